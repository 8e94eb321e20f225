use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|input: (Vec<u8>, i8)| {
            let (data, level) = input;
            let level = strata::CLEVEL_MIN
                + (level as i32 - i8::MIN as i32)
                    % (strata::CLEVEL_MAX - strata::CLEVEL_MIN + 1);
            let frame = strata::compress(&data, level).unwrap();
            assert_eq!(strata::decompress(&frame).unwrap(), data);
        });
    }
}
