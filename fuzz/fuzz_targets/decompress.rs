use honggfuzz::fuzz;

// Arbitrary bytes must never panic the decoder; they may only produce a
// frame or a typed error.
fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let _ = strata::decompress(data);
        });
    }
}
