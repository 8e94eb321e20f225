use quickcheck::quickcheck;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata::{compress, compress_default, decompress, CLEVEL_DEFAULT, CLEVEL_MAX, CLEVEL_MIN};

fn random_128kb() -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(0x5742_A7A7);
    (0..128 * 1024).map(|_| rng.gen()).collect()
}

fn cases() -> Vec<Vec<u8>> {
    vec![
        Vec::new(),
        b"a".to_vec(),
        b"pack my box with five dozen liquor jugs\n".to_vec(),
        vec![0u8; 70_000],
        b"the quick brown fox jumps over the lazy dog "
            .iter()
            .cycle()
            .take(200_000)
            .copied()
            .collect(),
        random_128kb(),
    ]
}

#[test]
fn roundtrip_all_levels() {
    for level in CLEVEL_MIN..=CLEVEL_MAX {
        // 0 aliases the default level and is covered below.
        if level == 0 {
            continue;
        }
        for data in cases() {
            let frame = compress(&data, level).unwrap();
            assert_eq!(decompress(&frame).unwrap(), data, "level {level}");
        }
    }
}

#[test]
fn default_level_aliases_are_byte_identical() {
    for data in cases() {
        let explicit = compress(&data, CLEVEL_DEFAULT).unwrap();
        assert_eq!(compress(&data, 0).unwrap(), explicit);
        assert_eq!(compress_default(&data).unwrap(), explicit);
    }
}

#[test]
fn encoding_is_deterministic() {
    for data in cases() {
        for level in [CLEVEL_MIN, -1, 1, CLEVEL_DEFAULT, 9, CLEVEL_MAX] {
            assert_eq!(
                compress(&data, level).unwrap(),
                compress(&data, level).unwrap()
            );
        }
    }
}

#[test]
fn pangram_roundtrip_at_default_level() {
    let data = "pack my box with five dozen liquor jugs\n".as_bytes();
    let frame = compress(data, CLEVEL_DEFAULT).unwrap();
    assert_eq!(decompress(&frame).unwrap(), data);
}

#[test]
fn concurrent_roundtrips() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let data: Vec<u8> = (0..50_000u32).map(|j| ((i * 7 + j) % 251) as u8).collect();
                for level in [-3, 1, CLEVEL_DEFAULT, 12] {
                    let frame = compress(&data, level).unwrap();
                    assert_eq!(decompress(&frame).unwrap(), data);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

quickcheck! {
    fn roundtrip_arbitrary(data: Vec<u8>) -> bool {
        let frame = compress(&data, CLEVEL_DEFAULT).unwrap();
        decompress(&frame).unwrap() == data
    }

    fn roundtrip_arbitrary_fast_level(data: Vec<u8>) -> bool {
        let frame = compress(&data, CLEVEL_MIN).unwrap();
        decompress(&frame).unwrap() == data
    }
}
