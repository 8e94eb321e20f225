//! Every strict prefix of a valid frame must fail to decode, and fail as a
//! truncation rather than as garbage or corruption.

use proptest::prelude::*;
use strata::{compress, decompress, Error, CLEVEL_DEFAULT, CLEVEL_MIN};

fn assert_all_prefixes_fail(frame: &[u8]) {
    for i in 1..frame.len() {
        match decompress(&frame[..i]) {
            Err(Error::TruncatedFrame(_)) => {}
            other => panic!("prefix of {i}/{} bytes: expected truncation, got {other:?}", frame.len()),
        }
    }
}

#[test]
fn prefixes_of_text_frame_fail() {
    let frame = compress(b"pack my box with five dozen liquor jugs\n", CLEVEL_DEFAULT).unwrap();
    assert_all_prefixes_fail(&frame);
}

#[test]
fn prefixes_of_multi_block_frame_fail() {
    let data: Vec<u8> = (0..150_000u32).map(|i| (i % 253) as u8).collect();
    let frame = compress(&data, CLEVEL_MIN).unwrap();
    // The full frame is large; probing every prefix of every block is slow
    // and redundant, so sample the structural boundaries plus a spread.
    for i in (1..64).chain((64..frame.len()).step_by(97)) {
        assert!(
            matches!(decompress(&frame[..i]), Err(Error::TruncatedFrame(_))),
            "prefix of {i} bytes"
        );
    }
}

#[test]
fn prefixes_of_empty_input_frame_fail() {
    // The format gives the empty-input frame no special leniency.
    let frame = compress(b"", CLEVEL_DEFAULT).unwrap();
    assert_all_prefixes_fail(&frame);
}

proptest! {
    #[test]
    fn arbitrary_frames_reject_all_prefixes(
        data in proptest::collection::vec(any::<u8>(), 1..400),
        level in prop_oneof![Just(-5), Just(-1), Just(1), Just(3), Just(19)],
    ) {
        let frame = compress(&data, level).unwrap();
        for i in 1..frame.len() {
            prop_assert!(matches!(
                decompress(&frame[..i]),
                Err(Error::TruncatedFrame(_))
            ));
        }
    }
}
