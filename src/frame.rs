//! Current container format (format version 8).
//!
//! Frame layout, all integers little-endian:
//!
//! ```text
//! [magic(4)][descriptor(1)][content size(1|2|4|8)][blocks...][crc32c(4)]
//! ```
//!
//! * **descriptor** – bits 0..1 select the content-size field width
//!   (1, 2, 4 or 8 bytes), bit 2 flags a trailing checksum, bits 3..7 are
//!   reserved and must be zero.
//! * **block header** – 3 bytes: bit 0 last-block, bits 1..2 block type,
//!   bits 3..23 size. Raw blocks store `size` literal bytes; RLE blocks
//!   store one byte regenerated `size` times; compressed blocks store a
//!   `size`-byte token stream (see [`crate::block`]).
//! * **crc32c** – CRC-32C of the decompressed content. The encoder always
//!   writes it; the decoder verifies it whenever the descriptor says it is
//!   present.
//!
//! A frame is self-delimiting and must account for every input byte:
//! trailing bytes after the checksum are an error, and any strict prefix of
//! a valid frame fails with `TruncatedFrame`. This includes the frame for
//! the empty input (a fixed 13-byte frame), which is deliberately given no
//! special leniency.

use serde::Serialize;
use tracing::trace;

use crate::block;
use crate::error::{Error, Result};
use crate::level::LevelParams;
use crate::reader::ByteReader;

/// Magic number opening every current-format frame, in emitted byte order.
pub const FRAME_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Format version number of frames this module emits.
pub(crate) const CURRENT_FORMAT: u8 = 8;

const FLAG_CHECKSUM: u8 = 0x04;
const DESCRIPTOR_RESERVED: u8 = !0x07;

const BLOCK_RAW: u32 = 0;
const BLOCK_RLE: u32 = 1;
const BLOCK_COMPRESSED: u32 = 2;

/// Header-only description of a frame, without decoding its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameInfo {
    /// Container format version, 1..=8.
    pub format_version: u8,
    /// Declared decompressed size, when the format records one up front.
    pub content_size: Option<u64>,
    /// Whether the frame carries a content checksum.
    pub checksum: bool,
    /// Whether a 4-byte legacy length prefix preceded the frame.
    pub length_prefix: bool,
}

fn size_width_code(content_size: u64) -> u8 {
    if content_size < 1 << 8 {
        0
    } else if content_size < 1 << 16 {
        1
    } else if content_size < 1 << 32 {
        2
    } else {
        3
    }
}

fn size_width(code: u8) -> usize {
    [1, 2, 4, 8][code as usize]
}

fn push_block_header(out: &mut Vec<u8>, last: bool, btype: u32, size: usize) {
    let word = (last as u32) | (btype << 1) | ((size as u32) << 3);
    out.extend_from_slice(&word.to_le_bytes()[..3]);
}

/// Encode `data` into a complete frame using already-resolved level tuning.
pub(crate) fn encode(data: &[u8], params: &LevelParams) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 2 + 16);
    out.extend_from_slice(&FRAME_MAGIC);

    let width_code = size_width_code(data.len() as u64);
    out.push(FLAG_CHECKSUM | width_code);
    out.extend_from_slice(&(data.len() as u64).to_le_bytes()[..size_width(width_code)]);

    if data.is_empty() {
        push_block_header(&mut out, true, BLOCK_RAW, 0);
    } else {
        let mut scratch = Vec::new();
        let block_count = data.len().div_ceil(params.block_size);
        for (i, chunk) in data.chunks(params.block_size).enumerate() {
            let last = i + 1 == block_count;
            if chunk.len() >= 2 && chunk.iter().all(|&b| b == chunk[0]) {
                push_block_header(&mut out, last, BLOCK_RLE, chunk.len());
                out.push(chunk[0]);
                continue;
            }
            scratch.clear();
            block::compress_block(chunk, params, &mut scratch);
            if scratch.len() < chunk.len() {
                push_block_header(&mut out, last, BLOCK_COMPRESSED, scratch.len());
                out.extend_from_slice(&scratch);
            } else {
                push_block_header(&mut out, last, BLOCK_RAW, chunk.len());
                out.extend_from_slice(chunk);
            }
        }
    }

    out.extend_from_slice(&crc32c::crc32c(data).to_le_bytes());
    out
}

/// Decode a current-format frame. The caller has already matched the magic.
pub(crate) fn decode(data: &[u8]) -> Result<Vec<u8>> {
    debug_assert!(data.starts_with(&FRAME_MAGIC));
    let mut r = ByteReader::new(&data[FRAME_MAGIC.len()..]);

    let desc = r.u8("frame descriptor")?;
    if desc & DESCRIPTOR_RESERVED != 0 {
        return Err(Error::CorruptFrame(format!(
            "reserved descriptor bits set: {desc:#04x}"
        )));
    }
    let content_size = r.uint_le(size_width(desc & 0x03), "content size")?;
    let content_size: usize = content_size
        .try_into()
        .map_err(|_| Error::CorruptFrame("content size exceeds address space".into()))?;

    let mut out = Vec::with_capacity(content_size.min(1 << 20));
    loop {
        let header = r.u24_le("block header")?;
        let last = header & 1 != 0;
        let btype = (header >> 1) & 0x03;
        let size = (header >> 3) as usize;
        trace!(btype, size, last, "decoding block");

        match btype {
            BLOCK_RAW => {
                let payload = r.bytes(size, "raw block payload")?;
                if out.len() + size > content_size {
                    return Err(Error::CorruptFrame(
                        "blocks regenerate more than declared content size".into(),
                    ));
                }
                out.extend_from_slice(payload);
            }
            BLOCK_RLE => {
                let byte = r.u8("rle block payload")?;
                if out.len() + size > content_size {
                    return Err(Error::CorruptFrame(
                        "blocks regenerate more than declared content size".into(),
                    ));
                }
                out.resize(out.len() + size, byte);
            }
            BLOCK_COMPRESSED => {
                let payload = r.bytes(size, "compressed block payload")?;
                let part = block::decompress_block(payload, content_size - out.len())?;
                out.extend_from_slice(&part);
            }
            _ => return Err(Error::CorruptFrame("reserved block type".into())),
        }

        if last {
            break;
        }
    }

    if out.len() != content_size {
        return Err(Error::CorruptFrame(format!(
            "declared content size {} but regenerated {} bytes",
            content_size,
            out.len()
        )));
    }

    if desc & FLAG_CHECKSUM != 0 {
        let stored = r.u32_le("content checksum")?;
        let actual = crc32c::crc32c(&out);
        if stored != actual {
            return Err(Error::CorruptFrame(format!(
                "content checksum mismatch: stored {stored:#010x}, computed {actual:#010x}"
            )));
        }
    }

    if !r.is_empty() {
        return Err(Error::CorruptFrame(format!(
            "{} trailing bytes after frame end",
            r.remaining()
        )));
    }

    Ok(out)
}

/// Read the frame header only. Used by [`crate::frame_info`].
pub(crate) fn info(data: &[u8]) -> Result<FrameInfo> {
    debug_assert!(data.starts_with(&FRAME_MAGIC));
    let mut r = ByteReader::new(&data[FRAME_MAGIC.len()..]);
    let desc = r.u8("frame descriptor")?;
    if desc & DESCRIPTOR_RESERVED != 0 {
        return Err(Error::CorruptFrame(format!(
            "reserved descriptor bits set: {desc:#04x}"
        )));
    }
    let content_size = r.uint_le(size_width(desc & 0x03), "content size")?;
    Ok(FrameInfo {
        format_version: CURRENT_FORMAT,
        content_size: Some(content_size),
        checksum: desc & FLAG_CHECKSUM != 0,
        length_prefix: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level;

    fn params() -> LevelParams {
        level::resolve(level::CLEVEL_DEFAULT).unwrap()
    }

    #[test]
    fn empty_input_minimal_frame() {
        let frame = encode(b"", &params());
        assert_eq!(
            frame,
            [0x28, 0xB5, 0x2F, 0xFD, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(decode(&frame).unwrap(), b"");
    }

    #[test]
    fn rle_block_chosen_for_runs() {
        let data = [0xAAu8; 5000];
        let frame = encode(&data, &params());
        // magic + descriptor + 2-byte size + block header + rle byte + crc
        assert_eq!(frame.len(), 4 + 1 + 2 + 3 + 1 + 4);
        assert_eq!(decode(&frame).unwrap(), data);
    }

    #[test]
    fn multi_block_input() {
        let p = LevelParams {
            block_size: 1 << 10,
            ..params()
        };
        let data: Vec<u8> = (0..40_000u32).map(|i| (i * 31 % 251) as u8).collect();
        let frame = encode(&data, &p);
        assert_eq!(decode(&frame).unwrap(), data);
    }

    #[test]
    fn trailing_bytes_are_corrupt() {
        let mut frame = encode(b"trailing", &params());
        frame.push(0);
        assert!(matches!(decode(&frame), Err(Error::CorruptFrame(_))));
    }

    #[test]
    fn reserved_descriptor_bits_are_corrupt() {
        let mut frame = encode(b"descriptor", &params());
        frame[4] |= 0x80;
        assert!(matches!(decode(&frame), Err(Error::CorruptFrame(_))));
    }
}
