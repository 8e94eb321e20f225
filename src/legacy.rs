//! Legacy Format Adapter.
//!
//! Seven container layouts predate the current format. Each is identified
//! by its own 4-byte magic and decoded by its own routine; none of them are
//! ever emitted by this crate. Layouts, all integers little-endian:
//!
//! * **v1** – magic, u32 content size, raw content.
//! * **v2** – magic, stored blocks `u16 len | bytes`, terminated by a zero
//!   length.
//! * **v3** – magic, tagged blocks (`0x00` raw, `0x01` RLE), `0xFF` end
//!   marker followed by a u32 content size cross-check.
//! * **v4** – magic, u32 content size, u16 block headers
//!   (bit 15 last, bits 0..14 raw length).
//! * **v5** – v4 plus an RLE flag in bit 14 (bits 0..13 length).
//! * **v6** – v5 plus a trailing CRC-32C of the content.
//! * **v7** – magic, descriptor (bit 0 checksum, rest reserved), u32 content
//!   size, 3-byte block headers in the current layout (raw and RLE only),
//!   optional trailing CRC-32C.
//!
//! Some early producers additionally prepended a 4-byte length field ahead
//! of the magic declaring the decompressed size; see
//! [`parse_length_prefix`]. That prefix is an adapter convention, not part
//! of any frame.
//!
//! Support for all of this is a build capability: the `legacy` cargo
//! feature sets [`MIN_LEGACY_FORMAT`] to 1, and without it the floor is the
//! current format. The floor is enforced once, at format resolution in
//! [`crate::decompress`] — known magics below it fail with
//! `UnsupportedLegacyFormat`, never with `UnrecognizedFormat`.

use crate::error::{Error, Result};
use crate::frame;
use crate::reader::ByteReader;

/// Oldest container format version this build can decode, 1..=8.
pub const MIN_LEGACY_FORMAT: u8 = if cfg!(feature = "legacy") { 1 } else { 8 };

/// Magics of the seven legacy layouts, oldest first, in emitted byte order.
const LEGACY_MAGICS: [[u8; 4]; 7] = [
    [0xFD, 0x2F, 0xB5, 0x1E],
    [0x22, 0xB5, 0x2F, 0xFD],
    [0x23, 0xB5, 0x2F, 0xFD],
    [0x24, 0xB5, 0x2F, 0xFD],
    [0x25, 0xB5, 0x2F, 0xFD],
    [0x26, 0xB5, 0x2F, 0xFD],
    [0x27, 0xB5, 0x2F, 0xFD],
];

/// Early producers never wrote frames larger than this, which keeps the
/// length prefix distinguishable from every known magic (all of which have
/// 0xFD or 0x1E in the high byte).
const MAX_PREFIX_LENGTH: u32 = 0x8000_0000;

/// Map a 4-byte magic to a container format version (1..=8).
pub(crate) fn resolve_format(magic: &[u8]) -> Option<u8> {
    if magic == &frame::FRAME_MAGIC[..] {
        return Some(frame::CURRENT_FORMAT);
    }
    LEGACY_MAGICS
        .iter()
        .position(|m| &m[..] == magic)
        .map(|i| i as u8 + 1)
}

/// True if `data` could still grow into a known magic.
pub(crate) fn is_magic_prefix(data: &[u8]) -> bool {
    frame::FRAME_MAGIC.starts_with(data)
        || LEGACY_MAGICS.iter().any(|m| m.starts_with(data))
}

/// Recognize the optional legacy length prefix: a u32 declared length
/// followed by a known legacy magic. Returns the declared length and the
/// inner legacy version.
pub(crate) fn parse_length_prefix(data: &[u8]) -> Option<(u64, u8)> {
    if data.len() < 8 {
        return None;
    }
    let declared = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if declared > MAX_PREFIX_LENGTH {
        return None;
    }
    match resolve_format(&data[4..8]) {
        Some(v) if v < frame::CURRENT_FORMAT => Some((declared as u64, v)),
        _ => None,
    }
}

/// Decode a legacy frame of the given version, magic included.
pub(crate) fn decode(version: u8, data: &[u8]) -> Result<Vec<u8>> {
    let body = &data[4..];
    match version {
        1 => decode_v1(body),
        2 => decode_v2(body),
        3 => decode_v3(body),
        4 => decode_v4(body),
        5 => decode_v5_v6(body, false),
        6 => decode_v5_v6(body, true),
        7 => decode_v7(body),
        _ => unreachable!("not a legacy version: {version}"),
    }
}

/// Header-only inspection of a legacy frame. v2 and v3 do not record the
/// content size up front, so it is reported as unknown.
pub(crate) fn info(version: u8, data: &[u8]) -> Result<frame::FrameInfo> {
    let mut r = ByteReader::new(&data[4..]);
    let (content_size, checksum) = match version {
        1 => (Some(r.u32_le("content size")? as u64), false),
        2 | 3 => (None, false),
        4 | 5 => (Some(r.u32_le("content size")? as u64), false),
        6 => (Some(r.u32_le("content size")? as u64), true),
        7 => {
            let desc = r.u8("frame descriptor")?;
            (Some(r.u32_le("content size")? as u64), desc & 1 != 0)
        }
        _ => unreachable!("not a legacy version: {version}"),
    };
    Ok(frame::FrameInfo {
        format_version: version,
        content_size,
        checksum,
        length_prefix: false,
    })
}

fn reject_trailing(r: &ByteReader) -> Result<()> {
    if !r.is_empty() {
        return Err(Error::CorruptFrame(format!(
            "{} trailing bytes after frame end",
            r.remaining()
        )));
    }
    Ok(())
}

fn decode_v1(body: &[u8]) -> Result<Vec<u8>> {
    let mut r = ByteReader::new(body);
    let size = r.u32_le("content size")? as usize;
    let out = r.bytes(size, "frame content")?.to_vec();
    reject_trailing(&r)?;
    Ok(out)
}

fn decode_v2(body: &[u8]) -> Result<Vec<u8>> {
    let mut r = ByteReader::new(body);
    let mut out = Vec::new();
    loop {
        let len = r.u16_le("block header")? as usize;
        if len == 0 {
            break;
        }
        out.extend_from_slice(r.bytes(len, "stored block")?);
    }
    reject_trailing(&r)?;
    Ok(out)
}

const V3_TAG_RAW: u8 = 0x00;
const V3_TAG_RLE: u8 = 0x01;
const V3_TAG_END: u8 = 0xFF;

fn decode_v3(body: &[u8]) -> Result<Vec<u8>> {
    let mut r = ByteReader::new(body);
    let mut out = Vec::new();
    loop {
        match r.u8("block tag")? {
            V3_TAG_RAW => {
                let len = r.u16_le("block header")? as usize;
                out.extend_from_slice(r.bytes(len, "raw block")?);
            }
            V3_TAG_RLE => {
                let len = r.u16_le("block header")? as usize;
                let byte = r.u8("rle byte")?;
                out.resize(out.len() + len, byte);
            }
            V3_TAG_END => {
                let declared = r.u32_le("end marker")? as usize;
                if declared != out.len() {
                    return Err(Error::CorruptFrame(format!(
                        "end marker declares {} bytes but frame regenerated {}",
                        declared,
                        out.len()
                    )));
                }
                break;
            }
            tag => {
                return Err(Error::CorruptFrame(format!("unknown block tag {tag:#04x}")));
            }
        }
    }
    reject_trailing(&r)?;
    Ok(out)
}

fn decode_v4(body: &[u8]) -> Result<Vec<u8>> {
    let mut r = ByteReader::new(body);
    let declared = r.u32_le("content size")? as usize;
    let mut out = Vec::new();
    loop {
        let header = r.u16_le("block header")?;
        let last = header & 0x8000 != 0;
        let len = (header & 0x7FFF) as usize;
        out.extend_from_slice(r.bytes(len, "raw block")?);
        if last {
            break;
        }
    }
    check_declared(declared, &out)?;
    reject_trailing(&r)?;
    Ok(out)
}

fn decode_v5_v6(body: &[u8], checksummed: bool) -> Result<Vec<u8>> {
    let mut r = ByteReader::new(body);
    let declared = r.u32_le("content size")? as usize;
    let mut out = Vec::new();
    loop {
        let header = r.u16_le("block header")?;
        let last = header & 0x8000 != 0;
        let rle = header & 0x4000 != 0;
        let len = (header & 0x3FFF) as usize;
        if rle {
            let byte = r.u8("rle byte")?;
            out.resize(out.len() + len, byte);
        } else {
            out.extend_from_slice(r.bytes(len, "raw block")?);
        }
        if last {
            break;
        }
    }
    check_declared(declared, &out)?;
    if checksummed {
        check_crc(&mut r, &out)?;
    }
    reject_trailing(&r)?;
    Ok(out)
}

fn decode_v7(body: &[u8]) -> Result<Vec<u8>> {
    let mut r = ByteReader::new(body);
    let desc = r.u8("frame descriptor")?;
    if desc & !0x01 != 0 {
        return Err(Error::CorruptFrame(format!(
            "reserved descriptor bits set: {desc:#04x}"
        )));
    }
    let declared = r.u32_le("content size")? as usize;
    let mut out = Vec::new();
    loop {
        let header = r.u24_le("block header")?;
        let last = header & 1 != 0;
        let btype = (header >> 1) & 0x03;
        let len = (header >> 3) as usize;
        match btype {
            0 => out.extend_from_slice(r.bytes(len, "raw block")?),
            1 => {
                let byte = r.u8("rle byte")?;
                out.resize(out.len() + len, byte);
            }
            t => {
                return Err(Error::CorruptFrame(format!(
                    "block type {t} reserved in this format"
                )));
            }
        }
        if last {
            break;
        }
    }
    check_declared(declared, &out)?;
    if desc & 0x01 != 0 {
        check_crc(&mut r, &out)?;
    }
    reject_trailing(&r)?;
    Ok(out)
}

fn check_declared(declared: usize, out: &[u8]) -> Result<()> {
    if declared != out.len() {
        return Err(Error::CorruptFrame(format!(
            "declared content size {} but frame regenerated {} bytes",
            declared,
            out.len()
        )));
    }
    Ok(())
}

fn check_crc(r: &mut ByteReader, out: &[u8]) -> Result<()> {
    let stored = r.u32_le("content checksum")?;
    let actual = crc32c::crc32c(out);
    if stored != actual {
        return Err(Error::CorruptFrame(format!(
            "content checksum mismatch: stored {stored:#010x}, computed {actual:#010x}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_table_is_ordered_and_distinct() {
        for (i, magic) in LEGACY_MAGICS.iter().enumerate() {
            assert_eq!(resolve_format(magic), Some(i as u8 + 1));
        }
        assert_eq!(resolve_format(&frame::FRAME_MAGIC), Some(8));
        assert_eq!(resolve_format(&[0x00, 0x11, 0x22, 0x33]), None);
    }

    #[test]
    fn magic_prefix_detection() {
        assert!(is_magic_prefix(&[0x28]));
        assert!(is_magic_prefix(&[0xFD, 0x2F]));
        assert!(is_magic_prefix(&[0x22, 0xB5, 0x2F]));
        assert!(!is_magic_prefix(&[0x29]));
        assert!(!is_magic_prefix(&[0x28, 0xB6]));
    }

    #[test]
    fn length_prefix_rejects_oversize_declarations() {
        let mut data = Vec::new();
        data.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
        data.extend_from_slice(&LEGACY_MAGICS[0]);
        assert_eq!(parse_length_prefix(&data), None);

        let mut data = Vec::new();
        data.extend_from_slice(&12u32.to_le_bytes());
        data.extend_from_slice(&LEGACY_MAGICS[3]);
        assert_eq!(parse_length_prefix(&data), Some((12, 4)));
    }

    #[test]
    fn length_prefix_never_wraps_current_format() {
        let mut data = Vec::new();
        data.extend_from_slice(&12u32.to_le_bytes());
        data.extend_from_slice(&frame::FRAME_MAGIC);
        assert_eq!(parse_length_prefix(&data), None);
    }
}
