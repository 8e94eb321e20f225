//! Frame-oriented compression codec with a stable binary container format.
//!
//! [`compress`] wraps a byte sequence in a self-delimiting frame: a 4-byte
//! magic, a content-size header, one or more raw/RLE/LZ-compressed blocks
//! and a CRC-32C trailer. [`decompress`] inspects the leading magic and
//! routes to the current decoder or, for the seven pre-standard container
//! layouts, to the legacy adapter in [`mod@legacy`]. Round trips are exact
//! for every input and every valid level, and encoding is byte-for-byte
//! deterministic for a fixed `(input, level)` pair.
//!
//! All operations are pure functions over caller-owned slices: no I/O, no
//! global state, safe to call from any number of threads at once.
//!
//! ```
//! let frame = strata::compress(b"pack my box with five dozen liquor jugs\n", 0)?;
//! assert_eq!(frame[..4], strata::FRAME_MAGIC);
//! assert_eq!(
//!     strata::decompress(&frame)?,
//!     b"pack my box with five dozen liquor jugs\n"
//! );
//! # Ok::<(), strata::Error>(())
//! ```

mod block;
mod error;
mod frame;
pub mod legacy;
mod level;
mod reader;

pub use error::{Error, Result};
pub use frame::{FrameInfo, FRAME_MAGIC};
pub use legacy::MIN_LEGACY_FORMAT;
pub use level::{CLEVEL_DEFAULT, CLEVEL_MAX, CLEVEL_MIN};

use tracing::{debug, warn};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate version as `major * 10000 + minor * 100 + patch`.
pub const VERSION_NUMBER: u32 = 200;

/// Compress `data` into a complete frame.
///
/// `level` ranges over [`CLEVEL_MIN`]`..=`[`CLEVEL_MAX`]; `0` is an alias
/// for [`CLEVEL_DEFAULT`]. The empty input is legal and produces a minimal
/// valid frame.
pub fn compress(data: &[u8], level: i32) -> Result<Vec<u8>> {
    let params = level::resolve(level)?;
    Ok(frame::encode(data, &params))
}

/// [`compress`] at the default level.
pub fn compress_default(data: &[u8]) -> Result<Vec<u8>> {
    compress(data, CLEVEL_DEFAULT)
}

/// Decompress a frame of any supported format version.
///
/// The first four bytes select the format: the current magic, one of the
/// seven legacy magics, or an optional legacy length prefix ahead of a
/// legacy magic. Output is returned only when the whole input is consumed.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    decompress_with_floor(data, MIN_LEGACY_FORMAT)
}

/// Header-only inspection: format version, declared content size when the
/// format records one, checksum flag and length-prefix presence. Does not
/// decode payloads and ignores the legacy support floor.
pub fn frame_info(data: &[u8]) -> Result<FrameInfo> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    if data.len() < 4 {
        return Err(short_input_error(data));
    }
    match legacy::resolve_format(&data[..4]) {
        Some(8) => frame::info(data),
        Some(v) => legacy::info(v, data),
        None => match legacy::parse_length_prefix(data) {
            Some((declared, v)) => {
                let mut info = legacy::info(v, &data[4..])?;
                info.content_size = Some(declared);
                info.length_prefix = true;
                Ok(info)
            }
            None => Err(Error::UnrecognizedFormat(data[..4].to_vec())),
        },
    }
}

fn short_input_error(data: &[u8]) -> Error {
    if legacy::is_magic_prefix(data) {
        Error::TruncatedFrame("frame magic")
    } else {
        Error::UnrecognizedFormat(data.to_vec())
    }
}

/// Single point where a frame's format version is resolved and the legacy
/// support floor is enforced.
fn decompress_with_floor(data: &[u8], floor: u8) -> Result<Vec<u8>> {
    if data.len() < 4 {
        return Err(short_input_error(data));
    }
    match legacy::resolve_format(&data[..4]) {
        Some(8) => {
            debug!(version = 8, len = data.len(), "decoding current-format frame");
            frame::decode(data)
        }
        Some(v) if v >= floor => {
            debug!(version = v, len = data.len(), "decoding legacy frame");
            legacy::decode(v, data)
        }
        Some(v) => Err(Error::UnsupportedLegacyFormat(v)),
        None => match legacy::parse_length_prefix(data) {
            Some((declared, v)) => {
                if v < floor {
                    return Err(Error::UnsupportedLegacyFormat(v));
                }
                debug!(version = v, declared, "decoding length-prefixed legacy frame");
                let out = legacy::decode(v, &data[4..])?;
                if out.len() as u64 != declared {
                    return Err(Error::CorruptFrame(format!(
                        "length prefix declares {} bytes but frame regenerated {}",
                        declared,
                        out.len()
                    )));
                }
                Ok(out)
            }
            None => Err(Error::UnrecognizedFormat(data[..4].to_vec())),
        },
    }
}

/// Pre-0.2 name for [`compress`]. Forwards unchanged.
#[deprecated(since = "0.2.0", note = "renamed to `compress`")]
pub fn pack(data: &[u8], level: i32) -> Result<Vec<u8>> {
    warn!("pack() is deprecated, use compress()");
    compress(data, level)
}

/// Pre-0.2 name for [`decompress`]. Forwards unchanged.
#[deprecated(since = "0.2.0", note = "renamed to `decompress`")]
pub fn unpack(data: &[u8]) -> Result<Vec<u8>> {
    warn!("unpack() is deprecated, use decompress()");
    decompress(data)
}
