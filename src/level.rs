//! Compression level policy.
//!
//! Levels are a single integer knob trading encode speed for ratio. The
//! bounds and the default are fixed for the life of the process; a level is
//! chosen per call and leaves no trace in the emitted frame beyond its
//! effect on block sizing and match finding.

use crate::error::{Error, Result};

/// Lowest accepted compression level. Negative levels trade ratio for speed.
pub const CLEVEL_MIN: i32 = -5;
/// Highest accepted compression level.
pub const CLEVEL_MAX: i32 = 22;
/// Level used when the caller passes `0` or calls [`crate::compress_default`].
pub const CLEVEL_DEFAULT: i32 = 3;

/// Internal tuning derived from a level. Pure data; the block codec reads
/// it, nothing mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LevelParams {
    /// Maximum uncompressed bytes per block.
    pub block_size: usize,
    /// log2 of the match-table slot count.
    pub hash_log: u32,
    /// Bytes stepped over after a failed match probe. 1 inspects every
    /// position; negative levels step further and miss more matches.
    pub step: usize,
}

/// Validate a caller-supplied level and map it to codec tuning.
///
/// `0` is an alias for [`CLEVEL_DEFAULT`] and resolves to identical
/// parameters, so the two produce byte-identical frames.
pub(crate) fn resolve(level: i32) -> Result<LevelParams> {
    if !(CLEVEL_MIN..=CLEVEL_MAX).contains(&level) {
        return Err(Error::InvalidLevel(level));
    }
    let level = if level == 0 { CLEVEL_DEFAULT } else { level };
    Ok(match level {
        -5..=-1 => LevelParams {
            block_size: 64 << 10,
            hash_log: 12,
            step: 1 + (-level) as usize,
        },
        1..=3 => LevelParams {
            block_size: 128 << 10,
            hash_log: 14,
            step: 1,
        },
        4..=9 => LevelParams {
            block_size: 128 << 10,
            hash_log: 15,
            step: 1,
        },
        10..=16 => LevelParams {
            block_size: 256 << 10,
            hash_log: 16,
            step: 1,
        },
        _ => LevelParams {
            block_size: 512 << 10,
            hash_log: 17,
            step: 1,
        },
    })
}
