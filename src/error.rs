use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the codec.
///
/// Every failure carries at least its kind; decode failures additionally
/// name the structure that was being parsed. No partial output is ever
/// returned alongside an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Input was not a plain byte buffer.
    ///
    /// In this crate the byte-sequence requirement is enforced by the type
    /// system, so the core never constructs this variant; it exists for
    /// embedding layers (FFI, scripting bindings) that accept polymorphic
    /// input and must reject text without guessing an encoding.
    #[error("input is not a byte buffer: {0}")]
    InvalidInput(String),

    /// Compression level outside `[CLEVEL_MIN, CLEVEL_MAX]`.
    #[error("compression level out of range: {0}")]
    InvalidLevel(i32),

    /// Decode called on a zero-length input.
    #[error("cannot decompress empty input")]
    EmptyInput,

    /// Leading bytes match no known format magic.
    #[error("unrecognized frame magic {}", hex::encode(.0))]
    UnrecognizedFormat(Vec<u8>),

    /// The magic is a known legacy format, but this build's floor
    /// (`MIN_LEGACY_FORMAT`) excludes it.
    #[error("legacy format v{0} not supported by this build")]
    UnsupportedLegacyFormat(u8),

    /// Input ends before the frame does. The payload names the structure
    /// that could not be read in full.
    #[error("truncated frame: unexpected end of input in {0}")]
    TruncatedFrame(&'static str),

    /// The frame is structurally present but inconsistent: checksum
    /// mismatch, reserved bits set, declared sizes that do not add up.
    #[error("corrupt frame: {0}")]
    CorruptFrame(String),
}
