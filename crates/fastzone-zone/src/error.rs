//! Error types for zone parsing.

use fastzone_ff::{Game, Platform};
use thiserror::Error;

/// Errors that stop a zone from being walked at all.
///
/// Individual assets that fail to decode are not errors; they end up as
/// `Failed` pool records.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] fastzone_common::Error),

    /// No definition exists for this combination.
    #[error("no zone definition for {game} on {platform}")]
    UnsupportedTarget { game: Game, platform: Platform },

    /// Zone buffer ends inside the fixed header.
    #[error("zone buffer too short: {len} bytes, header needs {needed}")]
    HeaderTooShort { len: usize, needed: usize },

    /// Declared counts are beyond anything the engine produces.
    #[error("declared {what} count {count} exceeds limit {limit}")]
    CountTooLarge {
        what: &'static str,
        count: u32,
        limit: usize,
    },

    /// Script-string table or asset array runs past the buffer.
    #[error("{what} at {offset:#x} runs past end of zone ({len} bytes)")]
    OutOfBounds {
        what: &'static str,
        offset: usize,
        len: usize,
    },
}

/// Result type for zone operations.
pub type Result<T> = std::result::Result<T, Error>;
