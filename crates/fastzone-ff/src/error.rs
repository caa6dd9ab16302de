//! Error types for the FastFile crate.

use thiserror::Error;

use crate::Strategy;

/// Errors that can occur when reading FastFile containers.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] fastzone_common::Error),

    /// File is shorter than the fixed container header.
    #[error("file too short for a FastFile header: {0} bytes")]
    TooShort(usize),

    /// Magic did not match either known tag.
    #[error("invalid FastFile magic: {0:?}")]
    InvalidMagic([u8; 8]),

    /// Version field matched no known (game, platform) constant in either byte order.
    #[error("unknown FastFile version: {big:#010x} (big-endian) / {little:#010x} (little-endian)")]
    UnknownVersion { big: u32, little: u32 },

    /// Game-specific extended header could not be read.
    #[error("malformed extended header: {0}")]
    ExtendedHeader(String),

    /// A single decompression strategy did not apply.
    #[error("{strategy} failed: {reason}")]
    StrategyFailed { strategy: Strategy, reason: String },

    /// Too many standard blocks failed to inflate.
    #[error("{failed} blocks failed to decompress (last good position {last_good:#x})")]
    TooManyBlockFailures { failed: usize, last_good: usize },

    /// Not a single block decompressed.
    #[error("no blocks decompressed ({failed} failed, last good position {last_good:#x})")]
    NoBlocksDecompressed { failed: usize, last_good: usize },

    /// Inflate error.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// Deflate error.
    #[error("compression error: {0}")]
    Compression(String),

    /// Output would exceed the configured ceiling.
    #[error("decompressed size exceeds limit of {0} bytes")]
    OutputTooLarge(usize),

    /// No version constant exists for the requested combination.
    #[error("no FastFile version known for {0}")]
    NoVersion(String),
}

/// Result type for FastFile operations.
pub type Result<T> = std::result::Result<T, Error>;
