//! Errors from reading fixed-layout fields.

use thiserror::Error;

/// A fixed field could not be read.
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer ended inside a field.
    #[error("buffer ends at {offset:#x}: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// Result type for fixed-field reads.
pub type Result<T> = std::result::Result<T, Error>;
