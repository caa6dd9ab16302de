//! Common utilities for fastzone.
//!
//! This crate provides the foundational pieces shared by the container and
//! zone crates:
//!
//! - [`Endian`] - Big/little-endian primitive codec over byte slices
//! - [`BinaryReader`] - Endian-aware cursor for structured reads
//! - [`InlinePtr`] - The engine's `0xFFFFFFFF` "data follows" pointer sentinel
//! - [`scan`] - memchr-backed pattern and sentinel-run searching
//! - [`text`] - Bounded null-terminated string extraction

mod endian;
mod error;
mod pointer;
mod reader;

pub mod scan;
pub mod text;

pub use endian::Endian;
pub use error::{Error, Result};
pub use pointer::{InlinePtr, INLINE_SENTINEL};
pub use reader::BinaryReader;

/// `memchr`, for callers that search zone buffers directly.
pub use memchr;
