//! FastFile container reader for Call of Duty 4, World at War and Modern
//! Warfare 2.
//!
//! A FastFile is a small header followed by a compressed stream that
//! inflates to the zone buffer. Several block encodings were shipped over
//! the years:
//!
//! - Standard blocks: `u16` length prefix, zlib or raw deflate, 64 KiB each
//! - PC: one zlib stream, or `u32` little-endian length-prefixed blocks
//! - Xbox 360 signed files: concatenated zlib streams past a 0x4000 trailer,
//!   `u32` big-endian length-prefixed XBlocks, or one monolithic stream
//!
//! [`FastFile::decompress`] tries the strategies that apply to the detected
//! header in a fixed order and keeps the first one that produces data.
//!
//! # Example
//!
//! ```no_run
//! use fastzone_ff::FastFile;
//!
//! let ff = FastFile::open("common_mp.ff")?;
//! println!("{} {}", ff.header().game, ff.header().platform);
//!
//! let out = ff.decompress()?;
//! println!("{} bytes via {}", out.zone.len(), out.report.strategy);
//! # Ok::<(), fastzone_ff::Error>(())
//! ```

mod compress;
mod container;
mod error;
mod header;
mod inflate;
mod options;
mod strategy;

pub use compress::{compress_blocks, repack, END_MARKER_BE, END_MARKER_LE};
pub use container::{decompress, Decompressed, DecompressReport, FastFile};
pub use error::{Error, Result};
pub use header::{
    version_for, ExtendedHeader, FastFileHeader, Game, KnownVersion, Magic, Platform,
    RawHeader, VersionTarget, KNOWN_VERSIONS,
};
pub use inflate::{inflate_block, is_zlib_header, BLOCK_SIZE};
pub use options::DecompressOptions;
pub use strategy::{plan, Strategy};
