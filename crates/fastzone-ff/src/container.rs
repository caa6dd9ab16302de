//! FastFile access and the strategy driver.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, info};

use crate::header::RawHeader;
use crate::strategy::{self, Strategy};
use crate::{DecompressOptions, Error, ExtendedHeader, FastFileHeader, Game, Result};

/// Where the file bytes live.
enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Backing {
    fn bytes(&self) -> &[u8] {
        match self {
            Backing::Mapped(mmap) => mmap,
            Backing::Owned(data) => data,
        }
    }
}

/// An opened FastFile with its parsed header.
pub struct FastFile {
    data: Backing,
    name: String,
    header: FastFileHeader,
    extended: Option<ExtendedHeader>,
    payload_offset: usize,
}

impl FastFile {
    /// Memory-map and parse a FastFile from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Self::from_backing(Backing::Mapped(mmap), name)
    }

    /// Parse a FastFile already in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_backing(Backing::Owned(data), "memory".to_string())
    }

    fn from_backing(data: Backing, name: String) -> Result<Self> {
        let bytes = data.bytes();
        let header = FastFileHeader::parse(bytes)?;

        let (extended, payload_offset) = if header.game == Game::MW2 {
            let ext = ExtendedHeader::parse(bytes, RawHeader::SIZE, header.endian)
                .map_err(|e| match e {
                    Error::Common(inner) => Error::ExtendedHeader(inner.to_string()),
                    other => other,
                })?;
            let offset = RawHeader::SIZE + ext.len;
            (Some(ext), offset)
        } else {
            (None, RawHeader::SIZE)
        };

        debug!(
            name = %name,
            game = %header.game,
            platform = %header.platform,
            version = header.version,
            signed = header.is_signed(),
            payload_offset,
            "parsed FastFile header"
        );

        Ok(Self {
            data,
            name,
            header,
            extended,
            payload_offset,
        })
    }

    /// File name, or `memory` for in-memory files.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parsed container header.
    #[inline]
    pub fn header(&self) -> &FastFileHeader {
        &self.header
    }

    /// MW2's extended header, if present.
    #[inline]
    pub fn extended_header(&self) -> Option<&ExtendedHeader> {
        self.extended.as_ref()
    }

    /// Raw file bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.data.bytes()
    }

    /// Offset of the compressed stream.
    #[inline]
    pub fn payload_offset(&self) -> usize {
        self.payload_offset
    }

    /// The compressed stream.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.bytes()[self.payload_offset..]
    }

    /// Decompress with default limits.
    pub fn decompress(&self) -> Result<Decompressed> {
        self.decompress_with(&DecompressOptions::default())
    }

    /// Decompress, trying each applicable strategy in turn.
    pub fn decompress_with(&self, opts: &DecompressOptions) -> Result<Decompressed> {
        run_plan(&self.header, self.payload(), opts)
    }
}

impl std::fmt::Debug for FastFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastFile")
            .field("name", &self.name)
            .field("header", &self.header)
            .field("payload_offset", &self.payload_offset)
            .finish_non_exhaustive()
    }
}

/// How the zone buffer was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecompressReport {
    /// Strategy that produced the buffer.
    pub strategy: Strategy,
    /// Blocks or streams inflated.
    pub blocks_ok: usize,
    /// Blocks skipped after failing to inflate.
    pub blocks_failed: usize,
    /// Compressed bytes read.
    pub consumed: usize,
}

/// A decompressed zone buffer and its report.
#[derive(Debug)]
pub struct Decompressed {
    pub zone: Vec<u8>,
    pub report: DecompressReport,
}

/// Parse and decompress a FastFile held in a slice.
pub fn decompress(data: &[u8], opts: &DecompressOptions) -> Result<Decompressed> {
    let header = FastFileHeader::parse(data)?;
    let offset = if header.game == Game::MW2 {
        RawHeader::SIZE + ExtendedHeader::parse(data, RawHeader::SIZE, header.endian)?.len
    } else {
        RawHeader::SIZE
    };
    run_plan(&header, &data[offset..], opts)
}

fn run_plan(header: &FastFileHeader, payload: &[u8], opts: &DecompressOptions) -> Result<Decompressed> {
    let plan = strategy::plan(header);
    let mut last_err = None;

    for (i, &strategy) in plan.iter().enumerate() {
        match strategy::run(strategy, payload, header.endian, opts) {
            Ok(attempt) => {
                info!(
                    strategy = %strategy,
                    bytes = attempt.data.len(),
                    blocks = attempt.blocks_ok,
                    failed = attempt.blocks_failed,
                    "decompressed zone"
                );
                return Ok(Decompressed {
                    zone: attempt.data,
                    report: DecompressReport {
                        strategy,
                        blocks_ok: attempt.blocks_ok,
                        blocks_failed: attempt.blocks_failed,
                        consumed: attempt.consumed,
                    },
                });
            }
            Err(e @ Error::OutputTooLarge(_)) => return Err(e),
            Err(e) if i + 1 < plan.len() => {
                debug!(strategy = %strategy, error = %e, "strategy did not apply, trying next");
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or(Error::NoBlocksDecompressed {
        failed: 0,
        last_good: 0,
    }))
}
