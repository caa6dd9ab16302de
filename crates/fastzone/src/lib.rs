//! fastzone - Call of Duty FastFile decompression and zone asset decoding.
//!
//! This crate ties the fastzone crates together into a single pipeline:
//! open a FastFile, inflate its zone buffer, read the declared asset pool
//! and decode every asset it can.
//!
//! # Crates
//!
//! - [`fastzone_common`] - Endian codec, inline pointers, sentinel scanning
//! - [`fastzone_ff`] - FastFile header detection, decompression and repacking
//! - [`fastzone_zone`] - Zone definitions, asset decoders, recovery and walker
//!
//! # Example
//!
//! ```no_run
//! use fastzone::prelude::*;
//!
//! let decoded = fastzone::open("patch_mp.ff")?;
//! println!(
//!     "{} {}: {} assets via {}",
//!     decoded.header.game,
//!     decoded.header.platform,
//!     decoded.walk.assets.len(),
//!     decoded.report.strategy
//! );
//!
//! for raw in decoded.walk.assets_of(AssetKind::RawFile) {
//!     if let Asset::RawFile(raw) = raw {
//!         let len = raw.contents(decoded.zone.data()).map_or(0, <[u8]>::len);
//!         println!("{} ({} bytes)", raw.name, len);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::info;

pub use fastzone_common as common;
pub use fastzone_ff as ff;
pub use fastzone_zone as zone;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use fastzone_common::{Endian, InlinePtr};
    pub use fastzone_ff::{
        DecompressOptions, DecompressReport, FastFile, FastFileHeader, Game, Platform, Strategy,
    };
    pub use fastzone_zone::{
        Asset, AssetKind, AssetPoolRecord, AssetType, GameDefinition, RecordState, ScanLimits,
        WalkResult, Zone,
    };

    pub use crate::{DecodedZone, Options};
}

use fastzone_ff::{DecompressOptions, DecompressReport, FastFile, FastFileHeader};
use fastzone_zone::{GameDefinition, ScanLimits, WalkResult, Zone};

/// Errors from the full pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Container could not be read or inflated.
    #[error(transparent)]
    Container(#[from] fastzone_ff::Error),

    /// Zone header or pool could not be read.
    #[error(transparent)]
    Zone(#[from] fastzone_zone::Error),
}

/// Result type for the pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Every tunable of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    pub decompress: DecompressOptions,
    pub limits: ScanLimits,
}

/// A fully decoded FastFile.
#[derive(Debug)]
pub struct DecodedZone {
    pub header: FastFileHeader,
    pub report: DecompressReport,
    pub zone: Zone,
    pub walk: WalkResult,
}

/// Open, inflate and walk a FastFile with default options.
pub fn open<P: AsRef<Path>>(path: P) -> Result<DecodedZone> {
    open_with(path, &Options::default())
}

/// Open, inflate and walk a FastFile.
pub fn open_with<P: AsRef<Path>>(path: P, opts: &Options) -> Result<DecodedZone> {
    decode(&FastFile::open(path)?, opts)
}

/// Inflate and walk a FastFile held in memory.
pub fn decode_bytes(data: Vec<u8>, opts: &Options) -> Result<DecodedZone> {
    decode(&FastFile::from_bytes(data)?, opts)
}

/// Inflate and walk an opened FastFile.
pub fn decode(ff: &FastFile, opts: &Options) -> Result<DecodedZone> {
    let header = *ff.header();
    let def = GameDefinition::lookup(header.game, header.platform)?;
    let out = ff.decompress_with(&opts.decompress)?;
    let zone = Zone::with_limits(out.zone, def, opts.limits.clone())?;
    let walk = zone.walk();

    info!(
        name = ff.name(),
        definition = %def,
        declared = walk.records.len(),
        decoded = walk.assets.len(),
        "decoded zone"
    );

    Ok(DecodedZone {
        header,
        report: out.report,
        zone,
        walk,
    })
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
