//! Zone buffer decoding for Call of Duty 4, World at War and Modern Warfare 2.
//!
//! A zone is the decompressed payload of a FastFile. It starts with a small
//! header and a declared asset pool, followed by the assets themselves laid
//! out back to back with no index. This crate reads the pool, decodes every
//! asset it can place, and falls back to byte-pattern search once the
//! sequential layout can no longer be followed.
//!
//! # Quick Start
//!
//! ```no_run
//! use fastzone_ff::FastFile;
//! use fastzone_zone::{RecordState, Zone};
//!
//! let ff = FastFile::open("common_mp.ff")?;
//! let header = *ff.header();
//! let zone = Zone::parse(ff.decompress()?.zone, header.game, header.platform)?;
//!
//! let walk = zone.walk();
//! for record in &walk.records {
//!     if record.state == RecordState::Decoded {
//!         println!("{:>12} {}", record.type_name, record.name.as_deref().unwrap_or(""));
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Layers
//!
//! - **Definitions** ([`GameDefinition`]): per-(game, platform) byte order,
//!   header offsets, type codes and structure offsets
//! - **Decoders** ([`decode`]): one pure function per asset kind
//! - **Recovery** ([`recovery`]): sentinel search with plausibility guards
//! - **Walker** ([`walker`]): sequential pool walk, then per-kind recovery

pub mod asset;
pub mod decode;
pub mod definition;
mod error;
mod header;
mod limits;
pub mod pool;
pub mod recovery;
pub mod walker;
mod zone;

use std::hash::BuildHasherDefault;

use rustc_hash::FxHasher;

pub use asset::{
    Asset, ImageAsset, ImageLoad, LocalizedEntry, Material, MenuList, RawFile, StringTable,
    TechSet, WeaponAsset, WeaponConfidence, XAnimParts,
};
pub use definition::{AssetKind, AssetType, GameDefinition};
pub use error::{Error, Result};
pub use header::ZoneHeader;
pub use limits::ScanLimits;
pub use pool::{AssetPool, AssetPoolRecord, RecordState, ScriptStringTable};
pub use walker::{WalkMode, WalkResult};
pub use zone::Zone;

/// `hashbrown` map with the Fx hasher.
pub type FxHashMap<K, V> = hashbrown::HashMap<K, V, BuildHasherDefault<FxHasher>>;
/// `hashbrown` set with the Fx hasher.
pub type FxHashSet<T> = hashbrown::HashSet<T, BuildHasherDefault<FxHasher>>;
