//! Script-string table and declared asset pool.
//!
//! Both follow the asset-list header when their pointers are inline:
//!
//! ```text
//! script string ptr x count    each FFFFFFFF (string follows) or 0 (empty)
//! script strings               one NUL-terminated string per inline slot
//! asset entries x count        { u32 type, u32 ptr }
//! first asset
//! ```

use std::ops::Range;

use fastzone_common::{text, InlinePtr};
use tracing::debug;

use crate::definition::GameDefinition;
use crate::{AssetKind, Error, Result, ScanLimits, ZoneHeader};

/// Interned strings, resolved by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptStringTable {
    pub strings: Vec<String>,
    pub start: usize,
    pub end: usize,
}

impl ScriptStringTable {
    /// Read the table that starts right after the asset-list header.
    pub fn parse(data: &[u8], header: &ZoneHeader, limits: &ScanLimits, def: &GameDefinition) -> Result<Self> {
        let start = header.list_end;
        let count = header.script_string_count;
        if count == 0 || !header.script_strings.is_inline() {
            return Ok(Self {
                strings: Vec::new(),
                start,
                end: start,
            });
        }
        if count as usize > limits.max_script_strings {
            return Err(Error::CountTooLarge {
                what: "script string",
                count,
                limit: limits.max_script_strings,
            });
        }

        let slots_end = start + 4 * count as usize;
        if slots_end > data.len() {
            return Err(Error::OutOfBounds {
                what: "script string pointers",
                offset: start,
                len: data.len(),
            });
        }

        let mut strings = Vec::with_capacity(count as usize);
        let mut pos = slots_end;
        for i in 0..count as usize {
            let slot = def.endian.read_u32(&data[start + 4 * i..]);
            if slot != fastzone_common::INLINE_SENTINEL {
                strings.push(String::new());
                continue;
            }
            let (bytes, next) =
                text::cstr_span(data, pos, limits.max_string_len).ok_or(Error::OutOfBounds {
                    what: "script string",
                    offset: pos,
                    len: data.len(),
                })?;
            strings.push(text::lossy(bytes));
            pos = next;
        }

        Ok(Self {
            strings,
            start,
            end: pos,
        })
    }

    /// String at an index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Decoding state of one pool entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecordState {
    /// Not yet attempted.
    Pending,
    /// An asset was decoded for this entry.
    Decoded,
    /// No decoder exists for the type code.
    Unsupported,
    /// A decoder exists but no instance was found.
    Failed,
}

/// One declared asset.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetPoolRecord {
    /// Position in the pool.
    pub index: usize,
    /// Full 32-bit type field.
    pub raw_type: u32,
    /// Type code (low byte of the type field).
    pub code: u8,
    /// Engine name of the type, or `unknown_0xNN`.
    pub type_name: String,
    /// Decoder kind, if the type is supported.
    pub kind: Option<AssetKind>,
    pub state: RecordState,
    /// Decoded byte range.
    pub range: Option<Range<usize>>,
    pub name: Option<String>,
    pub summary: Option<String>,
    /// Index into the walk's asset list.
    pub asset: Option<usize>,
    /// Whether the asset came from heuristic recovery.
    pub recovered: bool,
}

/// The declared asset pool.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetPool {
    pub records: Vec<AssetPoolRecord>,
    /// Offset of the first entry.
    pub start: usize,
    /// Offset just past the last entry, where the first asset begins.
    pub end: usize,
}

impl AssetPool {
    /// Size of one pool entry.
    pub const ENTRY_SIZE: usize = 8;

    /// Read `header.asset_count` entries starting at `start`.
    pub fn parse(
        data: &[u8],
        header: &ZoneHeader,
        start: usize,
        limits: &ScanLimits,
        def: &GameDefinition,
    ) -> Result<Self> {
        let count = header.asset_count;
        if count as usize > limits.max_assets {
            return Err(Error::CountTooLarge {
                what: "asset",
                count,
                limit: limits.max_assets,
            });
        }

        if let InlinePtr::Unknown(raw) = header.assets {
            // Entries still follow the script strings in every shipped zone.
            debug!(pointer = raw, count, start, "asset pool pointer is not inline, reading entries in place");
        }

        let end = start + Self::ENTRY_SIZE * count as usize;
        if end > data.len() {
            return Err(Error::OutOfBounds {
                what: "asset pool",
                offset: start,
                len: data.len(),
            });
        }

        let records = (0..count as usize)
            .map(|index| {
                let raw_type = def.endian.read_u32(&data[start + Self::ENTRY_SIZE * index..]);
                let code = (raw_type & 0xFF) as u8;
                let kind = def.kind_for_code(code);
                AssetPoolRecord {
                    index,
                    raw_type,
                    code,
                    type_name: def.asset_type_name(code),
                    kind,
                    state: RecordState::Pending,
                    range: None,
                    name: None,
                    summary: None,
                    asset: None,
                    recovered: false,
                }
            })
            .collect();

        Ok(Self {
            records,
            start,
            end,
        })
    }

    /// Number of entries of a kind.
    pub fn count_of(&self, kind: AssetKind) -> usize {
        self.records.iter().filter(|r| r.kind == Some(kind)).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
