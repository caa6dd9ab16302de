//! Decoded asset values.
//!
//! Assets copy out names and scalars and keep `[start, end)` ranges into the
//! zone buffer for everything bulky. None of them borrow the buffer, so a
//! decoded collection can outlive a re-scan.

use std::ops::Range;

use crate::AssetKind;

/// A rawfile (script, config, shader source, embedded media).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawFile {
    pub name: String,
    /// Size declared in the header (inflated size for compressed blobs).
    pub claimed_size: u32,
    /// Compressed blob size, when the title stores rawfiles compressed.
    pub compressed_size: Option<u32>,
    /// Payload bytes present in the buffer.
    pub data: Range<usize>,
    /// Declared size ran past the end of the buffer.
    pub truncated: bool,
    /// Inflated payload of a compressed rawfile.
    pub inflated: Option<Vec<u8>>,
    pub start: usize,
    /// End of the fixed header.
    pub header_end: usize,
    pub end: usize,
}

impl RawFile {
    /// Number of payload bytes present in the buffer.
    #[inline]
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// The file contents: inflated bytes if compressed, else the raw slice.
    ///
    /// `None` for a compressed blob that could not be inflated because the
    /// buffer ends inside it.
    pub fn contents<'a>(&'a self, zone: &'a [u8]) -> Option<&'a [u8]> {
        match (&self.inflated, self.compressed_size) {
            (Some(bytes), _) => Some(bytes),
            (None, Some(_)) => None,
            (None, None) => zone.get(self.data.clone()),
        }
    }
}

/// A localized string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalizedEntry {
    pub key: String,
    /// Absent for key-only entries.
    pub value: Option<String>,
    pub start: usize,
    pub end: usize,
}

/// A menu list (menufile).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MenuList {
    pub name: String,
    pub menu_count: u32,
    /// Whether the menus follow inline.
    pub menus_inline: bool,
    pub start: usize,
    pub end: usize,
    pub end_estimated: bool,
}

/// A material.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    pub name: String,
    pub texture_count: u8,
    pub constant_count: u8,
    pub state_bits_count: u8,
    /// Whether the technique set follows inline.
    pub techset_inline: bool,
    pub start: usize,
    pub end: usize,
    pub end_estimated: bool,
}

/// A technique set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TechSet {
    pub name: String,
    pub world_vert_format: u8,
    /// Technique slots holding inline data.
    pub inline_techniques: usize,
    pub technique_slots: usize,
    pub start: usize,
    pub end: usize,
    pub end_estimated: bool,
}

/// Skeletal animation header.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XAnimParts {
    pub name: String,
    pub data_byte_count: u16,
    pub data_short_count: u16,
    pub data_int_count: u16,
    pub random_data_byte_count: u16,
    pub random_data_int_count: u16,
    pub frame_count: u16,
    pub looping: bool,
    pub delta: bool,
    /// Bone counts per quantization class; the last slot is the total.
    pub bone_counts: [u8; 10],
    pub notify_count: u8,
    pub asset_type: u8,
    pub random_data_short_count: u32,
    pub index_count: u32,
    pub framerate: f32,
    pub frequency: f32,
    /// Bone names resolved through the script-string table.
    pub bone_names: Vec<String>,
    pub name_offset: usize,
    pub start: usize,
    pub end: usize,
    /// No following header was found; `end` is the search limit.
    pub end_estimated: bool,
}

impl XAnimParts {
    /// Total bone count.
    #[inline]
    pub fn bone_count(&self) -> u8 {
        self.bone_counts[9]
    }
}

/// A CSV string table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringTable {
    pub name: String,
    pub columns: u32,
    pub rows: u32,
    /// Cells in row-major order; shorter than `rows * columns` when cut off.
    pub cells: Vec<String>,
    pub start: usize,
    pub end: usize,
}

impl StringTable {
    /// Whether every declared cell was read.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.cells.len() == self.columns as usize * self.rows as usize
    }

    /// Cell at `(row, column)`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if column >= self.columns as usize {
            return None;
        }
        self.cells
            .get(row * self.columns as usize + column)
            .map(String::as_str)
    }

    /// Render as CSV text, quoting cells that need it.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for row in self.cells.chunks(self.columns.max(1) as usize) {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if cell.contains([',', '"', '\n']) {
                    out.push('"');
                    out.push_str(&cell.replace('"', "\"\""));
                    out.push('"');
                } else {
                    out.push_str(cell);
                }
            }
            out.push('\n');
        }
        out
    }
}

/// How far a weapon's numeric fields can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponConfidence {
    /// Every enum field was in range.
    Confident,
    /// An enum field was out of range; numeric fields were discarded.
    Misaligned,
}

/// A weapon definition header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponAsset {
    pub internal_name: String,
    pub display_name: Option<String>,
    pub damage: Option<i32>,
    pub min_damage: Option<i32>,
    pub clip_size: Option<i32>,
    pub max_ammo: Option<i32>,
    pub fire_type: Option<u32>,
    pub weapon_class: Option<u32>,
    pub penetration_type: Option<u32>,
    pub impact_type: Option<u32>,
    pub confidence: WeaponConfidence,
    /// Bytes the header was shifted by the short-sentinel correction.
    pub alignment_shift: usize,
    pub start: usize,
    pub end: usize,
    pub end_estimated: bool,
}

/// Inline texture load definition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageLoad {
    pub level_count: u8,
    pub flags: u8,
    pub dimensions: [i16; 3],
    pub format: i32,
    pub resource: Range<usize>,
}

/// An image (texture) header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageAsset {
    pub name: String,
    pub map_type: u32,
    pub semantic: u8,
    pub category: u8,
    pub streamed: bool,
    pub card_memory: u32,
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    /// Inline pixel data, when present.
    pub load: Option<ImageLoad>,
    pub start: usize,
    pub end: usize,
}

/// Any decoded asset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Asset {
    RawFile(RawFile),
    Localize(LocalizedEntry),
    MenuList(MenuList),
    Material(Material),
    TechSet(TechSet),
    XAnim(XAnimParts),
    StringTable(StringTable),
    Weapon(WeaponAsset),
    Image(ImageAsset),
}

impl Asset {
    /// Decoder kind.
    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::RawFile(_) => AssetKind::RawFile,
            Asset::Localize(_) => AssetKind::Localize,
            Asset::MenuList(_) => AssetKind::MenuList,
            Asset::Material(_) => AssetKind::Material,
            Asset::TechSet(_) => AssetKind::TechSet,
            Asset::XAnim(_) => AssetKind::XAnim,
            Asset::StringTable(_) => AssetKind::StringTable,
            Asset::Weapon(_) => AssetKind::Weapon,
            Asset::Image(_) => AssetKind::Image,
        }
    }

    /// Display name (the key for localize entries).
    pub fn name(&self) -> &str {
        match self {
            Asset::RawFile(a) => &a.name,
            Asset::Localize(a) => &a.key,
            Asset::MenuList(a) => &a.name,
            Asset::Material(a) => &a.name,
            Asset::TechSet(a) => &a.name,
            Asset::XAnim(a) => &a.name,
            Asset::StringTable(a) => &a.name,
            Asset::Weapon(a) => &a.internal_name,
            Asset::Image(a) => &a.name,
        }
    }

    /// Byte range in the zone buffer.
    pub fn range(&self) -> Range<usize> {
        let (start, end) = match self {
            Asset::RawFile(a) => (a.start, a.end),
            Asset::Localize(a) => (a.start, a.end),
            Asset::MenuList(a) => (a.start, a.end),
            Asset::Material(a) => (a.start, a.end),
            Asset::TechSet(a) => (a.start, a.end),
            Asset::XAnim(a) => (a.start, a.end),
            Asset::StringTable(a) => (a.start, a.end),
            Asset::Weapon(a) => (a.start, a.end),
            Asset::Image(a) => (a.start, a.end),
        };
        start..end
    }

    /// One-line description of the contents.
    pub fn summary(&self) -> String {
        match self {
            Asset::RawFile(a) => {
                let mut s = format!("{} bytes", a.claimed_size);
                if a.compressed_size.is_some() {
                    s.push_str(", compressed");
                }
                if a.truncated {
                    s.push_str(&format!(", truncated to {}", a.data_len()));
                }
                s
            }
            Asset::Localize(a) => match &a.value {
                Some(v) => {
                    let excerpt: String = v.chars().take(48).collect();
                    format!("\"{excerpt}\"")
                }
                None => "key only".to_string(),
            },
            Asset::MenuList(a) => format!("{} menus", a.menu_count),
            Asset::Material(a) => format!(
                "{} textures, {} constants, {} state bits",
                a.texture_count, a.constant_count, a.state_bits_count
            ),
            Asset::TechSet(a) => format!("{}/{} techniques", a.inline_techniques, a.technique_slots),
            Asset::XAnim(a) => format!(
                "{} frames @ {} fps, {} bones",
                a.frame_count,
                a.framerate,
                a.bone_count()
            ),
            Asset::StringTable(a) => format!("{}x{} cells", a.rows, a.columns),
            Asset::Weapon(a) => match a.confidence {
                WeaponConfidence::Confident => format!(
                    "damage {}, clip {}",
                    a.damage.unwrap_or_default(),
                    a.clip_size.unwrap_or_default()
                ),
                WeaponConfidence::Misaligned => "fields unknown (misaligned)".to_string(),
            },
            Asset::Image(a) => format!(
                "{}x{}x{}{}",
                a.width,
                a.height,
                a.depth,
                if a.streamed { ", streamed" } else { "" }
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_table_csv() {
        let table = StringTable {
            name: "mp/t.csv".to_string(),
            columns: 2,
            rows: 2,
            cells: vec!["a".into(), "b,c".into(), "d\"e".into(), "f".into()],
            start: 0,
            end: 0,
        };
        assert!(table.is_complete());
        assert_eq!(table.cell(1, 1), Some("f"));
        assert_eq!(table.cell(0, 2), None);
        assert_eq!(table.to_csv(), "a,\"b,c\"\n\"d\"\"e\",f\n");
    }
}
