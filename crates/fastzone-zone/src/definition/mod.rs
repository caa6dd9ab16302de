//! Per-(game, platform) zone definitions.
//!
//! A [`GameDefinition`] is a constant bundle of everything that differs
//! between titles and platforms: byte order, zone header offsets, the
//! asset-type code table and per-kind structure offsets. The decoding
//! algorithms in [`crate::decode`] are shared and take a definition as
//! input.
//!
//! Asset-type codes are listed explicitly for every pair. Platforms that
//! drop or add a shader asset shift every later code, and deriving one
//! table from another arithmetically hides those shifts.

mod cod4;
mod mw2;
mod types;
mod waw;

use fastzone_common::Endian;
use fastzone_ff::{Game, Platform};

use crate::asset::{
    Asset, ImageAsset, LocalizedEntry, Material, MenuList, RawFile, StringTable, TechSet,
    WeaponAsset, XAnimParts,
};
use crate::decode::{self, DecodeCx};
use crate::{Error, Result, ScanLimits};

pub use types::{AssetKind, AssetType};

/// Byte offsets of the zone header and asset-list fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneLayout {
    /// Number of block-size slots after the two size fields.
    pub block_slots: usize,
    /// Offset of the script-string count.
    pub script_string_count: usize,
    /// Offset of the script-string pointer.
    pub script_strings: usize,
    /// Offset of the asset count.
    pub asset_count: usize,
    /// Offset of the asset-array pointer.
    pub assets: usize,
    /// End of the asset-list header; script strings follow.
    pub list_end: usize,
}

impl ZoneLayout {
    /// Size of the fixed header before the asset-list fields.
    pub const fn header_size(&self) -> usize {
        self.script_string_count
    }
}

/// Xbox 360: six block slots.
pub const XBOX360_ZONE: ZoneLayout = ZoneLayout {
    block_slots: 6,
    script_string_count: 0x20,
    script_strings: 0x24,
    asset_count: 0x28,
    assets: 0x2C,
    list_end: 0x30,
};

/// PS3: seven block slots.
pub const PS3_ZONE: ZoneLayout = ZoneLayout {
    block_slots: 7,
    script_string_count: 0x24,
    script_strings: 0x28,
    asset_count: 0x2C,
    assets: 0x30,
    list_end: 0x34,
};

/// PC: eight block slots.
pub const PC_ZONE: ZoneLayout = ZoneLayout {
    block_slots: 8,
    script_string_count: 0x28,
    script_strings: 0x2C,
    asset_count: 0x30,
    assets: 0x34,
    list_end: 0x38,
};

/// Rawfile header shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFileLayout {
    /// `[name][len][buffer]`, 12 bytes.
    Plain,
    /// `[name][compressed len][len][buffer]`, 16 bytes.
    Compressed,
}

impl RawFileLayout {
    /// Fixed header size.
    pub const fn header_size(self) -> usize {
        match self {
            RawFileLayout::Plain => 12,
            RawFileLayout::Compressed => 16,
        }
    }
}

/// Material header offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialLayout {
    pub header_size: usize,
    pub texture_count: usize,
    pub constant_count: usize,
    pub state_bits_count: usize,
    pub techset: usize,
    pub texture_table: usize,
}

/// Technique set shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TechSetLayout {
    /// Technique pointer slots after the remapped pointer.
    pub technique_count: usize,
}

impl TechSetLayout {
    /// Fixed header size.
    pub const fn header_size(self) -> usize {
        12 + 4 * self.technique_count
    }
}

/// String table cell array shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringTableLayout {
    /// Bytes per entry of the inline pointer array (pointer, or pointer + hash).
    pub cell_stride: usize,
}

/// Weapon header offsets and enum maxima.
///
/// These are reverse-engineered per title and verified only against the
/// shipped files of that title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponLayout {
    pub header_size: usize,
    pub damage: usize,
    pub min_damage: usize,
    pub clip_size: usize,
    pub max_ammo: usize,
    pub fire_type: usize,
    pub weapon_class: usize,
    pub penetration_type: usize,
    pub impact_type: usize,
    pub fire_type_max: u32,
    pub weapon_class_max: u32,
    pub penetration_type_max: u32,
    pub impact_type_max: u32,
}

/// Everything that varies per (game, platform).
#[derive(Debug)]
pub struct GameDefinition {
    pub game: Game,
    pub platform: Platform,
    pub endian: Endian,
    pub zone: ZoneLayout,
    /// Asset type for each code; the code is the index.
    pub asset_types: &'static [AssetType],
    /// Whether a zero pointer marks inline data in secondary pointer slots.
    pub zero_is_inline: bool,
    pub rawfile: RawFileLayout,
    pub material: MaterialLayout,
    pub techset: TechSetLayout,
    pub string_table: StringTableLayout,
    pub weapon: WeaponLayout,
}

static DEFINITIONS: [&GameDefinition; 9] = [
    &cod4::PS3,
    &cod4::XBOX360,
    &cod4::PC,
    &waw::PS3,
    &waw::XBOX360,
    &waw::PC,
    &mw2::PS3,
    &mw2::XBOX360,
    &mw2::PC,
];

impl GameDefinition {
    /// Definition for a detected (game, platform).
    pub fn lookup(game: Game, platform: Platform) -> Result<&'static GameDefinition> {
        DEFINITIONS
            .iter()
            .copied()
            .find(|d| d.game == game && d.platform == platform)
            .ok_or(Error::UnsupportedTarget { game, platform })
    }

    /// Every supported definition.
    pub fn all() -> &'static [&'static GameDefinition] {
        &DEFINITIONS
    }

    /// Asset type for a code.
    #[inline]
    pub fn asset_type(&self, code: u8) -> Option<AssetType> {
        self.asset_types.get(code as usize).copied()
    }

    /// Code for an asset type, if this title has it.
    pub fn code_for(&self, asset_type: AssetType) -> Option<u8> {
        self.asset_types
            .iter()
            .position(|&t| t == asset_type)
            .map(|i| i as u8)
    }

    /// Decoder kind for a code.
    #[inline]
    pub fn kind_for_code(&self, code: u8) -> Option<AssetKind> {
        self.asset_type(code).and_then(AssetType::kind)
    }

    /// Whether assets with this code can be decoded.
    #[inline]
    pub fn is_supported_asset_type(&self, code: u8) -> bool {
        self.kind_for_code(code).is_some()
    }

    /// Engine name for a code; unknown codes render as `unknown_0xNN`.
    pub fn asset_type_name(&self, code: u8) -> String {
        match self.asset_type(code) {
            Some(t) => t.name().to_string(),
            None => format!("unknown_0x{code:02X}"),
        }
    }

    fn cx<'a>(&'static self, buffer: &'a [u8]) -> DecodeCx<'a> {
        DecodeCx::new(buffer, self, &[], &ScanLimits::DEFAULT)
    }

    /// Decode any kind at `offset` with default limits.
    pub fn parse(&'static self, kind: AssetKind, buffer: &[u8], offset: usize) -> Option<Asset> {
        decode::decode(kind, &self.cx(buffer), offset)
    }

    pub fn parse_rawfile(&'static self, buffer: &[u8], offset: usize) -> Option<RawFile> {
        decode::rawfile::decode(&self.cx(buffer), offset)
    }

    pub fn parse_localize(&'static self, buffer: &[u8], offset: usize) -> Option<LocalizedEntry> {
        decode::localize::decode(&self.cx(buffer), offset)
    }

    pub fn parse_menu_list(&'static self, buffer: &[u8], offset: usize) -> Option<MenuList> {
        decode::menu::decode(&self.cx(buffer), offset)
    }

    pub fn parse_material(&'static self, buffer: &[u8], offset: usize) -> Option<Material> {
        decode::material::decode(&self.cx(buffer), offset)
    }

    pub fn parse_techset(&'static self, buffer: &[u8], offset: usize) -> Option<TechSet> {
        decode::techset::decode(&self.cx(buffer), offset)
    }

    pub fn parse_xanim(&'static self, buffer: &[u8], offset: usize) -> Option<XAnimParts> {
        decode::xanim::decode(&self.cx(buffer), offset)
    }

    pub fn parse_string_table(&'static self, buffer: &[u8], offset: usize) -> Option<StringTable> {
        decode::stringtable::decode(&self.cx(buffer), offset)
    }

    pub fn parse_weapon(&'static self, buffer: &[u8], offset: usize) -> Option<WeaponAsset> {
        decode::weapon::decode(&self.cx(buffer), offset)
    }

    pub fn parse_image(&'static self, buffer: &[u8], offset: usize) -> Option<ImageAsset> {
        decode::image::decode(&self.cx(buffer), offset)
    }
}

impl std::fmt::Display for GameDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.game, self.platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_all_nine() {
        for game in [Game::CoD4, Game::WaW, Game::MW2] {
            for platform in [Platform::Ps3, Platform::Xbox360, Platform::Pc] {
                let def = GameDefinition::lookup(game, platform).unwrap();
                assert_eq!(def.endian, platform.endian());
            }
        }
        assert!(matches!(
            GameDefinition::lookup(Game::CoD4, Platform::Wii),
            Err(Error::UnsupportedTarget { .. })
        ));
    }

    #[test]
    fn test_header_sizes_per_platform() {
        assert_eq!(XBOX360_ZONE.header_size(), 8 + 4 * XBOX360_ZONE.block_slots);
        assert_eq!(PS3_ZONE.header_size(), 8 + 4 * PS3_ZONE.block_slots);
        assert_eq!(PC_ZONE.header_size(), 8 + 4 * PC_ZONE.block_slots);
    }

    #[test]
    fn test_shader_slot_shifts_codes() {
        let pc = GameDefinition::lookup(Game::CoD4, Platform::Pc).unwrap();
        let ps3 = GameDefinition::lookup(Game::CoD4, Platform::Ps3).unwrap();
        let pc_raw = pc.code_for(AssetType::RawFile).unwrap();
        let ps3_raw = ps3.code_for(AssetType::RawFile).unwrap();
        assert_eq!(ps3_raw, pc_raw + 1);
        assert_eq!(pc.asset_type_name(pc_raw), "rawfile");
        assert_eq!(pc.code_for(AssetType::XAnimParts), ps3.code_for(AssetType::XAnimParts));

        let mw2_pc = GameDefinition::lookup(Game::MW2, Platform::Pc).unwrap();
        let mw2_xbox = GameDefinition::lookup(Game::MW2, Platform::Xbox360).unwrap();
        assert_eq!(
            mw2_xbox.code_for(AssetType::Image).unwrap() + 1,
            mw2_pc.code_for(AssetType::Image).unwrap()
        );
    }

    #[test]
    fn test_unknown_code_name() {
        let def = GameDefinition::lookup(Game::WaW, Platform::Ps3).unwrap();
        assert_eq!(def.asset_type_name(0xEE), "unknown_0xEE");
        assert!(!def.is_supported_asset_type(0xEE));
        assert!(def.is_supported_asset_type(def.code_for(AssetType::Localize).unwrap()));
        assert!(!def.is_supported_asset_type(def.code_for(AssetType::Sound).unwrap()));
    }

    #[test]
    fn test_tables_have_unique_types() {
        for def in GameDefinition::all() {
            for (i, t) in def.asset_types.iter().enumerate() {
                assert_eq!(def.code_for(*t), Some(i as u8), "{def} {t}");
            }
        }
    }
}
