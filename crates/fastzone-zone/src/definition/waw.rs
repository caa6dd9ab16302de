//! World at War definitions.
//!
//! All three platforms share one code table; WaW kept both shader slots on
//! every platform.

use fastzone_common::Endian;
use fastzone_ff::{Game, Platform};

use super::{
    AssetType, GameDefinition, MaterialLayout, RawFileLayout, StringTableLayout, TechSetLayout,
    WeaponLayout, PC_ZONE, PS3_ZONE, XBOX360_ZONE,
};

use AssetType::*;

pub(super) static TYPES: [AssetType; 37] = [
    XModelPieces,     // 0x00
    PhysPreset,       // 0x01
    PhysConstraints,  // 0x02
    DestructibleDef,  // 0x03
    XAnimParts,       // 0x04
    XModel,           // 0x05
    Material,         // 0x06
    PixelShader,      // 0x07
    VertexShader,     // 0x08
    TechniqueSet,     // 0x09
    Image,            // 0x0A
    Sound,            // 0x0B
    LoadedSound,      // 0x0C
    ClipMap,          // 0x0D
    ClipMapPvs,       // 0x0E
    ComWorld,         // 0x0F
    GameWorldSp,      // 0x10
    GameWorldMp,      // 0x11
    MapEnts,          // 0x12
    GfxWorld,         // 0x13
    LightDef,         // 0x14
    UiMap,            // 0x15
    Font,             // 0x16
    MenuFile,         // 0x17
    Menu,             // 0x18
    Localize,         // 0x19
    Weapon,           // 0x1A
    SndDriverGlobals, // 0x1B
    Fx,               // 0x1C
    ImpactFx,         // 0x1D
    AiType,           // 0x1E
    MpType,           // 0x1F
    Character,        // 0x20
    XModelAlias,      // 0x21
    RawFile,          // 0x22
    StringTable,      // 0x23
    PackIndex,        // 0x24
];

const MATERIAL: MaterialLayout = MaterialLayout {
    header_size: 0x6C,
    texture_count: 0x57,
    constant_count: 0x58,
    state_bits_count: 0x59,
    techset: 0x5C,
    texture_table: 0x60,
};

const TECHSET: TechSetLayout = TechSetLayout {
    technique_count: 59,
};

const WEAPON: WeaponLayout = WeaponLayout {
    header_size: 0x9A0,
    damage: 0x430,
    min_damage: 0x438,
    clip_size: 0x3F8,
    max_ammo: 0x3F0,
    fire_type: 0x154,
    weapon_class: 0x140,
    penetration_type: 0x144,
    impact_type: 0x148,
    fire_type_max: 4,
    weapon_class_max: 11,
    penetration_type_max: 3,
    impact_type_max: 12,
};

pub(super) static PS3: GameDefinition = GameDefinition {
    game: Game::WaW,
    platform: Platform::Ps3,
    endian: Endian::Big,
    zone: PS3_ZONE,
    asset_types: &TYPES,
    zero_is_inline: true,
    rawfile: RawFileLayout::Plain,
    material: MATERIAL,
    techset: TECHSET,
    string_table: StringTableLayout { cell_stride: 4 },
    weapon: WEAPON,
};

pub(super) static XBOX360: GameDefinition = GameDefinition {
    game: Game::WaW,
    platform: Platform::Xbox360,
    endian: Endian::Big,
    zone: XBOX360_ZONE,
    asset_types: &TYPES,
    zero_is_inline: true,
    rawfile: RawFileLayout::Plain,
    material: MATERIAL,
    techset: TECHSET,
    string_table: StringTableLayout { cell_stride: 4 },
    weapon: WEAPON,
};

pub(super) static PC: GameDefinition = GameDefinition {
    game: Game::WaW,
    platform: Platform::Pc,
    endian: Endian::Little,
    zone: PC_ZONE,
    asset_types: &TYPES,
    zero_is_inline: true,
    rawfile: RawFileLayout::Plain,
    material: MATERIAL,
    techset: TECHSET,
    string_table: StringTableLayout { cell_stride: 4 },
    weapon: WEAPON,
};
