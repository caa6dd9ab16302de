//! Modern Warfare 2 definitions.

use fastzone_common::Endian;
use fastzone_ff::{Game, Platform};

use super::{
    AssetType, GameDefinition, MaterialLayout, RawFileLayout, StringTableLayout, TechSetLayout,
    WeaponLayout, PC_ZONE, PS3_ZONE, XBOX360_ZONE,
};

use AssetType::*;

/// PC codes, including the vertex declaration asset.
pub(super) static PC_TYPES: [AssetType; 43] = [
    PhysPreset,        // 0x00
    PhysCollmap,       // 0x01
    XAnimParts,        // 0x02
    XModelSurfs,       // 0x03
    XModel,            // 0x04
    Material,          // 0x05
    PixelShader,       // 0x06
    VertexShader,      // 0x07
    VertexDecl,        // 0x08
    TechniqueSet,      // 0x09
    Image,             // 0x0A
    Sound,             // 0x0B
    SoundCurve,        // 0x0C
    LoadedSound,       // 0x0D
    ClipMapSp,         // 0x0E
    ClipMapMp,         // 0x0F
    ComWorld,          // 0x10
    GameWorldSp,       // 0x11
    GameWorldMp,       // 0x12
    MapEnts,           // 0x13
    FxWorld,           // 0x14
    GfxWorld,          // 0x15
    LightDef,          // 0x16
    UiMap,             // 0x17
    Font,              // 0x18
    MenuFile,          // 0x19
    Menu,              // 0x1A
    Localize,          // 0x1B
    Weapon,            // 0x1C
    SndDriverGlobals,  // 0x1D
    Fx,                // 0x1E
    ImpactFx,          // 0x1F
    AiType,            // 0x20
    MpType,            // 0x21
    Character,         // 0x22
    XModelAlias,       // 0x23
    RawFile,           // 0x24
    StringTable,       // 0x25
    Leaderboard,       // 0x26
    StructuredDataDef, // 0x27
    Tracer,            // 0x28
    Vehicle,           // 0x29
    AddonMapEnts,      // 0x2A
];

/// Console codes: no vertex declaration, everything after shifts down one.
pub(super) static CONSOLE_TYPES: [AssetType; 42] = [
    PhysPreset,        // 0x00
    PhysCollmap,       // 0x01
    XAnimParts,        // 0x02
    XModelSurfs,       // 0x03
    XModel,            // 0x04
    Material,          // 0x05
    PixelShader,       // 0x06
    VertexShader,      // 0x07
    TechniqueSet,      // 0x08
    Image,             // 0x09
    Sound,             // 0x0A
    SoundCurve,        // 0x0B
    LoadedSound,       // 0x0C
    ClipMapSp,         // 0x0D
    ClipMapMp,         // 0x0E
    ComWorld,          // 0x0F
    GameWorldSp,       // 0x10
    GameWorldMp,       // 0x11
    MapEnts,           // 0x12
    FxWorld,           // 0x13
    GfxWorld,          // 0x14
    LightDef,          // 0x15
    UiMap,             // 0x16
    Font,              // 0x17
    MenuFile,          // 0x18
    Menu,              // 0x19
    Localize,          // 0x1A
    Weapon,            // 0x1B
    SndDriverGlobals,  // 0x1C
    Fx,                // 0x1D
    ImpactFx,          // 0x1E
    AiType,            // 0x1F
    MpType,            // 0x20
    Character,         // 0x21
    XModelAlias,       // 0x22
    RawFile,           // 0x23
    StringTable,       // 0x24
    Leaderboard,       // 0x25
    StructuredDataDef, // 0x26
    Tracer,            // 0x27
    Vehicle,           // 0x28
    AddonMapEnts,      // 0x29
];

const MATERIAL: MaterialLayout = MaterialLayout {
    header_size: 0x5C,
    texture_count: 0x44,
    constant_count: 0x45,
    state_bits_count: 0x46,
    techset: 0x4C,
    texture_table: 0x50,
};

const TECHSET: TechSetLayout = TechSetLayout {
    technique_count: 48,
};

// Cells are {string, hash} pairs.
const STRING_TABLE: StringTableLayout = StringTableLayout { cell_stride: 8 };

const WEAPON: WeaponLayout = WeaponLayout {
    header_size: 0x6B4,
    damage: 0x3A8,
    min_damage: 0x3B0,
    clip_size: 0x37C,
    max_ammo: 0x374,
    fire_type: 0x110,
    weapon_class: 0x100,
    penetration_type: 0x104,
    impact_type: 0x108,
    fire_type_max: 4,
    weapon_class_max: 10,
    penetration_type_max: 3,
    impact_type_max: 12,
};

pub(super) static PS3: GameDefinition = GameDefinition {
    game: Game::MW2,
    platform: Platform::Ps3,
    endian: Endian::Big,
    zone: PS3_ZONE,
    asset_types: &CONSOLE_TYPES,
    zero_is_inline: false,
    rawfile: RawFileLayout::Compressed,
    material: MATERIAL,
    techset: TECHSET,
    string_table: STRING_TABLE,
    weapon: WEAPON,
};

pub(super) static XBOX360: GameDefinition = GameDefinition {
    game: Game::MW2,
    platform: Platform::Xbox360,
    endian: Endian::Big,
    zone: XBOX360_ZONE,
    asset_types: &CONSOLE_TYPES,
    zero_is_inline: false,
    rawfile: RawFileLayout::Compressed,
    material: MATERIAL,
    techset: TECHSET,
    string_table: STRING_TABLE,
    weapon: WEAPON,
};

pub(super) static PC: GameDefinition = GameDefinition {
    game: Game::MW2,
    platform: Platform::Pc,
    endian: Endian::Little,
    zone: PC_ZONE,
    asset_types: &PC_TYPES,
    zero_is_inline: false,
    rawfile: RawFileLayout::Compressed,
    material: MATERIAL,
    techset: TECHSET,
    string_table: STRING_TABLE,
    weapon: WEAPON,
};
