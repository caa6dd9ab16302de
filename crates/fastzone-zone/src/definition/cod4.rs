//! Call of Duty 4 definitions.

use fastzone_common::Endian;
use fastzone_ff::{Game, Platform};

use super::{
    AssetType, GameDefinition, MaterialLayout, RawFileLayout, StringTableLayout, TechSetLayout,
    WeaponLayout, PC_ZONE, PS3_ZONE, XBOX360_ZONE,
};

use AssetType::*;

/// PC codes: no vertex shader asset.
pub(super) static PC_TYPES: [AssetType; 34] = [
    XModelPieces,     // 0x00
    PhysPreset,       // 0x01
    XAnimParts,       // 0x02
    XModel,           // 0x03
    Material,         // 0x04
    PixelShader,      // 0x05
    TechniqueSet,     // 0x06
    Image,            // 0x07
    Sound,            // 0x08
    SoundCurve,       // 0x09
    LoadedSound,      // 0x0A
    ClipMap,          // 0x0B
    ClipMapPvs,       // 0x0C
    ComWorld,         // 0x0D
    GameWorldSp,      // 0x0E
    GameWorldMp,      // 0x0F
    MapEnts,          // 0x10
    GfxWorld,         // 0x11
    LightDef,         // 0x12
    UiMap,            // 0x13
    Font,             // 0x14
    MenuFile,         // 0x15
    Menu,             // 0x16
    Localize,         // 0x17
    Weapon,           // 0x18
    SndDriverGlobals, // 0x19
    Fx,               // 0x1A
    ImpactFx,         // 0x1B
    AiType,           // 0x1C
    MpType,           // 0x1D
    Character,        // 0x1E
    XModelAlias,      // 0x1F
    RawFile,          // 0x20
    StringTable,      // 0x21
];

/// Console codes: a vertex shader slot after the pixel shader shifts every
/// later code by one.
pub(super) static CONSOLE_TYPES: [AssetType; 35] = [
    XModelPieces,     // 0x00
    PhysPreset,       // 0x01
    XAnimParts,       // 0x02
    XModel,           // 0x03
    Material,         // 0x04
    PixelShader,      // 0x05
    VertexShader,     // 0x06
    TechniqueSet,     // 0x07
    Image,            // 0x08
    Sound,            // 0x09
    SoundCurve,       // 0x0A
    LoadedSound,      // 0x0B
    ClipMap,          // 0x0C
    ClipMapPvs,       // 0x0D
    ComWorld,         // 0x0E
    GameWorldSp,      // 0x0F
    GameWorldMp,      // 0x10
    MapEnts,          // 0x11
    GfxWorld,         // 0x12
    LightDef,         // 0x13
    UiMap,            // 0x14
    Font,             // 0x15
    MenuFile,         // 0x16
    Menu,             // 0x17
    Localize,         // 0x18
    Weapon,           // 0x19
    SndDriverGlobals, // 0x1A
    Fx,               // 0x1B
    ImpactFx,         // 0x1C
    AiType,           // 0x1D
    MpType,           // 0x1E
    Character,        // 0x1F
    XModelAlias,      // 0x20
    RawFile,          // 0x21
    StringTable,      // 0x22
];

const MATERIAL: MaterialLayout = MaterialLayout {
    header_size: 0x4C,
    texture_count: 0x36,
    constant_count: 0x37,
    state_bits_count: 0x38,
    techset: 0x3C,
    texture_table: 0x40,
};

const TECHSET: TechSetLayout = TechSetLayout {
    technique_count: 34,
};

const WEAPON: WeaponLayout = WeaponLayout {
    header_size: 0x878,
    damage: 0x3E0,
    min_damage: 0x3E8,
    clip_size: 0x3B4,
    max_ammo: 0x3AC,
    fire_type: 0x148,
    weapon_class: 0x134,
    penetration_type: 0x138,
    impact_type: 0x13C,
    fire_type_max: 4,
    weapon_class_max: 9,
    penetration_type_max: 3,
    impact_type_max: 10,
};

pub(super) static PS3: GameDefinition = GameDefinition {
    game: Game::CoD4,
    platform: Platform::Ps3,
    endian: Endian::Big,
    zone: PS3_ZONE,
    asset_types: &CONSOLE_TYPES,
    zero_is_inline: false,
    rawfile: RawFileLayout::Plain,
    material: MATERIAL,
    techset: TECHSET,
    string_table: StringTableLayout { cell_stride: 4 },
    weapon: WEAPON,
};

pub(super) static XBOX360: GameDefinition = GameDefinition {
    game: Game::CoD4,
    platform: Platform::Xbox360,
    endian: Endian::Big,
    zone: XBOX360_ZONE,
    asset_types: &CONSOLE_TYPES,
    zero_is_inline: false,
    rawfile: RawFileLayout::Plain,
    material: MATERIAL,
    techset: TECHSET,
    string_table: StringTableLayout { cell_stride: 4 },
    weapon: WEAPON,
};

pub(super) static PC: GameDefinition = GameDefinition {
    game: Game::CoD4,
    platform: Platform::Pc,
    endian: Endian::Little,
    zone: PC_ZONE,
    asset_types: &PC_TYPES,
    zero_is_inline: false,
    rawfile: RawFileLayout::Plain,
    material: MATERIAL,
    techset: TECHSET,
    string_table: StringTableLayout { cell_stride: 4 },
    weapon: WEAPON,
};
