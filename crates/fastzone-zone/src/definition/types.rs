//! Engine asset types and the subset this crate decodes.

use std::fmt;

/// Every asset type the three titles declare, across all platforms.
///
/// Numeric codes are assigned per definition; see the tables in the
/// `cod4`, `waw` and `mw2` modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssetType {
    XModelPieces,
    PhysPreset,
    PhysCollmap,
    PhysConstraints,
    DestructibleDef,
    XAnimParts,
    XModelSurfs,
    XModel,
    Material,
    PixelShader,
    VertexShader,
    VertexDecl,
    TechniqueSet,
    Image,
    Sound,
    SoundCurve,
    LoadedSound,
    ClipMap,
    ClipMapSp,
    ClipMapMp,
    ClipMapPvs,
    ComWorld,
    GameWorldSp,
    GameWorldMp,
    MapEnts,
    FxWorld,
    GfxWorld,
    LightDef,
    UiMap,
    Font,
    MenuFile,
    Menu,
    Localize,
    Weapon,
    SndDriverGlobals,
    Fx,
    ImpactFx,
    AiType,
    MpType,
    Character,
    XModelAlias,
    RawFile,
    StringTable,
    PackIndex,
    Leaderboard,
    StructuredDataDef,
    Tracer,
    Vehicle,
    AddonMapEnts,
}

impl AssetType {
    /// Engine name of the type.
    pub const fn name(self) -> &'static str {
        match self {
            AssetType::XModelPieces => "xmodelpieces",
            AssetType::PhysPreset => "physpreset",
            AssetType::PhysCollmap => "phys_collmap",
            AssetType::PhysConstraints => "physconstraints",
            AssetType::DestructibleDef => "destructibledef",
            AssetType::XAnimParts => "xanim",
            AssetType::XModelSurfs => "xmodelsurfs",
            AssetType::XModel => "xmodel",
            AssetType::Material => "material",
            AssetType::PixelShader => "pixelshader",
            AssetType::VertexShader => "vertexshader",
            AssetType::VertexDecl => "vertexdecl",
            AssetType::TechniqueSet => "techset",
            AssetType::Image => "image",
            AssetType::Sound => "sound",
            AssetType::SoundCurve => "sndcurve",
            AssetType::LoadedSound => "loaded_sound",
            AssetType::ClipMap => "clipmap",
            AssetType::ClipMapSp => "clipmap_sp",
            AssetType::ClipMapMp => "clipmap_mp",
            AssetType::ClipMapPvs => "clipmap_pvs",
            AssetType::ComWorld => "comworld",
            AssetType::GameWorldSp => "gameworld_sp",
            AssetType::GameWorldMp => "gameworld_mp",
            AssetType::MapEnts => "map_ents",
            AssetType::FxWorld => "fxworld",
            AssetType::GfxWorld => "gfxworld",
            AssetType::LightDef => "lightdef",
            AssetType::UiMap => "ui_map",
            AssetType::Font => "font",
            AssetType::MenuFile => "menufile",
            AssetType::Menu => "menu",
            AssetType::Localize => "localize",
            AssetType::Weapon => "weapon",
            AssetType::SndDriverGlobals => "snddriverglobals",
            AssetType::Fx => "fx",
            AssetType::ImpactFx => "impactfx",
            AssetType::AiType => "aitype",
            AssetType::MpType => "mptype",
            AssetType::Character => "character",
            AssetType::XModelAlias => "xmodelalias",
            AssetType::RawFile => "rawfile",
            AssetType::StringTable => "stringtable",
            AssetType::PackIndex => "packindex",
            AssetType::Leaderboard => "leaderboard",
            AssetType::StructuredDataDef => "structureddatadef",
            AssetType::Tracer => "tracer",
            AssetType::Vehicle => "vehicle",
            AssetType::AddonMapEnts => "addon_map_ents",
        }
    }

    /// The decoder kind for this type, if one exists.
    pub const fn kind(self) -> Option<AssetKind> {
        match self {
            AssetType::RawFile => Some(AssetKind::RawFile),
            AssetType::Localize => Some(AssetKind::Localize),
            AssetType::MenuFile => Some(AssetKind::MenuList),
            AssetType::Material => Some(AssetKind::Material),
            AssetType::TechniqueSet => Some(AssetKind::TechSet),
            AssetType::XAnimParts => Some(AssetKind::XAnim),
            AssetType::StringTable => Some(AssetKind::StringTable),
            AssetType::Weapon => Some(AssetKind::Weapon),
            AssetType::Image => Some(AssetKind::Image),
            _ => None,
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Asset kinds with a structural decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssetKind {
    RawFile,
    Localize,
    MenuList,
    Material,
    TechSet,
    XAnim,
    StringTable,
    Weapon,
    Image,
}

impl AssetKind {
    /// All kinds, in the order recovery processes them.
    pub const ALL: [AssetKind; 9] = [
        AssetKind::RawFile,
        AssetKind::Localize,
        AssetKind::MenuList,
        AssetKind::Material,
        AssetKind::TechSet,
        AssetKind::XAnim,
        AssetKind::StringTable,
        AssetKind::Weapon,
        AssetKind::Image,
    ];

    /// The engine asset type decoded by this kind.
    pub const fn asset_type(self) -> AssetType {
        match self {
            AssetKind::RawFile => AssetType::RawFile,
            AssetKind::Localize => AssetType::Localize,
            AssetKind::MenuList => AssetType::MenuFile,
            AssetKind::Material => AssetType::Material,
            AssetKind::TechSet => AssetType::TechniqueSet,
            AssetKind::XAnim => AssetType::XAnimParts,
            AssetKind::StringTable => AssetType::StringTable,
            AssetKind::Weapon => AssetType::Weapon,
            AssetKind::Image => AssetType::Image,
        }
    }

    /// Whether a failed sequential decode of this kind ends the sequential
    /// pass outright instead of attempting a local resync.
    pub const fn halts_sequential(self) -> bool {
        matches!(
            self,
            AssetKind::RawFile | AssetKind::Localize | AssetKind::MenuList | AssetKind::XAnim
        )
    }

    /// Header offsets at which the kind's leading `FFFFFFFF` can sit.
    ///
    /// Recovery subtracts these from a sentinel-run position to get a
    /// candidate header start.
    pub const fn sentinel_offsets(self) -> &'static [usize] {
        match self {
            // Key-only entries start with a non-inline value pointer.
            AssetKind::Localize => &[0, 4],
            // Texture pointer, or the name pointer when the texture is external.
            AssetKind::Image => &[4, 0x18],
            _ => &[0],
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_type().name())
    }
}
