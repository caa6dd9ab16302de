//! FastFile container header.
//!
//! ```text
//! [0x00] Magic    "IWffu100" (unsigned) or "IWff0100" (signed)   8 bytes
//! [0x08] Version  u32, big-endian on consoles, little-endian on PC
//! [0x0C] MW2 only: extended header (see ExtendedHeader)
//! [....] Compressed block stream
//! ```
//!
//! The version's byte order is not announced anywhere; it is recovered by
//! reading the field both ways and matching against [`KNOWN_VERSIONS`].

use fastzone_common::{BinaryReader, Endian};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// Raw 12-byte container header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct RawHeader {
    /// Magic tag.
    pub magic: [u8; 8],
    /// Version, byte order unknown until matched.
    pub version: [u8; 4],
}

impl RawHeader {
    /// Size of the raw header in bytes.
    pub const SIZE: usize = 12;
}

/// Game family that produced a FastFile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Game {
    /// Call of Duty 4: Modern Warfare.
    CoD4,
    /// Call of Duty: World at War.
    WaW,
    /// Call of Duty: Modern Warfare 2.
    MW2,
}

impl Game {
    /// Short display name.
    pub const fn name(self) -> &'static str {
        match self {
            Game::CoD4 => "CoD4",
            Game::WaW => "WaW",
            Game::MW2 => "MW2",
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Hardware platform a FastFile was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Platform {
    /// PlayStation 3.
    Ps3,
    /// Xbox 360.
    Xbox360,
    /// Windows PC.
    Pc,
    /// Nintendo Wii.
    Wii,
}

impl Platform {
    /// Byte order of everything the platform writes.
    pub const fn endian(self) -> Endian {
        match self {
            Platform::Pc => Endian::Little,
            Platform::Ps3 | Platform::Xbox360 | Platform::Wii => Endian::Big,
        }
    }

    /// Short display name.
    pub const fn name(self) -> &'static str {
        match self {
            Platform::Ps3 => "PS3",
            Platform::Xbox360 => "Xbox 360",
            Platform::Pc => "PC",
            Platform::Wii => "Wii",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Container magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Magic {
    /// `IWffu100`: PS3, Wii, PC and unsigned Xbox 360 files.
    Unsigned,
    /// `IWff0100`: signed Xbox 360 files.
    Signed,
}

impl Magic {
    /// Unsigned tag bytes.
    pub const UNSIGNED: &'static [u8; 8] = b"IWffu100";
    /// Signed tag bytes.
    pub const SIGNED: &'static [u8; 8] = b"IWff0100";

    /// Classify raw magic bytes.
    pub fn from_bytes(bytes: &[u8; 8]) -> Option<Self> {
        if bytes == Self::UNSIGNED {
            Some(Magic::Unsigned)
        } else if bytes == Self::SIGNED {
            Some(Magic::Signed)
        } else {
            None
        }
    }

    /// Tag bytes for this magic.
    pub const fn bytes(self) -> &'static [u8; 8] {
        match self {
            Magic::Unsigned => Self::UNSIGNED,
            Magic::Signed => Self::SIGNED,
        }
    }
}

/// Which platforms a version constant identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionTarget {
    /// PS3 when unsigned, Xbox 360 when signed.
    Console,
    /// Windows PC.
    Pc,
    /// Nintendo Wii.
    Wii,
}

/// A known version constant.
#[derive(Debug, Clone, Copy)]
pub struct KnownVersion {
    pub game: Game,
    pub target: VersionTarget,
    pub value: u32,
}

/// Version constants observed in shipped FastFiles.
///
/// Console values are stored big-endian and PC values little-endian; the
/// WaW console and PC constants coincide and are told apart by byte order
/// alone.
pub const KNOWN_VERSIONS: &[KnownVersion] = &[
    KnownVersion { game: Game::CoD4, target: VersionTarget::Console, value: 0x0000_0001 },
    KnownVersion { game: Game::CoD4, target: VersionTarget::Pc, value: 0x0000_0005 },
    KnownVersion { game: Game::CoD4, target: VersionTarget::Wii, value: 0x0000_01A2 },
    KnownVersion { game: Game::WaW, target: VersionTarget::Console, value: 0x0000_0183 },
    KnownVersion { game: Game::WaW, target: VersionTarget::Pc, value: 0x0000_0183 },
    KnownVersion { game: Game::WaW, target: VersionTarget::Wii, value: 0x0000_019B },
    KnownVersion { game: Game::MW2, target: VersionTarget::Console, value: 0x0000_010D },
    KnownVersion { game: Game::MW2, target: VersionTarget::Pc, value: 0x0000_0114 },
];

/// Version constant for a (game, platform) pair.
pub fn version_for(game: Game, platform: Platform) -> Option<u32> {
    let target = match platform {
        Platform::Ps3 | Platform::Xbox360 => VersionTarget::Console,
        Platform::Pc => VersionTarget::Pc,
        Platform::Wii => VersionTarget::Wii,
    };
    KNOWN_VERSIONS
        .iter()
        .find(|v| v.game == game && v.target == target)
        .map(|v| v.value)
}

/// Parsed FastFile header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FastFileHeader {
    /// Container magic.
    pub magic: Magic,
    /// Version value in its matched byte order.
    pub version: u32,
    /// Byte order the version matched in (and the platform's byte order).
    pub endian: Endian,
    /// Detected game.
    pub game: Game,
    /// Detected platform.
    pub platform: Platform,
    /// Total file length in bytes.
    pub file_len: usize,
}

impl FastFileHeader {
    /// Parse and classify the first 12 bytes of a FastFile.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (raw, _) = RawHeader::read_from_prefix(data).map_err(|_| Error::TooShort(data.len()))?;

        let magic = Magic::from_bytes(&raw.magic).ok_or(Error::InvalidMagic(raw.magic))?;
        let big = Endian::Big.read_u32(&raw.version);
        let little = Endian::Little.read_u32(&raw.version);

        // Console constants first: a big-endian match is tried before the
        // little-endian interpretation.
        let console = KNOWN_VERSIONS
            .iter()
            .find(|v| v.target != VersionTarget::Pc && v.value == big);
        let pc = KNOWN_VERSIONS
            .iter()
            .find(|v| v.target == VersionTarget::Pc && v.value == little);

        let (known, endian) = match (console, pc) {
            (Some(known), _) => (known, Endian::Big),
            (None, Some(known)) => (known, Endian::Little),
            (None, None) => return Err(Error::UnknownVersion { big, little }),
        };

        let platform = match known.target {
            VersionTarget::Pc => Platform::Pc,
            VersionTarget::Wii => Platform::Wii,
            VersionTarget::Console if magic == Magic::Signed => Platform::Xbox360,
            VersionTarget::Console => Platform::Ps3,
        };

        Ok(Self {
            magic,
            version: known.value,
            endian,
            game: known.game,
            platform,
            file_len: data.len(),
        })
    }

    /// Build the header for writing a new file.
    pub fn for_target(game: Game, platform: Platform) -> Result<Self> {
        let version = version_for(game, platform)
            .ok_or_else(|| Error::NoVersion(format!("{game} {platform}")))?;
        Ok(Self {
            magic: Magic::Unsigned,
            version,
            endian: platform.endian(),
            game,
            platform,
            file_len: 0,
        })
    }

    /// Whether the file carries the signed magic.
    #[inline]
    pub fn is_signed(&self) -> bool {
        self.magic == Magic::Signed
    }

    /// Whether the file was built for PC.
    #[inline]
    pub fn is_pc(&self) -> bool {
        self.platform == Platform::Pc
    }

    /// Whether the file was built for Wii.
    #[inline]
    pub fn is_wii(&self) -> bool {
        self.platform == Platform::Wii
    }

    /// Whether the file was built for Xbox 360.
    #[inline]
    pub fn is_xbox360(&self) -> bool {
        self.platform == Platform::Xbox360
    }

    /// Serialize the 12-byte header.
    pub fn to_bytes(&self) -> [u8; RawHeader::SIZE] {
        let mut version = [0u8; 4];
        self.endian.write_u32(&mut version, self.version);
        let raw = RawHeader {
            magic: *self.magic.bytes(),
            version,
        };
        let mut out = [0u8; RawHeader::SIZE];
        out.copy_from_slice(raw.as_bytes());
        out
    }
}

/// MW2's extended header, between the version and the compressed data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtendedHeader {
    /// Whether the online-update service may patch this file.
    pub allow_online_update: bool,
    /// Creation time as written by the linker.
    pub creation_time: u64,
    /// Region code.
    pub region: u32,
    /// Raw entry table, `ENTRY_SIZE` bytes per entry.
    pub entries: Vec<[u8; ExtendedHeader::ENTRY_SIZE]>,
    /// First file-size field.
    pub file_size: u32,
    /// Second file-size field.
    pub file_size_alt: u32,
    /// Bytes occupied by the extended header.
    pub len: usize,
}

impl ExtendedHeader {
    /// Bytes per entry-table entry.
    pub const ENTRY_SIZE: usize = 20;

    /// Entry tables longer than this are treated as corruption.
    pub const MAX_ENTRIES: u32 = 4096;

    /// Read the extended header that starts at `offset`.
    pub fn parse(data: &[u8], offset: usize, endian: Endian) -> Result<Self> {
        let mut reader = BinaryReader::new_at(data, offset, endian);

        let allow_online_update = reader.read_bool()?;
        let creation_time = reader.read_u64()?;
        let region = reader.read_u32()?;
        let entry_count = reader.read_u32()?;
        if entry_count > Self::MAX_ENTRIES {
            return Err(Error::ExtendedHeader(format!(
                "entry count {entry_count} exceeds {}",
                Self::MAX_ENTRIES
            )));
        }

        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            let bytes = reader.read_bytes(Self::ENTRY_SIZE)?;
            let mut entry = [0u8; Self::ENTRY_SIZE];
            entry.copy_from_slice(bytes);
            entries.push(entry);
        }

        let file_size = reader.read_u32()?;
        let file_size_alt = reader.read_u32()?;

        Ok(Self {
            allow_online_update,
            creation_time,
            region,
            entries,
            file_size,
            file_size_alt,
            len: reader.position() - offset,
        })
    }

    /// An empty extended header for newly written files.
    pub fn empty() -> Self {
        Self {
            allow_online_update: false,
            creation_time: 0,
            region: 0,
            entries: Vec::new(),
            file_size: 0,
            file_size_alt: 0,
            len: 1 + 8 + 4 + 4 + 4 + 4,
        }
    }

    /// Serialize in the given byte order.
    pub fn to_bytes(&self, endian: Endian) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        out.push(self.allow_online_update as u8);
        let mut time = [0u8; 8];
        match endian {
            Endian::Big => time.copy_from_slice(&self.creation_time.to_be_bytes()),
            Endian::Little => time.copy_from_slice(&self.creation_time.to_le_bytes()),
        }
        out.extend_from_slice(&time);
        endian.put_u32(&mut out, self.region);
        endian.put_u32(&mut out, self.entries.len() as u32);
        for entry in &self.entries {
            out.extend_from_slice(entry);
        }
        endian.put_u32(&mut out, self.file_size);
        endian.put_u32(&mut out, self.file_size_alt);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(magic: &[u8; 8], version: [u8; 4]) -> Vec<u8> {
        let mut data = magic.to_vec();
        data.extend_from_slice(&version);
        data
    }

    #[test]
    fn test_cod4_pc_little_endian() {
        let data = header(Magic::UNSIGNED, [0x05, 0x00, 0x00, 0x00]);
        let header = FastFileHeader::parse(&data).unwrap();
        assert_eq!(header.game, Game::CoD4);
        assert_eq!(header.platform, Platform::Pc);
        assert_eq!(header.endian, Endian::Little);
        assert!(header.is_pc());
        assert!(!header.is_signed());
    }

    #[test]
    fn test_waw_disambiguated_by_byte_order() {
        let ps3 = FastFileHeader::parse(&header(Magic::UNSIGNED, [0, 0, 0x01, 0x83])).unwrap();
        assert_eq!((ps3.game, ps3.platform), (Game::WaW, Platform::Ps3));

        let pc = FastFileHeader::parse(&header(Magic::UNSIGNED, [0x83, 0x01, 0, 0])).unwrap();
        assert_eq!((pc.game, pc.platform), (Game::WaW, Platform::Pc));
    }

    #[test]
    fn test_signed_console_is_xbox() {
        let data = header(Magic::SIGNED, [0, 0, 0x01, 0x0D]);
        let header = FastFileHeader::parse(&data).unwrap();
        assert_eq!(header.game, Game::MW2);
        assert!(header.is_xbox360());
        assert!(header.is_signed());
    }

    #[test]
    fn test_wii_version() {
        let data = header(Magic::UNSIGNED, [0, 0, 0x01, 0x9B]);
        let header = FastFileHeader::parse(&data).unwrap();
        assert!(header.is_wii());
        assert_eq!(header.endian, Endian::Big);
    }

    #[test]
    fn test_rejects_bad_magic_and_version() {
        let bad_magic = header(b"IWffz100", [0, 0, 0, 1]);
        assert!(matches!(
            FastFileHeader::parse(&bad_magic),
            Err(Error::InvalidMagic(_))
        ));

        let bad_version = header(Magic::UNSIGNED, [0x12, 0x34, 0x56, 0x78]);
        assert!(matches!(
            FastFileHeader::parse(&bad_version),
            Err(Error::UnknownVersion { .. })
        ));

        assert!(matches!(
            FastFileHeader::parse(b"IWffu"),
            Err(Error::TooShort(5))
        ));
    }

    #[test]
    fn test_header_bytes_reparse() {
        let built = FastFileHeader::for_target(Game::MW2, Platform::Pc).unwrap();
        let parsed = FastFileHeader::parse(&built.to_bytes()).unwrap();
        assert_eq!(parsed.game, Game::MW2);
        assert_eq!(parsed.platform, Platform::Pc);
        assert_eq!(parsed.version, 0x114);
    }

    #[test]
    fn test_extended_header() {
        let mut ext = ExtendedHeader::empty();
        ext.region = 3;
        ext.entries.push([7u8; ExtendedHeader::ENTRY_SIZE]);
        ext.file_size = 0x1000;
        let mut data = vec![0u8; 12];
        data.extend_from_slice(&ext.to_bytes(Endian::Big));

        let parsed = ExtendedHeader::parse(&data, 12, Endian::Big).unwrap();
        assert_eq!(parsed.region, 3);
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.file_size, 0x1000);
        assert_eq!(parsed.len, 1 + 8 + 4 + 4 + 20 + 8);
    }
}
