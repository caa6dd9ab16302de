//! Zone header (XFile + XAssetList).

use fastzone_common::{BinaryReader, InlinePtr};

use crate::definition::GameDefinition;
use crate::{Error, Result};

/// Fixed fields at the start of a zone buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneHeader {
    /// Declared zone size.
    pub size: u32,
    /// Size of data streamed from outside the zone.
    pub external_size: u32,
    /// Per-block allocation sizes; 6, 7 or 8 depending on platform.
    pub block_sizes: Vec<u32>,
    pub script_string_count: u32,
    pub script_strings: InlinePtr,
    pub asset_count: u32,
    pub assets: InlinePtr,
    /// Where the asset-list header ends.
    pub list_end: usize,
}

impl ZoneHeader {
    /// Read the header using the definition's offsets.
    pub fn parse(data: &[u8], def: &GameDefinition) -> Result<Self> {
        let layout = def.zone;
        if data.len() < layout.list_end {
            return Err(Error::HeaderTooShort {
                len: data.len(),
                needed: layout.list_end,
            });
        }

        let mut reader = BinaryReader::new(data, def.endian);
        let size = reader.read_u32()?;
        let external_size = reader.read_u32()?;
        let block_sizes = (0..layout.block_slots)
            .map(|_| reader.read_u32())
            .collect::<fastzone_common::Result<Vec<_>>>()?;

        reader.seek(layout.script_string_count);
        let script_string_count = reader.read_u32()?;
        reader.seek(layout.script_strings);
        let script_strings = reader.read_ptr()?;
        reader.seek(layout.asset_count);
        let asset_count = reader.read_u32()?;
        reader.seek(layout.assets);
        let assets = reader.read_ptr()?;

        Ok(Self {
            size,
            external_size,
            block_sizes,
            script_string_count,
            script_strings,
            asset_count,
            assets,
            list_end: layout.list_end,
        })
    }
}

#[cfg(test)]
mod tests {
    use fastzone_common::Endian;
    use fastzone_ff::{Game, Platform};

    use super::*;

    #[test]
    fn test_parse_per_platform() {
        for (platform, slots) in [(Platform::Xbox360, 6), (Platform::Ps3, 7), (Platform::Pc, 8)] {
            let def = GameDefinition::lookup(Game::CoD4, platform).unwrap();
            let endian: Endian = def.endian;
            let mut data = Vec::new();
            endian.put_u32(&mut data, 0x1000);
            endian.put_u32(&mut data, 0);
            for i in 0..slots {
                endian.put_u32(&mut data, i);
            }
            endian.put_u32(&mut data, 3);
            data.extend_from_slice(&[0xFF; 4]);
            endian.put_u32(&mut data, 9);
            data.extend_from_slice(&[0xFF; 4]);

            let header = ZoneHeader::parse(&data, def).unwrap();
            assert_eq!(header.block_sizes.len(), slots as usize);
            assert_eq!(header.script_string_count, 3);
            assert_eq!(header.asset_count, 9);
            assert_eq!(header.assets, InlinePtr::Inline);
            assert_eq!(header.list_end, data.len());
        }
    }

    #[test]
    fn test_short_buffer() {
        let def = GameDefinition::lookup(Game::MW2, Platform::Pc).unwrap();
        assert!(matches!(
            ZoneHeader::parse(&[0u8; 16], def),
            Err(Error::HeaderTooShort { .. })
        ));
    }
}
