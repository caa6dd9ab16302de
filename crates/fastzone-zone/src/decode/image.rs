//! Image decoder.
//!
//! ```text
//! [0x00] map type      u32, 0..=5
//! [0x04] texture ptr   FFFFFFFF when a load definition follows the name
//! [0x08] semantic      u8
//! [0x09] category      u8
//! [0x0A] streaming     u8, 0 or 1
//! [0x0C] card memory   u32
//! [0x10] width, height, depth   u16 each, then 2 bytes padding
//! [0x18] name ptr      FFFFFFFF
//! [0x1C] name\0
//!        load definition (16 bytes) + resource bytes, if inline and not streamed
//! ```

use super::names::is_asset_name;
use super::DecodeCx;
use crate::asset::{ImageAsset, ImageLoad};

pub const HEADER_SIZE: usize = 0x1C;

const MAX_MAP_TYPE: u32 = 5;
const MAX_DIMENSION: u16 = 8192;
const MAX_DEPTH: u16 = 2048;
const LOAD_DEF_SIZE: usize = 16;

pub fn decode(cx: &DecodeCx<'_>, offset: usize) -> Option<ImageAsset> {
    let map_type = cx.u32_at(offset)?;
    if map_type > MAX_MAP_TYPE {
        return None;
    }
    let texture = cx.ptr_at(offset + 4)?;
    let semantic = cx.u8_at(offset + 8)?;
    let category = cx.u8_at(offset + 9)?;
    let streaming = cx.u8_at(offset + 0x0A)?;
    if streaming > 1 {
        return None;
    }
    let card_memory = cx.u32_at(offset + 0x0C)?;
    let width = cx.u16_at(offset + 0x10)?;
    let height = cx.u16_at(offset + 0x12)?;
    let depth = cx.u16_at(offset + 0x14)?;
    if !(1..=MAX_DIMENSION).contains(&width)
        || !(1..=MAX_DIMENSION).contains(&height)
        || !(1..=MAX_DEPTH).contains(&depth)
    {
        return None;
    }
    if !cx.ptr_at(offset + 0x18)?.is_inline() {
        return None;
    }

    let (name, name_end) = cx.str_at(offset + HEADER_SIZE)?;
    if !is_asset_name(name, 128) {
        return None;
    }

    let streamed = streaming != 0;
    let (load, end) = if texture.is_inline() && !streamed {
        let def = name_end;
        let level_count = cx.u8_at(def)?;
        let flags = cx.u8_at(def + 1)?;
        let dimensions = [
            cx.u16_at(def + 2)? as i16,
            cx.u16_at(def + 4)? as i16,
            cx.u16_at(def + 6)? as i16,
        ];
        let format = cx.i32_at(def + 8)?;
        let resource_size = cx.i32_at(def + 12)?;
        if level_count == 0 || resource_size < 0 {
            return None;
        }
        let resource_start = def + LOAD_DEF_SIZE;
        let resource_end = resource_start.checked_add(resource_size as usize)?;
        if resource_end > cx.data.len() {
            return None;
        }
        (
            Some(ImageLoad {
                level_count,
                flags,
                dimensions,
                format,
                resource: resource_start..resource_end,
            }),
            resource_end,
        )
    } else {
        (None, name_end)
    };

    Some(ImageAsset {
        name: name.to_string(),
        map_type,
        semantic,
        category,
        streamed,
        card_memory,
        width,
        height,
        depth,
        load,
        start: offset,
        end,
    })
}
