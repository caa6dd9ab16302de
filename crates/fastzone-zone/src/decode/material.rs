//! Material decoder.
//!
//! The header is a fixed per-title struct starting with the name pointer;
//! the count bytes and the technique-set pointer sit at offsets given by
//! [`MaterialLayout`](crate::definition::MaterialLayout). The name follows
//! the header, then the texture, constant and state tables.

use super::names::is_asset_name;
use super::{bounded_end, DecodeCx};
use crate::asset::Material;

const MAX_TEXTURES: u8 = 32;
const MAX_CONSTANTS: u8 = 32;
const MAX_STATE_BITS: u8 = 64;

pub(crate) struct Header<'a> {
    name: &'a str,
    texture_count: u8,
    constant_count: u8,
    state_bits_count: u8,
    techset_inline: bool,
    name_end: usize,
}

pub(crate) fn header<'a>(cx: &DecodeCx<'a>, offset: usize) -> Option<Header<'a>> {
    let layout = cx.def.material;
    if !cx.ptr_at(offset)?.is_inline() {
        return None;
    }

    let texture_count = cx.u8_at(offset + layout.texture_count)?;
    let constant_count = cx.u8_at(offset + layout.constant_count)?;
    let state_bits_count = cx.u8_at(offset + layout.state_bits_count)?;
    if texture_count > MAX_TEXTURES
        || constant_count > MAX_CONSTANTS
        || state_bits_count > MAX_STATE_BITS
    {
        return None;
    }

    let techset = cx.ptr_at(offset + layout.techset)?;
    if !techset.is_inline() && !techset.is_null() {
        return None;
    }
    let textures = cx.ptr_at(offset + layout.texture_table)?;
    if texture_count > 0 && !textures.is_inline() {
        return None;
    }

    let (name, name_end) = cx.str_at(offset + layout.header_size)?;
    if !is_asset_name(name, 128) {
        return None;
    }

    Some(Header {
        name,
        texture_count,
        constant_count,
        state_bits_count,
        techset_inline: techset.is_inline(),
        name_end,
    })
}

pub fn decode(cx: &DecodeCx<'_>, offset: usize) -> Option<Material> {
    let h = header(cx, offset)?;
    let (end, end_estimated) = bounded_end(cx, h.name_end);

    Some(Material {
        name: h.name.to_string(),
        texture_count: h.texture_count,
        constant_count: h.constant_count,
        state_bits_count: h.state_bits_count,
        techset_inline: h.techset_inline,
        start: offset,
        end,
        end_estimated,
    })
}

#[cfg(test)]
mod tests {
    use fastzone_common::Endian;
    use fastzone_ff::{Game, Platform};

    use super::*;
    use crate::decode::testutil::{def, Bytes};
    use crate::ScanLimits;

    #[test]
    fn test_material_header() {
        let def = def(Game::CoD4, Platform::Pc);
        let layout = def.material;

        let mut header = vec![0u8; layout.header_size];
        header[..4].copy_from_slice(&[0xFF; 4]);
        header[layout.texture_count] = 2;
        header[layout.constant_count] = 1;
        header[layout.state_bits_count] = 3;
        header[layout.techset..layout.techset + 4].copy_from_slice(&[0xFF; 4]);
        header[layout.texture_table..layout.texture_table + 4].copy_from_slice(&[0xFF; 4]);

        let mut b = Bytes::new(Endian::Little);
        b.raw(&header).cstr("mc/mtl_brick_wall").zeros(8);

        let cx = DecodeCx::new(&b.buf, def, &[], &ScanLimits::DEFAULT);
        let material = decode(&cx, 0).unwrap();
        assert_eq!(material.name, "mc/mtl_brick_wall");
        assert_eq!(material.texture_count, 2);
        assert!(material.techset_inline);
        assert!(material.end_estimated);
        assert_eq!(material.end, b.len());

        header[layout.texture_count] = 200;
        let mut b = Bytes::new(Endian::Little);
        b.raw(&header).cstr("mc/mtl_brick_wall");
        let cx = DecodeCx::new(&b.buf, def, &[], &ScanLimits::DEFAULT);
        assert!(decode(&cx, 0).is_none());
    }
}
