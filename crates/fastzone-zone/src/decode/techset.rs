//! Technique set decoder.
//!
//! ```text
//! [0x00] name ptr            FFFFFFFF
//! [0x04] world vert format   u8, then 3 bytes padding
//! [0x08] remapped ptr
//! [0x0C] technique ptr x N   each FFFFFFFF or 0
//! then name\0 and the inline techniques
//! ```

use super::names::is_asset_name;
use super::{bounded_end, DecodeCx};
use crate::asset::TechSet;

pub(crate) struct Header<'a> {
    name: &'a str,
    world_vert_format: u8,
    inline_techniques: usize,
    name_end: usize,
}

pub(crate) fn header<'a>(cx: &DecodeCx<'a>, offset: usize) -> Option<Header<'a>> {
    let layout = cx.def.techset;
    if !cx.ptr_at(offset)?.is_inline() {
        return None;
    }
    let world_vert_format = cx.u8_at(offset + 4)?;

    let remapped = cx.ptr_at(offset + 8)?;
    if !remapped.is_inline() && !remapped.is_null() {
        return None;
    }

    let mut inline_techniques = 0;
    for i in 0..layout.technique_count {
        let slot = cx.ptr_at(offset + 12 + 4 * i)?;
        if slot.is_inline() {
            inline_techniques += 1;
        } else if !slot.is_null() {
            return None;
        }
    }
    if inline_techniques == 0 {
        return None;
    }

    let (name, name_end) = cx.str_at(offset + layout.header_size())?;
    if !is_asset_name(name, 128) {
        return None;
    }

    Some(Header {
        name,
        world_vert_format,
        inline_techniques,
        name_end,
    })
}

pub fn decode(cx: &DecodeCx<'_>, offset: usize) -> Option<TechSet> {
    let h = header(cx, offset)?;
    let (end, end_estimated) = bounded_end(cx, h.name_end);

    Some(TechSet {
        name: h.name.to_string(),
        world_vert_format: h.world_vert_format,
        inline_techniques: h.inline_techniques,
        technique_slots: cx.def.techset.technique_count,
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

    fn techset(count: usize, inline: &[usize]) -> Bytes {
        let mut b = Bytes::new(Endian::Big);
        b.ff().u8(3).zeros(3).u32(0);
        for i in 0..count {
            if inline.contains(&i) {
                b.ff();
            } else {
                b.u32(0);
            }
        }
        b.cstr("mc_l_sm_r0c0").zeros(16);
        b
    }

    #[test]
    fn test_techset() {
        let def = def(Game::MW2, Platform::Xbox360);
        let b = techset(def.techset.technique_count, &[0, 5, 9]);
        let cx = DecodeCx::new(&b.buf, def, &[], &ScanLimits::DEFAULT);

        let set = decode(&cx, 0).unwrap();
        assert_eq!(set.name, "mc_l_sm_r0c0");
        assert_eq!(set.world_vert_format, 3);
        assert_eq!(set.inline_techniques, 3);
        assert_eq!(set.technique_slots, 48);
    }

    #[test]
    fn test_techset_needs_an_inline_technique() {
        let def = def(Game::MW2, Platform::Xbox360);
        let b = techset(def.techset.technique_count, &[]);
        let cx = DecodeCx::new(&b.buf, def, &[], &ScanLimits::DEFAULT);
        assert!(decode(&cx, 0).is_none());
    }
}
