//! XAnimParts (skeletal animation) decoder.
//!
//! ```text
//! [0x00] name ptr                FFFFFFFF
//! [0x04] dataByteCount           u16
//! [0x06] dataShortCount          u16
//! [0x08] dataIntCount            u16
//! [0x0A] randomDataByteCount     u16
//! [0x0C] randomDataIntCount      u16
//! [0x0E] numframes               u16
//! [0x10] bLoop, bDelta           u8, u8
//! [0x12] boneCount[10]           u8, total in the last slot
//! [0x1C] notifyCount, assetType  u8, u8, then 2 bytes padding
//! [0x20] randomDataShortCount    u32
//! [0x24] indexCount              u32
//! [0x28] framerate, frequency    f32, f32
//! [0x30] ten pointers: names, data byte/short/int, random data
//!        short/byte/int, indices, notify, delta part
//! [0x58] name\0, bone name indices (u16 script strings), streams...
//! ```
//!
//! The streams after the bone names are title-specific, so the end is the
//! next plausible asset header.

use super::names::is_xanim_name;
use super::{bounded_end, DecodeCx};
use crate::asset::XAnimParts;

pub const HEADER_SIZE: usize = 0x58;

const NAMES_PTR: usize = 0x30;

pub(crate) struct Header<'a> {
    parts: XAnimParts,
    name: &'a str,
    name_end: usize,
}

pub(crate) fn header<'a>(cx: &DecodeCx<'a>, offset: usize) -> Option<Header<'a>> {
    if !cx.ptr_at(offset)?.is_inline() {
        return None;
    }

    let framerate = cx.f32_at(offset + 0x28)?;
    // NaN fails both comparisons.
    if !(framerate > 0.1 && framerate <= 1000.0) {
        return None;
    }
    // numframes is a u16 field, well under the 100000 frame ceiling.
    let frame_count = cx.u16_at(offset + 0x0E)?;
    if frame_count == 0 {
        return None;
    }
    let frequency = cx.f32_at(offset + 0x2C)?;
    if !frequency.is_finite() || frequency < 0.0 {
        return None;
    }

    let mut bone_counts = [0u8; 10];
    bone_counts.copy_from_slice(cx.data.get(offset + 0x12..offset + 0x1C)?);

    let (name, name_offset, name_end) = find_name(cx, offset + HEADER_SIZE)?;

    let parts = XAnimParts {
        name: String::new(),
        data_byte_count: cx.u16_at(offset + 0x04)?,
        data_short_count: cx.u16_at(offset + 0x06)?,
        data_int_count: cx.u16_at(offset + 0x08)?,
        random_data_byte_count: cx.u16_at(offset + 0x0A)?,
        random_data_int_count: cx.u16_at(offset + 0x0C)?,
        frame_count,
        looping: cx.u8_at(offset + 0x10)? != 0,
        delta: cx.u8_at(offset + 0x11)? != 0,
        bone_counts,
        notify_count: cx.u8_at(offset + 0x1C)?,
        asset_type: cx.u8_at(offset + 0x1D)?,
        random_data_short_count: cx.u32_at(offset + 0x20)?,
        index_count: cx.u32_at(offset + 0x24)?,
        framerate,
        frequency,
        bone_names: Vec::new(),
        name_offset,
        start: offset,
        end: name_end,
        end_estimated: false,
    };

    Some(Header {
        parts,
        name,
        name_end,
    })
}

/// The name normally starts right after the header; some files pad it, so
/// a short window is searched for a valid name starting after a NUL or a
/// sentinel byte.
fn find_name<'a>(cx: &DecodeCx<'a>, at: usize) -> Option<(&'a str, usize, usize)> {
    let valid = |pos: usize| {
        cx.str_at(pos)
            .filter(|(name, _)| is_xanim_name(name))
            .map(|(name, end)| (name, pos, end))
    };

    if let Some(found) = valid(at) {
        return Some(found);
    }
    let limit = at.saturating_add(cx.limits.xanim_name_window).min(cx.data.len());
    (at + 1..limit)
        .filter(|&pos| matches!(cx.data[pos - 1], 0x00 | 0xFF))
        .find_map(valid)
}

pub fn decode(cx: &DecodeCx<'_>, offset: usize) -> Option<XAnimParts> {
    let Header {
        mut parts,
        name,
        name_end,
    } = header(cx, offset)?;
    parts.name = name.to_string();

    let mut pos = name_end;
    let total_bones = parts.bone_count() as usize;
    if total_bones > 0 && cx.ptr_at(offset + NAMES_PTR)?.is_inline() {
        let indices_end = pos + 2 * total_bones;
        if indices_end <= cx.data.len() {
            parts.bone_names = (0..total_bones)
                .filter_map(|i| cx.u16_at(pos + 2 * i))
                .map(|index| cx.script_string(index))
                .collect();
            pos = indices_end;
        }
    }

    let (end, end_estimated) = bounded_end(cx, pos);
    parts.end = end;
    parts.end_estimated = end_estimated;
    Some(parts)
}

#[cfg(test)]
mod tests {
    use fastzone_common::Endian;
    use fastzone_ff::{Game, Platform};

    use super::*;
    use crate::decode::testutil::{def, Bytes};
    use crate::ScanLimits;

    fn xanim_header(b: &mut Bytes, framerate_bits: u32, frames: u16, bones: u8) {
        b.ff();
        b.u16(10).u16(20).u16(30).u16(0).u16(0).u16(frames);
        b.u8(1).u8(0);
        b.zeros(9).u8(bones);
        b.u8(2).u8(0).zeros(2);
        b.u32(0).u32(0);
        b.u32(framerate_bits).f32(1.0);
        b.ff();
        b.zeros(4 * 9);
    }

    #[test]
    fn test_decode_with_bone_names() {
        let strings = vec!["".to_string(), "tag_origin".to_string(), "j_spine4".to_string()];
        let mut b = Bytes::new(Endian::Big);
        xanim_header(&mut b, 30.0f32.to_bits(), 42, 2);
        assert_eq!(b.len(), HEADER_SIZE);
        b.cstr("pb_stand_alert").u16(1).u16(2).zeros(12);
        let next = b.len();
        b.ff().u32(1).ff().cstr("x.gsc").u8(b'!');

        let def = def(Game::WaW, Platform::Ps3);
        let cx = DecodeCx::new(&b.buf, def, &strings, &ScanLimits::DEFAULT);
        let anim = decode(&cx, 0).unwrap();
        assert_eq!(anim.name, "pb_stand_alert");
        assert_eq!(anim.frame_count, 42);
        assert_eq!(anim.framerate, 30.0);
        assert!(anim.looping);
        assert_eq!(anim.bone_names, vec!["tag_origin", "j_spine4"]);
        assert_eq!(anim.end, next);
        assert!(!anim.end_estimated);
    }

    #[test]
    fn test_nan_framerate_rejected() {
        let mut b = Bytes::new(Endian::Big);
        xanim_header(&mut b, 0x7FC0_0000, 42, 0);
        b.cstr("pb_stand_alert").zeros(8);

        let cx = DecodeCx::new(&b.buf, def(Game::CoD4, Platform::Ps3), &[], &ScanLimits::DEFAULT);
        assert!(decode(&cx, 0).is_none());
    }

    #[test]
    fn test_frame_and_rate_bounds() {
        for (rate, frames) in [(0.05f32, 10u16), (2000.0, 10), (30.0, 0)] {
            let mut b = Bytes::new(Endian::Little);
            xanim_header(&mut b, rate.to_bits(), frames, 0);
            b.cstr("pb_stand_alert");
            let cx = DecodeCx::new(&b.buf, def(Game::CoD4, Platform::Pc), &[], &ScanLimits::DEFAULT);
            assert!(decode(&cx, 0).is_none(), "rate {rate} frames {frames}");
        }
    }

    #[test]
    fn test_widest_frame_count_accepted() {
        let mut b = Bytes::new(Endian::Little);
        xanim_header(&mut b, 30.0f32.to_bits(), u16::MAX, 0);
        b.cstr("pb_long_idle").zeros(4);

        let cx = DecodeCx::new(&b.buf, def(Game::CoD4, Platform::Pc), &[], &ScanLimits::DEFAULT);
        assert_eq!(decode(&cx, 0).unwrap().frame_count, u16::MAX);
    }

    #[test]
    fn test_padded_name_is_found() {
        let mut b = Bytes::new(Endian::Little);
        xanim_header(&mut b, 20.0f32.to_bits(), 5, 0);
        b.zeros(6).cstr("viewmodel_reload").zeros(4);

        let cx = DecodeCx::new(&b.buf, def(Game::CoD4, Platform::Pc), &[], &ScanLimits::DEFAULT);
        let anim = decode(&cx, 0).unwrap();
        assert_eq!(anim.name, "viewmodel_reload");
        assert_eq!(anim.name_offset, HEADER_SIZE + 6);
    }
}
