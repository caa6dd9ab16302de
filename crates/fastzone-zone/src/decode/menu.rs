//! Menu list (menufile) decoder.
//!
//! ```text
//! [0x00] name ptr   FFFFFFFF
//! [0x04] menu count u32
//! [0x08] menus ptr  FFFFFFFF (or 0 when empty)
//! [0x0C] name\0, then one pointer slot per menu, then the menus
//! ```

use super::names::is_file_name;
use super::{bounded_end, DecodeCx};
use crate::asset::MenuList;

const MAX_MENUS: u32 = 512;

pub(crate) struct Header<'a> {
    name: &'a str,
    count: u32,
    menus_inline: bool,
    slots_end: usize,
}

pub(crate) fn header<'a>(cx: &DecodeCx<'a>, offset: usize) -> Option<Header<'a>> {
    if !cx.ptr_at(offset)?.is_inline() {
        return None;
    }
    let count = cx.u32_at(offset + 4)?;
    if count > MAX_MENUS {
        return None;
    }
    let menus = cx.ptr_at(offset + 8)?;
    let menus_inline = menus.is_inline_or_zero(cx.def.zero_is_inline) && count > 0;
    if count > 0 && !menus_inline {
        return None;
    }
    if count == 0 && !(menus.is_null() || menus.is_inline()) {
        return None;
    }

    let (name, name_end) = cx.str_at(offset + 12)?;
    if !is_file_name(name) {
        return None;
    }

    let slots_end = name_end + 4 * count as usize;
    if slots_end > cx.data.len() {
        return None;
    }
    // Every menu slot is itself an inline marker.
    for i in 0..count as usize {
        if !cx.ptr_at(name_end + 4 * i)?.is_inline() {
            return None;
        }
    }

    Some(Header {
        name,
        count,
        menus_inline,
        slots_end,
    })
}

pub fn decode(cx: &DecodeCx<'_>, offset: usize) -> Option<MenuList> {
    let h = header(cx, offset)?;

    let (end, end_estimated) = if h.count > 0 {
        bounded_end(cx, h.slots_end)
    } else {
        (h.slots_end, false)
    };

    Some(MenuList {
        name: h.name.to_string(),
        menu_count: h.count,
        menus_inline: h.menus_inline,
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
    fn test_menu_list_stops_at_next_header() {
        let mut b = Bytes::new(Endian::Big);
        b.ff().u32(2).ff().cstr("ui_mp/hud.txt").ff().ff();
        let menus_start = b.len();
        b.zeros(40);
        let next = b.len();
        // A rawfile header follows the menus.
        b.ff().u32(2).ff().cstr("b.cfg").raw(b"ok");

        let cx = DecodeCx::new(&b.buf, def(Game::CoD4, Platform::Ps3), &[], &ScanLimits::DEFAULT);
        let menu = decode(&cx, 0).unwrap();
        assert_eq!(menu.name, "ui_mp/hud.txt");
        assert_eq!(menu.menu_count, 2);
        assert!(menus_start < next);
        assert_eq!(menu.end, next);
        assert!(!menu.end_estimated);
    }

    #[test]
    fn test_rejects_huge_count() {
        let mut b = Bytes::new(Endian::Big);
        b.ff().u32(10_000).ff().cstr("ui_mp/hud.txt");
        let cx = DecodeCx::new(&b.buf, def(Game::CoD4, Platform::Ps3), &[], &ScanLimits::DEFAULT);
        assert!(decode(&cx, 0).is_none());
    }
}
