//! String table decoder.
//!
//! ```text
//! [0x00] name ptr    FFFFFFFF
//! [0x04] columns     u32
//! [0x08] rows        u32
//! [0x0C] values ptr  FFFFFFFF
//! [0x10] name\0
//!        optional cell pointer array (rows*cols entries, inline markers)
//!        rows*cols cell strings
//! ```

use fastzone_common::{text, INLINE_SENTINEL};

use super::names::is_csv_name;
use super::DecodeCx;
use crate::asset::StringTable;

const MAX_COLUMNS: u32 = 1000;
const MAX_ROWS: u32 = 100_000;

pub(crate) struct Header<'a> {
    name: &'a str,
    columns: u32,
    rows: u32,
    name_end: usize,
}

pub(crate) fn header<'a>(cx: &DecodeCx<'a>, offset: usize) -> Option<Header<'a>> {
    if !cx.ptr_at(offset)?.is_inline() {
        return None;
    }
    let columns = cx.u32_at(offset + 4)?;
    let rows = cx.u32_at(offset + 8)?;
    if columns == 0 || columns > MAX_COLUMNS || rows == 0 || rows > MAX_ROWS {
        return None;
    }
    if !cx.inline_at(offset + 12)? {
        return None;
    }

    let (name, name_end) = cx.str_at(offset + 16)?;
    if !is_csv_name(name) {
        return None;
    }

    Some(Header {
        name,
        columns,
        rows,
        name_end,
    })
}

pub fn decode(cx: &DecodeCx<'_>, offset: usize) -> Option<StringTable> {
    let h = header(cx, offset)?;
    let cell_count = h.columns as usize * h.rows as usize;

    let mut pos = skip_pointer_array(cx, h.name_end, cell_count);
    let mut cells = Vec::with_capacity(cell_count.min(4096));
    while cells.len() < cell_count {
        // Another asset starts here.
        if cx.u32_at(pos) == Some(INLINE_SENTINEL) {
            break;
        }
        let Some((bytes, next)) = text::cstr_span(cx.data, pos, cx.limits.max_string_len) else {
            break;
        };
        cells.push(text::lossy(bytes));
        pos = next;
    }

    Some(StringTable {
        name: h.name.to_string(),
        columns: h.columns,
        rows: h.rows,
        cells,
        start: offset,
        end: pos,
    })
}

/// Skip the cell pointer array when every slot's pointer is an inline marker.
fn skip_pointer_array(cx: &DecodeCx<'_>, at: usize, cell_count: usize) -> usize {
    let stride = cx.def.string_table.cell_stride;
    let Some(len) = cell_count.checked_mul(stride) else {
        return at;
    };
    if at + len > cx.data.len() {
        return at;
    }
    let all_inline =
        (0..cell_count).all(|i| cx.ptr_at(at + i * stride).is_some_and(|p| p.is_inline()));
    if all_inline {
        at + len
    } else {
        at
    }
}

#[cfg(test)]
mod tests {
    use fastzone_common::Endian;
    use fastzone_ff::{Game, Platform};

    use super::*;
    use crate::decode::testutil::{def, Bytes};
    use crate::ScanLimits;

    #[test]
    fn test_table_with_pointer_array() {
        let mut b = Bytes::new(Endian::Big);
        b.ff().u32(2).u32(2).ff().cstr("mp/classtable.csv");
        for _ in 0..4 {
            b.ff();
        }
        b.cstr("id").cstr("name").cstr("1").cstr("ak47_mp");

        let cx = DecodeCx::new(&b.buf, def(Game::CoD4, Platform::Ps3), &[], &ScanLimits::DEFAULT);
        let table = decode(&cx, 0).unwrap();
        assert_eq!(table.name, "mp/classtable.csv");
        assert!(table.is_complete());
        assert_eq!(table.cell(1, 1), Some("ak47_mp"));
        assert_eq!(table.end, b.len());
    }

    #[test]
    fn test_cells_stop_at_next_asset() {
        let mut b = Bytes::new(Endian::Big);
        b.ff().u32(3).u32(1).ff().cstr("x.csv").cstr("a");
        let stop = b.len();
        b.ff().ff().cstr("v").cstr("SOME_KEY");

        let cx = DecodeCx::new(&b.buf, def(Game::WaW, Platform::Xbox360), &[], &ScanLimits::DEFAULT);
        let table = decode(&cx, 0).unwrap();
        assert_eq!(table.cells, vec!["a"]);
        assert!(!table.is_complete());
        assert_eq!(table.end, stop);
    }

    #[test]
    fn test_mw2_hashed_cells() {
        let mut b = Bytes::new(Endian::Little);
        b.ff().u32(1).u32(2).ff().cstr("mp/t.csv");
        b.ff().u32(0x1234).ff().u32(0x5678);
        b.cstr("x").cstr("y");

        let cx = DecodeCx::new(&b.buf, def(Game::MW2, Platform::Pc), &[], &ScanLimits::DEFAULT);
        let table = decode(&cx, 0).unwrap();
        assert_eq!(table.cells, vec!["x", "y"]);
    }

    #[test]
    fn test_guards() {
        for (cols, rows, name) in [(0, 1, "a.csv"), (1001, 1, "a.csv"), (1, 100_001, "a.csv"), (1, 1, "a.txt")] {
            let mut b = Bytes::new(Endian::Big);
            b.ff().u32(cols).u32(rows).ff().cstr(name).cstr("cell");
            let cx = DecodeCx::new(&b.buf, def(Game::CoD4, Platform::Ps3), &[], &ScanLimits::DEFAULT);
            assert!(decode(&cx, 0).is_none(), "{cols}x{rows} {name}");
        }
    }
}
