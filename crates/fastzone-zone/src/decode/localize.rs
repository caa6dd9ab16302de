//! Localize entry decoder.
//!
//! ```text
//! [0x00] value ptr  FFFFFFFF, or anything else when the value is absent
//! [0x04] key ptr    FFFFFFFF
//! [0x08] value\0 (if inline), key\0
//! ```

use fastzone_common::text;

use super::names::is_localize_key;
use super::DecodeCx;
use crate::asset::LocalizedEntry;

pub fn decode(cx: &DecodeCx<'_>, offset: usize) -> Option<LocalizedEntry> {
    let value_inline = cx.ptr_at(offset)?.is_inline();
    if !cx.ptr_at(offset + 4)?.is_inline() {
        return None;
    }

    let mut pos = offset + 8;
    let value = if value_inline {
        let (bytes, next) = text::cstr_span(cx.data, pos, cx.limits.max_string_len)?;
        // Localized text may be any encoding the title used; control bytes
        // other than whitespace mean this is not a string.
        if bytes
            .iter()
            .any(|&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r'))
        {
            return None;
        }
        pos = next;
        Some(text::lossy(bytes))
    } else {
        None
    };

    let (key, end) = cx.str_at(pos)?;
    if !is_localize_key(key) {
        return None;
    }

    Some(LocalizedEntry {
        key: key.to_string(),
        value,
        start: offset,
        end,
    })
}

#[cfg(test)]
mod tests {
    use fastzone_common::Endian;
    use fastzone_ff::{Game, Platform};

    use super::*;
    use crate::decode::testutil::{def, Bytes};
    use crate::ScanLimits;

    fn decode_be(data: &[u8]) -> Option<LocalizedEntry> {
        let cx = DecodeCx::new(data, def(Game::CoD4, Platform::Ps3), &[], &ScanLimits::DEFAULT);
        decode(&cx, 0)
    }

    #[test]
    fn test_value_and_key() {
        let mut b = Bytes::new(Endian::Big);
        b.ff().ff().cstr("Start Game").cstr("MENU_START_GAME").u32(7);

        let entry = decode_be(&b.buf).unwrap();
        assert_eq!(entry.key, "MENU_START_GAME");
        assert_eq!(entry.value.as_deref(), Some("Start Game"));
        assert_eq!(entry.end, b.len() - 4);
    }

    #[test]
    fn test_key_only() {
        let mut b = Bytes::new(Endian::Big);
        b.u32(0).ff().cstr("MP_SOME_KEY");

        let entry = decode_be(&b.buf).unwrap();
        assert_eq!(entry.value, None);
        assert_eq!(entry.end, b.len());
    }

    #[test]
    fn test_each_guard_rule_rejects() {
        for key in ["ab", "lowercase_key", "NOUNDERSCORE", "AAAA_TEST"] {
            let mut b = Bytes::new(Endian::Big);
            b.ff().ff().cstr("value").cstr(key);
            assert!(decode_be(&b.buf).is_none(), "{key} accepted");
        }
    }

    #[test]
    fn test_key_pointer_must_be_inline() {
        let mut b = Bytes::new(Endian::Big);
        b.ff().u32(0).cstr("MENU_START_GAME");
        assert!(decode_be(&b.buf).is_none());
    }
}
