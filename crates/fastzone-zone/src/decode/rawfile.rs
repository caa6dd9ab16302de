//! Rawfile decoder.
//!
//! ```text
//! Plain (CoD4, WaW), 12 bytes:
//!   [0x00] name ptr    FFFFFFFF
//!   [0x04] len         u32
//!   [0x08] buffer ptr  FFFFFFFF
//!   [0x0C] name\0, then len bytes, then an optional NUL
//!
//! Compressed (MW2), 16 bytes:
//!   [0x00] name ptr    FFFFFFFF
//!   [0x04] compressed  u32, 0 when stored
//!   [0x08] len         u32, inflated size
//!   [0x0C] buffer ptr  FFFFFFFF
//!   [0x10] name\0, then the blob (compressed bytes if compressed != 0)
//! ```

use tracing::trace;

use super::names::is_file_name;
use super::DecodeCx;
use crate::asset::RawFile;
use crate::definition::RawFileLayout;

pub fn decode(cx: &DecodeCx<'_>, offset: usize) -> Option<RawFile> {
    let layout = cx.def.rawfile;
    let header_size = layout.header_size();

    if !cx.ptr_at(offset)?.is_inline() {
        return None;
    }

    let (compressed, len, buffer_ptr) = match layout {
        RawFileLayout::Plain => (0, cx.u32_at(offset + 4)?, offset + 8),
        RawFileLayout::Compressed => (cx.u32_at(offset + 4)?, cx.u32_at(offset + 8)?, offset + 12),
    };
    let ptr = cx.ptr_at(buffer_ptr)?;
    if !ptr.is_inline() && !(len == 0 || (cx.def.zero_is_inline && ptr.is_null())) {
        return None;
    }

    let stored = if compressed != 0 { compressed } else { len };
    if stored as usize > cx.limits.max_rawfile_size || len as usize > cx.limits.max_rawfile_size {
        return None;
    }

    let (name, data_offset) = cx.str_at(offset + header_size)?;
    if !is_file_name(name) {
        return None;
    }

    let available = cx.data.len().saturating_sub(data_offset);
    let present = (stored as usize).min(available);
    let truncated = present < stored as usize;
    let data = data_offset..data_offset + present;

    let inflated = if compressed != 0 && !truncated {
        let bytes = fastzone_ff::inflate_block(&cx.data[data.clone()]).ok()?;
        if bytes.len() != len as usize {
            trace!(name, expected = len, actual = bytes.len(), "rawfile inflated to wrong size");
            return None;
        }
        Some(bytes)
    } else {
        None
    };

    let mut end = data.end;
    if !truncated && cx.data.get(end) == Some(&0) {
        end += 1;
    }

    Some(RawFile {
        name: name.to_string(),
        claimed_size: len,
        compressed_size: (compressed != 0).then_some(compressed),
        data,
        truncated,
        inflated,
        start: offset,
        header_end: offset + header_size,
        end,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use fastzone_common::Endian;
    use fastzone_ff::{Game, Platform};
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    use super::*;
    use crate::decode::testutil::{def, Bytes};
    use crate::ScanLimits;

    fn cx<'a>(data: &'a [u8], game: Game, platform: Platform) -> DecodeCx<'a> {
        DecodeCx::new(data, def(game, platform), &[], &ScanLimits::DEFAULT)
    }

    #[test]
    fn test_single_rawfile_then_noise() {
        let mut b = Bytes::new(Endian::Big);
        b.ff().u32(5).ff().cstr("a.txt").raw(b"hello").raw(&[0x13, 0x37, 0xAB, 0xCD]);

        let raw = decode(&cx(&b.buf, Game::CoD4, Platform::Ps3), 0).unwrap();
        assert_eq!(raw.name, "a.txt");
        assert_eq!(raw.data_len(), 5);
        assert_eq!(raw.contents(&b.buf), Some(&b"hello"[..]));
        assert!(!raw.truncated);
        assert_eq!(raw.header_end, 12);
        assert_eq!(raw.end, 23);
    }

    #[test]
    fn test_range_properties() {
        let mut b = Bytes::new(Endian::Little);
        b.zeros(3).ff().u32(4).ff().cstr("maps/x.gsc").raw(b"main").u8(0);

        let raw = decode(&cx(&b.buf, Game::WaW, Platform::Pc), 3).unwrap();
        assert!(raw.start < raw.header_end);
        assert!(raw.header_end <= raw.start + raw.claimed_size as usize + 12);
        assert!(raw.data_len() <= (raw.claimed_size as usize).min(b.len() - raw.data.start));
        // Trailing NUL consumed.
        assert_eq!(raw.end, b.len());
    }

    #[test]
    fn test_truncated_payload_is_flagged() {
        let mut b = Bytes::new(Endian::Big);
        b.ff().u32(1000).ff().cstr("sound/x.wav").raw(&[1, 2, 3]);

        let raw = decode(&cx(&b.buf, Game::CoD4, Platform::Xbox360), 0).unwrap();
        assert!(raw.truncated);
        assert_eq!(raw.data_len(), 3);
        assert_eq!(raw.end, b.len());
    }

    #[test]
    fn test_rejects_bad_sentinels_and_names() {
        let mut b = Bytes::new(Endian::Big);
        b.u32(0).u32(5).ff().cstr("a.txt").raw(b"hello");
        assert!(decode(&cx(&b.buf, Game::CoD4, Platform::Ps3), 0).is_none());

        let mut b = Bytes::new(Endian::Big);
        b.ff().u32(5).ff().cstr("noext").raw(b"hello");
        assert!(decode(&cx(&b.buf, Game::CoD4, Platform::Ps3), 0).is_none());
    }

    #[test]
    fn test_mw2_compressed_rawfile() {
        let contents = b"#include common_scripts\\utility;\n".repeat(10);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&contents).unwrap();
        let blob = encoder.finish().unwrap();

        let mut b = Bytes::new(Endian::Big);
        b.ff()
            .u32(blob.len() as u32)
            .u32(contents.len() as u32)
            .ff()
            .cstr("maps/mp/_utility.gsc")
            .raw(&blob);

        let raw = decode(&cx(&b.buf, Game::MW2, Platform::Ps3), 0).unwrap();
        assert_eq!(raw.compressed_size, Some(blob.len() as u32));
        assert_eq!(raw.header_end, 16);
        assert_eq!(raw.contents(&b.buf), Some(&contents[..]));
        assert_eq!(raw.end, b.len());
    }

    #[test]
    fn test_truncated_compressed_rawfile_has_no_contents() {
        let contents = b"set sv_hostname test\n".repeat(40);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&contents).unwrap();
        let blob = encoder.finish().unwrap();

        let mut b = Bytes::new(Endian::Big);
        b.ff()
            .u32(blob.len() as u32)
            .u32(contents.len() as u32)
            .ff()
            .cstr("mp/server.cfg")
            .raw(&blob[..blob.len() / 2]);

        let raw = decode(&cx(&b.buf, Game::MW2, Platform::Ps3), 0).unwrap();
        assert!(raw.truncated);
        assert_eq!(raw.inflated, None);
        assert_eq!(raw.data_len(), blob.len() / 2);
        assert_eq!(raw.contents(&b.buf), None);
    }
}
