//! zlib and raw-deflate helpers.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::{Error, Result};

/// Uncompressed size of every block but the last.
pub const BLOCK_SIZE: usize = 0x10000;

/// Whether two bytes form a valid zlib stream header.
///
/// Checks the deflate method nibble, the window size and the FCHECK bits.
#[inline]
pub fn is_zlib_header(data: &[u8]) -> bool {
    match data {
        [cmf, flg, ..] => {
            cmf & 0x0F == 8 && cmf >> 4 <= 7 && ((*cmf as u16) << 8 | *flg as u16) % 31 == 0
        }
        _ => false,
    }
}

/// Result of inflating one stream.
#[derive(Debug)]
pub(crate) struct Inflated {
    pub data: Vec<u8>,
    /// Input bytes the inflater consumed.
    pub consumed: usize,
    /// Whether the stream reached its end marker.
    pub complete: bool,
}

/// Inflate a single stream from the start of `input`.
///
/// Stops at the stream end marker, at input exhaustion, or with
/// [`Error::OutputTooLarge`] once `limit` is passed. Trailing bytes after the
/// stream are left unconsumed so callers can locate the next stream.
pub(crate) fn inflate_stream(input: &[u8], zlib: bool, limit: usize) -> Result<Inflated> {
    let mut inflater = Decompress::new(zlib);
    let mut data = Vec::with_capacity(BLOCK_SIZE);

    let complete = loop {
        if data.len() == data.capacity() {
            if data.len() >= limit {
                return Err(Error::OutputTooLarge(limit));
            }
            data.reserve(BLOCK_SIZE);
        }

        let in_before = inflater.total_in() as usize;
        let out_before = inflater.total_out();
        let status = inflater
            .decompress_vec(&input[in_before..], &mut data, FlushDecompress::None)
            .map_err(|e| Error::Decompression(e.to_string()))?;

        if status == Status::StreamEnd {
            break true;
        }

        let stalled = inflater.total_in() as usize == in_before && inflater.total_out() == out_before;
        if stalled && data.len() < data.capacity() {
            // Output space available but nothing moved: input is exhausted.
            break false;
        }
    };

    if data.len() > limit {
        return Err(Error::OutputTooLarge(limit));
    }

    Ok(Inflated {
        data,
        consumed: inflater.total_in() as usize,
        complete,
    })
}

/// Inflate one block, choosing zlib or raw deflate from its first bytes.
///
/// A block that looks like zlib but fails to inflate as such is retried as
/// raw deflate, since a raw stream can begin with a byte pair that happens to
/// pass the zlib header check.
pub fn inflate_block(block: &[u8]) -> Result<Vec<u8>> {
    inflate_block_limited(block, usize::MAX)
}

pub(crate) fn inflate_block_limited(block: &[u8], limit: usize) -> Result<Vec<u8>> {
    if is_zlib_header(block) {
        if let Ok(out) = inflate_stream(block, true, limit) {
            if out.complete {
                return Ok(out.data);
            }
        }
    }

    let out = inflate_stream(block, false, limit)?;
    if !out.complete {
        return Err(Error::Decompression("deflate stream truncated".to_string()));
    }
    Ok(out.data)
}

/// zlib-compress a buffer.
pub(crate) fn zlib_compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| Error::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| Error::Compression(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::DeflateEncoder;

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_zlib_header_detection() {
        assert!(is_zlib_header(&[0x78, 0x9C]));
        assert!(is_zlib_header(&[0x78, 0xDA]));
        assert!(is_zlib_header(&[0x78, 0x01]));
        assert!(!is_zlib_header(&[0x78, 0x00]));
        assert!(!is_zlib_header(&[0xED, 0xBD]));
        assert!(!is_zlib_header(&[0x78]));
    }

    #[test]
    fn test_inflate_block_both_forms() {
        let original = b"maps/mp/gametypes/_globallogic.gsc".repeat(64);

        let zlib = zlib_compress(&original).unwrap();
        assert_eq!(inflate_block(&zlib).unwrap(), original);

        let raw = deflate(&original);
        assert_eq!(inflate_block(&raw).unwrap(), original);
    }

    #[test]
    fn test_stream_consumed_stops_at_end() {
        let first = zlib_compress(b"first stream").unwrap();
        let mut input = first.clone();
        input.extend_from_slice(&zlib_compress(b"second").unwrap());

        let out = inflate_stream(&input, true, usize::MAX).unwrap();
        assert!(out.complete);
        assert_eq!(out.data, b"first stream");
        assert_eq!(out.consumed, first.len());
    }

    #[test]
    fn test_truncated_stream_is_incomplete() {
        let zlib = zlib_compress(&[7u8; 4096]).unwrap();
        let out = inflate_stream(&zlib[..zlib.len() / 2], true, usize::MAX).unwrap();
        assert!(!out.complete);
        assert!(inflate_block(&zlib[..zlib.len() / 2]).is_err());
    }

    #[test]
    fn test_output_limit() {
        let zlib = zlib_compress(&vec![0u8; 4 * BLOCK_SIZE]).unwrap();
        assert!(matches!(
            inflate_stream(&zlib, true, BLOCK_SIZE),
            Err(Error::OutputTooLarge(_))
        ));
    }
}
