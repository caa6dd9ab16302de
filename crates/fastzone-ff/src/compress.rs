//! Standard-block compressor, the inverse of the standard-blocks reader.

use fastzone_common::Endian;
use tracing::warn;

use crate::inflate::{zlib_compress, BLOCK_SIZE};
use crate::{ExtendedHeader, FastFileHeader, Game, Platform, Result};

/// End-of-stream marker written after big-endian blocks.
pub const END_MARKER_BE: [u8; 6] = [0x00, 0x01, 0x00, 0x00, 0x00, 0x00];

/// End-of-stream marker written after little-endian blocks.
pub const END_MARKER_LE: [u8; 6] = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Compress a zone buffer into length-prefixed standard blocks.
///
/// Each 64 KiB chunk is zlib-compressed with its 2-byte header stripped,
/// leaving the deflate stream and Adler-32 trailer the engine expects. An
/// empty buffer still yields one block so the reader sees a decoded block.
///
/// A chunk whose compressed body would overflow the u16 length prefix is
/// halved until it fits, so incompressible input produces short blocks
/// before the last one. The reader accepts any inflated block size.
pub fn compress_blocks(zone: &[u8], endian: Endian) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(zone.len() / 2 + 16);

    if zone.is_empty() {
        write_chunk(&mut out, zone, endian)?;
    }
    for chunk in zone.chunks(BLOCK_SIZE) {
        write_chunk(&mut out, chunk, endian)?;
    }

    out.extend_from_slice(match endian {
        Endian::Big => &END_MARKER_BE,
        Endian::Little => &END_MARKER_LE,
    });
    Ok(out)
}

fn write_chunk(out: &mut Vec<u8>, chunk: &[u8], endian: Endian) -> Result<()> {
    let compressed = zlib_compress(chunk)?;
    let body = &compressed[2..];

    if body.len() > u16::MAX as usize {
        // Incompressible data can outgrow the u16 length prefix.
        warn!(len = body.len(), "block exceeds u16 length, splitting chunk");
        let (left, right) = chunk.split_at(chunk.len() / 2);
        write_chunk(out, left, endian)?;
        return write_chunk(out, right, endian);
    }

    endian.put_u16(out, body.len() as u16);
    out.extend_from_slice(body);
    Ok(())
}

/// Build a loadable FastFile for `(game, platform)` around a zone buffer.
pub fn repack(zone: &[u8], game: Game, platform: Platform) -> Result<Vec<u8>> {
    let header = FastFileHeader::for_target(game, platform)?;
    let mut out = header.to_bytes().to_vec();

    if game == Game::MW2 {
        out.extend_from_slice(&ExtendedHeader::empty().to_bytes(header.endian));
    }

    out.extend_from_slice(&compress_blocks(zone, header.endian)?);
    Ok(out)
}
