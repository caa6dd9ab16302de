//! Block-stream decompression strategies.

use std::fmt;

use fastzone_common::Endian;
use tracing::{debug, warn};

use crate::inflate::{inflate_block_limited, inflate_stream, is_zlib_header, BLOCK_SIZE};
use crate::{DecompressOptions, Error, FastFileHeader, Platform, Result};

/// One way of turning the compressed payload into the zone buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// One zlib stream covering the whole payload (PC).
    PcZlibStream,
    /// `[u32 LE length][zlib block]` repeated (PC).
    PcLengthBlocks,
    /// Concatenated zlib streams after the signed trailer (Xbox 360).
    XboxZlibStreams,
    /// `[u32 BE length][block]` repeated (Xbox 360).
    XboxBlocks,
    /// The remainder as a single stream (Xbox 360).
    Monolithic,
    /// `[u16 length][block]` repeated, the engine's native layout.
    StandardBlocks,
}

impl Strategy {
    /// Short display name.
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::PcZlibStream => "pc-zlib-stream",
            Strategy::PcLengthBlocks => "pc-length-blocks",
            Strategy::XboxZlibStreams => "xbox-zlib-streams",
            Strategy::XboxBlocks => "xbox-blocks",
            Strategy::Monolithic => "monolithic",
            Strategy::StandardBlocks => "standard-blocks",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strategies to try for a header, in order.
pub fn plan(header: &FastFileHeader) -> &'static [Strategy] {
    const SIGNED: &[Strategy] = &[
        Strategy::XboxZlibStreams,
        Strategy::XboxBlocks,
        Strategy::Monolithic,
        Strategy::StandardBlocks,
    ];
    const PC: &[Strategy] = &[
        Strategy::PcZlibStream,
        Strategy::PcLengthBlocks,
        Strategy::StandardBlocks,
    ];
    const STANDARD: &[Strategy] = &[Strategy::StandardBlocks];

    if header.is_signed() {
        SIGNED
    } else if header.platform == Platform::Pc {
        PC
    } else {
        STANDARD
    }
}

/// Output of a successful strategy.
#[derive(Debug)]
pub(crate) struct Attempt {
    pub data: Vec<u8>,
    pub blocks_ok: usize,
    pub blocks_failed: usize,
    /// Payload bytes read, including length prefixes.
    pub consumed: usize,
}

fn failed(strategy: Strategy, reason: impl Into<String>) -> Error {
    Error::StrategyFailed {
        strategy,
        reason: reason.into(),
    }
}

/// Run one strategy over the compressed payload.
pub(crate) fn run(
    strategy: Strategy,
    payload: &[u8],
    endian: Endian,
    opts: &DecompressOptions,
) -> Result<Attempt> {
    match strategy {
        Strategy::PcZlibStream => pc_zlib_stream(payload, opts),
        Strategy::PcLengthBlocks => pc_length_blocks(payload, opts),
        Strategy::XboxZlibStreams => xbox_zlib_streams(payload, opts),
        Strategy::XboxBlocks => xbox_blocks(payload, opts),
        Strategy::Monolithic => monolithic(payload, opts),
        Strategy::StandardBlocks => standard_blocks(payload, endian, opts),
    }
}

fn pc_zlib_stream(payload: &[u8], opts: &DecompressOptions) -> Result<Attempt> {
    let strategy = Strategy::PcZlibStream;
    if !is_zlib_header(payload) {
        return Err(failed(strategy, "no zlib header at payload start"));
    }

    let out = inflate_stream(payload, true, opts.max_output)?;
    if !out.complete || out.data.is_empty() {
        return Err(failed(strategy, "stream did not inflate to completion"));
    }

    Ok(Attempt {
        data: out.data,
        blocks_ok: 1,
        blocks_failed: 0,
        consumed: out.consumed,
    })
}

fn pc_length_blocks(payload: &[u8], opts: &DecompressOptions) -> Result<Attempt> {
    let strategy = Strategy::PcLengthBlocks;
    let mut data = Vec::new();
    let mut pos = 0;
    let mut blocks = 0;

    while pos + 4 <= payload.len() {
        let len = Endian::Little.read_i32(&payload[pos..]);
        if len <= 0 || len as usize > opts.pc_block_limit {
            // Zero padding after real blocks ends the stream.
            if blocks > 0 && payload[pos..].iter().all(|&b| b == 0) {
                break;
            }
            return Err(failed(strategy, format!("bad block length {len} at {pos:#x}")));
        }

        let start = pos + 4;
        let end = start + len as usize;
        let block = payload
            .get(start..end)
            .ok_or_else(|| failed(strategy, format!("block at {pos:#x} runs past end of file")))?;
        let inflated = inflate_block_limited(block, opts.max_output - data.len())
            .map_err(|e| failed(strategy, format!("block {blocks}: {e}")))?;

        data.extend_from_slice(&inflated);
        blocks += 1;
        pos = end;
    }

    if blocks == 0 {
        return Err(failed(strategy, "no blocks"));
    }

    Ok(Attempt {
        data,
        blocks_ok: blocks,
        blocks_failed: 0,
        consumed: pos,
    })
}

fn signed_start(payload: &[u8], opts: &DecompressOptions) -> usize {
    if payload.len() > opts.signed_trailer {
        opts.signed_trailer
    } else {
        0
    }
}

fn xbox_zlib_streams(payload: &[u8], opts: &DecompressOptions) -> Result<Attempt> {
    let strategy = Strategy::XboxZlibStreams;
    let mut pos = signed_start(payload, opts);
    let mut data = Vec::new();
    let mut streams = 0;

    loop {
        let window_end = (pos + opts.stream_gap + 2).min(payload.len());
        let Some(found) = (pos..window_end.saturating_sub(1)).find(|&i| is_zlib_header(&payload[i..]))
        else {
            break;
        };

        let out = match inflate_stream(&payload[found..], true, opts.max_output - data.len()) {
            Ok(out) if out.complete => out,
            Ok(_) | Err(Error::Decompression(_)) if streams > 0 => break,
            Ok(_) => return Err(failed(strategy, format!("stream at {found:#x} is truncated"))),
            Err(e) => return Err(e),
        };

        data.extend_from_slice(&out.data);
        streams += 1;
        pos = found + out.consumed.max(1);
    }

    if streams == 0 {
        return Err(failed(strategy, "no zlib stream after the signed trailer"));
    }

    debug!(streams, "inflated concatenated zlib streams");
    Ok(Attempt {
        data,
        blocks_ok: streams,
        blocks_failed: 0,
        consumed: pos,
    })
}

fn xbox_blocks(payload: &[u8], opts: &DecompressOptions) -> Result<Attempt> {
    let strategy = Strategy::XboxBlocks;
    let mut pos = signed_start(payload, opts);
    let mut data = Vec::new();
    let mut blocks = 0;

    while pos + 4 <= payload.len() {
        let len = Endian::Big.read_u32(&payload[pos..]) as usize;
        if len == 0 {
            pos += 4;
            break;
        }
        if len > opts.xblock_limit {
            return Err(failed(strategy, format!("block length {len:#x} at {pos:#x} over limit")));
        }

        let start = pos + 4;
        let block = payload
            .get(start..start + len)
            .ok_or_else(|| failed(strategy, format!("block at {pos:#x} runs past end of file")))?;
        let inflated = inflate_block_limited(block, opts.max_output - data.len())
            .map_err(|e| failed(strategy, format!("block {blocks}: {e}")))?;

        data.extend_from_slice(&inflated);
        blocks += 1;
        pos = start + len;
    }

    if blocks == 0 {
        return Err(failed(strategy, "no blocks"));
    }

    Ok(Attempt {
        data,
        blocks_ok: blocks,
        blocks_failed: 0,
        consumed: pos,
    })
}

fn monolithic(payload: &[u8], opts: &DecompressOptions) -> Result<Attempt> {
    let strategy = Strategy::Monolithic;
    let mut starts = vec![signed_start(payload, opts)];
    if starts[0] != 0 {
        starts.push(0);
    }

    for start in starts {
        let tail = &payload[start..];
        let zlib = is_zlib_header(tail);
        let out = match inflate_stream(tail, zlib, opts.max_output) {
            Ok(out) => out,
            Err(Error::OutputTooLarge(limit)) => return Err(Error::OutputTooLarge(limit)),
            Err(_) => continue,
        };
        if !out.data.is_empty() {
            if !out.complete {
                warn!(start, bytes = out.data.len(), "monolithic stream ended early");
            }
            return Ok(Attempt {
                data: out.data,
                blocks_ok: 1,
                blocks_failed: 0,
                consumed: start + out.consumed,
            });
        }
    }

    Err(failed(strategy, "remainder does not inflate"))
}

/// The engine's native layout, and the last resort for every header.
fn standard_blocks(payload: &[u8], endian: Endian, opts: &DecompressOptions) -> Result<Attempt> {
    let mut data = Vec::new();
    let mut pos = 0;
    let mut blocks_ok = 0;
    let mut blocks_failed = 0;
    let mut last_good = 0;

    while pos + 2 <= payload.len() {
        let len = endian.read_u16(&payload[pos..]) as usize;
        if len <= 1 {
            pos += 2;
            break;
        }

        let start = pos + 2;
        let Some(block) = payload.get(start..start + len) else {
            blocks_failed += 1;
            warn!(
                index = blocks_ok + blocks_failed - 1,
                offset = pos,
                len,
                "block runs past end of file"
            );
            pos = payload.len();
            break;
        };
        pos = start + len;

        match inflate_block_limited(block, opts.max_output - data.len()) {
            Ok(inflated) => {
                if inflated.len() != BLOCK_SIZE {
                    debug!(offset = start, size = inflated.len(), "short block");
                }
                data.extend_from_slice(&inflated);
                blocks_ok += 1;
                last_good = pos;
            }
            Err(Error::OutputTooLarge(limit)) => return Err(Error::OutputTooLarge(limit)),
            Err(e) => {
                blocks_failed += 1;
                warn!(offset = start, len, error = %e, "skipping block that failed to decompress");
                if blocks_failed > opts.max_block_failures {
                    return Err(Error::TooManyBlockFailures {
                        failed: blocks_failed,
                        last_good,
                    });
                }
            }
        }
    }

    if blocks_ok == 0 {
        return Err(Error::NoBlocksDecompressed {
            failed: blocks_failed,
            last_good,
        });
    }
    if blocks_failed > opts.max_block_failures {
        return Err(Error::TooManyBlockFailures {
            failed: blocks_failed,
            last_good,
        });
    }

    Ok(Attempt {
        data,
        blocks_ok,
        blocks_failed,
        consumed: pos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflate::zlib_compress;

    fn opts() -> DecompressOptions {
        DecompressOptions::default()
    }

    #[test]
    fn test_standard_blocks_skip_one_bad_block() {
        let good = zlib_compress(b"hello").unwrap();
        let mut payload = Vec::new();
        Endian::Big.put_u16(&mut payload, good.len() as u16);
        payload.extend_from_slice(&good);
        Endian::Big.put_u16(&mut payload, 4);
        payload.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        Endian::Big.put_u16(&mut payload, good.len() as u16);
        payload.extend_from_slice(&good);
        payload.extend_from_slice(&[0, 0]);

        let attempt = standard_blocks(&payload, Endian::Big, &opts()).unwrap();
        assert_eq!(attempt.data, b"hellohello");
        assert_eq!(attempt.blocks_ok, 2);
        assert_eq!(attempt.blocks_failed, 1);
        assert_eq!(attempt.consumed, payload.len());
    }

    #[test]
    fn test_standard_blocks_failure_threshold() {
        let mut payload = Vec::new();
        for _ in 0..4 {
            Endian::Big.put_u16(&mut payload, 4);
            payload.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
        }
        let good = zlib_compress(b"late").unwrap();
        Endian::Big.put_u16(&mut payload, good.len() as u16);
        payload.extend_from_slice(&good);

        assert!(matches!(
            standard_blocks(&payload, Endian::Big, &opts()),
            Err(Error::TooManyBlockFailures { failed: 4, .. })
        ));
    }

    #[test]
    fn test_standard_blocks_nothing_decoded() {
        let payload = [0x00, 0x00];
        assert!(matches!(
            standard_blocks(&payload, Endian::Big, &opts()),
            Err(Error::NoBlocksDecompressed { failed: 0, .. })
        ));
    }

    #[test]
    fn test_pc_length_blocks_with_padding() {
        let block = zlib_compress(b"pc block").unwrap();
        let mut payload = Vec::new();
        for _ in 0..2 {
            Endian::Little.put_u32(&mut payload, block.len() as u32);
            payload.extend_from_slice(&block);
        }
        payload.extend_from_slice(&[0u8; 16]);

        let attempt = pc_length_blocks(&payload, &opts()).unwrap();
        assert_eq!(attempt.data, b"pc blockpc block");
        assert_eq!(attempt.blocks_ok, 2);
    }

    #[test]
    fn test_pc_length_blocks_rejects_oversize() {
        let mut payload = Vec::new();
        Endian::Little.put_u32(&mut payload, 2 * 1024 * 1024);
        payload.extend_from_slice(&[0x78, 0x9C]);
        assert!(matches!(
            pc_length_blocks(&payload, &opts()),
            Err(Error::StrategyFailed { strategy: Strategy::PcLengthBlocks, .. })
        ));
    }

    #[test]
    fn test_xbox_streams_after_trailer() {
        let opts = DecompressOptions {
            signed_trailer: 32,
            ..DecompressOptions::default()
        };
        let mut payload = vec![0xAAu8; 32];
        payload.extend_from_slice(&zlib_compress(b"one ").unwrap());
        payload.extend_from_slice(&[0, 0, 0]);
        payload.extend_from_slice(&zlib_compress(b"two").unwrap());

        let attempt = xbox_zlib_streams(&payload, &opts).unwrap();
        assert_eq!(attempt.data, b"one two");
        assert_eq!(attempt.blocks_ok, 2);
    }

    #[test]
    fn test_xbox_blocks() {
        let opts = DecompressOptions {
            signed_trailer: 8,
            ..DecompressOptions::default()
        };
        let block = zlib_compress(b"xblock").unwrap();
        let mut payload = vec![0u8; 8];
        Endian::Big.put_u32(&mut payload, block.len() as u32);
        payload.extend_from_slice(&block);
        Endian::Big.put_u32(&mut payload, 0);

        let attempt = xbox_blocks(&payload, &opts).unwrap();
        assert_eq!(attempt.data, b"xblock");
    }

    #[test]
    fn test_monolithic_after_trailer() {
        let opts = DecompressOptions {
            signed_trailer: 32,
            ..DecompressOptions::default()
        };
        let stream = zlib_compress(&b"whole zone ".repeat(50)).unwrap();
        let mut payload = vec![0xAAu8; 32];
        payload.extend_from_slice(&stream);

        let attempt = monolithic(&payload, &opts).unwrap();
        assert_eq!(attempt.data, b"whole zone ".repeat(50));
        assert_eq!(attempt.blocks_ok, 1);
        assert_eq!(attempt.consumed, 32 + stream.len());
    }

    #[test]
    fn test_monolithic_retries_from_payload_start() {
        let stream = zlib_compress(b"no trailer on this one").unwrap();
        let opts = DecompressOptions {
            signed_trailer: stream.len(),
            ..DecompressOptions::default()
        };
        // 0xFF opens a deflate block of the reserved type, so the trailer start fails.
        let mut payload = stream.clone();
        payload.extend_from_slice(&[0xFF; 16]);

        let attempt = monolithic(&payload, &opts).unwrap();
        assert_eq!(attempt.data, b"no trailer on this one");
        assert_eq!(attempt.consumed, stream.len());
    }

    #[test]
    fn test_monolithic_nothing_inflates() {
        let opts = DecompressOptions {
            signed_trailer: 32,
            ..DecompressOptions::default()
        };
        assert!(matches!(
            monolithic(&[0xFF; 64], &opts),
            Err(Error::StrategyFailed { strategy: Strategy::Monolithic, .. })
        ));
    }

    #[test]
    fn test_plan_order() {
        let mut header = FastFileHeader::for_target(crate::Game::CoD4, Platform::Pc).unwrap();
        assert_eq!(plan(&header)[0], Strategy::PcZlibStream);
        assert_eq!(*plan(&header).last().unwrap(), Strategy::StandardBlocks);

        header.magic = crate::Magic::Signed;
        header.platform = Platform::Xbox360;
        assert_eq!(plan(&header)[0], Strategy::XboxZlibStreams);

        let ps3 = FastFileHeader::for_target(crate::Game::WaW, Platform::Ps3).unwrap();
        assert_eq!(plan(&ps3), &[Strategy::StandardBlocks]);
    }
}
