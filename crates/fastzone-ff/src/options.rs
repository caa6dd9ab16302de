//! Decompression limits.

/// Bounds applied while inflating a container.
///
/// The defaults are the limits the shipped games' files are known to stay
/// within; they double as the termination guarantee on corrupt input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecompressOptions {
    /// Standard-block failures tolerated before giving up.
    pub max_block_failures: usize,
    /// Ceiling on the inflated zone size.
    pub max_output: usize,
    /// Bytes skipped past the header before a signed file's streams begin.
    pub signed_trailer: usize,
    /// Largest accepted PC length-prefixed block.
    pub pc_block_limit: usize,
    /// Largest accepted Xbox 360 XBlock.
    pub xblock_limit: usize,
    /// Bytes searched for the next zlib header between Xbox 360 streams.
    pub stream_gap: usize,
}

impl Default for DecompressOptions {
    fn default() -> Self {
        Self {
            max_block_failures: 3,
            max_output: 1024 * 1024 * 1024,
            signed_trailer: 0x4000,
            pc_block_limit: 1024 * 1024,
            xblock_limit: 2 * 1024 * 1024,
            stream_gap: 64,
        }
    }
}
