//! Search bounds for decoding and recovery.

use crate::AssetKind;

/// Every bound the decoders and the recovery scanner respect.
///
/// Zone data is untrusted; these caps are what guarantees that a scan over
/// a corrupt buffer terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScanLimits {
    /// Recovery look-ahead for rawfiles, restarted after every find.
    pub rawfile_window: usize,
    /// Recovery look-ahead for localize entries.
    pub localize_window: usize,
    /// Recovery look-ahead for every other kind.
    pub recovery_window: usize,
    /// How far a decoder looks for the next asset header to bound itself.
    pub boundary_window: usize,
    /// Local search after a failed non-halting decode.
    pub resync_window: usize,
    /// Bytes searched for an animation name that is not at its usual offset.
    pub xanim_name_window: usize,
    /// Longest accepted string value.
    pub max_string_len: usize,
    /// Largest declared rawfile size taken at face value.
    pub max_rawfile_size: usize,
    /// Largest accepted asset-pool count.
    pub max_assets: usize,
    /// Largest accepted script-string count.
    pub max_script_strings: usize,
}

impl ScanLimits {
    /// Limits matching the shipped games.
    pub const DEFAULT: Self = Self {
        rawfile_window: 2 * 1024 * 1024,
        localize_window: 500_000,
        recovery_window: 1024 * 1024,
        boundary_window: 256 * 1024,
        resync_window: 4096,
        xanim_name_window: 64,
        max_string_len: 8192,
        max_rawfile_size: 64 * 1024 * 1024,
        max_assets: 100_000,
        max_script_strings: 65_536,
    };

    /// Recovery window for a kind.
    pub fn window_for(&self, kind: AssetKind) -> usize {
        match kind {
            AssetKind::RawFile => self.rawfile_window,
            AssetKind::Localize => self.localize_window,
            _ => self.recovery_window,
        }
    }
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}
