//! Heuristic recovery of assets the sequential walk could not reach.
//!
//! Recovery searches forward from an anchor for the kind's leading
//! `FFFFFFFF` run, turns every run into candidate header offsets (see
//! [`AssetKind::sentinel_offsets`]) and runs the structural decoder there.
//! The first hit moves the cursor past the decoded asset and the search
//! window starts over; a window with no hit abandons the kind.
//!
//! Kinds are independent, so with the `parallel` feature each kind is
//! scanned on its own rayon task. Results come back in request order either
//! way.

use fastzone_common::scan;
use tracing::debug;

use crate::decode::{self, DecodeCx};
use crate::{Asset, AssetKind, FxHashMap, FxHashSet};

/// One kind to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryRequest {
    pub kind: AssetKind,
    /// How many more instances the pool declares.
    pub remaining: usize,
}

/// Assets found for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered {
    pub kind: AssetKind,
    pub assets: Vec<Asset>,
    /// Cursor position when the scan stopped.
    pub cursor: usize,
}

/// First asset of `kind` whose header starts in `[from, from + window)`.
pub fn find_next(kind: AssetKind, cx: &DecodeCx<'_>, from: usize, window: usize) -> Option<Asset> {
    let end = from.saturating_add(window).min(cx.data.len());
    for run in scan::sentinel_runs(cx.data, from, end) {
        for &shift in kind.sentinel_offsets() {
            let Some(candidate) = run.checked_sub(shift) else {
                continue;
            };
            if candidate < from {
                continue;
            }
            if let Some(asset) = decode::decode(kind, cx, candidate) {
                return Some(asset);
            }
        }
    }
    None
}

/// Scan for up to `remaining` new assets of `kind` starting at `anchor`.
///
/// Names already in `seen` (compared case-insensitively) are skipped and do
/// not count towards `remaining`.
pub fn recover(
    kind: AssetKind,
    cx: &DecodeCx<'_>,
    anchor: usize,
    remaining: usize,
    seen: &FxHashSet<String>,
) -> Recovered {
    let window = cx.limits.window_for(kind);
    let mut names = seen.clone();
    let mut assets = Vec::new();
    let mut cursor = anchor;

    while assets.len() < remaining && cursor < cx.data.len() {
        let Some(asset) = find_next(kind, cx, cursor, window) else {
            debug!(%kind, cursor, window, "no candidate in window, abandoning");
            break;
        };
        let range = asset.range();
        cursor = range.end.max(range.start + 1);

        if names.insert(asset.name().to_ascii_lowercase()) {
            assets.push(asset);
        } else {
            debug!(%kind, name = asset.name(), offset = range.start, "skipping duplicate");
        }
    }

    Recovered {
        kind,
        assets,
        cursor,
    }
}

/// Run every request from the same anchor.
///
/// `seen` maps a kind to the lowercased names already decoded for it.
pub fn recover_all(
    cx: &DecodeCx<'_>,
    requests: &[RecoveryRequest],
    anchor: usize,
    seen: &FxHashMap<AssetKind, FxHashSet<String>>,
) -> Vec<Recovered> {
    let empty = FxHashSet::default();
    let run = |req: &RecoveryRequest| {
        let names = seen.get(&req.kind).unwrap_or(&empty);
        recover(req.kind, cx, anchor, req.remaining, names)
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        requests.par_iter().map(run).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        requests.iter().map(run).collect()
    }
}
