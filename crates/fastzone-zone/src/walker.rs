//! Asset pool walker.
//!
//! The walker visits the declared pool in order. While every entry decodes,
//! it stays in sequential mode and each asset starts where the previous one
//! ended. The first entry it cannot place (an unsupported type code, or a
//! supported type whose decoder and local resync both fail) switches it to
//! recovery mode for the rest of the walk: every kind with undecoded entries
//! is handed to [`recovery`](crate::recovery) from the last known-good
//! offset, and the results fill that kind's open entries in pool order.

use tracing::{debug, info, trace};

use crate::decode::{self, DecodeCx};
use crate::pool::{AssetPool, AssetPoolRecord, RecordState};
use crate::recovery::{self, RecoveryRequest};
use crate::{Asset, AssetKind, FxHashMap, FxHashSet};

/// Walker mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WalkMode {
    Sequential,
    Recovery,
}

/// Outcome of a walk.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkResult {
    /// Decoded assets; sequential ones first, then recovered ones by kind.
    pub assets: Vec<Asset>,
    /// Pool records with their final state.
    pub records: Vec<AssetPoolRecord>,
    /// Mode the walk ended in.
    pub mode: WalkMode,
    /// Pool index of the entry that ended sequential mode.
    pub switched_at: Option<usize>,
    /// Offset recovery started from.
    pub anchor: usize,
}

impl WalkResult {
    /// Number of records in a state.
    pub fn count(&self, state: RecordState) -> usize {
        self.records.iter().filter(|r| r.state == state).count()
    }

    /// Decoded assets of one kind.
    pub fn assets_of(&self, kind: AssetKind) -> impl Iterator<Item = &Asset> {
        self.assets.iter().filter(move |a| a.kind() == kind)
    }

    /// The asset decoded for a pool record.
    pub fn asset_for(&self, record: &AssetPoolRecord) -> Option<&Asset> {
        record.asset.and_then(|i| self.assets.get(i))
    }
}

/// Walk the pool over the zone buffer.
///
/// Walking is a pure function of its inputs; walking the same pool twice
/// gives equal results.
pub fn walk(cx: &DecodeCx<'_>, pool: &AssetPool) -> WalkResult {
    let mut walker = Walker {
        cx,
        records: pool.records.clone(),
        assets: Vec::new(),
        cursor: pool.end,
    };

    let switched_at = walker.sequential();
    let anchor = walker.cursor;
    let mode = match switched_at {
        Some(index) => {
            info!(
                index,
                anchor,
                type_name = %walker.records[index].type_name,
                "sequential walk stopped, switching to recovery"
            );
            walker.recover();
            WalkMode::Recovery
        }
        None => WalkMode::Sequential,
    };
    walker.settle();

    WalkResult {
        assets: walker.assets,
        records: walker.records,
        mode,
        switched_at,
        anchor,
    }
}

struct Walker<'c, 'a> {
    cx: &'c DecodeCx<'a>,
    records: Vec<AssetPoolRecord>,
    assets: Vec<Asset>,
    cursor: usize,
}

impl Walker<'_, '_> {
    /// Decode entries in order; returns the index that ended the pass.
    fn sequential(&mut self) -> Option<usize> {
        for index in 0..self.records.len() {
            let Some(kind) = self.records[index].kind else {
                self.records[index].state = RecordState::Unsupported;
                return Some(index);
            };

            let asset = decode::decode(kind, self.cx, self.cursor).or_else(|| {
                if kind.halts_sequential() {
                    return None;
                }
                let found = recovery::find_next(kind, self.cx, self.cursor, self.cx.limits.resync_window)?;
                debug!(
                    index,
                    %kind,
                    from = self.cursor,
                    to = found.range().start,
                    "resynchronized"
                );
                Some(found)
            });

            match asset {
                Some(asset) => {
                    self.cursor = asset.range().end;
                    trace!(index, %kind, name = asset.name(), end = self.cursor, "decoded");
                    self.place(index, asset, false);
                }
                None => {
                    debug!(index, %kind, offset = self.cursor, "decode failed");
                    self.records[index].state = RecordState::Failed;
                    return Some(index);
                }
            }
        }
        None
    }

    /// Recover every kind with open entries and fill them in pool order.
    fn recover(&mut self) {
        let mut expected: FxHashMap<AssetKind, usize> = FxHashMap::default();
        let mut seen: FxHashMap<AssetKind, FxHashSet<String>> = FxHashMap::default();
        for record in &self.records {
            if let Some(kind) = record.kind {
                *expected.entry(kind).or_default() += 1;
            }
        }
        for asset in &self.assets {
            seen.entry(asset.kind())
                .or_default()
                .insert(asset.name().to_ascii_lowercase());
        }

        let requests: Vec<RecoveryRequest> = AssetKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let declared = expected.get(&kind).copied().unwrap_or(0);
                let remaining = declared.saturating_sub(self.decoded_count(kind));
                (remaining > 0).then_some(RecoveryRequest { kind, remaining })
            })
            .collect();

        for found in recovery::recover_all(self.cx, &requests, self.cursor, &seen) {
            info!(kind = %found.kind, recovered = found.assets.len(), "recovery finished");
            let mut open = self
                .records
                .iter()
                .enumerate()
                .filter(|(_, r)| {
                    r.kind == Some(found.kind)
                        && matches!(r.state, RecordState::Pending | RecordState::Failed)
                })
                .map(|(i, _)| i)
                .collect::<Vec<_>>()
                .into_iter();
            for asset in found.assets {
                let Some(index) = open.next() else {
                    break;
                };
                self.place(index, asset, true);
            }
        }
    }

    /// Give every record still open its final state.
    fn settle(&mut self) {
        for record in &mut self.records {
            if record.state == RecordState::Pending || record.state == RecordState::Failed {
                record.state = match record.kind {
                    Some(_) => RecordState::Failed,
                    None => RecordState::Unsupported,
                };
            }
        }
    }

    fn decoded_count(&self, kind: AssetKind) -> usize {
        self.records
            .iter()
            .filter(|r| r.kind == Some(kind) && r.state == RecordState::Decoded)
            .count()
    }

    fn place(&mut self, index: usize, asset: Asset, recovered: bool) {
        let record = &mut self.records[index];
        record.state = RecordState::Decoded;
        record.range = Some(asset.range());
        record.name = Some(asset.name().to_string());
        record.summary = Some(asset.summary());
        record.asset = Some(self.assets.len());
        record.recovered = recovered;
        self.assets.push(asset);
    }
}
