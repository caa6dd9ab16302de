//! A parsed zone buffer, ready to walk.

use fastzone_ff::{Game, Platform};
use tracing::debug;

use crate::decode::DecodeCx;
use crate::definition::GameDefinition;
use crate::pool::{AssetPool, ScriptStringTable};
use crate::walker::{self, WalkResult};
use crate::{Result, ScanLimits, ZoneHeader};

/// Decompressed zone with its header, script strings and pool read.
#[derive(Debug, Clone)]
pub struct Zone {
    data: Vec<u8>,
    def: &'static GameDefinition,
    limits: ScanLimits,
    header: ZoneHeader,
    strings: ScriptStringTable,
    pool: AssetPool,
}

impl Zone {
    /// Parse a zone for a detected (game, platform) with default limits.
    pub fn parse(data: Vec<u8>, game: Game, platform: Platform) -> Result<Self> {
        Self::with_limits(data, GameDefinition::lookup(game, platform)?, ScanLimits::default())
    }

    /// Parse a zone with an explicit definition and limits.
    pub fn with_limits(data: Vec<u8>, def: &'static GameDefinition, limits: ScanLimits) -> Result<Self> {
        let header = ZoneHeader::parse(&data, def)?;
        let strings = ScriptStringTable::parse(&data, &header, &limits, def)?;
        let pool = AssetPool::parse(&data, &header, strings.end, &limits, def)?;
        debug!(
            definition = %def,
            script_strings = strings.len(),
            assets = pool.len(),
            pool_end = pool.end,
            "parsed zone header"
        );

        Ok(Self {
            data,
            def,
            limits,
            header,
            strings,
            pool,
        })
    }

    /// Walk the asset pool.
    pub fn walk(&self) -> WalkResult {
        walker::walk(&self.cx(), &self.pool)
    }

    /// Decoder context over this zone.
    pub fn cx(&self) -> DecodeCx<'_> {
        DecodeCx::new(&self.data, self.def, &self.strings.strings, &self.limits)
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn definition(&self) -> &'static GameDefinition {
        self.def
    }

    #[inline]
    pub fn header(&self) -> &ZoneHeader {
        &self.header
    }

    #[inline]
    pub fn script_strings(&self) -> &ScriptStringTable {
        &self.strings
    }

    #[inline]
    pub fn pool(&self) -> &AssetPool {
        &self.pool
    }

    #[inline]
    pub fn limits(&self) -> &ScanLimits {
        &self.limits
    }

    /// Give back the buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
