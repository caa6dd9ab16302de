//! Structural asset decoders.
//!
//! Every decoder is a pure function of the buffer and an offset and returns
//! `None` as soon as a structural guard fails. A `None` is never an error;
//! the walker decides what a failure means.
//!
//! Assets whose tail is variable-length and title-specific (animations,
//! materials, technique sets, menus, weapons) do not compute an exact end.
//! They stop at the next offset where some other asset header plausibly
//! begins, see [`find_boundary`].

pub mod image;
pub mod localize;
pub mod material;
pub mod menu;
pub mod names;
pub mod rawfile;
pub mod stringtable;
pub mod techset;
pub mod weapon;
pub mod xanim;

use fastzone_common::{scan, text, Endian, InlinePtr};

use crate::definition::GameDefinition;
use crate::{Asset, AssetKind, ScanLimits};

/// Everything a decoder needs besides the offset.
#[derive(Clone, Copy)]
pub struct DecodeCx<'a> {
    pub data: &'a [u8],
    pub def: &'static GameDefinition,
    /// Script strings, for resolving indices by value.
    pub strings: &'a [String],
    pub limits: &'a ScanLimits,
}

impl<'a> DecodeCx<'a> {
    pub fn new(
        data: &'a [u8],
        def: &'static GameDefinition,
        strings: &'a [String],
        limits: &'a ScanLimits,
    ) -> Self {
        Self {
            data,
            def,
            strings,
            limits,
        }
    }

    #[inline]
    pub fn endian(&self) -> Endian {
        self.def.endian
    }

    #[inline]
    pub fn u8_at(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    #[inline]
    pub fn u16_at(&self, offset: usize) -> Option<u16> {
        self.endian().u16_at(self.data, offset)
    }

    #[inline]
    pub fn u32_at(&self, offset: usize) -> Option<u32> {
        self.endian().u32_at(self.data, offset)
    }

    #[inline]
    pub fn i32_at(&self, offset: usize) -> Option<i32> {
        self.endian().i32_at(self.data, offset)
    }

    #[inline]
    pub fn f32_at(&self, offset: usize) -> Option<f32> {
        self.endian().f32_at(self.data, offset)
    }

    #[inline]
    pub fn ptr_at(&self, offset: usize) -> Option<InlinePtr> {
        self.u32_at(offset).map(InlinePtr::from_raw)
    }

    /// Whether the pointer at `offset` marks inline data, honoring the
    /// title's zero-as-inline convention.
    #[inline]
    pub fn inline_at(&self, offset: usize) -> Option<bool> {
        self.ptr_at(offset)
            .map(|p| p.is_inline_or_zero(self.def.zero_is_inline))
    }

    /// UTF-8 string at `offset` and the offset past its terminator.
    pub fn str_at(&self, offset: usize) -> Option<(&'a str, usize)> {
        let (bytes, end) = text::cstr_span(self.data, offset, self.limits.max_string_len)?;
        std::str::from_utf8(bytes).ok().map(|s| (s, end))
    }

    /// Script string for an index, or `#index` when out of range.
    pub fn script_string(&self, index: u16) -> String {
        self.strings
            .get(index as usize)
            .cloned()
            .unwrap_or_else(|| format!("#{index}"))
    }
}

/// Decode one asset of `kind` at `offset`.
pub fn decode(kind: AssetKind, cx: &DecodeCx<'_>, offset: usize) -> Option<Asset> {
    let asset = match kind {
        AssetKind::RawFile => rawfile::decode(cx, offset).map(Asset::RawFile),
        AssetKind::Localize => localize::decode(cx, offset).map(Asset::Localize),
        AssetKind::MenuList => menu::decode(cx, offset).map(Asset::MenuList),
        AssetKind::Material => material::decode(cx, offset).map(Asset::Material),
        AssetKind::TechSet => techset::decode(cx, offset).map(Asset::TechSet),
        AssetKind::XAnim => xanim::decode(cx, offset).map(Asset::XAnim),
        AssetKind::StringTable => stringtable::decode(cx, offset).map(Asset::StringTable),
        AssetKind::Weapon => weapon::decode(cx, offset).map(Asset::Weapon),
        AssetKind::Image => image::decode(cx, offset).map(Asset::Image),
    }?;

    let range = asset.range();
    debug_assert!(range.start <= range.end && range.end <= cx.data.len());
    (range.end <= cx.data.len()).then_some(asset)
}

/// Header-only plausibility check, without boundary scanning.
pub fn probe(kind: AssetKind, cx: &DecodeCx<'_>, offset: usize) -> bool {
    match kind {
        AssetKind::RawFile => rawfile::decode(cx, offset).is_some(),
        AssetKind::Localize => localize::decode(cx, offset).is_some(),
        AssetKind::MenuList => menu::header(cx, offset).is_some(),
        AssetKind::Material => material::header(cx, offset).is_some(),
        AssetKind::TechSet => techset::header(cx, offset).is_some(),
        AssetKind::XAnim => xanim::header(cx, offset).is_some(),
        AssetKind::StringTable => stringtable::header(cx, offset).is_some(),
        AssetKind::Weapon => weapon::header(cx, offset).is_some(),
        AssetKind::Image => image::decode(cx, offset).is_some(),
    }
}

/// First offset at or after `from` where any asset header plausibly begins.
///
/// Only sentinel-run positions within the boundary window are considered.
pub fn find_boundary(cx: &DecodeCx<'_>, from: usize) -> Option<usize> {
    let end = from.saturating_add(cx.limits.boundary_window);
    for run in scan::sentinel_runs(cx.data, from, end) {
        for kind in AssetKind::ALL {
            for &shift in kind.sentinel_offsets() {
                let Some(candidate) = run.checked_sub(shift) else {
                    continue;
                };
                if candidate >= from && probe(kind, cx, candidate) {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

/// End of a variable-length asset: the next header, or the window limit.
///
/// The flag is `true` when no header was found and the end is an estimate.
pub fn bounded_end(cx: &DecodeCx<'_>, from: usize) -> (usize, bool) {
    match find_boundary(cx, from) {
        Some(end) => (end, false),
        None => (
            from.saturating_add(cx.limits.boundary_window)
                .min(cx.data.len())
                .max(from.min(cx.data.len())),
            true,
        ),
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use fastzone_common::Endian;
    use fastzone_ff::{Game, Platform};

    use crate::definition::GameDefinition;

    /// Little builder for synthetic zone bytes.
    pub struct Bytes {
        pub buf: Vec<u8>,
        pub endian: Endian,
    }

    impl Bytes {
        pub fn new(endian: Endian) -> Self {
            Self {
                buf: Vec::new(),
                endian,
            }
        }

        pub fn ff(&mut self) -> &mut Self {
            self.buf.extend_from_slice(&[0xFF; 4]);
            self
        }

        pub fn u8(&mut self, v: u8) -> &mut Self {
            self.buf.push(v);
            self
        }

        pub fn u16(&mut self, v: u16) -> &mut Self {
            self.endian.put_u16(&mut self.buf, v);
            self
        }

        pub fn u32(&mut self, v: u32) -> &mut Self {
            self.endian.put_u32(&mut self.buf, v);
            self
        }

        pub fn f32(&mut self, v: f32) -> &mut Self {
            self.endian.put_f32(&mut self.buf, v);
            self
        }

        pub fn cstr(&mut self, s: &str) -> &mut Self {
            self.buf.extend_from_slice(s.as_bytes());
            self.buf.push(0);
            self
        }

        pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
            self.buf.extend_from_slice(bytes);
            self
        }

        pub fn zeros(&mut self, n: usize) -> &mut Self {
            self.buf.resize(self.buf.len() + n, 0);
            self
        }

        pub fn len(&self) -> usize {
            self.buf.len()
        }
    }

    pub fn def(game: Game, platform: Platform) -> &'static GameDefinition {
        GameDefinition::lookup(game, platform).unwrap()
    }
}
