//! Inline-data pointer sentinel.
//!
//! A relocated zone never contains real addresses. Pointer-sized fields hold
//! either `0xFFFFFFFF` ("the referenced data follows immediately") or some
//! other raw value that must never be dereferenced.

/// The all-ones value marking inline data.
pub const INLINE_SENTINEL: u32 = 0xFFFF_FFFF;

/// Decoded form of a 32-bit pointer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InlinePtr {
    /// `0xFFFFFFFF`: the data follows in the buffer.
    Inline,
    /// Any other raw value, kept only for diagnostics.
    Unknown(u32),
}

impl InlinePtr {
    /// Classify a raw 32-bit field.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        if raw == INLINE_SENTINEL {
            InlinePtr::Inline
        } else {
            InlinePtr::Unknown(raw)
        }
    }

    /// Whether this is the inline sentinel.
    #[inline]
    pub const fn is_inline(self) -> bool {
        matches!(self, InlinePtr::Inline)
    }

    /// Whether the raw value is zero (absent data in most titles).
    #[inline]
    pub const fn is_null(self) -> bool {
        matches!(self, InlinePtr::Unknown(0))
    }

    /// Inline, or the zero value some titles write as an alternate inline
    /// marker. Decoders pass `zero_is_inline` from the game definition.
    #[inline]
    pub const fn is_inline_or_zero(self, zero_is_inline: bool) -> bool {
        self.is_inline() || (zero_is_inline && self.is_null())
    }

    /// The raw 32-bit value.
    #[inline]
    pub const fn raw(self) -> u32 {
        match self {
            InlinePtr::Inline => INLINE_SENTINEL,
            InlinePtr::Unknown(raw) => raw,
        }
    }
}

impl From<u32> for InlinePtr {
    fn from(raw: u32) -> Self {
        Self::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(InlinePtr::from_raw(0xFFFF_FFFF), InlinePtr::Inline);
        assert_eq!(InlinePtr::from_raw(0), InlinePtr::Unknown(0));
        assert!(InlinePtr::from_raw(0).is_null());
        assert!(InlinePtr::from_raw(0).is_inline_or_zero(true));
        assert!(!InlinePtr::from_raw(0).is_inline_or_zero(false));
        assert_eq!(InlinePtr::from_raw(0x1234).raw(), 0x1234);
    }
}
