//! Big/little-endian primitive codec.
//!
//! Console zones (PS3, Xbox 360, Wii) are big-endian, PC zones are
//! little-endian. Every structural decoder goes through [`Endian`] so the
//! same layout code serves both.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte order of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endian {
    /// Most significant byte first (consoles).
    Big,
    /// Least significant byte first (PC).
    Little,
}

impl Endian {
    /// Decode a u16 from the first two bytes of `buf`.
    ///
    /// Panics if `buf` is shorter than 2 bytes; use [`Endian::u16_at`] for
    /// bounds-checked access.
    #[inline]
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            Endian::Big => BigEndian::read_u16(buf),
            Endian::Little => LittleEndian::read_u16(buf),
        }
    }

    /// Decode a u32 from the first four bytes of `buf`.
    #[inline]
    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Endian::Big => BigEndian::read_u32(buf),
            Endian::Little => LittleEndian::read_u32(buf),
        }
    }

    /// Decode an i32 from the first four bytes of `buf`.
    #[inline]
    pub fn read_i32(self, buf: &[u8]) -> i32 {
        match self {
            Endian::Big => BigEndian::read_i32(buf),
            Endian::Little => LittleEndian::read_i32(buf),
        }
    }

    /// Decode a u64 from the first eight bytes of `buf`.
    #[inline]
    pub fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            Endian::Big => BigEndian::read_u64(buf),
            Endian::Little => LittleEndian::read_u64(buf),
        }
    }

    /// Decode an IEEE-754 f32 from the first four bytes of `buf`.
    #[inline]
    pub fn read_f32(self, buf: &[u8]) -> f32 {
        match self {
            Endian::Big => BigEndian::read_f32(buf),
            Endian::Little => LittleEndian::read_f32(buf),
        }
    }

    /// Bounds-checked u16 read at `offset`.
    #[inline]
    pub fn u16_at(self, data: &[u8], offset: usize) -> Option<u16> {
        data.get(offset..offset.checked_add(2)?).map(|b| self.read_u16(b))
    }

    /// Bounds-checked u32 read at `offset`.
    #[inline]
    pub fn u32_at(self, data: &[u8], offset: usize) -> Option<u32> {
        data.get(offset..offset.checked_add(4)?).map(|b| self.read_u32(b))
    }

    /// Bounds-checked i32 read at `offset`.
    #[inline]
    pub fn i32_at(self, data: &[u8], offset: usize) -> Option<i32> {
        data.get(offset..offset.checked_add(4)?).map(|b| self.read_i32(b))
    }

    /// Bounds-checked f32 read at `offset`.
    #[inline]
    pub fn f32_at(self, data: &[u8], offset: usize) -> Option<f32> {
        data.get(offset..offset.checked_add(4)?).map(|b| self.read_f32(b))
    }

    /// Encode a u16 into the first two bytes of `buf`.
    #[inline]
    pub fn write_u16(self, buf: &mut [u8], value: u16) {
        match self {
            Endian::Big => BigEndian::write_u16(buf, value),
            Endian::Little => LittleEndian::write_u16(buf, value),
        }
    }

    /// Encode a u32 into the first four bytes of `buf`.
    #[inline]
    pub fn write_u32(self, buf: &mut [u8], value: u32) {
        match self {
            Endian::Big => BigEndian::write_u32(buf, value),
            Endian::Little => LittleEndian::write_u32(buf, value),
        }
    }

    /// Encode an f32 into the first four bytes of `buf`.
    #[inline]
    pub fn write_f32(self, buf: &mut [u8], value: f32) {
        match self {
            Endian::Big => BigEndian::write_f32(buf, value),
            Endian::Little => LittleEndian::write_f32(buf, value),
        }
    }

    /// Append a u16 to a growing buffer.
    #[inline]
    pub fn put_u16(self, out: &mut Vec<u8>, value: u16) {
        let mut bytes = [0u8; 2];
        self.write_u16(&mut bytes, value);
        out.extend_from_slice(&bytes);
    }

    /// Append a u32 to a growing buffer.
    #[inline]
    pub fn put_u32(self, out: &mut Vec<u8>, value: u32) {
        let mut bytes = [0u8; 4];
        self.write_u32(&mut bytes, value);
        out.extend_from_slice(&bytes);
    }

    /// Append an f32 to a growing buffer.
    #[inline]
    pub fn put_f32(self, out: &mut Vec<u8>, value: f32) {
        let mut bytes = [0u8; 4];
        self.write_f32(&mut bytes, value);
        out.extend_from_slice(&bytes);
    }

    /// The other byte order.
    #[inline]
    pub const fn swapped(self) -> Self {
        match self {
            Endian::Big => Endian::Little,
            Endian::Little => Endian::Big,
        }
    }
}

impl std::fmt::Display for Endian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endian::Big => f.write_str("big-endian"),
            Endian::Little => f.write_str("little-endian"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_both_orders() {
        let data = [0x00, 0x00, 0x01, 0x83];
        assert_eq!(Endian::Big.read_u32(&data), 0x183);
        assert_eq!(Endian::Little.read_u32(&data), 0x8301_0000);
    }

    #[test]
    fn test_bounds_checked_reads() {
        let data = [0x12, 0x34, 0x56];
        assert_eq!(Endian::Big.u16_at(&data, 1), Some(0x3456));
        assert_eq!(Endian::Big.u16_at(&data, 2), None);
        assert_eq!(Endian::Little.u32_at(&data, 0), None);
        assert_eq!(Endian::Little.u32_at(&data, usize::MAX), None);
    }

    #[test]
    fn test_write_then_read_float() {
        let mut out = Vec::new();
        Endian::Big.put_f32(&mut out, 30.0);
        Endian::Little.put_f32(&mut out, 30.0);
        assert_eq!(&out[..4], &[0x41, 0xF0, 0x00, 0x00]);
        assert_eq!(Endian::Big.f32_at(&out, 0), Some(30.0));
        assert_eq!(Endian::Little.f32_at(&out, 4), Some(30.0));
    }

    #[test]
    fn test_nan_bits_decode_as_nan() {
        let data = [0x7F, 0xC0, 0x00, 0x00];
        assert!(Endian::Big.read_f32(&data).is_nan());
    }
}
