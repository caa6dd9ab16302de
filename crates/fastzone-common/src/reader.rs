//! Cursor over a zone or container buffer.

use crate::{Endian, Error, InlinePtr, Result};

/// Sequential reader for fixed header layouts.
///
/// Structural decoders use the `*_at` lookups on [`Endian`] instead; this
/// cursor is for the few places that read a run of known fields in order
/// and want a hard error when the buffer ends early.
///
/// ```
/// use fastzone_common::{BinaryReader, Endian};
///
/// let data = [0x00, 0x00, 0x00, 0x05, 0xFF, 0xFF, 0xFF, 0xFF];
/// let mut reader = BinaryReader::new(&data, Endian::Big);
///
/// assert_eq!(reader.read_u32().unwrap(), 5);
/// assert!(reader.read_ptr().unwrap().is_inline());
/// assert_eq!(reader.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
}

impl<'a> BinaryReader<'a> {
    #[inline]
    pub const fn new(data: &'a [u8], endian: Endian) -> Self {
        Self::new_at(data, 0, endian)
    }

    /// Start reading at `position`.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize, endian: Endian) -> Self {
        Self {
            data,
            position,
            endian,
        }
    }

    #[inline]
    pub const fn endian(&self) -> Endian {
        self.endian
    }

    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the cursor.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Jump to an absolute offset. Reads past the end fail, the seek does not.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Take `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if available < count {
            return Err(Error::UnexpectedEof {
                offset: self.position,
                needed: count,
                available,
            });
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    /// A single byte flag; any non-zero value is `true`.
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_bytes(1).map(|b| b[0] != 0)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let endian = self.endian;
        self.read_bytes(4).map(|b| endian.read_u32(b))
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        let endian = self.endian;
        self.read_bytes(8).map(|b| endian.read_u64(b))
    }

    /// A 32-bit pointer slot.
    #[inline]
    pub fn read_ptr(&mut self) -> Result<InlinePtr> {
        self.read_u32().map(InlinePtr::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_in_both_orders() {
        let data = [0x01u8, 0x02, 0x03, 0x04, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00];

        let mut le = BinaryReader::new(&data, Endian::Little);
        assert_eq!(le.read_u32().unwrap(), 0x0403_0201);
        assert_eq!(le.read_ptr().unwrap(), InlinePtr::Inline);
        assert!(le.read_ptr().unwrap().is_null());

        let mut be = BinaryReader::new(&data, Endian::Big);
        assert_eq!(be.read_u32().unwrap(), 0x0102_0304);
        be.seek(0);
        assert_eq!(be.read_u64().unwrap(), 0x0102_0304_FFFF_FFFF);
    }

    #[test]
    fn test_short_read_reports_offset() {
        let data = [0x01, 0x00, 0x00];
        let mut reader = BinaryReader::new_at(&data, 1, Endian::Little);

        assert!(matches!(
            reader.read_u32(),
            Err(Error::UnexpectedEof { offset: 1, needed: 4, available: 2 })
        ));
        assert_eq!(reader.position(), 1);

        reader.seek(0);
        assert!(reader.read_bool().unwrap());
        reader.seek(10);
        assert_eq!(reader.remaining(), 0);
        assert!(reader.read_bool().is_err());
    }
}
