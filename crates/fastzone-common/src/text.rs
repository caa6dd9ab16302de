//! Bounded null-terminated string extraction.
//!
//! Zone strings are plain bytes with a trailing NUL. Scans are always
//! bounded so a corrupt buffer cannot turn a string read into a
//! multi-megabyte walk.

/// Bytes of the null-terminated string at `offset`, excluding the NUL.
///
/// Returns `None` when no terminator occurs within `max_len` bytes or the
/// offset is out of range.
pub fn cstr_at(data: &[u8], offset: usize, max_len: usize) -> Option<&[u8]> {
    let tail = data.get(offset..)?;
    let window = &tail[..tail.len().min(max_len.saturating_add(1))];
    let nul = memchr::memchr(0, window)?;
    Some(&window[..nul])
}

/// Like [`cstr_at`] but also returns the offset just past the terminator.
pub fn cstr_span(data: &[u8], offset: usize, max_len: usize) -> Option<(&[u8], usize)> {
    cstr_at(data, offset, max_len).map(|bytes| (bytes, offset + bytes.len() + 1))
}

/// Whether every byte is printable ASCII (space through tilde).
#[inline]
pub fn is_printable_ascii(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| (0x20..=0x7E).contains(&b))
}

/// Whether every byte is printable ASCII, tab, CR or LF.
#[inline]
pub fn is_text(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|&b| (0x20..=0x7E).contains(&b) || b == b'\t' || b == b'\r' || b == b'\n')
}

/// Owned string from raw bytes, replacing invalid UTF-8.
#[inline]
pub fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
