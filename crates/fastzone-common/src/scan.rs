//! Byte-pattern searching over zone buffers.
//!
//! Thin wrappers over `memchr`, plus the sentinel-run search that the
//! recovery layer and the boundary finder are built on.

use memchr::memmem;

/// Four bytes of the inline sentinel.
pub static SENTINEL_BYTES: [u8; 4] = [0xFF; 4];

/// Find the first null byte in a slice, returning its index.
#[inline]
pub fn find_null(data: &[u8]) -> Option<usize> {
    memchr::memchr(0, data)
}

/// Find a multi-byte pattern in a slice.
#[inline]
pub fn find_pattern(needle: &[u8], haystack: &[u8]) -> Option<usize> {
    memmem::find(haystack, needle)
}

/// Find a multi-byte pattern in a slice, searching from the end.
#[inline]
pub fn find_pattern_reverse(needle: &[u8], haystack: &[u8]) -> Option<usize> {
    memmem::rfind(haystack, needle)
}

/// Count how many consecutive `byte` values start at `offset`.
#[inline]
pub fn leading_run(data: &[u8], offset: usize, byte: u8) -> usize {
    data.get(offset..)
        .map(|tail| tail.iter().take_while(|&&b| b == byte).count())
        .unwrap_or(0)
}

/// Whether every byte in the slice equals `byte`.
#[inline]
pub fn is_all(data: &[u8], byte: u8) -> bool {
    data.iter().all(|&b| b == byte)
}

/// Iterator over the start offsets of `0xFFFFFFFF` runs.
///
/// Only the first position of a run is yielded: a match whose preceding
/// byte is also `0xFF` lies inside a longer run and is skipped. Offsets are
/// absolute indices into the searched buffer.
pub struct SentinelRuns<'a> {
    data: &'a [u8],
    window_start: usize,
    inner: memmem::FindIter<'a, 'static>,
}

impl<'a> SentinelRuns<'a> {
    /// Search `data[start..end)`, clamped to the buffer.
    pub fn new(data: &'a [u8], start: usize, end: usize) -> Self {
        let end = end.min(data.len());
        let start = start.min(end);
        Self {
            data,
            window_start: start,
            inner: memmem::find_iter(&data[start..end], &SENTINEL_BYTES),
        }
    }
}

impl Iterator for SentinelRuns<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        for relative in self.inner.by_ref() {
            let absolute = self.window_start + relative;
            if absolute == 0 || self.data[absolute - 1] != 0xFF {
                return Some(absolute);
            }
        }
        None
    }
}

/// Iterate over sentinel-run starts in `data[start..end)`.
#[inline]
pub fn sentinel_runs(data: &[u8], start: usize, end: usize) -> SentinelRuns<'_> {
    SentinelRuns::new(data, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_skip_interior_matches() {
        let mut data = vec![0u8; 4];
        data.extend_from_slice(&[0xFF; 8]);
        data.extend_from_slice(&[0x01, 0x02]);
        data.extend_from_slice(&[0xFF; 4]);

        let runs: Vec<usize> = sentinel_runs(&data, 0, data.len()).collect();
        assert_eq!(runs, vec![4, 14]);
    }

    #[test]
    fn test_runs_respect_window() {
        let mut data = vec![0xFFu8; 4];
        data.extend_from_slice(&[0x00; 4]);
        data.extend_from_slice(&[0xFF; 4]);

        let runs: Vec<usize> = sentinel_runs(&data, 1, data.len()).collect();
        assert_eq!(runs, vec![8]);

        let runs: Vec<usize> = sentinel_runs(&data, 0, 10).collect();
        assert_eq!(runs, vec![0]);
    }

    #[test]
    fn test_run_starting_mid_window_inside_longer_run() {
        // Window begins inside a run; the preceding byte is still consulted.
        let data = [0xFFu8; 10];
        assert_eq!(sentinel_runs(&data, 3, 10).count(), 0);
    }

    #[test]
    fn test_leading_run() {
        let data = [0xFF, 0xFF, 0xFF, 0x00, 0xFF];
        assert_eq!(leading_run(&data, 0, 0xFF), 3);
        assert_eq!(leading_run(&data, 3, 0xFF), 0);
        assert_eq!(leading_run(&data, 10, 0xFF), 0);
    }

    #[test]
    fn test_find_pattern() {
        assert_eq!(find_pattern(b"csv", b"table.csv"), Some(6));
        assert_eq!(find_pattern_reverse(b"a", b"banana"), Some(5));
        assert_eq!(find_null(b"ab\0c"), Some(2));
    }
}
