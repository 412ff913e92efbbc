//! 8-aligned growable byte buffer backing bucket storage.
//!
//! Record offsets are rounded up to 8 bytes so the value field of every
//! record stays naturally aligned. That only holds if the buffer base is
//! itself 8-aligned, so storage is a `Vec<u64>` viewed as bytes.

/// Smallest non-empty allocation, in 8-byte words.
const MIN_WORDS: usize = 4;

pub(crate) struct AlignedBuf {
    words: Vec<u64>,
    /// Used bytes; always a multiple of 8.
    len: usize,
}

impl AlignedBuf {
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.words.len() * 8
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.words)[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut(&mut self.words)[..self.len]
    }

    /// Append `extra` zeroed bytes, doubling capacity when the append would
    /// overflow it. Returns the offset of the new region.
    pub fn extend_zeroed(&mut self, extra: usize) -> usize {
        debug_assert_eq!(extra % 8, 0);
        let offset = self.len;
        let new_len = self.len + extra;
        let need_words = new_len / 8;
        if need_words > self.words.len() {
            let new_words = need_words.max(self.words.len() * 2).max(MIN_WORDS);
            self.words.resize(new_words, 0);
        }
        self.len = new_len;
        // the region may hold stale bytes from an earlier truncate
        self.as_mut_slice()[offset..].fill(0);
        offset
    }

    /// Shift `src..self.len` down to `dest`, closing the gap left by a
    /// removed record.
    pub fn shift_down(&mut self, src: usize, dest: usize) {
        debug_assert!(dest <= src && src <= self.len);
        let len = self.len;
        self.as_mut_slice().copy_within(src..len, dest);
    }

    pub fn truncate(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.len);
        debug_assert_eq!(new_len % 8, 0);
        self.len = new_len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_returns_sequential_offsets() {
        let mut buf = AlignedBuf::new();
        assert_eq!(buf.extend_zeroed(16), 0);
        assert_eq!(buf.extend_zeroed(8), 16);
        assert_eq!(buf.len(), 24);
        assert!(buf.capacity() >= 24);
        assert!(buf.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn capacity_doubles() {
        let mut buf = AlignedBuf::new();
        buf.extend_zeroed(MIN_WORDS * 8);
        let cap = buf.capacity();
        buf.extend_zeroed(8);
        assert_eq!(buf.capacity(), cap * 2);
    }

    #[test]
    fn extend_after_truncate_rezeros() {
        let mut buf = AlignedBuf::new();
        buf.extend_zeroed(16);
        buf.as_mut_slice().fill(0xaa);
        buf.truncate(8);
        let offset = buf.extend_zeroed(8);
        assert!(buf.as_slice()[offset..].iter().all(|&b| b == 0));
    }

    #[test]
    fn shift_down_closes_gap() {
        let mut buf = AlignedBuf::new();
        buf.extend_zeroed(24);
        for (i, b) in buf.as_mut_slice().iter_mut().enumerate() {
            *b = i as u8;
        }
        buf.shift_down(16, 8);
        buf.truncate(16);
        assert_eq!(buf.as_slice()[8..16], [16, 17, 18, 19, 20, 21, 22, 23]);
    }
}
