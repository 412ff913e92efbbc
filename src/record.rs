//! Packed record layout inside a bucket buffer.
//!
//! ```text
//! +-----------------+-----------+-----+---------------------+-----+
//! | key_len: u32 LE | key bytes | pad | value (fixed width) | pad |
//! +-----------------+-----------+-----+---------------------+-----+
//! ```
//!
//! Records sit back-to-back with no gaps. The value field and the next
//! record both start on an 8-byte boundary, which keeps value references
//! aligned for any value type with alignment at most 8.

pub(crate) const KEY_LEN_SIZE: usize = 4;
pub(crate) const RECORD_ALIGN: usize = 8;

#[inline]
pub(crate) fn align_up(n: usize) -> usize {
    (n + RECORD_ALIGN - 1) & !(RECORD_ALIGN - 1)
}

/// Offset of the value field relative to the record start.
#[inline]
pub(crate) fn value_offset(key_len: usize) -> usize {
    align_up(KEY_LEN_SIZE + key_len)
}

/// Total byte size of a record.
#[inline]
pub(crate) fn record_size(key_len: usize, value_size: usize) -> usize {
    align_up(value_offset(key_len) + value_size)
}

#[inline]
pub(crate) fn read_key_len(bytes: &[u8], offset: usize) -> usize {
    let mut raw = [0u8; KEY_LEN_SIZE];
    raw.copy_from_slice(&bytes[offset..offset + KEY_LEN_SIZE]);
    u32::from_le_bytes(raw) as usize
}

#[inline]
pub(crate) fn write_key_len(bytes: &mut [u8], offset: usize, key_len: usize) {
    let raw = (key_len as u32).to_le_bytes();
    bytes[offset..offset + KEY_LEN_SIZE].copy_from_slice(&raw);
}

/// Walks the records packed into a bucket's byte region, yielding
/// `(record offset, key, value bytes)`.
pub(crate) struct Records<'a> {
    bytes: &'a [u8],
    offset: usize,
    value_size: usize,
}

impl<'a> Records<'a> {
    pub fn new(bytes: &'a [u8], value_size: usize) -> Self {
        Self {
            bytes,
            offset: 0,
            value_size,
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = (usize, &'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.bytes.len() {
            return None;
        }
        let offset = self.offset;
        let key_len = read_key_len(self.bytes, offset);
        let key = &self.bytes[offset + KEY_LEN_SIZE..offset + KEY_LEN_SIZE + key_len];
        let vo = offset + value_offset(key_len);
        let value = &self.bytes[vo..vo + self.value_size];
        self.offset = offset + record_size(key_len, self.value_size);
        Some((offset, key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_math() {
        // empty key: header pads straight to the value field
        assert_eq!(value_offset(0), 8);
        assert_eq!(record_size(0, 8), 16);

        // 3-byte key fits beside the header in one word
        assert_eq!(value_offset(3), 8);
        assert_eq!(record_size(3, 8), 16);

        // 5-byte key pushes the value into the next word
        assert_eq!(value_offset(5), 16);
        assert_eq!(record_size(5, 8), 24);

        // zero-width values still round the record up to alignment
        assert_eq!(record_size(4, 0), 8);
    }

    #[test]
    fn key_len_round_trip() {
        let mut bytes = [0u8; 16];
        write_key_len(&mut bytes, 8, 0x0102_0304);
        assert_eq!(read_key_len(&bytes, 8), 0x0102_0304);
    }
}
