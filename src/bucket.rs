//! Array-hash bucket: every record sharing a hash slot, packed into one
//! flat buffer and found by linear scan.

use std::marker::PhantomData;
use std::mem::size_of;

use bytemuck::Pod;

use crate::buf::AlignedBuf;
use crate::record::{self, Records, KEY_LEN_SIZE};

pub(crate) struct Bucket<V> {
    buf: AlignedBuf,
    records: usize,
    _value: PhantomData<V>,
}

impl<V: Pod> Bucket<V> {
    pub fn new() -> Self {
        Self {
            buf: AlignedBuf::new(),
            records: 0,
            _value: PhantomData,
        }
    }

    #[inline]
    pub fn record_count(&self) -> usize {
        self.records
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn byte_capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn records(&self) -> Records<'_> {
        Records::new(self.buf.as_slice(), size_of::<V>())
    }

    /// Offset of the record whose key is byte-equal to `key`.
    pub fn find(&self, key: &[u8]) -> Option<usize> {
        for (offset, record_key, _) in self.records() {
            if record_key == key {
                return Some(offset);
            }
        }
        None
    }

    pub fn key_at(&self, offset: usize) -> &[u8] {
        let bytes = self.buf.as_slice();
        let key_len = record::read_key_len(bytes, offset);
        &bytes[offset + KEY_LEN_SIZE..offset + KEY_LEN_SIZE + key_len]
    }

    pub fn value_at(&self, offset: usize) -> &V {
        let bytes = self.buf.as_slice();
        let vo = offset + record::value_offset(record::read_key_len(bytes, offset));
        bytemuck::from_bytes(&bytes[vo..vo + size_of::<V>()])
    }

    pub fn value_at_mut(&mut self, offset: usize) -> &mut V {
        let bytes = self.buf.as_mut_slice();
        let vo = offset + record::value_offset(record::read_key_len(bytes, offset));
        bytemuck::from_bytes_mut(&mut bytes[vo..vo + size_of::<V>()])
    }

    /// Key, value reference, and total record size at `offset`.
    pub fn record_at(&self, offset: usize) -> (&[u8], &V, usize) {
        let bytes = self.buf.as_slice();
        let key_len = record::read_key_len(bytes, offset);
        let key = &bytes[offset + KEY_LEN_SIZE..offset + KEY_LEN_SIZE + key_len];
        let vo = offset + record::value_offset(key_len);
        let value = bytemuck::from_bytes(&bytes[vo..vo + size_of::<V>()]);
        (key, value, record::record_size(key_len, size_of::<V>()))
    }

    /// Append a record without scanning for duplicates. Used when the caller
    /// already knows the key is absent (fresh inserts, redistribution).
    pub fn push_record(&mut self, key: &[u8], value: &[u8]) {
        debug_assert_eq!(value.len(), size_of::<V>());
        let size = record::record_size(key.len(), size_of::<V>());
        let offset = self.buf.extend_zeroed(size);
        let bytes = self.buf.as_mut_slice();
        record::write_key_len(bytes, offset, key.len());
        bytes[offset + KEY_LEN_SIZE..offset + KEY_LEN_SIZE + key.len()].copy_from_slice(key);
        let vo = offset + record::value_offset(key.len());
        bytes[vo..vo + value.len()].copy_from_slice(value);
        self.records += 1;
    }

    /// Remove the record for `key`, shifting the tail left to close the gap.
    pub fn remove(&mut self, key: &[u8]) -> Option<V> {
        let offset = self.find(key)?;
        let bytes = self.buf.as_slice();
        let key_len = record::read_key_len(bytes, offset);
        let vo = offset + record::value_offset(key_len);
        let value = bytemuck::pod_read_unaligned(&bytes[vo..vo + size_of::<V>()]);
        let size = record::record_size(key_len, size_of::<V>());
        let len = self.buf.len();
        self.buf.shift_down(offset + size, offset);
        self.buf.truncate(len - size);
        self.records -= 1;
        Some(value)
    }

    /// Unordered traversal with in-place value mutation.
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&[u8], &mut V)) {
        let mut offset = 0;
        while offset < self.buf.len() {
            let bytes = self.buf.as_mut_slice();
            let key_len = record::read_key_len(bytes, offset);
            let vo = record::value_offset(key_len);
            let size = record::record_size(key_len, size_of::<V>());
            let (head, tail) = bytes[offset..].split_at_mut(vo);
            let key = &head[KEY_LEN_SIZE..KEY_LEN_SIZE + key_len];
            let value = bytemuck::from_bytes_mut(&mut tail[..size_of::<V>()]);
            f(key, value);
            offset += size;
        }
    }
}

impl<V: Pod + Default> Bucket<V> {
    /// Append a zero-default record unless `key` is already present.
    /// Returns true if a record was created.
    pub fn insert_if_absent(&mut self, key: &[u8]) -> bool {
        if self.find(key).is_some() {
            return false;
        }
        self.push_record(key, bytemuck::bytes_of(&V::default()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_find_remove() {
        let mut bucket: Bucket<u64> = Bucket::new();
        assert!(bucket.insert_if_absent(b"alpha"));
        assert!(bucket.insert_if_absent(b"beta"));
        assert!(!bucket.insert_if_absent(b"alpha"));
        assert_eq!(bucket.record_count(), 2);

        let offset = bucket.find(b"alpha").unwrap();
        *bucket.value_at_mut(offset) = 7;
        assert_eq!(*bucket.value_at(bucket.find(b"alpha").unwrap()), 7);

        assert_eq!(bucket.remove(b"alpha"), Some(7));
        assert_eq!(bucket.remove(b"alpha"), None);
        assert_eq!(bucket.record_count(), 1);
        // the survivor is intact after the shift
        assert_eq!(bucket.key_at(bucket.find(b"beta").unwrap()), b"beta");
    }

    #[test]
    fn remove_middle_closes_gap() {
        let mut bucket: Bucket<u64> = Bucket::new();
        for key in [b"one".as_slice(), b"two", b"three"] {
            bucket.insert_if_absent(key);
            *bucket.value_at_mut(bucket.find(key).unwrap()) = key.len() as u64;
        }
        assert_eq!(bucket.remove(b"two"), Some(3));

        let keys: Vec<&[u8]> = bucket.records().map(|(_, k, _)| k).collect();
        assert_eq!(keys, [b"one".as_slice(), b"three"]);
        assert_eq!(*bucket.value_at(bucket.find(b"three").unwrap()), 5);
    }

    #[test]
    fn empty_key_is_a_real_record() {
        let mut bucket: Bucket<u64> = Bucket::new();
        assert!(bucket.insert_if_absent(b""));
        assert!(!bucket.insert_if_absent(b""));
        assert!(bucket.insert_if_absent(b"x"));
        assert_eq!(bucket.record_count(), 2);
        assert_eq!(bucket.key_at(bucket.find(b"").unwrap()), b"");
        assert_eq!(bucket.remove(b""), Some(0));
        assert_eq!(bucket.find(b"x").map(|o| bucket.key_at(o)), Some(&b"x"[..]));
    }

    #[test]
    fn byte_len_tracks_packed_records() {
        let mut bucket: Bucket<u64> = Bucket::new();
        bucket.insert_if_absent(b"abc");
        // u32 header + 3 key bytes pad to 8, value pads to 16
        assert_eq!(bucket.byte_len(), 16);
        bucket.insert_if_absent(b"abcde");
        assert_eq!(bucket.byte_len(), 16 + 24);
    }
}
