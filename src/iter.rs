//! Unordered and sorted traversal over a table's buckets.
//!
//! Both iterators borrow the table immutably; the borrow checker rules out
//! mutation while one is alive, so there is no generation bookkeeping to
//! pay for on every step.

use bytemuck::Pod;

use crate::bucket::Bucket;

/// Unordered iterator: walks buckets in directory order and records in
/// storage order. Visits each present key exactly once.
pub struct Iter<'a, V> {
    buckets: &'a [Bucket<V>],
    slot: usize,
    offset: usize,
}

impl<'a, V: Pod> Iter<'a, V> {
    pub(crate) fn new(buckets: &'a [Bucket<V>]) -> Self {
        Self {
            buckets,
            slot: 0,
            offset: 0,
        }
    }
}

impl<'a, V: Pod> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.slot < self.buckets.len() {
            let bucket = &self.buckets[self.slot];
            if self.offset < bucket.byte_len() {
                let (key, value, size) = bucket.record_at(self.offset);
                self.offset += size;
                return Some((key, value));
            }
            self.slot += 1;
            self.offset = 0;
        }
        None
    }
}

/// Sorted iterator: snapshots every record location at construction, sorts
/// the snapshot once by key, then streams. Key order is byte-wise
/// lexicographic; on a shared-prefix tie the shorter key comes first, which
/// is exactly what `<[u8]>::cmp` does.
pub struct SortedIter<'a, V> {
    buckets: &'a [Bucket<V>],
    entries: Vec<(usize, usize)>,
    pos: usize,
}

impl<'a, V: Pod> SortedIter<'a, V> {
    pub(crate) fn new(buckets: &'a [Bucket<V>], len: usize) -> Self {
        let mut entries = Vec::with_capacity(len);
        for (slot, bucket) in buckets.iter().enumerate() {
            for (offset, _, _) in bucket.records() {
                entries.push((slot, offset));
            }
        }
        entries.sort_unstable_by(|&(sa, oa), &(sb, ob)| {
            buckets[sa].key_at(oa).cmp(buckets[sb].key_at(ob))
        });
        Self {
            buckets,
            entries,
            pos: 0,
        }
    }
}

impl<'a, V: Pod> Iterator for SortedIter<'a, V> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let &(slot, offset) = self.entries.get(self.pos)?;
        self.pos += 1;
        let (key, value, _) = self.buckets[slot].record_at(offset);
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl<'a, V: Pod> ExactSizeIterator for SortedIter<'a, V> {}
