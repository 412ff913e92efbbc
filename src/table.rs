//! Table-level orchestration: directory addressing, hashing, and the
//! per-bucket resize controller.
//!
//! The directory is a power-of-two `Vec` of buckets indexed by
//! `xxh3_64(key)` reduced with a mask. Unlike a classic load-factor policy,
//! growth is driven by individual bucket size: the moment an insert pushes
//! one bucket past [`TableConfig::bucket_size_limit`], the directory doubles
//! and every record is redistributed. Bucket scans stay cheap even under
//! skewed key distributions, at the price of an occasional full rehash.

use std::mem::{align_of, size_of};

use bytemuck::Pod;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::bucket::Bucket;
use crate::config::TableConfig;
use crate::iter::{Iter, SortedIter};
use crate::record::RECORD_ALIGN;

/// Array hash table mapping byte-string keys to fixed-size POD values.
///
/// Value references and iterators borrow the table, so the borrow checker
/// rules out use across a mutation; buffer growth and redistribution are
/// free to relocate storage.
pub struct ArrayHashTable<V = u64> {
    buckets: Vec<Bucket<V>>,
    len: usize,
    config: TableConfig,
}

impl<V: Pod + Default> ArrayHashTable<V> {
    /// Empty table with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Self {
        assert!(
            align_of::<V>() <= RECORD_ALIGN,
            "value types with alignment above {} are not supported",
            RECORD_ALIGN
        );
        let config = config.normalized();
        let buckets = (0..config.initial_slots).map(|_| Bucket::new()).collect();
        Self {
            buckets,
            len: 0,
            config,
        }
    }

    #[inline]
    fn slot_for(&self, key: &[u8]) -> usize {
        (xxh3_64(key) & (self.buckets.len() as u64 - 1)) as usize
    }

    /// Number of distinct keys currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert-if-absent lookup. Returns a mutable reference to the value for
    /// `key`, creating a `V::default()` record when the key is new.
    pub fn get(&mut self, key: &[u8]) -> &mut V {
        let mut slot = self.slot_for(key);
        if self.buckets[slot].insert_if_absent(key) {
            self.len += 1;
            if self.buckets[slot].byte_len() > self.config.bucket_size_limit {
                self.expand();
                slot = self.slot_for(key);
            }
        }
        match self.buckets[slot].find(key) {
            Some(offset) => self.buckets[slot].value_at_mut(offset),
            None => unreachable!("key present after insert_if_absent"),
        }
    }

    /// Lookup without insertion.
    pub fn try_get(&self, key: &[u8]) -> Option<&V> {
        let bucket = &self.buckets[self.slot_for(key)];
        bucket.find(key).map(|offset| bucket.value_at(offset))
    }

    /// Lookup without insertion, mutable.
    pub fn try_get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let slot = self.slot_for(key);
        let offset = self.buckets[slot].find(key)?;
        Some(self.buckets[slot].value_at_mut(offset))
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &[u8]) -> Option<V> {
        let slot = self.slot_for(key);
        let removed = self.buckets[slot].remove(key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Drop every record and return to the initial directory size.
    pub fn clear(&mut self) {
        self.buckets = (0..self.config.initial_slots)
            .map(|_| Bucket::new())
            .collect();
        self.len = 0;
    }

    /// Approximate heap footprint in bytes, for diagnostics and capacity
    /// planning.
    pub fn mem_size(&self) -> usize {
        size_of::<Self>()
            + self.buckets.capacity() * size_of::<Bucket<V>>()
            + self.buckets.iter().map(|b| b.byte_capacity()).sum::<usize>()
    }

    /// Unordered traversal: directory order, storage order within a bucket.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.buckets)
    }

    /// Globally sorted traversal. Snapshots and sorts all record locations
    /// up front (O(N log N)); buckets themselves are never kept sorted.
    pub fn iter_sorted(&self) -> SortedIter<'_, V> {
        SortedIter::new(&self.buckets, self.len)
    }

    /// Unordered traversal with in-place value mutation.
    pub fn for_each_mut<F: FnMut(&[u8], &mut V)>(&mut self, mut f: F) {
        for bucket in &mut self.buckets {
            bucket.for_each_mut(&mut f);
        }
    }

    /// Double the directory and redistribute every record by re-hashing.
    fn expand(&mut self) {
        let new_slots = self.buckets.len() * 2;
        debug!(slots = new_slots, entries = self.len, "expanding directory");
        let old = std::mem::replace(
            &mut self.buckets,
            (0..new_slots).map(|_| Bucket::new()).collect(),
        );
        let mask = new_slots as u64 - 1;
        for bucket in old {
            for (_, key, value) in bucket.records() {
                let slot = (xxh3_64(key) & mask) as usize;
                self.buckets[slot].push_record(key, value);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn slots(&self) -> usize {
        self.buckets.len()
    }
}

impl<V: Pod + Default> Default for ArrayHashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_matches_bucket_counts() {
        let mut table: ArrayHashTable<u64> = ArrayHashTable::new();
        for i in 0..100u32 {
            *table.get(&i.to_le_bytes()) += 1;
        }
        table.remove(&5u32.to_le_bytes());
        let bucket_total: usize = table.buckets.iter().map(|b| b.record_count()).sum();
        assert_eq!(table.len(), bucket_total);
        assert_eq!(table.len(), 99);
    }

    #[test]
    fn expand_preserves_every_pair() {
        let config = TableConfig {
            initial_slots: 2,
            bucket_size_limit: 64,
        };
        let mut table: ArrayHashTable<u64> = ArrayHashTable::with_config(config);
        for i in 0..256u32 {
            *table.get(&i.to_le_bytes()) = u64::from(i) + 1;
        }
        assert!(table.slots() > 2, "directory never grew");
        for i in 0..256u32 {
            assert_eq!(table.try_get(&i.to_le_bytes()), Some(&(u64::from(i) + 1)));
        }
    }
}
