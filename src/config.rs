//! Table configuration

/// Directory slots a fresh table starts with.
pub const DEFAULT_INITIAL_SLOTS: usize = 16;
/// Used-byte bucket threshold that triggers a directory doubling. A few
/// kilobytes keeps a full bucket scan inside a handful of cache lines.
pub const DEFAULT_BUCKET_SIZE_LIMIT: usize = 4 * 1024;

/// Tuning knobs for [`ArrayHashTable`](crate::ArrayHashTable).
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Initial number of directory slots; rounded up to a power of two.
    pub initial_slots: usize,
    /// When an insert pushes a bucket's used bytes past this limit, the
    /// directory doubles and all records are redistributed.
    pub bucket_size_limit: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_slots: DEFAULT_INITIAL_SLOTS,
            bucket_size_limit: DEFAULT_BUCKET_SIZE_LIMIT,
        }
    }
}

impl TableConfig {
    /// Slot counts must stay powers of two so hashing reduces with a mask.
    pub(crate) fn normalized(mut self) -> Self {
        self.initial_slots = self.initial_slots.max(1).next_power_of_two();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_rounds_to_power_of_two() {
        let config = TableConfig {
            initial_slots: 3,
            ..TableConfig::default()
        }
        .normalized();
        assert_eq!(config.initial_slots, 4);

        let config = TableConfig {
            initial_slots: 0,
            ..TableConfig::default()
        }
        .normalized();
        assert_eq!(config.initial_slots, 1);
    }
}
