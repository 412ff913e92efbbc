//! # arrayhash
//!
//! An array hash table: byte-string keys mapped to fixed-size POD values,
//! with collision buckets stored as flat, contiguous, growable byte buffers
//! instead of pointer-linked chains. One cache-friendly linear scan replaces
//! a pointer chase per collision, and a per-bucket size threshold (rather
//! than a global load factor) keeps every scan short.
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   arrayhash                     │
//! ├─────────────────────────────────────────────────┤
//! │  • table    - directory, hashing, resize       │
//! │  • bucket   - packed-record collision buckets  │
//! │  • record   - in-bucket record layout          │
//! │  • buf      - aligned growable byte buffer     │
//! │  • iter     - unordered and sorted traversal   │
//! │  • persist  - binary save/load                 │
//! │  • config   - tuning knobs                     │
//! │  • error    - error handling                   │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use arrayhash::ArrayHashTable;
//!
//! let mut table: ArrayHashTable<u64> = ArrayHashTable::new();
//! *table.get(b"foo") += 1;
//! *table.get(b"foo") += 1;
//! *table.get(b"bar") += 1;
//!
//! assert_eq!(table.try_get(b"foo"), Some(&2));
//! assert_eq!(table.try_get(b"baz"), None);
//!
//! let keys: Vec<&[u8]> = table.iter_sorted().map(|(k, _)| k).collect();
//! assert_eq!(keys, [b"bar".as_slice(), b"foo"]);
//! ```
//!
//! The table is single-threaded and fully synchronous. Value references and
//! iterators borrow the table, so the borrow checker prevents their use
//! across any mutation; callers needing shared access must wrap the table in
//! their own lock.

mod bucket;
mod buf;
mod record;
mod table;

pub mod config;
pub mod error;
pub mod iter;
pub mod persist;

// Re-export commonly used types
pub use config::TableConfig;
pub use error::{Error, Result};
pub use iter::{Iter, SortedIter};
pub use persist::{FORMAT_VERSION, MAGIC};
pub use table::ArrayHashTable;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
