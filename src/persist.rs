//! Binary save/load for a whole table.
//!
//! Stream layout, every integer little-endian:
//!
//! ```text
//! [magic "ARRAYHSH"][version: u32][value_size: u64][entry_count: u64]
//! then per entry:
//! [key_len: u32][key bytes][value: value_size bytes]
//! ```
//!
//! Entries are written in unordered traversal order; load rebuilds the
//! table through the normal insert path, so the reloaded table matches the
//! saved one as a multiset of (key, value) pairs regardless of how its
//! directory ends up laid out. The format carries no cross-version
//! compatibility guarantee.

use std::io::{Read, Write};
use std::mem::size_of;

use bytemuck::Pod;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::ArrayHashTable;

pub const MAGIC: &[u8; 8] = b"ARRAYHSH";
pub const FORMAT_VERSION: u32 = 1;

impl<V: Pod + Default> ArrayHashTable<V> {
    /// Write every (key, value) pair to `w`.
    pub fn save<W: Write>(&self, mut w: W) -> Result<()> {
        w.write_all(MAGIC)?;
        w.write_u32::<LittleEndian>(FORMAT_VERSION)?;
        w.write_u64::<LittleEndian>(size_of::<V>() as u64)?;
        w.write_u64::<LittleEndian>(self.len() as u64)?;
        for (key, value) in self.iter() {
            w.write_u32::<LittleEndian>(key.len() as u32)?;
            w.write_all(key)?;
            w.write_all(bytemuck::bytes_of(value))?;
        }
        debug!(entries = self.len(), "table saved");
        Ok(())
    }

    /// Read a table previously written by [`save`](Self::save). On any
    /// failure the partially built table is dropped, never returned.
    pub fn load<R: Read>(mut r: R) -> Result<Self> {
        let mut magic = [0u8; 8];
        read_exact(&mut r, &mut magic)?;
        if &magic != MAGIC {
            return Err(Error::Corrupt {
                message: "bad magic".to_string(),
            });
        }
        let version = r.read_u32::<LittleEndian>().map_err(truncated)?;
        if version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion { version });
        }
        let value_size = r.read_u64::<LittleEndian>().map_err(truncated)? as usize;
        if value_size != size_of::<V>() {
            return Err(Error::Corrupt {
                message: format!(
                    "value width {} does not match the {}-byte value type",
                    value_size,
                    size_of::<V>()
                ),
            });
        }
        let count = r.read_u64::<LittleEndian>().map_err(truncated)?;

        let mut table = Self::new();
        let mut key = Vec::new();
        let mut value = vec![0u8; value_size];
        for _ in 0..count {
            let key_len = r.read_u32::<LittleEndian>().map_err(truncated)? as usize;
            key.resize(key_len, 0);
            read_exact(&mut r, &mut key)?;
            read_exact(&mut r, &mut value)?;
            *table.get(&key) = bytemuck::pod_read_unaligned(&value);
        }
        debug!(entries = table.len(), "table loaded");
        Ok(table)
    }
}

fn read_exact<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<()> {
    r.read_exact(buf).map_err(truncated)
}

/// A short read means the declared contents exceed the available bytes;
/// that is a format problem, not a transport one.
fn truncated(err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::Corrupt {
            message: "truncated stream".to_string(),
        }
    } else {
        Error::from(err)
    }
}
