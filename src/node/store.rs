//! Per node key/value storage.

use bytes::Bytes;
use dashmap::{mapref::entry::Entry, DashMap};

#[derive(Debug, Default)]
/// Raw key to raw value map, growing monotonically.
///
/// Backed by a sharded concurrent map, so it can be read and written from
/// several threads through a shared reference.
pub struct LocalStore {
    values: DashMap<Bytes, Bytes>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &[u8]) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &[u8]) -> Option<Bytes> {
        self.values.get(key).map(|v| v.value().clone())
    }

    /// Unconditional insert, overwriting any previous value.
    pub fn put(&self, key: &[u8], value: &[u8]) {
        self.values
            .insert(Bytes::copy_from_slice(key), Bytes::copy_from_slice(value));
    }

    /// Insert only if `key` is absent, and return `true` if it did.
    ///
    /// Check and insert happen under the same shard lock, so of two racing
    /// writers exactly one wins.
    pub(crate) fn insert_if_absent(&self, key: &Bytes, value: &Bytes) -> bool {
        match self.values.entry(key.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value.clone());
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
