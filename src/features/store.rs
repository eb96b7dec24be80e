use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum StoreError {
    #[error("Storage backend failure - {0}")]
    Backend(String),

    #[error("Storage io failure - {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization failure - {0}")]
    Serialization(#[from] serde_json::Error),
}

pub(crate) type StoreResult<T> = anyhow::Result<T, StoreError>;

/// The get/put capability the record store is built on.
///
/// A missing key is `Ok(None)`, never an error, so callers can tell an
/// absent record apart from a failing backend.
pub(crate) trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    fn put(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()>;
}

/// In-memory key-value store, used for one-off runs and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("tx1").unwrap().is_none());
    }

    #[test]
    fn put_overwrites_previous_value() {
        let mut store = MemoryStore::new();
        store.put("tx1", b"first".to_vec()).unwrap();
        store.put("tx1", b"second".to_vec()).unwrap();

        assert_eq!(store.get("tx1").unwrap(), Some(b"second".to_vec()));
        assert_eq!(store.len(), 1);
    }
}
