use thiserror::Error;

use super::index::{IdentifierIndex, INDEX_KEY};
use super::store::{KeyValueStore, StoreError};
use super::transaction::{TransactionId, TransactionRecord};

pub(crate) const GREETING: &str = "Hello, world!";

#[derive(Error, Debug)]
pub(crate) enum RecordStoreError {
    #[error("Storage failure - {0}")]
    Store(#[from] StoreError),

    #[error("Identifier index not found, initialize the store first")]
    Uninitialized,

    #[error("Identifier index is corrupt - {0}")]
    CorruptIndex(#[source] serde_json::Error),

    #[error("Record {id} is corrupt - {source}")]
    CorruptRecord {
        id: TransactionId,
        source: serde_json::Error,
    },

    #[error("Record {0} not found")]
    NotFound(TransactionId),
}

type RecordResult<T> = anyhow::Result<T, RecordStoreError>;

/// Transaction records keyed by id, plus the index listing every id.
///
/// Writes take `&mut self`, which serializes the index read-modify-write
/// for any one owner. Share across threads behind a `Mutex`.
#[derive(Debug)]
pub struct RecordStore<S> {
    store: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub(crate) fn new(store: S) -> Self {
        Self { store }
    }

    /// Resets the index to an empty list. Records already written are left
    /// in place but are no longer indexed.
    pub(crate) fn initialize(&mut self, seed: &str) -> RecordResult<()> {
        debug!("initializing record store (seed {seed:?})");
        self.write_index(&IdentifierIndex::new())
    }

    /// Writes the record under its id, then appends the id to the index.
    ///
    /// The two writes are not atomic: if the index cannot be read or written
    /// the record stays stored but unindexed.
    pub(crate) fn create(&mut self, record: TransactionRecord) -> RecordResult<()> {
        let id = record.id().clone();
        let bytes = serde_json::to_vec(&record).map_err(StoreError::from)?;
        self.store.put(id.as_str(), bytes)?;

        let mut index = self.read_index()?;
        index.append(id.clone());
        self.write_index(&index)?;

        debug!(
            "created record {id}: {} ({}) -> {} ({}), amount {:?} as {:?}, {} indexed",
            record.sender_name(),
            record.sender_country(),
            record.receiver_name(),
            record.receiver_country(),
            record.amount(),
            record.get_amount(),
            index.ids().len()
        );
        Ok(())
    }

    pub(crate) fn fetch(&self, id: &TransactionId) -> RecordResult<TransactionRecord> {
        let bytes = self
            .store
            .get(id.as_str())?
            .ok_or_else(|| RecordStoreError::NotFound(id.clone()))?;

        serde_json::from_slice(&bytes).map_err(|source| RecordStoreError::CorruptRecord {
            id: id.clone(),
            source,
        })
    }

    /// Every indexed record, in index order
    pub(crate) fn list(&self) -> RecordResult<Vec<TransactionRecord>> {
        self.read_index()?
            .ids()
            .iter()
            .map(|id| self.fetch(id))
            .collect()
    }

    pub(crate) fn index(&self) -> RecordResult<IdentifierIndex> {
        self.read_index()
    }

    pub(crate) fn ping(&self) -> &'static str {
        GREETING
    }

    fn read_index(&self) -> RecordResult<IdentifierIndex> {
        let bytes = self
            .store
            .get(INDEX_KEY)?
            .ok_or(RecordStoreError::Uninitialized)?;
        serde_json::from_slice(&bytes).map_err(RecordStoreError::CorruptIndex)
    }

    fn write_index(&mut self, index: &IdentifierIndex) -> RecordResult<()> {
        let bytes = serde_json::to_vec(index).map_err(StoreError::from)?;
        self.store.put(INDEX_KEY, bytes)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn backing(&self) -> &S {
        &self.store
    }
}
