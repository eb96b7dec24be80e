use serde::{Deserialize, Serialize};

use super::transaction::TransactionId;

/// Well-known key the identifier index lives under
pub(crate) const INDEX_KEY: &str = "tranIDs";

/// Every transaction id created so far, in creation order.
///
/// Ids are appended without a uniqueness check, so creating the same id
/// twice lists it twice.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierIndex {
    #[serde(rename = "tranIDs")]
    ids: Vec<TransactionId>,
}

impl IdentifierIndex {
    pub(crate) fn new() -> Self {
        Self { ids: Vec::new() }
    }

    pub(crate) fn append(&mut self, id: TransactionId) {
        self.ids.push(id);
    }

    pub fn ids(&self) -> &[TransactionId] {
        &self.ids
    }
}
