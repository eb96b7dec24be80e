mod dispatch;
mod file_store;
mod index;
mod record_store;
mod store;
mod transaction;

pub(crate) use self::{
    dispatch::{OperationRegistry, Response},
    file_store::FileStore,
    record_store::RecordStore,
    store::{KeyValueStore, MemoryStore},
};
