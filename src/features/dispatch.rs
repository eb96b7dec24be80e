use std::collections::HashMap;

use thiserror::Error;

use super::record_store::{RecordStore, RecordStoreError};
use super::store::KeyValueStore;
use super::transaction::{TransactionError, TransactionId, TransactionRecord};

/// Broad class of a failed invocation, independent of which layer raised it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    Validation,
    Store,
    CorruptIndex,
    CorruptRecord,
    NotFound,
    UnknownOperation,
}

#[derive(Error, Debug)]
pub(crate) enum DispatchError {
    #[error("Received unknown function invocation: {0}")]
    UnknownOperation(String),

    #[error("Incorrect number of arguments for {operation}. Expecting {expected}, got {actual}")]
    WrongArity {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("Operation {0} is already registered")]
    DuplicateOperation(String),

    #[error("Operation name must not be empty")]
    EmptyOperationName,

    #[error("Invalid input - {0}")]
    InvalidInput(#[from] TransactionError),

    #[error(transparent)]
    Record(#[from] RecordStoreError),

    #[error("Unable to encode response - {0}")]
    Encoding(#[from] serde_json::Error),
}

impl DispatchError {
    pub(crate) fn kind(&self) -> ErrorKind {
        use RecordStoreError::*;

        match self {
            DispatchError::UnknownOperation(_) => ErrorKind::UnknownOperation,
            DispatchError::WrongArity { .. }
            | DispatchError::DuplicateOperation(_)
            | DispatchError::EmptyOperationName
            | DispatchError::InvalidInput(_) => ErrorKind::Validation,
            DispatchError::Encoding(_) => ErrorKind::Store,
            DispatchError::Record(e) => match e {
                Store(_) => ErrorKind::Store,
                Uninitialized | CorruptIndex(_) => ErrorKind::CorruptIndex,
                CorruptRecord { .. } => ErrorKind::CorruptRecord,
                NotFound(_) => ErrorKind::NotFound,
            },
        }
    }
}

type DispatchResult<T> = anyhow::Result<T, DispatchError>;

/// What an invocation hands back: nothing, or a byte payload
pub(crate) type Response = Option<Vec<u8>>;

type Handler<S> = fn(&mut RecordStore<S>, &[String]) -> DispatchResult<Response>;

struct Operation<S> {
    /// Exact argument count, `None` accepts any
    arity: Option<usize>,
    handler: Handler<S>,
}

/// Maps function names to typed handlers over a [`RecordStore`]
pub(crate) struct OperationRegistry<S> {
    operations: HashMap<String, Operation<S>>,
}

impl<S: KeyValueStore> OperationRegistry<S> {
    pub(crate) fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    /// Registry with every record store operation and its legacy alias
    pub(crate) fn with_defaults() -> DispatchResult<Self> {
        let mut registry = Self::new();
        for name in ["initialize", "init"] {
            registry.register(name, Some(1), initialize::<S>)?;
        }
        for name in ["create", "create_event"] {
            registry.register(name, Some(6), create::<S>)?;
        }
        for name in ["fetch", "query", "retrieve"] {
            registry.register(name, Some(1), fetch::<S>)?;
        }
        registry.register("list", Some(0), list::<S>)?;
        registry.register("index", Some(0), index::<S>)?;
        registry.register("ping", None, ping::<S>)?;
        Ok(registry)
    }

    pub(crate) fn register(
        &mut self,
        name: &str,
        arity: Option<usize>,
        handler: Handler<S>,
    ) -> DispatchResult<()> {
        if name.is_empty() {
            return Err(DispatchError::EmptyOperationName);
        }
        if self.operations.contains_key(name) {
            return Err(DispatchError::DuplicateOperation(name.to_owned()));
        }
        self.operations
            .insert(name.to_owned(), Operation { arity, handler });
        Ok(())
    }

    pub(crate) fn invoke(
        &self,
        records: &mut RecordStore<S>,
        function: &str,
        args: &[String],
    ) -> DispatchResult<Response> {
        info!("invoke is running {function}");

        let operation = self
            .operations
            .get(function)
            .ok_or_else(|| DispatchError::UnknownOperation(function.to_owned()))?;

        if let Some(expected) = operation.arity {
            if args.len() != expected {
                return Err(DispatchError::WrongArity {
                    operation: function.to_owned(),
                    expected,
                    actual: args.len(),
                });
            }
        }

        (operation.handler)(records, args)
    }
}

fn initialize<S: KeyValueStore>(records: &mut RecordStore<S>, args: &[String]) -> DispatchResult<Response> {
    records.initialize(&args[0])?;
    Ok(None)
}

fn create<S: KeyValueStore>(records: &mut RecordStore<S>, args: &[String]) -> DispatchResult<Response> {
    let record = TransactionRecord::new(
        TransactionId::new(args[0].as_str())?,
        &args[1],
        &args[2],
        &args[3],
        &args[4],
        &args[5],
    );
    records.create(record)?;
    Ok(None)
}

fn fetch<S: KeyValueStore>(records: &mut RecordStore<S>, args: &[String]) -> DispatchResult<Response> {
    let record = records.fetch(&TransactionId::new(args[0].as_str())?)?;
    Ok(Some(serde_json::to_vec(&record)?))
}

fn list<S: KeyValueStore>(records: &mut RecordStore<S>, _args: &[String]) -> DispatchResult<Response> {
    let all = records.list()?;
    Ok(Some(serde_json::to_vec(&all)?))
}

fn index<S: KeyValueStore>(records: &mut RecordStore<S>, _args: &[String]) -> DispatchResult<Response> {
    Ok(Some(serde_json::to_vec(&records.index()?)?))
}

fn ping<S: KeyValueStore>(records: &mut RecordStore<S>, _args: &[String]) -> DispatchResult<Response> {
    Ok(Some(records.ping().as_bytes().to_vec()))
}
