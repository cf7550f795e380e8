//! Flat-file record persistence
//!
//! A collection lives in a single JSON array file that is read and rewritten
//! whole on every operation. There is no schema beyond "array of objects".

mod file;
mod id;
mod memory;

pub use file::JsonFileStore;
pub use id::{IdGenerator, SequentialIdGenerator, TimestampIdGenerator};
pub use memory::MemoryStore;

use std::path::PathBuf;
use thiserror::Error;

/// An open-schema document; the only field the server cares about is `id`.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Errors raised when persisting a collection
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Whole-collection read/write primitive.
///
/// `read` never fails: missing or corrupt data reads as an empty collection.
/// `write` replaces the entire collection.
pub trait RecordStore: Send + Sync {
    fn read(&self) -> Vec<Record>;

    fn write(&self, records: &[Record]) -> Result<(), StoreError>;

    /// Human-readable location for log lines
    fn location(&self) -> String;
}

impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    fn read(&self) -> Vec<Record> {
        (**self).read()
    }

    fn write(&self, records: &[Record]) -> Result<(), StoreError> {
        (**self).write(records)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}
