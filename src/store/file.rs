//! JSON array file store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{Record, RecordStore, StoreError};

/// Collection persisted as a pretty-printed JSON array at `path`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonFileStore {
    fn read(&self) -> Vec<Record> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet, treating as empty", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read {}: {}. Treating as empty.", self.path.display(), e);
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        // `null` decodes to None and reads as empty, like a blank file
        match serde_json::from_str::<Option<Vec<Record>>>(&content) {
            Ok(records) => records.unwrap_or_default(),
            Err(e) => {
                warn!(
                    "Corrupt collection file {}: {}. Treating as empty.",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    fn write(&self, records: &[Record]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(records)?;
        std::fs::write(&self.path, data).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
