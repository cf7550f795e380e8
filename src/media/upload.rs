//! Image upload persistence
//!
//! Each upload is written under a fresh name of the form
//! `<unix millis>-<random 0..=1e9><ext>`, keeping the original extension or
//! falling back to `.png`. Files are never overwritten or deduplicated.

use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use super::public_url;

/// Extension used when the client's filename has none
pub const DEFAULT_EXTENSION: &str = ".png";

const MAX_RANDOM_SUFFIX: u32 = 1_000_000_000;

/// Errors raised while storing an upload
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file exceeds the {limit} byte upload limit")]
    TooLarge { limit: u64 },
    #[error("failed to write upload: {0}")]
    Io(#[from] std::io::Error),
}

/// A successfully stored image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub file_name: String,
    pub path: PathBuf,
    pub url: String,
    pub size: u64,
}

/// Generate a unique storage name for an upload originally called `original`
pub fn generate_filename(original: Option<&str>) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = rand::thread_rng().gen_range(0..=MAX_RANDOM_SUFFIX);
    format_filename(millis, suffix, original)
}

fn format_filename(millis: i64, suffix: u32, original: Option<&str>) -> String {
    format!("{}-{}{}", millis, suffix, extension_of(original))
}

/// `.ext` of the original name, or the default when it has none
fn extension_of(original: Option<&str>) -> String {
    original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        // "name." has an empty extension; it gets the default, not a bare "."
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Destination directory for uploads, with the per-file size cap
#[derive(Debug, Clone)]
pub struct UploadDir {
    dir: PathBuf,
    max_bytes: u64,
}

impl UploadDir {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Create the destination file for a new upload
    pub async fn begin(&self, original_name: Option<&str>) -> Result<PendingUpload, UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let file_name = generate_filename(original_name);
        let path = self.dir.join(&file_name);
        let file = File::create(&path).await?;
        Ok(PendingUpload {
            file,
            file_name,
            path,
            written: 0,
            max_bytes: self.max_bytes,
        })
    }
}

/// An upload being streamed to disk
#[derive(Debug)]
pub struct PendingUpload {
    file: File,
    file_name: String,
    path: PathBuf,
    written: u64,
    max_bytes: u64,
}

impl PendingUpload {
    /// Append a chunk, failing once the size cap would be exceeded
    pub async fn push(&mut self, chunk: &[u8]) -> Result<(), UploadError> {
        let len = chunk.len() as u64;
        if self.written + len > self.max_bytes {
            return Err(UploadError::TooLarge {
                limit: self.max_bytes,
            });
        }
        self.file.write_all(chunk).await?;
        self.written += len;
        Ok(())
    }

    /// Flush to disk and return the stored image
    pub async fn finish(mut self) -> Result<StoredImage, UploadError> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(StoredImage {
            url: public_url(&self.file_name),
            file_name: self.file_name,
            path: self.path,
            size: self.written,
        })
    }

    /// Discard the partial file
    pub async fn abort(self) {
        drop(self.file);
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            warn!("Failed to remove partial upload {}: {}", self.path.display(), e);
        }
    }
}
