//! On-disk layout: collection files, uploaded images, static assets

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum size of a single uploaded image (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

const LIBRARY_FILE_NAME: &str = "library.json";
const JOURNAL_FILE_NAME: &str = "journal.json";

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `library.json` and `journal.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory uploaded images are written to and served from
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
    /// Root of the static assets served at `/`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Document served for `GET /`
    #[serde(default = "default_index_file")]
    pub index_file: String,
    /// Per-file upload cap in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_index_file() -> String {
    "hi.html".to_string()
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl StorageConfig {
    pub fn library_path(&self) -> PathBuf {
        self.data_dir.join(LIBRARY_FILE_NAME)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.data_dir.join(JOURNAL_FILE_NAME)
    }

    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join(&self.index_file)
    }

    /// Create the data and images directories if they do not exist yet
    pub fn ensure_dirs(&self) -> Result<()> {
        create_dir(&self.data_dir)?;
        create_dir(&self.images_dir)?;
        Ok(())
    }
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory '{}'", path.display()))
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            images_dir: default_images_dir(),
            static_dir: default_static_dir(),
            index_file: default_index_file(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
