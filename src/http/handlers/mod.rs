//! HTTP API Request Handlers
//!
//! Collection CRUD, media upload and gallery, video search, liveness.

mod collections;
mod media;
mod search;
mod system;

use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::collection::Collection;
use crate::config::Config;
use crate::media::UploadDir;
use crate::search::YouTubeSearch;
use crate::store::{IdGenerator, JsonFileStore, TimestampIdGenerator};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<Collection>,
    pub journal: Arc<Collection>,
    pub uploads: Arc<UploadDir>,
    /// Server-held search credential
    pub search_api_key: Option<String>,
    /// Outbound client; `None` if it could not be built
    pub search_client: Option<Arc<YouTubeSearch>>,
}

impl AppState {
    /// Wire collections, upload directory and search client from config.
    ///
    /// Creates the data and images directories if they are missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = &config.storage;
        storage.ensure_dirs()?;

        let ids: Arc<dyn IdGenerator> = Arc::new(TimestampIdGenerator::new());

        let search_client = match YouTubeSearch::new(&config.search) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!("Video search disabled: {}", e);
                None
            }
        };

        Ok(Self {
            library: Arc::new(Collection::new(
                "library",
                JsonFileStore::new(storage.library_path()),
                ids.clone(),
            )),
            journal: Arc::new(Collection::new(
                "journal",
                JsonFileStore::new(storage.journal_path()),
                ids,
            )),
            uploads: Arc::new(UploadDir::new(&storage.images_dir, storage.max_upload_bytes)),
            search_api_key: config.search.api_key().map(str::to_string),
            search_client,
        })
    }
}

// Re-export all handlers
pub use collections::{create_record, delete_record, list_records, update_record};
pub use media::{list_gallery, upload_image, UPLOAD_FIELD};
pub use search::{search_youtube, MISSING_API_KEY_MESSAGE, MISSING_QUERY_MESSAGE};
pub use system::ping;
