//! Configuration for mediashelf

mod logging;
mod search;
mod server;
mod storage;

pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use search::{SearchConfig, DEFAULT_SEARCH_ENDPOINT};
pub use server::{ServerConfig, DEFAULT_JSON_BODY_LIMIT, DEFAULT_PORT};
pub use storage::{StorageConfig, DEFAULT_MAX_UPLOAD_BYTES};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding `server.port`
pub const PORT_ENV: &str = "PORT";

/// Environment variable supplying `search.api_key`
pub const API_KEY_ENV: &str = "YT_API_KEY";

/// Upper bound the YouTube search API accepts for `maxResults`
const MAX_SEARCH_RESULTS: u32 = 50;

/// Main configuration for the media server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// On-disk layout
    #[serde(default)]
    pub storage: StorageConfig,
    /// Video search proxy configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Not validated here; call [`Config::validate`] once overrides are applied.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        Ok(config)
    }

    /// Apply `PORT` and `YT_API_KEY` overrides.
    ///
    /// `lookup` is usually `|k| std::env::var(k).ok()`; tests pass a map.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV) {
            let port = port.trim();
            if !port.is_empty() {
                self.server.port = port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("{} must be a port number, got '{}'", PORT_ENV, port))?;
            }
        }
        if let Some(key) = lookup(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.search.api_key = Some(key);
            }
        }
        Ok(())
    }

    /// Validate all configuration fields.
    ///
    /// Collects every problem and reports them together.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.server.port == 0 {
            errors.push("server port must be between 1 and 65535".to_string());
        }
        if self.server.host.trim().is_empty() {
            errors.push("server host must not be empty".to_string());
        }
        if self.server.json_body_limit == 0 {
            errors.push("json_body_limit must be positive".to_string());
        }

        if self.storage.data_dir.as_os_str().is_empty() {
            errors.push("data_dir must not be empty".to_string());
        }
        if self.storage.images_dir.as_os_str().is_empty() {
            errors.push("images_dir must not be empty".to_string());
        }
        if self.storage.index_file.trim().is_empty() {
            errors.push("index_file must not be empty".to_string());
        }
        if self.storage.max_upload_bytes == 0 {
            errors.push("max_upload_bytes must be positive".to_string());
        }

        if self.search.max_results == 0 || self.search.max_results > MAX_SEARCH_RESULTS {
            errors.push(format!(
                "search max_results must be between 1 and {}, got {}",
                MAX_SEARCH_RESULTS, self.search.max_results
            ));
        }
        if self.search.timeout_secs == 0 {
            errors.push("search timeout_secs must be positive".to_string());
        }
        if url::Url::parse(&self.search.endpoint).is_err() {
            errors.push(format!("search endpoint is not a valid URL: '{}'", self.search.endpoint));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}
