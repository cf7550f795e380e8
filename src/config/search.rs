//! Video search proxy configuration

use serde::{Deserialize, Serialize};

/// Upstream YouTube Data API search endpoint
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";

/// Video search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// YouTube Data API key (usually supplied via `YT_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Search endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Number of results requested from upstream
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_SEARCH_ENDPOINT.to_string()
}

fn default_max_results() -> u32 {
    8
}

fn default_timeout_secs() -> u64 {
    30
}

impl SearchConfig {
    /// The configured API key, treating an empty string as unset
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
