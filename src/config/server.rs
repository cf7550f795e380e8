//! HTTP listener configuration

use serde::{Deserialize, Serialize};

/// Default listen port when neither the config file nor `PORT` sets one
pub const DEFAULT_PORT: u16 = 3000;

/// Maximum accepted JSON request body (20 MiB)
pub const DEFAULT_JSON_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (e.g., "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enable permissive CORS (useful when the UI is served from another origin)
    #[serde(default)]
    pub cors_enabled: bool,
    /// Maximum size of JSON request bodies in bytes
    #[serde(default = "default_json_body_limit")]
    pub json_body_limit: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_json_body_limit() -> usize {
    DEFAULT_JSON_BODY_LIMIT
}

impl ServerConfig {
    /// Socket address string in `host:port` form
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            cors_enabled: false,
            json_body_limit: DEFAULT_JSON_BODY_LIMIT,
        }
    }
}
