//! HTTP Server
//!
//! Axum-based HTTP server for the media API and static assets.

use std::future::Future;
use std::io;

use anyhow::{Context, Result};
use axum::http::Method;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;

use super::handlers::AppState;
use super::routes::create_router;

/// Failure to bind the listening socket
#[derive(Debug, Error)]
pub enum BindError {
    #[error("port {port} is already in use")]
    AddrInUse { port: u16 },
    #[error("failed to bind {addr}: {source}")]
    Other {
        addr: String,
        #[source]
        source: io::Error,
    },
}

/// HTTP server
pub struct HttpServer {
    config: Config,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: Config, state: AppState) -> Self {
        Self { config, state }
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener, BindError> {
        let addr = self.config.server.listen_addr();
        TcpListener::bind(&addr).await.map_err(|source| {
            if source.kind() == io::ErrorKind::AddrInUse {
                BindError::AddrInUse {
                    port: self.config.server.port,
                }
            } else {
                BindError::Other { addr, source }
            }
        })
    }

    /// Serve on `listener` until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut app = create_router(self.state, &self.config);

        if self.config.server.cors_enabled {
            let cors = CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers(Any)
                .allow_origin(Any);
            app = app.layer(cors);
        }

        app = app.layer(TraceLayer::new_for_http());

        info!(
            "Local image server running on http://localhost:{}",
            self.config.server.port
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server error")?;

        info!("HTTP server stopped");
        Ok(())
    }
}
