//! HTTP API Route Definitions
//!
//! JSON API under `/api`, uploads at `/upload`, uploaded images under
//! `/images`, and everything else from the static root.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::Uri,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use super::handlers::{self, AppState};
use crate::collection::Collection;
use crate::config::Config;
use crate::media::IMAGES_URL_PREFIX;

/// Room for multipart framing on top of the per-file cap
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// CRUD routes for one collection mounted at `prefix`
fn collection_routes(prefix: &str, collection: Arc<Collection>) -> Router {
    Router::new()
        .route(
            prefix,
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            &format!("{}/:id", prefix),
            put(handlers::update_record).delete(handlers::delete_record),
        )
        .with_state(collection)
}

/// Point directory requests at the default document inside that directory
async fn directory_index(State(index_file): State<Arc<str>>, mut request: Request) -> Request {
    let path = request.uri().path();
    if !path.ends_with('/') {
        return request;
    }

    let rewritten = match request.uri().query() {
        Some(query) => format!("{}{}?{}", path, index_file, query),
        None => format!("{}{}", path, index_file),
    };
    if let Ok(uri) = rewritten.parse::<Uri>() {
        *request.uri_mut() = uri;
    }
    request
}

/// Static assets, with `index_file` as every directory's default document
fn static_routes(config: &Config) -> Router {
    let storage = &config.storage;
    let index_file: Arc<str> = storage.index_file.as_str().into();
    Router::new()
        .fallback_service(ServeDir::new(&storage.static_dir).append_index_html_on_directories(false))
        .layer(middleware::map_request_with_state(index_file, directory_index))
}

/// Create the full application router
pub fn create_router(state: AppState, config: &Config) -> Router {
    let json_limit = DefaultBodyLimit::max(config.server.json_body_limit);
    let upload_limit = usize::try_from(
        config
            .storage
            .max_upload_bytes
            .saturating_add(MULTIPART_OVERHEAD_BYTES),
    )
    .unwrap_or(usize::MAX);

    let api = Router::new()
        .route("/api/ping", get(handlers::ping))
        .route("/api/images", get(handlers::list_gallery))
        .route("/api/search-youtube", get(handlers::search_youtube))
        .with_state(state.clone())
        .merge(collection_routes("/api/library", state.library.clone()))
        .merge(collection_routes("/api/journal", state.journal.clone()))
        .layer(json_limit);

    let upload = Router::new()
        .route("/upload", post(handlers::upload_image))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state.clone());

    Router::new()
        .merge(api)
        .merge(upload)
        .nest_service(IMAGES_URL_PREFIX, ServeDir::new(state.uploads.dir()))
        .merge(static_routes(config))
}
