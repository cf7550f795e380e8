//! HTTP API Server Module
//!
//! JSON API for the library and journal collections, image uploads and
//! gallery, the video search proxy, and static asset serving.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::create_router;
pub use server::{BindError, HttpServer};
