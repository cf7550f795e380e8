//! Liveness handler

use axum::Json;

use crate::http::types::OkResponse;

/// Liveness check
pub async fn ping() -> Json<OkResponse> {
    Json(OkResponse::ok())
}
