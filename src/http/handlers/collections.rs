//! Collection handlers: list, create, update, delete
//!
//! Routed once per collection with that collection as router state.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::collection::Collection;
use crate::http::error::ApiError;
use crate::http::types::OkResponse;
use crate::store::Record;

/// Decode a request body; an empty body counts as `{}`
fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))
}

/// List every record
pub async fn list_records(State(collection): State<Arc<Collection>>) -> Json<Vec<Record>> {
    Json(collection.list())
}

/// Create a record, assigning an id if needed
pub async fn create_record(
    State(collection): State<Arc<Collection>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Record>, ApiError> {
    let body = parse_body(&body?)?;
    let record = collection.create(body)?;
    Ok(Json(record))
}

/// Merge the body into the record with the given id
pub async fn update_record(
    State(collection): State<Arc<Collection>>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Record>, ApiError> {
    let patch = parse_body(&body?)?;
    debug!("{}: update {}", collection.name(), id);
    let record = collection.update(&id, patch)?;
    Ok(Json(record))
}

/// Delete records with the given id; succeeds even if none matched
pub async fn delete_record(
    State(collection): State<Arc<Collection>>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    collection.delete(&id)?;
    Ok(Json(OkResponse::ok()))
}
