//! Video search handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::error;

use super::AppState;
use crate::http::error::{ApiError, GENERIC_FAILURE};
use crate::http::types::SearchParams;
use crate::search::{SearchError, VideoSummary};

pub const MISSING_QUERY_MESSAGE: &str = "Missing query (q)";
pub const MISSING_API_KEY_MESSAGE: &str = "Missing YT_API_KEY on server. See README to add one.";
const MISSING_CLIENT_MESSAGE: &str = "Server missing fetch implementation";
const UPSTREAM_ERROR_MESSAGE: &str = "YouTube API error";

/// Proxy a search to YouTube
pub async fn search_youtube(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<VideoSummary>>, ApiError> {
    let Query(params) = params?;
    let query = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request(MISSING_QUERY_MESSAGE))?;
    let api_key = state
        .search_api_key
        .as_deref()
        .ok_or_else(|| ApiError::bad_request(MISSING_API_KEY_MESSAGE))?;
    let client = state
        .search_client
        .as_ref()
        .ok_or_else(|| ApiError::internal(MISSING_CLIENT_MESSAGE))?;

    match client.search(&query, api_key).await {
        Ok(items) => Ok(Json(items)),
        Err(SearchError::Upstream { status, body }) => {
            error!(
                "YouTube API returned error {}: {}",
                status,
                body.as_deref().unwrap_or("<unreadable body>")
            );
            Err(ApiError::BadGateway {
                message: UPSTREAM_ERROR_MESSAGE.to_string(),
                status,
                body,
            })
        }
        Err(e) => {
            error!("YouTube search failed: {}", e);
            Err(ApiError::internal(GENERIC_FAILURE))
        }
    }
}
