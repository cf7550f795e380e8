//! HTTP error mapping
//!
//! Every handler failure becomes a JSON body with an `error` field.

use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{BytesRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use super::types::{ErrorResponse, UpstreamErrorResponse};
use crate::collection::CollectionError;
use crate::media::UploadError;

/// Generic message for failures whose details stay in the log
pub const GENERIC_FAILURE: &str = "failed";

/// Errors returned from HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("upstream error {status}")]
    BadGateway {
        message: String,
        status: u16,
        body: Option<String>,
    },
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a multipart parsing failure, keeping the body-limit status
    pub fn from_multipart(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge("File too large".to_string())
        } else {
            Self::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        Self::BadRequest(err.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(err: BytesRejection) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge("Request body too large".to_string())
        } else {
            Self::BadRequest(err.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::BadGateway {
                message,
                status: upstream,
                body,
            } => (
                status,
                Json(UpstreamErrorResponse {
                    error: message,
                    status: upstream,
                    body,
                }),
            )
                .into_response(),
            Self::BadRequest(message)
            | Self::NotFound(message)
            | Self::PayloadTooLarge(message)
            | Self::Internal(message) => (status, Json(ErrorResponse::new(message))).into_response(),
        }
    }
}

impl From<CollectionError> for ApiError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::NotFound(_) => Self::NotFound("Not found".to_string()),
            CollectionError::NotAnObject(_) => Self::BadRequest(err.to_string()),
            CollectionError::Store(e) => {
                error!("Failed to persist collection: {}", e);
                Self::Internal("failed to persist collection".to_string())
            }
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::TooLarge { .. } => Self::PayloadTooLarge("File too large".to_string()),
            UploadError::Io(e) => {
                error!("Failed to store upload: {}", e);
                Self::Internal(GENERIC_FAILURE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn collection_errors_map_to_statuses() {
        let not_found: ApiError = CollectionError::NotFound("9".to_string()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Not found");

        let bad: ApiError = CollectionError::NotAnObject("an array").into();
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);

        let store: ApiError =
            CollectionError::Store(StoreError::Unavailable("disk full".to_string())).into();
        assert_eq!(store.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!store.to_string().contains("disk full"));
    }

    #[test]
    fn upload_errors_map_to_statuses() {
        let too_large: ApiError = UploadError::TooLarge { limit: 10 }.into();
        assert_eq!(too_large.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        let io: ApiError = UploadError::Io(std::io::Error::other("denied")).into();
        assert_eq!(io.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(io.to_string(), "failed");
    }

    #[test]
    fn bad_gateway_carries_upstream_status() {
        let err = ApiError::BadGateway {
            message: "YouTube API error".to_string(),
            status: 403,
            body: None,
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
