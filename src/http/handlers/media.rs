//! Media handlers: image upload and gallery listing

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::{error, info};

use super::AppState;
use crate::http::error::{ApiError, GENERIC_FAILURE};
use crate::http::types::UploadResponse;
use crate::media::{list_images, GalleryEntry};

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "image";

const NO_FILE_MESSAGE: &str = "No file";

/// Store the first `image` file field under a generated name
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    // Non-multipart requests simply carry no file
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::bad_request(NO_FILE_MESSAGE));
    };

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(ApiError::from_multipart)?
    {
        if field.name() != Some(UPLOAD_FIELD) || field.file_name().is_none() {
            continue;
        }

        let mut pending = state.uploads.begin(field.file_name()).await?;
        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if let Err(e) = pending.push(&chunk).await {
                        pending.abort().await;
                        return Err(e.into());
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    pending.abort().await;
                    return Err(ApiError::from_multipart(e));
                }
            }
        }

        let stored = pending.finish().await?;
        info!("Stored upload {} ({} bytes)", stored.file_name, stored.size);
        return Ok(Json(UploadResponse { url: stored.url }));
    }

    Err(ApiError::bad_request(NO_FILE_MESSAGE))
}

/// List images in the upload directory
pub async fn list_gallery(
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryEntry>>, ApiError> {
    list_images(state.uploads.dir()).map(Json).map_err(|e| {
        error!(
            "Failed to list images in {}: {}",
            state.uploads.dir().display(),
            e
        );
        ApiError::internal(GENERIC_FAILURE)
    })
}
