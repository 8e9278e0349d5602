//! Serves objects of the local storage backend behind signed URLs.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use clipvault_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    pub expires: u64,
    pub signature: String,
}

#[tracing::instrument(skip(state, query), fields(bucket = %bucket, key = %key))]
pub async fn serve_local_media(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
    Query(query): Query<SignedQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let storage = state
        .local_storage
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    let path = storage.verify_access(&bucket, &key, query.expires, &query.signature)?;

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound("Object not found".to_string())
        } else {
            AppError::Storage(format!("Failed to open {}: {}", path.display(), e))
        }
    })?;
    let size = file
        .metadata()
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?
        .len();

    Ok((
        [
            (header::CONTENT_TYPE, state.video_content_type.clone()),
            (header::CONTENT_LENGTH, size.to_string()),
        ],
        Body::from_stream(ReaderStream::new(file)),
    ))
}
