use crate::auth::bearer_token;
use crate::constants::VIDEO_FIELD;
use crate::error::HttpAppError;
use crate::services::ingest::NoBody;
use crate::services::{sign_record, UploadedFile};
use crate::state::AppState;
use crate::utils::upload::multipart_error;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use clipvault_core::{AppError, VideoResponse};
use std::sync::Arc;

/// Upload the video for an existing record.
///
/// Authorization runs before any of the body is read. The first `video` field
/// is streamed through the ingestion pipeline; other fields are ignored.
#[tracing::instrument(skip(state, headers, multipart), fields(video_id = %video_id, operation = "upload_video"))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let authorized = state
        .ingest
        .authorize(&video_id, bearer_token(&headers))
        .await?;

    let mut multipart = multipart.map_err(|e| {
        AppError::InvalidInput(format!("Expected a multipart/form-data body: {}", e.body_text()))
    })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(String::from);
        let record = state
            .ingest
            .ingest_authorized(
                authorized,
                Some(UploadedFile {
                    content_type,
                    body: field,
                }),
            )
            .await?;

        return Ok(Json(respond(&state, record).await));
    }

    let record = state
        .ingest
        .ingest_authorized::<NoBody, _>(authorized, None)
        .await?;
    Ok(Json(respond(&state, record).await))
}

/// The upload already succeeded, so a signing failure degrades to no URL
/// instead of failing the request.
async fn respond(state: &AppState, record: clipvault_core::MediaRecord) -> VideoResponse {
    let fallback = record.clone();
    match sign_record(state.storage.as_ref(), record, state.video_url_ttl).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, video_id = %fallback.id, "Failed to sign uploaded video URL");
            VideoResponse::from_record(fallback, None)
        }
    }
}
