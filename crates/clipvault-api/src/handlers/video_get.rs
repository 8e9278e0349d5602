use crate::auth::bearer_token;
use crate::error::HttpAppError;
use crate::services::sign_record;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use clipvault_core::AppError;
use futures::future::try_join_all;
use std::sync::Arc;

#[tracing::instrument(skip(state, headers), fields(video_id = %video_id, operation = "get_video"))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpAppError> {
    let authorized = state
        .ingest
        .authorize(&video_id, bearer_token(&headers))
        .await?;

    let response = sign_record(
        state.storage.as_ref(),
        authorized.record,
        state.video_url_ttl,
    )
    .await?;

    Ok(Json(response))
}

#[tracing::instrument(skip(state, headers), fields(operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpAppError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
    let user_id = state.tokens.verify(token)?;

    let records = state.records.list_videos_for_user(user_id).await?;
    let responses = try_join_all(
        records
            .into_iter()
            .map(|record| sign_record(state.storage.as_ref(), record, state.video_url_ttl)),
    )
    .await?;

    tracing::debug!(user_id = %user_id, count = responses.len(), "Listed videos");

    Ok(Json(responses))
}
