//! Video and media route groups.

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

/// Record read routes plus the upload route, which alone accepts large bodies.
pub fn video_routes(upload_body_limit: usize) -> Router<Arc<AppState>> {
    let upload = Router::new()
        .route(
            &format!("{}/videos/{{video_id}}/upload", API_PREFIX),
            post(handlers::video_upload::upload_video),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(upload_body_limit));

    Router::new()
        .route(&format!("{}/videos", API_PREFIX), get(handlers::video_get::list_videos))
        .route(
            &format!("{}/videos/{{video_id}}", API_PREFIX),
            get(handlers::video_get::get_video),
        )
        .merge(upload)
}

/// Signed downloads for the local storage backend.
pub fn media_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/media/{bucket}/{*key}",
        get(handlers::local_media::serve_local_media),
    )
}
