//! Application state shared by all handlers.

use std::sync::Arc;
use std::time::Duration;

use clipvault_db::MediaRecordStore;
use clipvault_storage::{LocalStorage, Storage};

use crate::auth::TokenVerifier;
use crate::services::VideoIngestService;

/// Only `Arc`s to immutable services and pooled clients; no per-request state.
#[derive(Clone)]
pub struct AppState {
    pub ingest: VideoIngestService,
    pub records: Arc<dyn MediaRecordStore>,
    pub tokens: Arc<dyn TokenVerifier>,
    pub storage: Arc<dyn Storage>,
    /// Present only when the local backend is active; serves `/media`.
    pub local_storage: Option<Arc<LocalStorage>>,
    pub video_url_ttl: Duration,
    pub video_content_type: String,
}
