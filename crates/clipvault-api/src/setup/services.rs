//! Service wiring

use anyhow::{Context, Result};
use clipvault_core::Config;
use clipvault_db::{MediaRecordStore, VideoRepository};
use clipvault_processing::{FfmpegRemuxer, FfprobeProbe, StagingArea};
use clipvault_storage::{KeyDeriver, LocalStorage, Storage};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{JwtAuth, TokenVerifier};
use crate::services::{IngestSettings, VideoIngestService};
use crate::state::AppState;

/// Build the application state from its connected dependencies.
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
    local_storage: Option<Arc<LocalStorage>>,
) -> Result<Arc<AppState>> {
    let records: Arc<dyn MediaRecordStore> = Arc::new(VideoRepository::new(pool));
    let tokens: Arc<dyn TokenVerifier> =
        Arc::new(JwtAuth::new(config.jwt_secret(), config.jwt_issuer()));

    let remuxer = FfmpegRemuxer::new(config.ffmpeg_path()).context("Invalid FFMPEG_PATH")?;
    let probe = FfprobeProbe::new(config.ffprobe_path()).context("Invalid FFPROBE_PATH")?;

    let staging_dir = config.staging_dir();
    std::fs::create_dir_all(&staging_dir).with_context(|| {
        format!("Failed to create staging directory {}", staging_dir.display())
    })?;

    let ingest = VideoIngestService::new(
        records.clone(),
        tokens.clone(),
        storage.clone(),
        Arc::new(remuxer),
        Arc::new(probe),
        KeyDeriver::default(),
        StagingArea::new(staging_dir.clone()),
        IngestSettings {
            max_video_size_bytes: config.max_video_size_bytes(),
            video_content_type: config.video_content_type().to_string(),
        },
    );

    tracing::info!(
        staging_dir = %staging_dir.display(),
        max_video_size_bytes = config.max_video_size_bytes(),
        video_url_ttl_secs = config.video_url_ttl_secs(),
        "Services initialized"
    );

    Ok(Arc::new(AppState {
        ingest,
        records,
        tokens,
        storage,
        local_storage,
        video_url_ttl: Duration::from_secs(config.video_url_ttl_secs()),
        video_content_type: config.video_content_type().to_string(),
    }))
}
