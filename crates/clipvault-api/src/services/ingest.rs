//! Video ingestion pipeline
//!
//! Turns an authorized upload into a persisted locator:
//! stage → remux → probe/classify → derive key → upload → encode → persist.
//! Every temp file lives in a [`StagedFile`], so whichever step fails, the
//! files created so far are removed on the way out.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use clipvault_core::{AppError, Locator, MediaRecord, ShapeClass};
use clipvault_db::MediaRecordStore;
use clipvault_processing::{GeometryProbe, Remuxer, StagedFile, StagingArea};
use clipvault_storage::{KeyDeriver, Storage};
use futures::Stream;
use uuid::Uuid;

use crate::auth::TokenVerifier;
use crate::utils::upload::normalize_mime_type;

/// Limits applied to every upload.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub max_video_size_bytes: u64,
    pub video_content_type: String,
}

/// Upload body and its declared content type.
pub struct UploadedFile<S> {
    pub content_type: Option<String>,
    pub body: S,
}

/// A record the caller has been verified to own.
#[derive(Debug, Clone)]
pub struct AuthorizedRecord {
    pub record: MediaRecord,
    pub user_id: Uuid,
}

/// Body type for requests that carried no upload.
pub type NoBody = futures::stream::Empty<Result<Bytes, std::io::Error>>;

#[derive(Clone)]
pub struct VideoIngestService {
    records: Arc<dyn MediaRecordStore>,
    tokens: Arc<dyn TokenVerifier>,
    storage: Arc<dyn Storage>,
    remuxer: Arc<dyn Remuxer>,
    probe: Arc<dyn GeometryProbe>,
    keys: KeyDeriver,
    staging: StagingArea,
    settings: IngestSettings,
}

impl VideoIngestService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        records: Arc<dyn MediaRecordStore>,
        tokens: Arc<dyn TokenVerifier>,
        storage: Arc<dyn Storage>,
        remuxer: Arc<dyn Remuxer>,
        probe: Arc<dyn GeometryProbe>,
        keys: KeyDeriver,
        staging: StagingArea,
        settings: IngestSettings,
    ) -> Self {
        Self {
            records,
            tokens,
            storage,
            remuxer,
            probe,
            keys,
            staging,
            settings,
        }
    }

    /// Check the request against the record without touching the body.
    ///
    /// In order: record id format, bearer token, record existence, ownership.
    #[tracing::instrument(skip(self, bearer), fields(video_id = %record_id))]
    pub async fn authorize(
        &self,
        record_id: &str,
        bearer: Option<&str>,
    ) -> Result<AuthorizedRecord, AppError> {
        let id = Uuid::parse_str(record_id)
            .map_err(|_| AppError::InvalidInput(format!("Invalid video id: {}", record_id)))?;

        let token = bearer
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
        let user_id = self.tokens.verify(token)?;

        let record = self
            .records
            .get_video(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        if !record.is_owned_by(user_id) {
            tracing::warn!(video_id = %id, user_id = %user_id, "Video access denied");
            return Err(AppError::Forbidden(
                "You do not have access to this video".to_string(),
            ));
        }

        Ok(AuthorizedRecord { record, user_id })
    }

    /// Run the pipeline for an authorized record and persist the new locator.
    #[tracing::instrument(
        skip(self, authorized, file),
        fields(video_id = %authorized.record.id, user_id = %authorized.user_id)
    )]
    pub async fn ingest_authorized<S, E>(
        &self,
        authorized: AuthorizedRecord,
        file: Option<UploadedFile<S>>,
    ) -> Result<MediaRecord, AppError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let start = Instant::now();
        let video_id = authorized.record.id;

        let file = file.ok_or_else(|| {
            AppError::InvalidInput("No video file provided in field 'video'".to_string())
        })?;

        let declared = file
            .content_type
            .as_deref()
            .map(normalize_mime_type)
            .unwrap_or_default();
        if declared != self.settings.video_content_type {
            return Err(AppError::InvalidInput(format!(
                "Unsupported content type '{}', expected {}",
                declared, self.settings.video_content_type
            )));
        }

        let staged = self
            .staging
            .stage(file.body, self.settings.max_video_size_bytes)
            .await?;
        let remuxed = self.staging.allocate(".mp4")?;

        self.remuxer
            .remux(staged.path(), remuxed.path())
            .await
            .map_err(|e| AppError::processing("Couldn't process video", e))?;
        release(staged, "staged");

        let ratio = self
            .probe
            .probe(remuxed.path())
            .await
            .map_err(|e| AppError::processing("Couldn't get video ratio", e))?;
        let shape = ShapeClass::from_ratio(&ratio);

        let key = self.keys.derive(shape)?.to_string();
        let bucket = self.storage.bucket().to_string();

        tracing::debug!(ratio = %ratio, shape = %shape, storage_key = %key, "Video classified");

        let size_bytes = self
            .storage
            .upload_file(&bucket, &key, remuxed.path(), &self.settings.video_content_type)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let locator =
            Locator::encode(&bucket, &key).map_err(|e| AppError::Storage(e.to_string()))?;
        let updated = self.records.update_video_locator(video_id, &locator).await?;
        release(remuxed, "remuxed");

        tracing::info!(
            video_id = %video_id,
            user_id = %authorized.user_id,
            storage_key = %key,
            shape = %shape,
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video ingested"
        );

        Ok(updated)
    }

    /// Authorize, then ingest.
    pub async fn ingest<S, E>(
        &self,
        record_id: &str,
        bearer: Option<&str>,
        file: Option<UploadedFile<S>>,
    ) -> Result<MediaRecord, AppError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let authorized = self.authorize(record_id, bearer).await?;
        self.ingest_authorized(authorized, file).await
    }
}

fn release(file: StagedFile, stage: &'static str) {
    let path = file.path().to_path_buf();
    if let Err(e) = file.release() {
        tracing::warn!(error = %e, path = %path.display(), stage = stage, "Failed to remove staged file");
    }
}
