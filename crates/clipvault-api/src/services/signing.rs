//! Read-path expansion of persisted locators into signed URLs.

use std::time::Duration;

use clipvault_core::{AppError, Locator, MediaRecord, VideoResponse};
use clipvault_storage::{Storage, StorageError};

/// Sign read access to the object behind `locator`, valid for `ttl`.
pub async fn sign_locator(
    storage: &dyn Storage,
    locator: &Locator,
    ttl: Duration,
) -> Result<String, StorageError> {
    storage
        .presigned_get_url(&locator.bucket, &locator.key, ttl)
        .await
}

/// Build the client view of `record`.
///
/// A missing or malformed locator yields `video_url: null`; a signing failure
/// is a storage error.
pub async fn sign_record(
    storage: &dyn Storage,
    record: MediaRecord,
    ttl: Duration,
) -> Result<VideoResponse, AppError> {
    let signed_url = match Locator::decode(record.video_url.as_deref()) {
        Some(locator) => Some(
            sign_locator(storage, &locator, ttl)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?,
        ),
        None => {
            if record.video_url.is_some() {
                tracing::warn!(video_id = %record.id, "Stored locator is malformed, treating as no video");
            }
            None
        }
    };

    Ok(VideoResponse::from_record(record, signed_url))
}
