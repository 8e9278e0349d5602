//! Storage setup and initialization

use anyhow::Result;
use clipvault_core::{Config, StorageBackend};
use clipvault_storage::{create_local_storage, create_storage, LocalStorage, Storage};
use std::sync::Arc;

/// Setup the object store. The local backend is also returned concretely so
/// the `/media` route can verify its signed URLs.
pub async fn setup_storage(
    config: &Config,
) -> Result<(Arc<dyn Storage>, Option<Arc<LocalStorage>>)> {
    tracing::info!("Initializing storage...");

    let (storage, local): (Arc<dyn Storage>, Option<Arc<LocalStorage>>) =
        match config.storage_backend() {
            StorageBackend::Local => {
                let local = create_local_storage(config).await?;
                (local.clone(), Some(local))
            }
            StorageBackend::S3 => (create_storage(config).await?, None),
        };

    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %storage.bucket(),
        "Storage initialized successfully"
    );

    Ok((storage, local))
}
