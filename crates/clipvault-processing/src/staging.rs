//! Temp staging area
//!
//! Every staged file is a uniquely named temp file owned by one request. The
//! file is deleted when its [`StagedFile`] is dropped, so early returns,
//! errors and unwinding all clean up without explicit calls.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::error::StageError;

const PREFIX: &str = "clipvault-";

/// Directory that staged uploads are written to.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create an empty staged file, e.g. as the output of a remux.
    pub fn allocate(&self, suffix: &str) -> Result<StagedFile, StageError> {
        let file = tempfile::Builder::new()
            .prefix(PREFIX)
            .suffix(suffix)
            .tempfile_in(&self.dir)?;
        Ok(StagedFile {
            path: file.into_temp_path(),
        })
    }

    /// Write `body` to a new staged file, failing as soon as more than
    /// `max_bytes` have been received.
    pub async fn stage<S, E>(&self, body: S, max_bytes: u64) -> Result<StagedFile, StageError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let staged = self.allocate(".mp4")?;
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(staged.path())
            .await?;

        let mut body = std::pin::pin!(body);
        let mut received: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| StageError::Body(e.to_string()))?;
            received += chunk.len() as u64;
            if received > max_bytes {
                tracing::debug!(
                    path = %staged.path().display(),
                    limit = max_bytes,
                    "Upload exceeded size limit while staging"
                );
                return Err(StageError::TooLarge { limit: max_bytes });
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        tracing::debug!(
            path = %staged.path().display(),
            size_bytes = received,
            "Upload staged"
        );

        Ok(staged)
    }
}

/// Request-scoped temp file, removed on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now, reporting removal failures.
    pub fn release(self) -> Result<(), StageError> {
        self.path.close()?;
        Ok(())
    }
}
