//! In-memory stand-ins for the database, tools, object store and entropy.

use async_trait::async_trait;
use clipvault_core::{AppError, MediaRecord, StorageBackend};
use clipvault_db::MediaRecordStore;
use clipvault_processing::{GeometryProbe, ProcessingError, Remuxer};
use clipvault_storage::{EntropySource, KeyError, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<HashMap<Uuid, MediaRecord>>,
    fail_updates: AtomicBool,
}

impl InMemoryRecordStore {
    pub fn insert(&self, record: MediaRecord) {
        self.records.lock().unwrap().insert(record.id, record);
    }

    pub fn get(&self, id: Uuid) -> Option<MediaRecord> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaRecordStore for InMemoryRecordStore {
    async fn get_video(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        Ok(self.get(id))
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<MediaRecord>, AppError> {
        let mut records: Vec<MediaRecord> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn update_video_locator(&self, id: Uuid, locator: &str) -> Result<MediaRecord, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;
        record.video_url = Some(locator.to_string());
        record.updated_at = chrono::Utc::now();
        Ok(record.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Copies input to output, or fails like a crashed ffmpeg.
pub struct FakeRemuxer {
    pub fail: bool,
}

#[async_trait]
impl Remuxer for FakeRemuxer {
    async fn remux(&self, input: &Path, output: &Path) -> Result<(), ProcessingError> {
        if self.fail {
            return Err(ProcessingError::ToolFailed {
                tool: "ffmpeg",
                status: "exit status: 1".to_string(),
                stderr: "moov atom not found".to_string(),
            });
        }
        tokio::fs::copy(input, output)
            .await
            .map_err(|source| ProcessingError::ToolUnavailable {
                tool: "ffmpeg",
                source,
            })?;
        Ok(())
    }
}

/// Reports a fixed ratio, or fails like a crashed ffprobe when `None`.
pub struct FakeProbe {
    pub ratio: Option<&'static str>,
}

#[async_trait]
impl GeometryProbe for FakeProbe {
    async fn probe(&self, path: &Path) -> Result<String, ProcessingError> {
        assert!(path.exists(), "probe must run against an existing file");
        self.ratio
            .map(String::from)
            .ok_or_else(|| ProcessingError::ToolFailed {
                tool: "ffprobe",
                status: "exit status: 1".to_string(),
                stderr: "Invalid data found when processing input".to_string(),
            })
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object store that keeps uploads in memory and signs with a fake query.
pub struct MemoryStorage {
    bucket: String,
    objects: Mutex<Vec<StoredObject>>,
    fail_uploads: AtomicBool,
}

impl MemoryStorage {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Mutex::new(Vec::new()),
            fail_uploads: AtomicBool::new(false),
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }

    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "connection reset by peer".to_string(),
            ));
        }
        let bytes = tokio::fs::read(path).await?;
        let size = bytes.len() as u64;
        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            bytes,
            content_type: content_type.to_string(),
        });
        Ok(size)
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(format!(
            "https://{}.example/{}?X-Amz-Expires={}",
            bucket,
            key,
            expires_in.as_secs()
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Fills every key id with the same byte.
pub struct FixedEntropy(pub u8);

impl EntropySource for FixedEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), KeyError> {
        buf.fill(self.0);
        Ok(())
    }
}
