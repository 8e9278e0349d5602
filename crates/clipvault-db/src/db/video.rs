use async_trait::async_trait;
use clipvault_core::models::MediaRecord;
use clipvault_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Access to video metadata records.
///
/// The ingestion pipeline only reads a record and updates its locator; the
/// locator write is a single-column update so a failed write leaves the
/// previous value intact.
#[async_trait]
pub trait MediaRecordStore: Send + Sync {
    async fn get_video(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError>;

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<MediaRecord>, AppError>;

    /// Replace the stored locator, returning the updated record.
    async fn update_video_locator(&self, id: Uuid, locator: &str) -> Result<MediaRecord, AppError>;

    /// Round-trip to the backing store, used by readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaRecordStore for VideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, MediaRecord>(
            "SELECT id, user_id, title, description, video_url, created_at, updated_at \
             FROM videos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", user_id = %user_id))]
    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<MediaRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, MediaRecord>(
            "SELECT id, user_id, title, description, video_url, created_at, updated_at \
             FROM videos WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn update_video_locator(&self, id: Uuid, locator: &str) -> Result<MediaRecord, AppError> {
        let record = sqlx::query_as::<Postgres, MediaRecord>(
            "UPDATE videos SET video_url = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, user_id, title, description, video_url, created_at, updated_at",
        )
        .bind(id)
        .bind(locator)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
