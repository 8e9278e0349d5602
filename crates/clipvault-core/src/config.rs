//! Configuration module
//!
//! Environment-driven settings for the API server, the database pool, the
//! object store, and the ingestion pipeline.

use std::env;
use std::path::PathBuf;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_ISSUER: &str = "clipvault-access";
const MAX_VIDEO_SIZE_BYTES: u64 = 1 << 30;
const VIDEO_CONTENT_TYPE: &str = "video/mp4";
const VIDEO_URL_TTL_SECS: u64 = 300;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub environment: String,
}

/// Video ingestion configuration
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub local_storage_signing_secret: Option<String>,
    // Pipeline configuration
    pub max_video_size_bytes: u64,
    pub video_content_type: String,
    pub video_url_ttl_secs: u64,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub staging_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IngestConfig>);

impl Config {
    fn as_ingest(&self) -> &IngestConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_ingest().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IngestConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_ingest().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_ingest().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_ingest().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_ingest().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_ingest().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_ingest().base.jwt_secret
    }

    pub fn jwt_issuer(&self) -> &str {
        &self.as_ingest().base.jwt_issuer
    }

    pub fn environment(&self) -> &str {
        &self.as_ingest().base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.as_ingest().database_url
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_ingest().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_ingest().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_ingest().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_ingest().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_ingest().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_ingest().local_storage_base_url.as_deref()
    }

    /// Secret used to sign local media URLs; falls back to the JWT secret.
    pub fn local_storage_signing_secret(&self) -> &str {
        self.as_ingest()
            .local_storage_signing_secret
            .as_deref()
            .unwrap_or(&self.as_ingest().base.jwt_secret)
    }

    pub fn max_video_size_bytes(&self) -> u64 {
        self.as_ingest().max_video_size_bytes
    }

    pub fn video_content_type(&self) -> &str {
        &self.as_ingest().video_content_type
    }

    pub fn video_url_ttl_secs(&self) -> u64 {
        self.as_ingest().video_url_ttl_secs
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.as_ingest().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.as_ingest().ffprobe_path
    }

    /// Directory for staged uploads; the system temp dir when unset.
    pub fn staging_dir(&self) -> PathBuf {
        self.as_ingest()
            .staging_dir
            .clone()
            .unwrap_or_else(env::temp_dir)
    }

    /// Bucket name recorded in locators for the active backend.
    pub fn bucket(&self) -> Option<&str> {
        match self.storage_backend() {
            StorageBackend::S3 => self.s3_bucket(),
            StorageBackend::Local => Some(crate::storage_types::LOCAL_BUCKET),
        }
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| JWT_ISSUER.to_string()),
            environment,
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::S3,
        };

        let config = IngestConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            local_storage_signing_secret: env::var("LOCAL_STORAGE_SIGNING_SECRET").ok(),
            max_video_size_bytes: env::var("MAX_VIDEO_SIZE_BYTES")
                .unwrap_or_else(|_| MAX_VIDEO_SIZE_BYTES.to_string())
                .parse()
                .unwrap_or(MAX_VIDEO_SIZE_BYTES),
            video_content_type: env::var("VIDEO_CONTENT_TYPE")
                .unwrap_or_else(|_| VIDEO_CONTENT_TYPE.to_string())
                .trim()
                .to_lowercase(),
            video_url_ttl_secs: env::var("VIDEO_URL_TTL_SECS")
                .unwrap_or_else(|_| VIDEO_URL_TTL_SECS.to_string())
                .parse()
                .unwrap_or(VIDEO_URL_TTL_SECS),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            staging_dir: env::var("STAGING_DIR").ok().map(PathBuf::from),
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if is_production_env(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_VIDEO_SIZE_BYTES must be greater than 0"));
        }

        if self.video_url_ttl_secs == 0 {
            return Err(anyhow::anyhow!("VIDEO_URL_TTL_SECS must be greater than 0"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                let bucket = self.s3_bucket.as_deref().unwrap_or_default();
                if bucket.is_empty() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                // The bucket is one half of a comma-joined locator
                if bucket.contains(',') {
                    return Err(anyhow::anyhow!("S3_BUCKET must not contain ','"));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
