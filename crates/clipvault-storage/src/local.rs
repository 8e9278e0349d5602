use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use clipvault_core::LOCAL_BUCKET;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::fs;

type HmacSha256 = Hmac<Sha256>;

/// Local filesystem storage implementation
///
/// Objects live at `{base_path}/{bucket}/{key}`. Access URLs point at the
/// API's `/media` route and carry an HMAC-SHA256 signature over bucket, key
/// and expiry, so they behave like presigned object-store URLs.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    bucket: String,
    signing_secret: Vec<u8>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/clipvault/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8091/media")
    /// * `signing_secret` - Key for access URL signatures
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        signing_secret: impl Into<Vec<u8>>,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
            bucket: LOCAL_BUCKET.to_string(),
            signing_secret: signing_secret.into(),
        })
    }

    /// Convert bucket and key to a filesystem path with security validation
    ///
    /// Rejects anything that could escape the base storage directory.
    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        if bucket.is_empty() || bucket.contains('/') || bucket.contains('\\') || bucket == ".." {
            return Err(StorageError::InvalidKey(format!("Invalid bucket: {bucket}")));
        }
        if key.is_empty() || key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }
        let relative = Path::new(key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(self.base_path.join(bucket).join(relative))
    }

    fn signature(&self, bucket: &str, key: &str, expires: u64) -> StorageResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.signing_secret)
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;
        mac.update(bucket.as_bytes());
        mac.update(b"\n");
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(&expires.to_be_bytes());
        Ok(mac)
    }

    fn url_for(&self, bucket: &str, key: &str, expires: u64) -> StorageResult<String> {
        let signature = hex::encode(self.signature(bucket, key, expires)?.finalize().into_bytes());
        let encoded_key = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Ok(format!(
            "{}/{}/{}?expires={}&signature={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(bucket),
            encoded_key,
            expires,
            signature
        ))
    }

    /// Check a signed access request and resolve the object path.
    ///
    /// `now` is seconds since the Unix epoch.
    pub fn verify_access_at(
        &self,
        bucket: &str,
        key: &str,
        expires: u64,
        signature: &str,
        now: u64,
    ) -> StorageResult<PathBuf> {
        let provided = hex::decode(signature)
            .map_err(|_| StorageError::AccessDenied("Malformed signature".to_string()))?;
        self.signature(bucket, key, expires)?
            .verify_slice(&provided)
            .map_err(|_| StorageError::AccessDenied("Invalid signature".to_string()))?;

        if now > expires {
            return Err(StorageError::AccessDenied("Link has expired".to_string()));
        }

        self.object_path(bucket, key)
    }

    /// Check a signed access request against the current time.
    pub fn verify_access(
        &self,
        bucket: &str,
        key: &str,
        expires: u64,
        signature: &str,
    ) -> StorageResult<PathBuf> {
        self.verify_access_at(bucket, key, expires, signature, unix_now())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[async_trait]
impl Storage for LocalStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        _content_type: &str,
    ) -> StorageResult<u64> {
        let dest = self.object_path(bucket, key)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }

        let start = std::time::Instant::now();

        let size = fs::copy(path, &dest).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Local storage upload failed"
            );
            StorageError::UploadFailed(format!(
                "Failed to copy {} to {}: {}",
                path.display(),
                dest.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %dest.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(size)
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.object_path(bucket, key)?;
        let expires = unix_now().saturating_add(expires_in.as_secs());
        self.url_for(bucket, key, expires)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
