//! Storage key derivation.
//!
//! Key format: `{shape}/{id}` where `id` is [`KEY_ID_BYTES`] fresh random bytes
//! encoded as unpadded URL-safe base64 (43 characters). Keys are derived
//! without any counter, clock or registry, so uniqueness is probabilistic.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use base64::Engine;
use clipvault_core::{AppError, ShapeClass};
use rand::rngs::OsRng;
use rand::TryRngCore;

/// Number of random bytes behind every key id.
pub const KEY_ID_BYTES: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Entropy source failed: {0}")]
    Entropy(String),
}

impl From<KeyError> for AppError {
    fn from(err: KeyError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Source of cryptographically secure random bytes.
pub trait EntropySource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<(), KeyError>;
}

/// Reads from the operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), KeyError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| KeyError::Entropy(e.to_string()))
    }
}

/// Object key an upload is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    shape: ShapeClass,
    id: String,
}

impl StorageKey {
    pub fn shape(&self) -> ShapeClass {
        self.shape
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.shape.as_str(), self.id)
    }
}

/// Builds fresh storage keys from a shape and random bytes.
#[derive(Clone)]
pub struct KeyDeriver {
    entropy: Arc<dyn EntropySource>,
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new(Arc::new(OsEntropy))
    }
}

impl KeyDeriver {
    pub fn new(entropy: Arc<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    /// Derive a new key for `shape`. Fails only if the entropy source fails.
    pub fn derive(&self, shape: ShapeClass) -> Result<StorageKey, KeyError> {
        let mut bytes = [0u8; KEY_ID_BYTES];
        self.entropy.fill(&mut bytes)?;
        let id = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);
        Ok(StorageKey { shape, id })
    }
}
