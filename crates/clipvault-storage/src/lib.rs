//! Clipvault Storage Library
//!
//! Object storage abstraction for uploaded videos, with S3 and local
//! filesystem backends, plus derivation of the keys objects are stored under.
//!
//! # Storage key format
//!
//! Every key is `{shape}/{id}` where `shape` is `landscape`, `portrait` or
//! `other` and `id` is 32 random bytes encoded as unpadded URL-safe base64.
//! Keys never contain `,`, `..` or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use clipvault_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use factory::create_local_storage;
pub use factory::create_storage;
pub use keys::{EntropySource, KeyDeriver, KeyError, OsEntropy, StorageKey, KEY_ID_BYTES};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
