//! Clipvault Core Library
//!
//! Domain models, error types, configuration and the locator codec shared by
//! every clipvault crate.

pub mod config;
pub mod error;
pub mod locator;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IngestConfig};
pub use error::{AppError, ErrorKind, ErrorMetadata, LogLevel};
pub use locator::{Locator, LocatorError};
pub use models::{MediaRecord, ShapeClass, VideoResponse};
pub use storage_types::{StorageBackend, LOCAL_BUCKET};
