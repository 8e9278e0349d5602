//! Clipvault Processing Library
//!
//! Request-scoped staging of uploaded bytes on local disk, plus the two
//! external tool boundaries of the ingestion pipeline: the container remuxer
//! (`ffmpeg`) and the geometry probe (`ffprobe`).

pub mod error;
pub mod staging;
pub mod video;

pub use error::{ProcessingError, StageError};
pub use staging::{StagedFile, StagingArea};
pub use video::{FfmpegRemuxer, FfprobeProbe, GeometryProbe, Remuxer};
