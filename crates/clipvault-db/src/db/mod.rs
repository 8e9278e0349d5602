//! Database repositories for data access layer
//
// Video metadata records
pub mod video;
//
pub use video::{MediaRecordStore, VideoRepository};
