//! Data models for the application

mod shape;
mod video;

pub use shape::ShapeClass;
pub use video::{MediaRecord, VideoResponse};
