//! Clipvault database layer
//!
//! PostgreSQL repositories built on sqlx.

pub mod db;

pub use db::{MediaRecordStore, VideoRepository};
