//! Clipvault API Library
//!
//! HTTP surface of the video ingestion service: handlers, the ingestion
//! pipeline service, and application setup.

pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::VideoIngestService;
pub use state::AppState;
