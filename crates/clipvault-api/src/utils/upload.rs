//! Common utilities for the upload handler

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use clipvault_core::AppError;

/// Strip parameters from a MIME type and lower-case it.
///
/// `"Video/MP4; codecs=avc1"` becomes `"video/mp4"`.
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Map a multipart framing error to a client error.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}
