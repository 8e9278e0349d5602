//! External video tool boundaries.

mod probe;
mod remux;

pub use probe::{ratio_from_probe_output, FfprobeProbe, GeometryProbe};
pub use remux::{FfmpegRemuxer, Remuxer};

use crate::error::ProcessingError;

/// Reject tool paths that could be interpreted by a shell.
fn validate_tool_path(path: &str) -> Result<(), ProcessingError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() || path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(ProcessingError::InvalidPath(format!(
            "Tool path contains dangerous characters: {}",
            path
        )));
    }
    if path.contains("..") {
        return Err(ProcessingError::InvalidPath(format!(
            "Tool path contains directory traversal: {}",
            path
        )));
    }
    Ok(())
}
