use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::validate_tool_path;
use crate::error::ProcessingError;

/// Rewrites a container so its index sits before the media data.
#[async_trait]
pub trait Remuxer: Send + Sync {
    async fn remux(&self, input: &Path, output: &Path) -> Result<(), ProcessingError>;
}

/// Remuxes with `ffmpeg -c copy -movflags faststart`; streams are not re-encoded.
#[derive(Debug, Clone)]
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> Result<Self, ProcessingError> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self { ffmpeg_path })
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, input: &Path, output: &Path) -> Result<(), ProcessingError> {
        let start = std::time::Instant::now();

        let result = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4", "-y"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ProcessingError::ToolUnavailable {
                tool: "ffmpeg",
                source,
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            tracing::error!(
                status = %result.status,
                stderr = %stderr,
                duration_ms = start.elapsed().as_millis(),
                "FFmpeg remux failed"
            );
            return Err(ProcessingError::ToolFailed {
                tool: "ffmpeg",
                status: result.status.to_string(),
                stderr,
            });
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            "FFmpeg remux completed"
        );

        Ok(())
    }
}
