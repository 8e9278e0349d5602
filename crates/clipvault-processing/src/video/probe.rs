use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::validate_tool_path;
use crate::error::ProcessingError;

/// Reports the display aspect ratio of a video as `W:H`.
#[async_trait]
pub trait GeometryProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<String, ProcessingError>;
}

#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    ffprobe_path: String,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>) -> Result<Self, ProcessingError> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffprobe_path)?;
        Ok(Self { ffprobe_path })
    }
}

#[async_trait]
impl GeometryProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<String, ProcessingError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ProcessingError::ToolUnavailable {
                tool: "ffprobe",
                source,
            })?;

        if !output.status.success() {
            return Err(ProcessingError::ToolFailed {
                tool: "ffprobe",
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let ratio = ratio_from_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            ratio = %ratio,
            "Video probe completed"
        );

        Ok(ratio)
    }
}

/// Extract the ratio string from ffprobe's JSON output.
///
/// Prefers the stream's `display_aspect_ratio`; falls back to width:height
/// reduced by their greatest common divisor.
pub fn ratio_from_probe_output(stdout: &[u8]) -> Result<String, ProcessingError> {
    let invalid = |message: &str| ProcessingError::InvalidOutput {
        tool: "ffprobe",
        message: message.to_string(),
    };

    let probe_data: serde_json::Value =
        serde_json::from_slice(stdout).map_err(|e| invalid(&e.to_string()))?;

    let stream = probe_data["streams"]
        .get(0)
        .ok_or_else(|| invalid("No video stream found"))?;

    if let Some(dar) = stream["display_aspect_ratio"].as_str() {
        if parse_ratio(dar).is_some() {
            return Ok(dar.to_string());
        }
    }

    let width = stream["width"]
        .as_u64()
        .filter(|w| *w > 0)
        .ok_or_else(|| invalid("Could not parse width"))?;
    let height = stream["height"]
        .as_u64()
        .filter(|h| *h > 0)
        .ok_or_else(|| invalid("Could not parse height"))?;

    let divisor = gcd(width, height);
    Ok(format!("{}:{}", width / divisor, height / divisor))
}

/// `W:H` with both sides positive integers.
fn parse_ratio(ratio: &str) -> Option<(u64, u64)> {
    let (w, h) = ratio.split_once(':')?;
    let w: u64 = w.parse().ok()?;
    let h: u64 = h.parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
