//! ffmpeg-backed fast-start remuxing.
//!
//! Rewrites a container's metadata layout to the front of the file so
//! playback can begin before the full file downloads. Stream copy only; the
//! encoded stream data is untouched.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use reelvault_core::IngestError;

use crate::tool::validate_tool_path;

const OUTPUT_SUFFIX: &str = ".processing.mp4";

/// Produces a fast-start-optimized copy of a local media file.
///
/// The input must be fully flushed to disk before calling; the remuxer
/// reads it by path, not through the caller's open handle.
#[async_trait]
pub trait Remuxer: Send + Sync {
    async fn remux(&self, input: &Path) -> Result<PathBuf, IngestError>;
}

/// `Remuxer` backed by an external `ffmpeg` process in stream-copy mode.
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> Result<Self, IngestError> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self { ffmpeg_path })
    }
}

/// Output path for a remuxed copy, alongside the input.
fn output_path_for(input: &Path) -> PathBuf {
    let mut path = input.as_os_str().to_owned();
    path.push(OUTPUT_SUFFIX);
    PathBuf::from(path)
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self, input), fields(input = %input.display()))]
    async fn remux(&self, input: &Path) -> Result<PathBuf, IngestError> {
        let output_path = output_path_for(input);

        let output = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                IngestError::Remux(format!("failed to execute {}: {}", self.ffmpeg_path, e))
            })?;

        if !output.status.success() {
            return Err(IngestError::Remux(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        tracing::debug!(output = %output_path.display(), "remuxed for fast start");
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_is_next_to_input() {
        let output = output_path_for(Path::new("/tmp/ingest/input.mp4"));
        assert_eq!(
            output,
            PathBuf::from("/tmp/ingest/input.mp4.processing.mp4")
        );
    }

    #[test]
    fn test_remuxer_rejects_unsafe_tool_path() {
        assert!(FfmpegRemuxer::new("ffmpeg").is_ok());
        assert!(FfmpegRemuxer::new("ffmpeg && reboot").is_err());
    }
}
