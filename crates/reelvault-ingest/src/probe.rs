//! ffprobe-backed stream inspection.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use reelvault_core::IngestError;

use crate::tool::validate_tool_path;

/// Geometry of the first video stream. Derived per ingestion call, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub width: u32,
    pub height: u32,
}

/// Inspects a local media file and returns stream geometry.
#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<ProbeResult, IngestError>;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<i64>,
    height: Option<i64>,
}

/// `MediaProber` backed by an external `ffprobe` process. One process per
/// probe, no retries; a probe failure is fatal to the ingestion call.
pub struct FfprobeProber {
    ffprobe_path: String,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<String>) -> Result<Self, IngestError> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffprobe_path)?;
        Ok(Self { ffprobe_path })
    }
}

/// Parse ffprobe's JSON output defensively: absence of `streams[0]` or of
/// positive dimensions is a probe failure, not a panic.
fn parse_probe_output(stdout: &[u8]) -> Result<ProbeResult, IngestError> {
    let parsed: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| IngestError::Probe(format!("malformed ffprobe output: {}", e)))?;

    let stream = parsed
        .streams
        .first()
        .ok_or_else(|| IngestError::Probe("no video stream found".to_string()))?;

    // Dimensions outside 1..=u32::MAX are probe failures, never wrapped.
    let width = stream
        .width
        .and_then(|w| u32::try_from(w).ok())
        .filter(|w| *w > 0)
        .ok_or_else(|| IngestError::Probe("stream has no positive width".to_string()))?;
    let height = stream
        .height
        .and_then(|h| u32::try_from(h).ok())
        .filter(|h| *h > 0)
        .ok_or_else(|| IngestError::Probe("stream has no positive height".to_string()))?;

    Ok(ProbeResult { width, height })
}

#[async_trait]
impl MediaProber for FfprobeProber {
    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    async fn probe(&self, path: &Path) -> Result<ProbeResult, IngestError> {
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
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                IngestError::Probe(format!("failed to execute {}: {}", self.ffprobe_path, e))
            })?;

        if !output.status.success() {
            return Err(IngestError::Probe(format!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let result = parse_probe_output(&output.stdout)?;
        tracing::debug!(
            width = result.width,
            height = result.height,
            "probed video stream"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_output() {
        let json = br#"{"streams":[{"width":1920,"height":1080,"codec_name":"h264"}]}"#;
        let result = parse_probe_output(json).unwrap();
        assert_eq!(
            result,
            ProbeResult {
                width: 1920,
                height: 1080
            }
        );
    }

    #[test]
    fn test_parse_no_streams() {
        let err = parse_probe_output(br#"{"streams":[]}"#).unwrap_err();
        assert!(matches!(err, IngestError::Probe(_)));

        let err = parse_probe_output(br#"{}"#).unwrap_err();
        assert!(matches!(err, IngestError::Probe(_)));
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_probe_output(b"not json at all").unwrap_err();
        assert!(matches!(err, IngestError::Probe(_)));
    }

    #[test]
    fn test_parse_missing_or_invalid_dimensions() {
        let err = parse_probe_output(br#"{"streams":[{"codec_name":"h264"}]}"#).unwrap_err();
        assert!(matches!(err, IngestError::Probe(_)));

        let err =
            parse_probe_output(br#"{"streams":[{"width":0,"height":1080}]}"#).unwrap_err();
        assert!(matches!(err, IngestError::Probe(_)));

        let err =
            parse_probe_output(br#"{"streams":[{"width":1920,"height":-1}]}"#).unwrap_err();
        assert!(matches!(err, IngestError::Probe(_)));

        // Values past u32 range fail the probe instead of wrapping.
        let err =
            parse_probe_output(br#"{"streams":[{"width":4294967296,"height":1080}]}"#)
                .unwrap_err();
        assert!(matches!(err, IngestError::Probe(_)));
    }

    #[test]
    fn test_prober_rejects_unsafe_tool_path() {
        assert!(FfprobeProber::new("ffprobe").is_ok());
        assert!(FfprobeProber::new("ffprobe; true").is_err());
    }
}
