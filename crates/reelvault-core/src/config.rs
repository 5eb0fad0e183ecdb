//! Configuration module
//!
//! All ingestion settings live in an explicit `IngestConfig` passed into the
//! orchestrator at construction; there is no process-wide mutable state.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Validity window for presigned retrieval URLs. Fixed at 15 minutes from
/// issuance; not environment-configurable.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(15 * 60);

const DEFAULT_S3_REGION: &str = "us-east-1";
const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
const DEFAULT_FFPROBE_PATH: &str = "ffprobe";
const DEFAULT_STORAGE_OP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONCURRENT_TRANSCODES: usize = 4;

/// Ingestion pipeline configuration.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub s3_bucket: String,
    pub s3_region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, Spaces, ...).
    pub s3_endpoint: Option<String>,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub signed_url_ttl: Duration,
    /// Upper bound applied to every upload and signing call so a hung
    /// object-store request cannot block the pipeline indefinitely.
    pub storage_op_timeout: Duration,
    /// Bound on concurrent external-process invocations (probe + remux).
    pub max_concurrent_transcodes: usize,
}

impl IngestConfig {
    /// Config with defaults for everything except the bucket name.
    pub fn new(s3_bucket: impl Into<String>) -> Self {
        Self {
            s3_bucket: s3_bucket.into(),
            s3_region: DEFAULT_S3_REGION.to_string(),
            s3_endpoint: None,
            ffmpeg_path: DEFAULT_FFMPEG_PATH.to_string(),
            ffprobe_path: DEFAULT_FFPROBE_PATH.to_string(),
            signed_url_ttl: SIGNED_URL_TTL,
            storage_op_timeout: Duration::from_secs(DEFAULT_STORAGE_OP_TIMEOUT_SECS),
            max_concurrent_transcodes: DEFAULT_MAX_CONCURRENT_TRANSCODES,
        }
    }

    /// Load configuration from environment variables. `S3_BUCKET` is
    /// required; everything else falls back to defaults.
    pub fn from_env() -> Result<Self> {
        let s3_bucket = env::var("S3_BUCKET").context("S3_BUCKET must be set")?;

        let mut config = Self::new(s3_bucket);
        if let Ok(region) = env::var("S3_REGION") {
            config.s3_region = region;
        }
        config.s3_endpoint = env::var("S3_ENDPOINT").ok();
        if let Ok(path) = env::var("FFMPEG_PATH") {
            config.ffmpeg_path = path;
        }
        if let Ok(path) = env::var("FFPROBE_PATH") {
            config.ffprobe_path = path;
        }
        if let Ok(raw) = env::var("STORAGE_OP_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .context("STORAGE_OP_TIMEOUT_SECS must be an integer")?;
            config.storage_op_timeout = Duration::from_secs(secs);
        }
        if let Ok(raw) = env::var("MAX_CONCURRENT_TRANSCODES") {
            config.max_concurrent_transcodes = raw
                .parse()
                .context("MAX_CONCURRENT_TRANSCODES must be an integer")?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::new("videos");
        assert_eq!(config.s3_bucket, "videos");
        assert_eq!(config.s3_region, "us-east-1");
        assert_eq!(config.s3_endpoint, None);
        assert_eq!(config.ffmpeg_path, "ffmpeg");
        assert_eq!(config.ffprobe_path, "ffprobe");
        assert_eq!(config.signed_url_ttl, Duration::from_secs(900));
        assert_eq!(config.storage_op_timeout, Duration::from_secs(30));
        assert_eq!(config.max_concurrent_transcodes, 4);
    }
}
