//! Object-storage abstraction trait
//!
//! This module defines the `ObjectStorage` trait the ingestion pipeline
//! uploads through and mints signed retrieval URLs from.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("{operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: &'static str,
        timeout_secs: u64,
    },

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable object storage scoped to a single bucket.
///
/// On a failed upload the key must not be assumed free to reuse; no
/// partial-object cleanup is performed here, and a retry must use a newly
/// generated key.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Bucket this gateway writes to. Fixed per deployment.
    fn bucket(&self) -> &str;

    /// Upload bytes under the given key with the content type set as
    /// object metadata.
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()>;

    /// Mint a retrieval URL valid for `expires_in`, without contacting the
    /// object itself. Signing a key for a nonexistent object succeeds; the
    /// URL fails only when dereferenced.
    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;
}
