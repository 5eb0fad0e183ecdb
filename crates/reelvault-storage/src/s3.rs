use crate::traits::{ObjectStorage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{
    Attribute, Attributes, ObjectStore, PutOptions, PutPayload, Result as ObjectResult,
};
use std::future::Future;
use std::time::Duration;

/// S3 object storage scoped to one bucket.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    /// Bound applied to every upload and signing call; elapsing maps to
    /// `StorageError::Timeout`.
    op_timeout: Duration,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible
    ///   providers (e.g., "http://localhost:9000" for MinIO)
    /// * `op_timeout` - Per-operation timeout for uploads and signing
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        op_timeout: Duration,
    ) -> StorageResult<Self> {
        // Build AmazonS3 object store from environment and explicit settings.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            op_timeout,
        })
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> StorageResult<ObjectResult<T>>
    where
        F: Future<Output = ObjectResult<T>>,
    {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| StorageError::Timeout {
                operation,
                timeout_secs: self.op_timeout.as_secs(),
            })
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        let size = data.len() as u64;
        let bytes = Bytes::from(data);
        let location = Path::from(key.to_string());

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());

        let start = std::time::Instant::now();

        let result = self
            .bounded(
                "upload",
                self.store
                    .put_opts(&location, PutPayload::from(bytes), PutOptions::from(attributes)),
            )
            .await?;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let location = Path::from(key.to_string());

        let url_result = self
            .bounded(
                "signing",
                self.store.signed_url(Method::GET, &location, expires_in),
            )
            .await?;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "S3 presign failed"
                );
                StorageError::SigningFailed(e.to_string())
            })?
            .to_string();

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Credential resolution is deferred until the first request, so the
    // store builds fine in tests without AWS credentials configured.
    fn storage(op_timeout: Duration) -> S3Storage {
        S3Storage::new(
            "test-bucket".to_string(),
            "us-east-1".to_string(),
            None,
            op_timeout,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_bounded_elapses_to_timeout() {
        let storage = storage(Duration::from_millis(10));
        let err = storage
            .bounded("upload", std::future::pending::<ObjectResult<()>>())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Timeout {
                operation: "upload",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_bounded_passes_through_a_completed_operation() {
        let storage = storage(Duration::from_secs(5));
        let inner = storage
            .bounded("signing", std::future::ready(ObjectResult::Ok(7u32)))
            .await
            .unwrap();
        assert_eq!(inner.unwrap(), 7);
    }
}
