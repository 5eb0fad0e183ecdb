//! Error types module
//!
//! Every failure in the ingestion pipeline is represented by one variant of
//! `IngestError`. A stage failure aborts the remaining stages, triggers
//! temp-file cleanup and is surfaced to the caller as a single terminal
//! error; nothing is retried inside the pipeline.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Ownership mismatch. Never retried, surfaced to the caller immediately.
    #[error("forbidden: requester does not own the video")]
    Forbidden,

    /// Wrong or unparseable content type. Rejected before any side effects.
    #[error("bad input: {0}")]
    BadInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The external stream inspector exited non-zero, produced malformed
    /// output, or the file has no video stream.
    #[error("probe failed: {0}")]
    Probe(String),

    /// The external remux tool exited non-zero. There is no fallback to
    /// serving the un-remuxed file.
    #[error("remux failed: {0}")]
    Remux(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("signing failed: {0}")]
    Signing(String),

    /// The persisted storage reference violated the codec contract. Always
    /// fatal to the read path, never silently defaulted.
    #[error("malformed storage reference: {0}")]
    Format(String),

    /// Metadata store read or write failure.
    #[error("metadata store error: {0}")]
    Metadata(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IngestError {
    /// Machine-readable error code for callers that classify failures.
    pub fn error_code(&self) -> &'static str {
        match self {
            IngestError::Forbidden => "FORBIDDEN",
            IngestError::BadInput(_) => "BAD_INPUT",
            IngestError::NotFound(_) => "NOT_FOUND",
            IngestError::Probe(_) => "PROBE_FAILURE",
            IngestError::Remux(_) => "REMUX_FAILURE",
            IngestError::Upload(_) => "UPLOAD_FAILURE",
            IngestError::Signing(_) => "SIGNING_FAILURE",
            IngestError::Format(_) => "FORMAT_ERROR",
            IngestError::Metadata(_) => "METADATA_ERROR",
            IngestError::Io(_) => "IO_ERROR",
            IngestError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure was caused by the request rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IngestError::Forbidden | IngestError::BadInput(_) | IngestError::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(IngestError::Forbidden.error_code(), "FORBIDDEN");
        assert_eq!(
            IngestError::Remux("exit status 1".to_string()).error_code(),
            "REMUX_FAILURE"
        );
        assert_eq!(
            IngestError::Format("one field".to_string()).error_code(),
            "FORMAT_ERROR"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(IngestError::Forbidden.is_client_error());
        assert!(IngestError::BadInput("bad".to_string()).is_client_error());
        assert!(!IngestError::Upload("timed out".to_string()).is_client_error());
        assert!(!IngestError::Format("corrupt".to_string()).is_client_error());
    }
}
