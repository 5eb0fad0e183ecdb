//! Persisted storage-reference codec.
//!
//! A `(bucket, key)` pair is stored on the video record as a single opaque
//! string, `"{bucket},{key}"`. The format is bit-exact: any consumer reading
//! the field directly must use this exact delimiter and two-field shape.

use crate::error::IngestError;

const DELIMITER: char = ',';

/// Identifies an uploaded object. Created once per successful upload and
/// immutable thereafter; decoded only when a signed URL must be minted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageReference {
    pub bucket: String,
    pub key: String,
}

impl StorageReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Encode to the persisted form. Fails fast with `Format` if either
    /// field is empty or contains the delimiter, rather than producing an
    /// undecodable reference.
    pub fn encode(&self) -> Result<String, IngestError> {
        if self.bucket.is_empty() || self.key.is_empty() {
            return Err(IngestError::Format(
                "bucket and key must be non-empty".to_string(),
            ));
        }
        if self.bucket.contains(DELIMITER) || self.key.contains(DELIMITER) {
            return Err(IngestError::Format(format!(
                "bucket and key must not contain '{}'",
                DELIMITER
            )));
        }
        Ok(format!("{}{}{}", self.bucket, DELIMITER, self.key))
    }

    /// Decode the persisted form. Anything other than exactly two non-empty
    /// fields indicates data corruption and fails with `Format`.
    pub fn decode(raw: &str) -> Result<Self, IngestError> {
        let mut parts = raw.split(DELIMITER);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(bucket), Some(key), None) if !bucket.is_empty() && !key.is_empty() => {
                Ok(Self::new(bucket, key))
            }
            _ => Err(IngestError::Format(format!(
                "expected '<bucket>{}<key>', got {:?}",
                DELIMITER, raw
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let reference = StorageReference::new("videos", "landscape/abc123.mp4");
        let encoded = reference.encode().unwrap();
        assert_eq!(encoded, "videos,landscape/abc123.mp4");
        assert_eq!(StorageReference::decode(&encoded).unwrap(), reference);
    }

    #[test]
    fn test_decode_rejects_extra_fields() {
        let err = StorageReference::decode("a,b,c").unwrap_err();
        assert!(matches!(err, IngestError::Format(_)));
    }

    #[test]
    fn test_decode_rejects_missing_delimiter() {
        let err = StorageReference::decode("onlyone").unwrap_err();
        assert!(matches!(err, IngestError::Format(_)));
    }

    #[test]
    fn test_decode_rejects_empty_fields() {
        assert!(StorageReference::decode(",key").is_err());
        assert!(StorageReference::decode("bucket,").is_err());
        assert!(StorageReference::decode("").is_err());
    }

    #[test]
    fn test_encode_rejects_delimiter_in_fields() {
        let err = StorageReference::new("buck,et", "key").encode().unwrap_err();
        assert!(matches!(err, IngestError::Format(_)));
        assert!(StorageReference::new("bucket", "a,b").encode().is_err());
    }

    #[test]
    fn test_encode_rejects_empty_fields() {
        assert!(StorageReference::new("", "key").encode().is_err());
        assert!(StorageReference::new("bucket", "").encode().is_err());
    }
}
