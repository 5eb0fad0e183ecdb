//! Content-type validation for uploads.

use crate::error::IngestError;

/// The only content type accepted for video ingestion.
pub const VIDEO_MP4: &str = "video/mp4";

/// Split a media type value into its `(type, subtype)` pair, discarding
/// `;`-separated parameters. `None` when the value is not a two-part
/// media type. Single point of truth for the split; used by both content
/// validation and extension derivation.
pub fn split_media_type(raw: &str) -> Option<(&str, &str)> {
    let essence = raw.split(';').next().unwrap_or_default().trim();
    let mut parts = essence.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(kind), Some(subtype), None) if !kind.is_empty() && !subtype.is_empty() => {
            Some((kind, subtype))
        }
        _ => None,
    }
}

/// Parse a media type header value into its lowercased essence
/// (`type/subtype`), discarding any `;`-separated parameters.
pub fn parse_media_type(raw: &str) -> Result<String, IngestError> {
    match split_media_type(raw) {
        Some((kind, subtype))
            if !kind.contains(char::is_whitespace)
                && !subtype.contains(char::is_whitespace) =>
        {
            Ok(format!("{}/{}", kind, subtype).to_ascii_lowercase())
        }
        _ => Err(IngestError::BadInput(format!(
            "unparseable content type: {:?}",
            raw
        ))),
    }
}

/// Validate that a declared content type is `video/mp4`, returning the
/// normalized essence.
pub fn ensure_video_mp4(raw: &str) -> Result<String, IngestError> {
    let essence = parse_media_type(raw)?;
    if essence != VIDEO_MP4 {
        return Err(IngestError::BadInput(format!(
            "unsupported content type: {}",
            essence
        )));
    }
    Ok(essence)
}
