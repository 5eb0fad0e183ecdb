//! Validation for external tool paths.

use reelvault_core::IngestError;

/// Reject tool paths containing shell metacharacters or traversal
/// sequences before they are ever handed to `Command`.
pub(crate) fn validate_tool_path(path: &str) -> Result<(), IngestError> {
    if path.is_empty() {
        return Err(IngestError::Internal(
            "tool path must not be empty".to_string(),
        ));
    }

    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(IngestError::Internal(format!(
            "tool path contains dangerous characters: {}",
            path
        )));
    }

    if path.contains("..") {
        return Err(IngestError::Internal(format!(
            "tool path contains directory traversal: {}",
            path
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_names_and_paths() {
        assert!(validate_tool_path("ffprobe").is_ok());
        assert!(validate_tool_path("/usr/local/bin/ffmpeg").is_ok());
    }

    #[test]
    fn test_rejects_metacharacters() {
        assert!(validate_tool_path("ffprobe; rm -rf /").is_err());
        assert!(validate_tool_path("ffmpeg|cat").is_err());
        assert!(validate_tool_path("$(ffmpeg)").is_err());
    }

    #[test]
    fn test_rejects_traversal_and_empty() {
        assert!(validate_tool_path("../ffmpeg").is_err());
        assert!(validate_tool_path("").is_err());
    }
}
