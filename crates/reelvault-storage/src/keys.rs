//! Asset key generation.
//!
//! Key format: `{orientation_prefix}{token}{ext}` where the token is 32
//! CSPRNG bytes, base64 URL-safe encoded without padding. Pure naming
//! decision; no I/O beyond random-byte generation, so key generation is
//! testable without network access.

use base64::Engine;
use rand::Rng;
use reelvault_core::{validation, Orientation};

const TOKEN_BYTES: usize = 32;
const FALLBACK_EXT: &str = ".bin";

/// Generate a collision-resistant, orientation-prefixed storage key for a
/// new upload. Every call produces a fresh key; keys are never reused.
pub fn generate_asset_key(content_type: &str, orientation: Orientation) -> String {
    let mut rng = rand::rng();
    let random_bytes: Vec<u8> = (0..TOKEN_BYTES).map(|_| rng.random()).collect();
    let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes);

    format!(
        "{}{}{}",
        orientation.prefix(),
        token,
        extension_for(content_type)
    )
}

/// File extension derived from a content type's subtype (`video/mp4` →
/// `.mp4`). An unparseable content type yields a generic binary extension.
pub fn extension_for(content_type: &str) -> String {
    match validation::split_media_type(content_type) {
        Some((_, subtype)) => format!(".{}", subtype),
        None => FALLBACK_EXT.to_string(),
    }
}
