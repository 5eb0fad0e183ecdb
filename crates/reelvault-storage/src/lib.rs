//! ReelVault Storage Library
//!
//! Object-storage abstraction and the S3 implementation used by the
//! ingestion pipeline, plus asset key generation.
//!
//! # Asset key format
//!
//! Keys are orientation-prefixed and collision-resistant:
//! `{landscape|portrait|other}/{base64url-token}{ext}`. Key generation is
//! centralized in the `keys` module; a key is unique per upload and never
//! reused.

pub mod keys;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use keys::generate_asset_key;
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
