//! ReelVault Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration and
//! the persisted storage-reference codec shared across all ReelVault crates.

pub mod config;
pub mod error;
pub mod models;
pub mod reference;
pub mod validation;

// Re-export commonly used types
pub use config::IngestConfig;
pub use error::IngestError;
pub use models::{Orientation, Video};
pub use reference::StorageReference;
