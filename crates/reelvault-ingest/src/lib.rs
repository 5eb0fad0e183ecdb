//! ReelVault Ingest Library
//!
//! The video ingestion pipeline: probe → classify → remux → key-generate →
//! upload → persist-reference, plus the read path that exchanges a persisted
//! storage reference for a freshly signed URL.

pub mod aspect;
pub mod orchestrator;
pub mod probe;
pub mod remux;
pub mod repository;
mod tool;

// Re-export commonly used types
pub use orchestrator::{IngestOrchestrator, IngestStage};
pub use probe::{FfprobeProber, MediaProber, ProbeResult};
pub use remux::{FfmpegRemuxer, Remuxer};
pub use repository::VideoRepository;
