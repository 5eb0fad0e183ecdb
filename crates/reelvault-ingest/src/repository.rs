//! Abstraction for the video metadata store.
//!
//! The store owns the record's schema and queries; the pipeline performs a
//! single read-then-write per ingestion call through this seam.

use async_trait::async_trait;
use uuid::Uuid;

use reelvault_core::Video;

/// Metadata store operations consumed by the ingestion pipeline.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch a video record by id, or `None` if it does not exist.
    async fn get_video(&self, id: Uuid) -> anyhow::Result<Option<Video>>;

    /// Persist an updated video record.
    async fn update_video(&self, video: &Video) -> anyhow::Result<()>;
}
