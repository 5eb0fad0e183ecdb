//! Video ingestion orchestration: buffer → probe → classify → remux →
//! upload → persist-reference, plus sign-on-read.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use reelvault_core::{validation, IngestConfig, IngestError, StorageReference, Video};
use reelvault_storage::{keys, ObjectStorage, StorageError};

use crate::aspect;
use crate::probe::{FfprobeProber, MediaProber};
use crate::remux::{FfmpegRemuxer, Remuxer};
use crate::repository::VideoRepository;

/// Linear per-call pipeline state. Each call advances through these in
/// order; any failure terminates the call at the stage reached, which is
/// included in the failure log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Received,
    OwnershipVerified,
    Buffered,
    Probed,
    Classified,
    Remuxed,
    Uploaded,
    Referenced,
    Persisted,
}

impl Display for IngestStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            IngestStage::Received => "received",
            IngestStage::OwnershipVerified => "ownership_verified",
            IngestStage::Buffered => "buffered",
            IngestStage::Probed => "probed",
            IngestStage::Classified => "classified",
            IngestStage::Remuxed => "remuxed",
            IngestStage::Uploaded => "uploaded",
            IngestStage::Referenced => "referenced",
            IngestStage::Persisted => "persisted",
        };
        write!(f, "{}", name)
    }
}

/// Sequences one upload from validated byte stream to persisted storage
/// reference, and exchanges persisted references for signed URLs on read.
///
/// Each call owns its temporary files exclusively; they live in a per-call
/// temp directory removed on every exit path. External-process invocations
/// are bounded by a fixed-size permit pool shared across calls.
pub struct IngestOrchestrator {
    repo: Arc<dyn VideoRepository>,
    storage: Arc<dyn ObjectStorage>,
    prober: Arc<dyn MediaProber>,
    remuxer: Arc<dyn Remuxer>,
    config: IngestConfig,
    transcode_permits: Arc<Semaphore>,
}

impl IngestOrchestrator {
    /// Orchestrator with ffprobe/ffmpeg-backed components from the config.
    pub fn new(
        repo: Arc<dyn VideoRepository>,
        storage: Arc<dyn ObjectStorage>,
        config: IngestConfig,
    ) -> Result<Self, IngestError> {
        let prober = Arc::new(FfprobeProber::new(&config.ffprobe_path)?);
        let remuxer = Arc::new(FfmpegRemuxer::new(&config.ffmpeg_path)?);
        Ok(Self::with_components(repo, storage, prober, remuxer, config))
    }

    /// Orchestrator with explicit prober/remuxer implementations.
    pub fn with_components(
        repo: Arc<dyn VideoRepository>,
        storage: Arc<dyn ObjectStorage>,
        prober: Arc<dyn MediaProber>,
        remuxer: Arc<dyn Remuxer>,
        config: IngestConfig,
    ) -> Self {
        let transcode_permits = Arc::new(Semaphore::new(config.max_concurrent_transcodes.max(1)));
        Self {
            repo,
            storage,
            prober,
            remuxer,
            config,
            transcode_permits,
        }
    }

    /// Ingest one video upload for its owner.
    ///
    /// On success the only persisted effect is the updated storage
    /// reference on the record; the returned copy carries a freshly signed
    /// URL in its place. On failure every temporary file created so far is
    /// removed and a single terminal error is surfaced.
    #[tracing::instrument(skip(self, body))]
    pub async fn ingest<R>(
        &self,
        owner_id: Uuid,
        video_id: Uuid,
        content_type: &str,
        body: R,
    ) -> Result<Video, IngestError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut stage = IngestStage::Received;
        let result = self
            .run_pipeline(owner_id, video_id, content_type, body, &mut stage)
            .await;

        match &result {
            Ok(_) => {
                tracing::info!(video_id = %video_id, "video ingested");
            }
            Err(err) => {
                tracing::warn!(
                    video_id = %video_id,
                    stage = %stage,
                    error = %err,
                    "ingestion failed"
                );
            }
        }

        result
    }

    async fn run_pipeline<R>(
        &self,
        owner_id: Uuid,
        video_id: Uuid,
        content_type: &str,
        mut body: R,
        stage: &mut IngestStage,
    ) -> Result<Video, IngestError>
    where
        R: AsyncRead + Unpin + Send,
    {
        // Rejected without side effects: no metadata lookup, no file I/O.
        let media_type = validation::ensure_video_mp4(content_type)?;

        let mut video = self
            .repo
            .get_video(video_id)
            .await
            .map_err(|e| IngestError::Metadata(e.to_string()))?
            .ok_or_else(|| IngestError::NotFound(format!("video {}", video_id)))?;

        // Ownership is checked immediately after metadata lookup, before
        // any file I/O happens for this call.
        if video.owner_id != owner_id {
            return Err(IngestError::Forbidden);
        }
        *stage = IngestStage::OwnershipVerified;

        // Every temp path for this call lives under one directory whose
        // removal is tied to scope exit, success or failure.
        let temp_dir = TempDir::new()?;
        let input_path = temp_dir.path().join("input.mp4");

        let mut input = File::create(&input_path).await?;
        tokio::io::copy(&mut body, &mut input).await?;
        input.flush().await?;
        // The prober and remuxer read by path; the file must be fully on
        // disk before they start.
        input.sync_all().await?;
        drop(input);
        *stage = IngestStage::Buffered;

        let (orientation, remuxed_path) = {
            let _permit = self
                .transcode_permits
                .acquire()
                .await
                .map_err(|_| IngestError::Internal("transcode pool closed".to_string()))?;

            let geometry = self.prober.probe(&input_path).await?;
            *stage = IngestStage::Probed;

            let orientation = aspect::classify(geometry.width, geometry.height);
            *stage = IngestStage::Classified;

            let remuxed_path = self.remuxer.remux(&input_path).await?;
            *stage = IngestStage::Remuxed;

            (orientation, remuxed_path)
        };

        let data = tokio::fs::read(&remuxed_path).await?;

        // A fresh key per upload; re-ingesting a video never reuses or
        // overwrites the previous object.
        let key = keys::generate_asset_key(&media_type, orientation);
        self.storage
            .upload(&key, data, &media_type)
            .await
            .map_err(upload_error)?;
        *stage = IngestStage::Uploaded;

        let reference = StorageReference::new(self.storage.bucket(), &key);
        let encoded = reference.encode()?;
        *stage = IngestStage::Referenced;

        video.video_url = Some(encoded);
        video.updated_at = Utc::now();
        self.repo
            .update_video(&video)
            .await
            .map_err(|e| IngestError::Metadata(e.to_string()))?;
        *stage = IngestStage::Persisted;

        tracing::debug!(
            video_id = %video_id,
            key = %key,
            orientation = %orientation,
            "storage reference persisted"
        );

        self.signed_view(video).await
    }

    /// Fetch a video record with its storage reference exchanged for a
    /// freshly signed URL. The signature is regenerated on every read.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, video_id: Uuid) -> Result<Video, IngestError> {
        let video = self
            .repo
            .get_video(video_id)
            .await
            .map_err(|e| IngestError::Metadata(e.to_string()))?
            .ok_or_else(|| IngestError::NotFound(format!("video {}", video_id)))?;

        self.signed_view(video).await
    }

    /// Transient copy with the reference field replaced by a signed URL.
    /// A record with no reference yet is returned unchanged.
    async fn signed_view(&self, mut video: Video) -> Result<Video, IngestError> {
        let Some(encoded) = video.video_url.as_deref() else {
            return Ok(video);
        };

        let reference = StorageReference::decode(encoded)?;
        // A persisted bucket that disagrees with the gateway's is a corrupt
        // reference; it is never silently re-pointed at the current bucket.
        if reference.bucket != self.storage.bucket() {
            return Err(IngestError::Format(format!(
                "reference names bucket {:?}, storage is scoped to {:?}",
                reference.bucket,
                self.storage.bucket()
            )));
        }
        let url = self
            .storage
            .presigned_get_url(&reference.key, self.config.signed_url_ttl)
            .await
            .map_err(signing_error)?;

        video.video_url = Some(url);
        Ok(video)
    }
}

fn upload_error(err: StorageError) -> IngestError {
    IngestError::Upload(err.to_string())
}

fn signing_error(err: StorageError) -> IngestError {
    IngestError::Signing(err.to_string())
}
