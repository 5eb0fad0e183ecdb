use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Video metadata record.
///
/// `video_url` holds the encoded storage reference at rest
/// (`"{bucket},{key}"`). The persisted record is never rewritten with a
/// signed URL; read paths return a transient copy with the reference
/// replaced by a freshly signed URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new(id: Uuid, owner_id: Uuid, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id,
            title: title.into(),
            video_url: None,
            thumbnail_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}
