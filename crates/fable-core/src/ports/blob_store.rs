//! Blob storage port - path-addressed object storage.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

/// Blob store trait. `put` returns the public URL for the stored object.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobStoreError>;

    async fn delete(&self, path: &str) -> Result<(), BlobStoreError>;
}

/// Storage path for a post's cover image.
pub fn cover_path(post_id: Uuid) -> String {
    format!("covers/{post_id}/{}", Utc::now().timestamp_millis())
}

/// Storage path for an inline novel image.
pub fn novel_image_path(post_id: Uuid) -> String {
    format!("novel-images/{post_id}/{}", Utc::now().timestamp_millis())
}

/// Blob store errors.
#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("Blob write failed: {0}")]
    Write(String),

    #[error("Blob delete failed: {0}")]
    Delete(String),

    #[error("Blob not found: {0}")]
    NotFound(String),
}
