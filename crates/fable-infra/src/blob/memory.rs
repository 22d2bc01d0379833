use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use fable_core::ports::{BlobStore, BlobStoreError};

/// In-memory blob store for tests and database-less local runs.
/// Returned URLs use the `memory://` scheme and resolve nowhere.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, (Vec<u8>, String)>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: look up a stored blob by path.
    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs.read().await.get(path).map(|(b, _)| b.clone())
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobStoreError> {
        self.blobs
            .write()
            .await
            .insert(path.to_string(), (bytes, content_type.to_string()));
        Ok(format!("memory://{path}"))
    }

    async fn delete(&self, path: &str) -> Result<(), BlobStoreError> {
        self.blobs
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| BlobStoreError::NotFound(path.to_string()))
    }
}
