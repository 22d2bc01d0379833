use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use fable_core::ports::{BlobStore, BlobStoreError};

/// Filesystem blob store. Objects land under `root`, and `put` returns
/// `public_base` joined with the storage path, which the HTTP layer
/// serves as static files.
pub struct LocalBlobStore {
    root: PathBuf,
    public_base: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        let mut public_base = public_base.into();
        while public_base.ends_with('/') {
            public_base.pop();
        }
        Self {
            root: root.into(),
            public_base,
        }
    }

    /// Resolve a storage path under the root, rejecting anything that
    /// would escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf, BlobStoreError> {
        let rel = Path::new(path);
        let escapes = rel.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || path.is_empty() {
            return Err(BlobStoreError::Write(format!("Invalid blob path: {path}")));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, BlobStoreError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobStoreError::Write(e.to_string()))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| BlobStoreError::Write(e.to_string()))?;
        tracing::debug!(blob_path = %path, "Stored blob");
        Ok(format!("{}/{path}", self.public_base))
    }

    async fn delete(&self, path: &str) -> Result<(), BlobStoreError> {
        let target = self
            .resolve(path)
            .map_err(|_| BlobStoreError::Delete(format!("Invalid blob path: {path}")))?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobStoreError::NotFound(path.to_string()))
            }
            Err(e) => Err(BlobStoreError::Delete(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_under_root_and_builds_public_url() {
        let dir = std::env::temp_dir().join(format!("fable-blob-{}", uuid::Uuid::new_v4()));
        let store = LocalBlobStore::new(&dir, "http://localhost:8080/media/");

        let url = store
            .put("covers/abc/123", vec![9, 9], "image/jpeg")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:8080/media/covers/abc/123");
        assert!(dir.join("covers/abc/123").exists());

        store.delete("covers/abc/123").await.unwrap();
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_paths_that_escape_the_root() {
        let store = LocalBlobStore::new("/tmp/fable-blob-guard", "/media");
        let err = store
            .put("../outside", vec![0], "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, BlobStoreError::Write(_)));
    }
}
