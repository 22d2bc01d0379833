use serde::{Deserialize, Serialize};

/// Reference to an uploaded image blob.
///
/// `id` is the blob-store path (also the token carried by inline-image
/// placeholders); `url` is where readers fetch it. Owned by a post as
/// its cover or embedded by reference inside page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: String,
    pub url: String,
}
