use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard cap on stored page content length, in characters.
pub const MAX_PAGE_CONTENT_CHARS: usize = 10_000;

/// One page of a post. Identity is positional: a page is addressed by
/// its index within the post's page list, not by a durable id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    /// Sanitized HTML produced by the content codec.
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
