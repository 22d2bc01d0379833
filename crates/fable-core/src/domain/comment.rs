use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

use super::post::AuthorRef;

/// Replacement content for soft-deleted comments.
pub const DELETED_COMMENT_TOMBSTONE: &str = "This comment has been deleted.";

/// A reader comment on a post. Displayed newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: AuthorRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted: bool,
}

impl Comment {
    pub fn new(post_id: Uuid, author: AuthorRef, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author,
            content,
            created_at: Utc::now(),
            deleted: false,
        }
    }

    /// Soft delete: only the comment's own author may tombstone it.
    /// The content is replaced, the record stays.
    pub fn soft_delete(&mut self, requested_by: Uuid) -> Result<(), DomainError> {
        if self.author.id != requested_by {
            return Err(DomainError::PermissionDenied);
        }
        self.content = DELETED_COMMENT_TOMBSTONE.to_string();
        self.deleted = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_comment() -> Comment {
        Comment::new(
            Uuid::new_v4(),
            AuthorRef {
                id: Uuid::new_v4(),
                name: "Reader".to_string(),
            },
            "lovely chapter".to_string(),
        )
    }

    #[test]
    fn author_can_soft_delete_own_comment() {
        let mut comment = sample_comment();
        comment.soft_delete(comment.author.id).unwrap();
        assert!(comment.deleted);
        assert_eq!(comment.content, DELETED_COMMENT_TOMBSTONE);
    }

    #[test]
    fn others_cannot_soft_delete() {
        let mut comment = sample_comment();
        let err = comment.soft_delete(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::PermissionDenied));
        assert!(!comment.deleted);
    }
}
