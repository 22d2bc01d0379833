use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, User};
use crate::error::RepoError;

/// Post document repository.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Published posts, newest first.
    async fn find_published(&self) -> Result<Vec<Post>, RepoError>;

    /// Every post (drafts included) by one author, newest first.
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Save a post document (create or full overwrite - last write wins
    /// at whole-document granularity).
    async fn save(&self, post: Post) -> Result<Post, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Atomic best-effort view counter bump; never decrements.
    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError>;

    /// Rewrite the denormalized author name on every post owned by
    /// `author_id`. Returns how many documents changed.
    async fn update_author_name(&self, author_id: Uuid, name: &str) -> Result<u64, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;

    /// Comments for one post ordered by creation time descending.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Fan-out counterpart of [`PostRepository::update_author_name`].
    async fn update_author_name(&self, author_id: Uuid, name: &str) -> Result<u64, RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn save(&self, user: User) -> Result<User, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}
