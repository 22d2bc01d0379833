//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Pen name shown on posts and comments; defaults to "Anonymous".
    #[serde(default)]
    pub author_name: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub author_name: String,
}

/// Request to change the caller's pen name. The denormalized copies on
/// existing posts/comments are repaired by a background job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameAuthorRequest {
    pub author_name: String,
}

/// Denormalized author identity as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: String,
}

/// An uploaded image reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRefDto {
    pub id: String,
    pub url: String,
}

/// One page as submitted by the editor (plain text with placeholders).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Create/update payload for a post, in editor representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePostRequest {
    pub title: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub pages: Vec<PageInput>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub cover_image: Option<ImageRefDto>,
    #[serde(default)]
    pub images: Vec<ImageRefDto>,
}

/// One entry in the pagination strip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageControlDto {
    Number { page: usize },
    Ellipsis,
}

/// One page rendered for reading (sanitized display HTML).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
    pub title: String,
    pub html: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card-sized post summary for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub synopsis: String,
    pub tags: Vec<String>,
    pub author: AuthorDto,
    pub published: bool,
    pub cover_image: Option<ImageRefDto>,
    pub page_count: usize,
    pub likes: usize,
    pub favorites: usize,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post opened for reading: one rendered page at a time plus the
/// pagination controls for the strip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub synopsis: String,
    pub tags: Vec<String>,
    pub author: AuthorDto,
    pub published: bool,
    pub cover_image: Option<ImageRefDto>,
    pub images: Vec<ImageRefDto>,
    pub page_count: usize,
    pub current_page: usize,
    pub page: PageView,
    pub controls: Vec<PageControlDto>,
    pub likes: usize,
    pub favorites: usize,
    pub liked_by_me: bool,
    pub favorited_by_me: bool,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post opened for re-editing: pages back in editor representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEditView {
    pub id: Uuid,
    pub title: String,
    pub synopsis: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub cover_image: Option<ImageRefDto>,
    pub images: Vec<ImageRefDto>,
    pub pages: Vec<PageInput>,
}

/// Result of a like/favorite toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub active: bool,
    pub count: usize,
}

/// Request to add a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
}

/// A comment as displayed under a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: AuthorDto,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub deleted: bool,
}

/// AI-assist request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistRequest {
    pub prompt: String,
}

/// AI-assist success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistResponse {
    pub content: String,
}

/// AI-assist failure body. This endpoint keeps its own error contract
/// instead of the RFC 7807 envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
