use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

use super::image::ImageRef;
use super::page::Page;

/// Hard cap on the synopsis length, in characters.
pub const MAX_SYNOPSIS_CHARS: usize = 1_000;

/// How many inline images a single post may carry.
pub const MAX_INLINE_IMAGES: usize = 5;

/// Denormalized author identity carried by posts and comments.
///
/// The name is copied in at write time to avoid a join on every read;
/// renames repair it through a batched background fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub name: String,
}

/// Post aggregate root: a multi-page novel with tags, synopsis, cover
/// and inline images, and the social-interaction counters.
///
/// The `default` attributes double as the legacy-schema normalization
/// point: documents written before `favorites`, `views`, `images` or
/// `cover_image` existed deserialize with empty defaults instead of
/// failing or carrying nulls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author: AuthorRef,
    pub title: String,
    pub synopsis: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub published: bool,
    #[serde(default)]
    pub cover_image: Option<ImageRef>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    /// Never empty; the editor model rejects deleting the last page.
    pub pages: Vec<Page>,
    #[serde(default)]
    pub likes: Vec<Uuid>,
    #[serde(default)]
    pub favorites: Vec<Uuid>,
    #[serde(default)]
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Membership toggle on the likes set. Idempotent per user: two
    /// toggles return the set to its previous state. Returns whether
    /// the user likes the post afterwards.
    pub fn toggle_like(&mut self, user_id: Uuid) -> bool {
        toggle_membership(&mut self.likes, user_id)
    }

    /// Membership toggle on the favorites set, same semantics as
    /// [`Self::toggle_like`].
    pub fn toggle_favorite(&mut self, user_id: Uuid) -> bool {
        toggle_membership(&mut self.favorites, user_id)
    }

    /// Best-effort monotonic view counter. No per-viewer dedup.
    pub fn record_view(&mut self) {
        self.views = self.views.saturating_add(1);
    }

    /// Ownership check run before every mutation. UI gating is never
    /// trusted on its own.
    pub fn ensure_author(&self, user_id: Uuid) -> Result<(), DomainError> {
        if self.author.id == user_id {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied)
        }
    }

    /// Attach an inline image, enforcing the per-post cap.
    pub fn add_image(&mut self, image: ImageRef) -> Result<(), DomainError> {
        if self.images.len() >= MAX_INLINE_IMAGES {
            return Err(DomainError::Validation(format!(
                "A post may carry at most {MAX_INLINE_IMAGES} inline images"
            )));
        }
        self.images.push(image);
        Ok(())
    }

    /// Detach an inline image by id, returning it so the caller can
    /// delete the blob and strip its placeholders from page content.
    pub fn remove_image(&mut self, image_id: &str) -> Option<ImageRef> {
        let idx = self.images.iter().position(|img| img.id == image_id)?;
        Some(self.images.remove(idx))
    }
}

fn toggle_membership(set: &mut Vec<Uuid>, user_id: Uuid) -> bool {
    match set.iter().position(|id| *id == user_id) {
        Some(idx) => {
            set.remove(idx);
            false
        }
        None => {
            set.push(user_id);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_post() -> Post {
        Post {
            id: Uuid::new_v4(),
            author: AuthorRef {
                id: Uuid::new_v4(),
                name: "Ursula".to_string(),
            },
            title: "The Lathe".to_string(),
            synopsis: String::new(),
            tags: vec![],
            published: true,
            cover_image: None,
            images: vec![],
            pages: vec![Page {
                title: String::new(),
                content: String::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }],
            likes: vec![],
            favorites: vec![],
            views: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn double_toggle_restores_the_likes_set() {
        let mut post = sample_post();
        let reader = Uuid::new_v4();
        let before = post.likes.clone();

        assert!(post.toggle_like(reader));
        assert!(post.likes.contains(&reader));
        assert!(!post.toggle_like(reader));
        assert_eq!(post.likes, before);
    }

    #[test]
    fn ensure_author_rejects_non_owner() {
        let post = sample_post();
        assert!(post.ensure_author(post.author.id).is_ok());
        assert!(matches!(
            post.ensure_author(Uuid::new_v4()),
            Err(DomainError::PermissionDenied)
        ));
    }

    #[test]
    fn inline_image_cap_is_enforced() {
        let mut post = sample_post();
        for i in 0..MAX_INLINE_IMAGES {
            post.add_image(ImageRef {
                id: format!("novel-images/p/{i}"),
                url: format!("/media/{i}"),
            })
            .unwrap();
        }
        let err = post
            .add_image(ImageRef {
                id: "one-too-many".to_string(),
                url: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn legacy_document_without_favorites_reads_back_empty() {
        let raw = serde_json::json!({
            "id": Uuid::new_v4(),
            "author": { "id": Uuid::new_v4(), "name": "老舗" },
            "title": "Legacy",
            "synopsis": "",
            "published": true,
            "pages": [{
                "title": "",
                "content": "old",
                "created_at": Utc::now(),
                "updated_at": Utc::now(),
            }],
            "likes": [],
            "created_at": Utc::now(),
            "updated_at": Utc::now(),
        });

        let post: Post = serde_json::from_value(raw).unwrap();
        assert!(post.favorites.is_empty());
        assert_eq!(post.views, 0);
        assert!(post.cover_image.is_none());
    }
}
