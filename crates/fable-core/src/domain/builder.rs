//! Assembly of the persisted post aggregate from editor drafts.

use chrono::Utc;
use uuid::Uuid;

use crate::content::ContentCodec;
use crate::error::DomainError;

use super::draft::{PostDraft, truncate_chars};
use super::page::{MAX_PAGE_CONTENT_CHARS, Page};
use super::post::{AuthorRef, MAX_SYNOPSIS_CHARS, Post};

/// Builds [`Post`] documents from [`PostDraft`]s, running every page
/// through the content codec's storage transform.
pub struct PostBuilder {
    codec: ContentCodec,
}

impl PostBuilder {
    pub fn new(codec: ContentCodec) -> Self {
        Self { codec }
    }

    /// First save of a draft (publish or draft-save). Social counters
    /// start empty and both timestamps are set to now.
    pub fn build_for_create(
        &self,
        draft: &PostDraft,
        author: AuthorRef,
    ) -> Result<Post, DomainError> {
        self.validate(draft)?;
        let now = Utc::now();
        Ok(Post {
            id: Uuid::new_v4(),
            author,
            title: draft.title.trim().to_string(),
            synopsis: truncate_chars(&draft.synopsis, MAX_SYNOPSIS_CHARS),
            tags: normalize_tags(&draft.tags),
            published: draft.published,
            cover_image: draft.cover_image.clone(),
            images: draft.images.clone(),
            pages: self.storage_pages(draft),
            likes: Vec::new(),
            favorites: Vec::new(),
            views: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Edit-save of an existing post. Social counters, creation time
    /// and authorship are preserved; content is re-encoded.
    pub fn build_for_update(
        &self,
        existing: &Post,
        draft: &PostDraft,
    ) -> Result<Post, DomainError> {
        self.validate(draft)?;
        Ok(Post {
            id: existing.id,
            author: existing.author.clone(),
            title: draft.title.trim().to_string(),
            synopsis: truncate_chars(&draft.synopsis, MAX_SYNOPSIS_CHARS),
            tags: normalize_tags(&draft.tags),
            published: draft.published,
            cover_image: draft.cover_image.clone(),
            images: draft.images.clone(),
            pages: self.storage_pages(draft),
            likes: existing.likes.clone(),
            favorites: existing.favorites.clone(),
            views: existing.views,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        })
    }

    fn validate(&self, draft: &PostDraft) -> Result<(), DomainError> {
        if draft.title.trim().is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }
        if draft.pages.is_empty() {
            return Err(DomainError::Validation(
                "A post needs at least one page".to_string(),
            ));
        }
        Ok(())
    }

    fn storage_pages(&self, draft: &PostDraft) -> Vec<Page> {
        draft
            .pages
            .iter()
            .map(|page| Page {
                title: page.title.clone(),
                content: self.codec.to_storage(&truncate_chars(
                    &page.content,
                    MAX_PAGE_CONTENT_CHARS,
                )),
                created_at: page.created_at,
                updated_at: page.updated_at,
            })
            .collect()
    }
}

impl Default for PostBuilder {
    fn default() -> Self {
        Self::new(ContentCodec::new())
    }
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> AuthorRef {
        AuthorRef {
            id: Uuid::new_v4(),
            name: "Ursula".to_string(),
        }
    }

    fn draft() -> PostDraft {
        let mut draft = PostDraft::new();
        draft.title = "The Dispossessed".to_string();
        draft.update_content("chapter one\nbegins here");
        draft
    }

    #[test]
    fn create_starts_social_fields_empty() {
        let builder = PostBuilder::default();
        let post = builder.build_for_create(&draft(), author()).unwrap();
        assert!(post.likes.is_empty());
        assert!(post.favorites.is_empty());
        assert_eq!(post.views, 0);
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn create_encodes_pages_to_storage_form() {
        let builder = PostBuilder::default();
        let post = builder.build_for_create(&draft(), author()).unwrap();
        assert_eq!(post.pages[0].content, "chapter one<br>begins here");
    }

    #[test]
    fn update_preserves_social_fields_and_created_at() {
        let builder = PostBuilder::default();
        let mut existing = builder.build_for_create(&draft(), author()).unwrap();
        let reader = Uuid::new_v4();
        existing.toggle_like(reader);
        existing.record_view();

        let mut edited = draft();
        edited.update_content("rewritten");
        let updated = builder.build_for_update(&existing, &edited).unwrap();

        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.likes, vec![reader]);
        assert_eq!(updated.views, 1);
        assert_eq!(updated.created_at, existing.created_at);
        assert_eq!(updated.pages[0].content, "rewritten");
        assert!(updated.updated_at >= existing.updated_at);
    }

    #[test]
    fn blank_title_is_rejected() {
        let builder = PostBuilder::default();
        let mut untitled = PostDraft::new();
        untitled.title = "   ".to_string();
        let err = builder.build_for_create(&untitled, author()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn tags_are_normalized_on_build() {
        let builder = PostBuilder::default();
        let mut d = draft();
        d.tags = vec![
            "fantasy".to_string(),
            " fantasy".to_string(),
            "".to_string(),
            "scifi".to_string(),
        ];
        let post = builder.build_for_create(&d, author()).unwrap();
        assert_eq!(post.tags, vec!["fantasy", "scifi"]);
    }
}
