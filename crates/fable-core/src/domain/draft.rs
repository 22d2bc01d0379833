//! The page-collection editor model: an ordered, mutable list of page
//! drafts plus a cursor, with the validation the editor relies on.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::image::ImageRef;
use super::page::MAX_PAGE_CONTENT_CHARS;
use super::post::{MAX_INLINE_IMAGES, MAX_SYNOPSIS_CHARS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("A post must keep at least one page")]
    CannotDeleteLastPage,

    #[error("Page index out of bounds")]
    PageOutOfBounds,

    #[error("A post may carry at most {MAX_INLINE_IMAGES} inline images")]
    TooManyImages,
}

/// One page being written. Content is editor text (literal newlines,
/// placeholders), not storage HTML.
#[derive(Debug, Clone)]
pub struct PageDraft {
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PageDraft {
    fn empty() -> Self {
        let now = Utc::now();
        Self {
            title: String::new(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Draft state for one post under editing.
///
/// Invariant: `pages` is never empty and `current` is always a valid
/// index into it. Wire input never lands here directly; request DTOs
/// are mapped through `PostDraft::new` so the invariant holds.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub synopsis: String,
    pub tags: Vec<String>,
    pub pages: Vec<PageDraft>,
    pub current: usize,
    pub published: bool,
    pub cover_image: Option<ImageRef>,
    pub images: Vec<ImageRef>,
}

impl PostDraft {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            synopsis: String::new(),
            tags: Vec::new(),
            pages: vec![PageDraft::empty()],
            current: 0,
            published: false,
            cover_image: None,
            images: Vec::new(),
        }
    }

    /// Append an empty page and move the cursor onto it.
    pub fn add_page(&mut self) {
        self.pages.push(PageDraft::empty());
        self.current = self.pages.len() - 1;
    }

    /// Remove the page at `index`. The last remaining page can never be
    /// deleted; afterwards the cursor clamps into bounds.
    pub fn delete_page(&mut self, index: usize) -> Result<(), DraftError> {
        if self.pages.len() == 1 {
            return Err(DraftError::CannotDeleteLastPage);
        }
        if index >= self.pages.len() {
            return Err(DraftError::PageOutOfBounds);
        }
        self.pages.remove(index);
        self.current = self.current.min(self.pages.len() - 1);
        Ok(())
    }

    /// Move the cursor. Out-of-bounds indices are ignored.
    pub fn set_current_page(&mut self, index: usize) {
        if index < self.pages.len() {
            self.current = index;
        }
    }

    pub fn current_page(&self) -> &PageDraft {
        &self.pages[self.current]
    }

    /// Replace the current page's content, truncated at the per-page
    /// character cap, and refresh its update timestamp.
    pub fn update_content(&mut self, content: &str) {
        let page = &mut self.pages[self.current];
        page.content = truncate_chars(content, MAX_PAGE_CONTENT_CHARS);
        page.updated_at = Utc::now();
    }

    /// Replace the current page's title and refresh its update timestamp.
    pub fn update_title(&mut self, title: &str) {
        let page = &mut self.pages[self.current];
        page.title = title.to_string();
        page.updated_at = Utc::now();
    }

    /// Replace the synopsis, truncated at its character cap.
    pub fn set_synopsis(&mut self, synopsis: &str) {
        self.synopsis = truncate_chars(synopsis, MAX_SYNOPSIS_CHARS);
    }

    /// Add a tag. Empty (after trimming) and duplicate tags are ignored;
    /// insertion order is preserved.
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return;
        }
        self.tags.push(tag.to_string());
    }

    /// Remove a tag by exact match.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Attach an inline image reference, enforcing the per-post cap.
    pub fn add_image(&mut self, image: ImageRef) -> Result<(), DraftError> {
        if self.images.len() >= MAX_INLINE_IMAGES {
            return Err(DraftError::TooManyImages);
        }
        self.images.push(image);
        Ok(())
    }
}

impl Default for PostDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Char-boundary-safe truncation to at most `max` characters.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_draft_starts_with_one_page() {
        let draft = PostDraft::new();
        assert_eq!(draft.pages.len(), 1);
        assert_eq!(draft.current, 0);
    }

    #[test]
    fn add_page_moves_cursor_to_the_new_page() {
        let mut draft = PostDraft::new();
        draft.add_page();
        draft.add_page();
        assert_eq!(draft.pages.len(), 3);
        assert_eq!(draft.current, 2);
    }

    #[test]
    fn last_page_cannot_be_deleted() {
        let mut draft = PostDraft::new();
        assert_eq!(draft.delete_page(0), Err(DraftError::CannotDeleteLastPage));
        assert_eq!(draft.pages.len(), 1);
    }

    #[test]
    fn delete_clamps_the_cursor() {
        let mut draft = PostDraft::new();
        draft.add_page();
        draft.add_page();
        assert_eq!(draft.current, 2);
        draft.delete_page(2).unwrap();
        assert_eq!(draft.current, 1);
        assert_eq!(draft.delete_page(5), Err(DraftError::PageOutOfBounds));
    }

    #[test]
    fn cursor_ignores_out_of_bounds_moves() {
        let mut draft = PostDraft::new();
        draft.add_page();
        draft.set_current_page(9);
        assert_eq!(draft.current, 1);
        draft.set_current_page(0);
        assert_eq!(draft.current, 0);
    }

    #[test]
    fn update_content_truncates_at_the_cap() {
        let mut draft = PostDraft::new();
        let long = "あ".repeat(MAX_PAGE_CONTENT_CHARS + 50);
        draft.update_content(&long);
        assert_eq!(
            draft.current_page().content.chars().count(),
            MAX_PAGE_CONTENT_CHARS
        );
    }

    #[test]
    fn tags_deduplicate_and_keep_insertion_order() {
        let mut draft = PostDraft::new();
        draft.add_tag("fantasy");
        draft.add_tag("  fantasy  ");
        draft.add_tag("");
        draft.add_tag("slice-of-life");
        assert_eq!(draft.tags, vec!["fantasy", "slice-of-life"]);

        draft.remove_tag("fantasy");
        assert_eq!(draft.tags, vec!["slice-of-life"]);
    }

    #[test]
    fn inline_image_cap_applies_to_drafts() {
        let mut draft = PostDraft::new();
        for i in 0..5 {
            draft
                .add_image(ImageRef {
                    id: format!("novel-images/d/{i}"),
                    url: String::new(),
                })
                .unwrap();
        }
        assert_eq!(
            draft.add_image(ImageRef {
                id: "extra".to_string(),
                url: String::new(),
            }),
            Err(DraftError::TooManyImages)
        );
    }
}
