//! Domain entities - the core business objects.

mod builder;
mod comment;
mod draft;
mod image;
mod page;
mod post;
mod user;

pub use builder::PostBuilder;
pub use comment::{Comment, DELETED_COMMENT_TOMBSTONE};
pub use draft::{DraftError, PageDraft, PostDraft};
pub use image::ImageRef;
pub use page::{MAX_PAGE_CONTENT_CHARS, Page};
pub use post::{AuthorRef, MAX_INLINE_IMAGES, MAX_SYNOPSIS_CHARS, Post};
pub use user::{ANONYMOUS_AUTHOR, User};
