//! SeaORM entities. The nested post shape (pages, tags, image refs,
//! like/favorite sets) is stored in JSONB columns; the entity-to-domain
//! conversions are the single normalization point where legacy rows get
//! their missing fields defaulted.

pub mod comment;
pub mod post;
pub mod user;
