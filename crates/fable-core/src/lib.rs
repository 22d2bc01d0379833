//! # Fable Core
//!
//! The domain layer of the Fable novel-publishing backend.
//! This crate contains pure business logic with zero infrastructure
//! dependencies: the content sanitization codec, the page-collection
//! editor model, the pagination display algorithm, the image guard and
//! the post aggregate builder, plus the port traits every external
//! collaborator (document store, blob store, auth, text generation)
//! must implement.

pub mod content;
pub mod domain;
pub mod error;
pub mod image_guard;
pub mod pagination;
pub mod ports;

pub use error::DomainError;
