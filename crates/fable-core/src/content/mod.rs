//! The content codec: conversion between the editor-facing plain-text
//! representation and the sanitized storage/render representation.
//!
//! This module owns the inline-image placeholder syntax and the
//! allow-listed HTML subset. Every path that renders user-authored text
//! as markup must go through [`ContentCodec`] - it is the single
//! injection-safety boundary of the system.

mod codec;
mod sanitize;

pub use codec::ContentCodec;
pub use sanitize::{HtmlSanitizer, INLINE_IMAGE_TAG};
