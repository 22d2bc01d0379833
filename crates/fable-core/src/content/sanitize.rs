//! Allow-list HTML sanitization.

use std::collections::{HashMap, HashSet};

use ammonia::{Builder, UrlRelative};

/// The custom element carrying an inline-image reference in stored content.
pub const INLINE_IMAGE_TAG: &str = "novel-image";

/// Block-level tags writers may use.
const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "code", "ul", "ol", "li",
];

/// Inline formatting tags.
const INLINE_TAGS: &[&str] = &["b", "strong", "i", "em", "u", "br", "a"];

/// HTML sanitizer configured from an explicit allow-list.
///
/// Everything outside the allow-list is stripped: unknown tags, all
/// attributes except `a[href]` and `novel-image[id]`, and every URL
/// scheme (`href` accepts same-origin relative paths only). Script and
/// style content is dropped entirely, never rendered as text.
pub struct HtmlSanitizer {
    builder: Builder<'static>,
}

impl HtmlSanitizer {
    pub fn new() -> Self {
        let mut tags: HashSet<&str> = BLOCK_TAGS.iter().copied().collect();
        tags.extend(INLINE_TAGS.iter().copied());
        tags.insert(INLINE_IMAGE_TAG);

        let mut tag_attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
        tag_attributes.insert("a", HashSet::from(["href"]));
        tag_attributes.insert(INLINE_IMAGE_TAG, HashSet::from(["id"]));

        let mut builder = Builder::new();
        builder
            .tags(tags)
            .tag_attributes(tag_attributes)
            .generic_attributes(HashSet::new())
            // No schemes at all: absolute URLs are stripped, relative
            // paths pass through untouched.
            .url_schemes(HashSet::new())
            .url_relative(UrlRelative::PassThrough)
            .link_rel(None);

        Self { builder }
    }

    /// Sanitize `input` down to the allowed subset.
    pub fn clean(&self, input: &str) -> String {
        self.builder.clean(input).to_string()
    }
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new()
    }
}
