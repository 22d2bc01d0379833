//! Editor-text to storage-HTML conversion.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::ImageRef;

use super::sanitize::HtmlSanitizer;

/// Editor-side inline-image placeholder: `[novel-image id="<id>"]`.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\[novel-image id="([^"\]]+)"\]"#).expect("valid regex"));

/// Storage-side inline-image element, with or without a closing tag.
static IMAGE_ELEMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<novel-image id="([^"]*)"[^>]*>(?:</novel-image>)?"#).expect("valid regex")
});

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<br\s*/?>").expect("valid regex"));

/// Converts between the editor representation (plain text, literal
/// newlines, `[novel-image id="..."]` placeholders) and the stored
/// representation (sanitized HTML, `<br>`, `<novel-image>` elements).
pub struct ContentCodec {
    sanitizer: HtmlSanitizer,
}

impl ContentCodec {
    pub fn new() -> Self {
        Self {
            sanitizer: HtmlSanitizer::new(),
        }
    }

    /// Editor text to sanitized storage HTML.
    ///
    /// Newlines become `<br>`, placeholders become `<novel-image>`
    /// elements, and the whole result runs through the allow-list
    /// sanitizer. Called on every save path, no exceptions.
    pub fn to_storage(&self, editor_text: &str) -> String {
        let normalized = editor_text.replace("\r\n", "\n");
        let with_breaks = normalized.replace('\n', "<br>");
        let with_images = PLACEHOLDER_RE.replace_all(&with_breaks, |caps: &regex::Captures| {
            format!(
                r#"<novel-image id="{}"></novel-image>"#,
                escape_attr(&caps[1])
            )
        });
        self.sanitizer.clean(&with_images)
    }

    /// Stored HTML back to editor text.
    ///
    /// Inverse of [`Self::to_storage`] for content produced by the
    /// editor convention. Hand-authored HTML outside the convention is
    /// left in place as literal text and will not survive a round trip
    /// unchanged - an accepted limitation.
    pub fn to_editor(&self, stored_html: &str) -> String {
        let text = IMAGE_ELEMENT_RE.replace_all(stored_html, |caps: &regex::Captures| {
            format!(r#"[novel-image id="{}"]"#, decode_entities(&caps[1]))
        });
        let text = LINE_BREAK_RE.replace_all(&text, "\n");
        decode_entities(&text)
    }

    /// Stored HTML to display HTML.
    ///
    /// Re-applies the sanitizer - stored content is never trusted to be
    /// safe, since legacy records or direct writes may have bypassed the
    /// editor - then resolves each `novel-image` element against the
    /// post's inline image list. Unmatched ids render as nothing.
    pub fn render(&self, stored_html: &str, images: &[ImageRef]) -> String {
        let clean = self.sanitizer.clean(stored_html);
        IMAGE_ELEMENT_RE
            .replace_all(&clean, |caps: &regex::Captures| {
                let id = decode_entities(&caps[1]);
                match images.iter().find(|img| img.id == id) {
                    Some(img) => format!(r#"<img src="{}" alt="">"#, escape_attr(&img.url)),
                    None => String::new(),
                }
            })
            .into_owned()
    }

    /// Remove every occurrence of one inline image from `text`, in both
    /// the placeholder and the element form. Used when an [`ImageRef`]
    /// is deleted so content never references a dead blob.
    pub fn strip_image(&self, text: &str, image_id: &str) -> String {
        let escaped = regex::escape(&escape_attr(image_id));
        let placeholder = Regex::new(&format!(
            r#"\[novel-image id="{}"\]"#,
            regex::escape(image_id)
        ))
        .expect("valid regex");
        let element = Regex::new(&format!(
            r#"<novel-image id="{escaped}"[^>]*>(?:</novel-image>)?"#
        ))
        .expect("valid regex");
        let text = placeholder.replace_all(text, "");
        element.replace_all(&text, "").into_owned()
    }
}

impl Default for ContentCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> ContentCodec {
        ContentCodec::new()
    }

    #[test]
    fn newlines_round_trip() {
        let codec = codec();
        let text = "first line\nsecond line\n\nfourth line";
        let stored = codec.to_storage(text);
        assert_eq!(stored, "first line<br>second line<br><br>fourth line");
        assert_eq!(codec.to_editor(&stored), text);
    }

    #[test]
    fn crlf_is_normalized() {
        let codec = codec();
        let stored = codec.to_storage("a\r\nb");
        assert_eq!(stored, "a<br>b");
    }

    #[test]
    fn placeholder_round_trip() {
        let codec = codec();
        let text = r#"above[novel-image id="novel-images/p1/42"]below"#;
        let stored = codec.to_storage(text);
        assert_eq!(
            stored,
            r#"above<novel-image id="novel-images/p1/42"></novel-image>below"#
        );
        assert_eq!(codec.to_editor(&stored), text);
    }

    #[test]
    fn placeholder_survives_as_exactly_one_element() {
        let codec = codec();
        let stored = codec.to_storage(r#"[novel-image id="x"]"#);
        assert_eq!(IMAGE_ELEMENT_RE.find_iter(&stored).count(), 1);
    }

    #[test]
    fn script_input_is_neutralized() {
        let codec = codec();
        let stored = codec.to_storage("hello<script>alert(1)</script>world");
        assert!(!stored.contains("<script"));
        assert!(!stored.contains("alert(1)"));
    }

    #[test]
    fn angle_brackets_in_prose_round_trip() {
        let codec = codec();
        let text = "1 < 2 && 3 > 2";
        let stored = codec.to_storage(text);
        assert_eq!(codec.to_editor(&stored), text);
    }

    #[test]
    fn render_resolves_known_images_and_drops_unknown() {
        let codec = codec();
        let images = vec![ImageRef {
            id: "novel-images/p1/1".to_string(),
            url: "/media/novel-images/p1/1".to_string(),
        }];
        let stored = codec.to_storage(
            r#"a[novel-image id="novel-images/p1/1"]b[novel-image id="missing"]c"#,
        );
        let html = codec.render(&stored, &images);
        assert_eq!(html, r#"a<img src="/media/novel-images/p1/1" alt="">bc"#);
    }

    #[test]
    fn render_sanitizes_untrusted_stored_content() {
        // Legacy records may hold markup that never went through
        // to_storage; render must not trust it.
        let codec = codec();
        let html = codec.render("<script>boom()</script><p>ok</p>", &[]);
        assert_eq!(html, "<p>ok</p>");
    }

    #[test]
    fn strip_image_removes_both_forms() {
        let codec = codec();
        let editor = codec.strip_image(r#"a[novel-image id="gone"]b"#, "gone");
        assert_eq!(editor, "ab");
        let stored = codec.strip_image(r#"a<novel-image id="gone"></novel-image>b"#, "gone");
        assert_eq!(stored, "ab");
        let other = codec.strip_image(r#"a[novel-image id="kept"]b"#, "gone");
        assert_eq!(other, r#"a[novel-image id="kept"]b"#);
    }
}
