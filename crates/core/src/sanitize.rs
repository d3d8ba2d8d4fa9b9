//! HTML sanitization for rich-text post content.
//!
//! Post bodies arrive from a rich-text editor as HTML. Everything is
//! scrubbed through an allow-list before it hits the store, so the
//! stored content is always safe to render verbatim.

/// Sanitize rich-text HTML, keeping editor formatting and dropping
/// scripts, event handlers, and unknown tags.
#[must_use]
pub fn clean_html(content: &str) -> String {
    ammonia::Builder::default()
        .add_tags(["u", "s", "mark"])
        .add_generic_attributes(["class"])
        .clean(content)
        .to_string()
}
