//! Plain-text helpers for terminal and table output.

use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;

static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(br\s*/?|/p|/li|/h[1-6]|/div)\s*>").expect("valid regex")
});
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*li[^>]*>").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Converts an HTML abstract into readable plain text.
///
/// Paragraph and line breaks become newlines, list items get a bullet,
/// remaining tags are dropped and common entities decoded.
pub fn html_to_text(html: &str) -> String {
    let text = html.replace("\r\n", "\n");
    let text = BLOCK_BREAK.replace_all(&text, "\n");
    let text = LIST_ITEM.replace_all(&text, "• ");
    let text = TAG.replace_all(&text, "");
    let text = decode_entities(&text);

    let text = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    BLANK_LINES.replace_all(&text, "\n\n").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    // &amp; last so "&amp;lt;" stays "&lt;".
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Formats an RFC 3339 timestamp as a local date. Unparseable input is
/// returned as-is.
pub fn display_date(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.with_timezone(&Local).format("%b %-d, %Y").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// "★★★☆☆" for a score out of five.
pub fn stars(filled: u8) -> String {
    let filled = usize::from(filled.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// "N spots left", as shown next to each workshop.
pub fn spots_left(available: i64) -> String {
    if available == 1 {
        "1 spot left".to_string()
    } else {
        format!("{available} spots left")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_paragraphs_and_entities() {
        let html = "<p>Learn <strong>Rust</strong> &amp; more.</p><p>Bring a laptop&nbsp;!</p>";
        assert_eq!(html_to_text(html), "Learn Rust & more.\nBring a laptop !");
    }

    #[test]
    fn test_html_to_text_lists() {
        let html = "<ul><li>One</li><li>Two</li></ul>";
        assert_eq!(html_to_text(html), "• One\n• Two");
    }

    #[test]
    fn test_double_escaped_entity_survives_once() {
        assert_eq!(html_to_text("&amp;lt;tag&amp;gt;"), "&lt;tag&gt;");
    }

    #[test]
    fn test_display_date_falls_back_to_raw() {
        assert_eq!(display_date("yesterday"), "yesterday");
        assert!(display_date("2025-03-14T10:00:00Z").contains("2025"));
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(9), "★★★★★");
    }

    #[test]
    fn test_spots_left() {
        assert_eq!(spots_left(1), "1 spot left");
        assert_eq!(spots_left(0), "0 spots left");
    }
}
