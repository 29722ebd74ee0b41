//! Lightweight markdown-ish formatting for assistant replies

use regex::Regex;
use std::sync::LazyLock;

static HTML_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<img|<br>|<p|<strong|<em|<code").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static BOLD_ALT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"∗∗(.+?)∗∗").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+?)\*").unwrap());
static ITALIC_ALT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"∗([^∗]+?)∗").unwrap());
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.+?)`").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^•\s?(.+)").unwrap());
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s?(.+)").unwrap());

/// True when the text already carries markup and must not be reformatted
pub fn looks_like_html(message: &str) -> bool {
    HTML_HINT.is_match(message)
}

/// Convert an assistant reply into display HTML.
///
/// Existing HTML passes through untouched. Otherwise angle brackets are
/// escaped first, then bold, italic, inline code, line breaks and list
/// prefixes are applied in that order.
pub fn format_message(message: &str) -> String {
    if message.is_empty() {
        return String::new();
    }
    if looks_like_html(message) {
        return message.to_string();
    }

    let escaped = message.replace('<', "&lt;").replace('>', "&gt;");

    let out = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    let out = BOLD_ALT.replace_all(&out, "<strong>$1</strong>");
    let out = ITALIC.replace_all(&out, "<em>$1</em>");
    let out = ITALIC_ALT.replace_all(&out, "<em>$1</em>");
    let out = CODE.replace_all(&out, "<code>$1</code>");
    let out = out.replace('\n', "<br>");
    let out = BULLET.replace_all(&out, "<br>• $1");
    let out = NUMBERED.replace_all(&out, "<br>${0}");

    out.into_owned()
}

/// Escape text for insertion into an HTML fragment
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_italic_code() {
        let html = format_message("Use **urea** with *care* and `50kg`");
        assert_eq!(
            html,
            "Use <strong>urea</strong> with <em>care</em> and <code>50kg</code>"
        );
    }

    #[test]
    fn test_escapes_tags_before_formatting() {
        let html = format_message("a <script> b");
        assert_eq!(html, "a &lt;script&gt; b");
    }

    #[test]
    fn test_existing_html_passes_through() {
        let msg = "<p>already <strong>formatted</strong></p>";
        assert_eq!(format_message(msg), msg);
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(format_message("line one\nline two"), "line one<br>line two");
    }

    #[test]
    fn test_leading_list_markers() {
        assert_eq!(format_message("• first"), "<br>• first");
        assert_eq!(format_message("1. sow early"), "<br>1. sow early");
    }

    #[test]
    fn test_unicode_asterisks() {
        assert_eq!(format_message("∗∗neem∗∗"), "<strong>neem</strong>");
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(format_message(""), "");
    }
}
