//! Page text cleanup before speech

use once_cell::sync::Lazy;
use regex::Regex;

/// A word split across lines with a hyphen: "exam-\nple"
static HYPHEN_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w)-[ \t]*\r?\n[ \t]*(\w)").expect("valid hyphen regex"));

/// Any run of whitespace, including line breaks
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Normalise extracted page text for the speech engine
///
/// PDF text comes out with hard line breaks wherever the layout wrapped.
/// Engines pause at every newline, so rejoin hyphenated words and collapse
/// whitespace into single spaces.
pub fn normalize_page_text(raw: &str) -> String {
    let joined = HYPHEN_BREAK.replace_all(raw, "$1$2");
    WHITESPACE.replace_all(&joined, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            normalize_page_text("  Chapter  one\n\nIt was\ta dark night. \n"),
            "Chapter one It was a dark night."
        );
    }

    #[test]
    fn test_joins_hyphenated_line_breaks() {
        assert_eq!(normalize_page_text("an exam-\nple of text"), "an example of text");
        assert_eq!(normalize_page_text("exam- \r\n  ple"), "example");
    }

    #[test]
    fn test_keeps_ordinary_hyphens() {
        assert_eq!(normalize_page_text("well-known fact"), "well-known fact");
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(normalize_page_text(""), "");
        assert_eq!(normalize_page_text(" \n\t "), "");
    }
}
