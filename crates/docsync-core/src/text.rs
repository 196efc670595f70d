//! Line-oriented text utilities for doc comment handling.
//!
//! Doc comments arrive from hosts with either line ending convention. All
//! helpers here treat `\r\n` and `\n` alike and always produce `\n`.

use std::borrow::Cow;

/// Convert `\r\n` line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Number of line breaks in the text.
pub fn newline_count(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

/// Number of lines in the text. Empty text has zero lines.
pub fn line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        newline_count(text) + 1
    }
}

/// Strip leading and trailing whitespace from every line.
pub fn trim_each_line(text: &str) -> String {
    normalize_line_endings(text)
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip trailing whitespace from every line.
pub fn trim_trailing_whitespace(text: &str) -> String {
    normalize_line_endings(text)
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_counting() {
        assert_eq!(line_count(""), 0);
        assert_eq!(line_count("/** @see A#f() */"), 1);
        assert_eq!(line_count("/**\n * @see A#f()\n */"), 3);
        assert_eq!(newline_count("/**\n */"), 1);
    }

    #[test]
    fn trims_every_line() {
        assert_eq!(trim_each_line("  /**\r\n   * A  \n   */ "), "/**\n* A\n*/");
    }

    #[test]
    fn trims_trailing_only() {
        assert_eq!(trim_trailing_whitespace(" * a  \n *\t"), " * a\n *");
    }

    #[test]
    fn crlf_normalized() {
        assert_eq!(normalize_line_endings("a\r\nb"), "a\nb");
        assert!(matches!(normalize_line_endings("a\nb"), Cow::Borrowed(_)));
    }
}
