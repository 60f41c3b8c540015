//! Physical line normalization: tab expansion and indent measurement.

use std::borrow::Cow;

/// Characters treated as insignificant at the edges of a line.
pub const EDGE_WHITESPACE: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0B'];

/// One tab-expanded input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The full line after tab expansion.
    pub body: String,
    /// Width of the leading space run.
    pub indent: usize,
}

impl Line {
    /// Normalize a raw, non-blank line.
    pub fn new(raw: &str) -> Self {
        let body = expand_tabs(raw).into_owned();
        let indent = body.bytes().take_while(|&b| b == b' ').count();
        Self { body, indent }
    }

    /// The line with its indentation removed.
    #[inline]
    pub fn text(&self) -> &str {
        &self.body[self.indent..]
    }

    /// First byte of the dedented text.
    #[inline]
    pub fn marker(&self) -> Option<u8> {
        self.text().as_bytes().first().copied()
    }

    /// The body with its first `n` columns dropped.
    #[inline]
    pub fn body_from(&self, n: usize) -> &str {
        self.body.get(n..).unwrap_or("")
    }
}

/// A line with nothing but whitespace and control padding.
#[inline]
pub fn is_blank(raw: &str) -> bool {
    raw.trim_end_matches(EDGE_WHITESPACE).is_empty()
}

/// Expand each tab to the next multiple-of-4 column, counting columns
/// in characters emitted so far on the line.
pub fn expand_tabs(raw: &str) -> Cow<'_, str> {
    if memchr::memchr(b'\t', raw.as_bytes()).is_none() {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len() + 8);
    let mut column = 0usize;
    for ch in raw.chars() {
        if ch == '\t' {
            let shortage = 4 - column % 4;
            out.extend(std::iter::repeat_n(' ', shortage));
            column += shortage;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    Cow::Owned(out)
}

/// Trim edge whitespace from both ends.
#[inline]
pub fn trim_edges(s: &str) -> &str {
    s.trim_matches(EDGE_WHITESPACE)
}

/// Split a document into lines: normalize line endings and drop
/// surrounding newlines.
pub fn split_document(text: &str) -> Vec<String> {
    let normalized = if memchr::memchr(b'\r', text.as_bytes()).is_some() {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    };
    normalized
        .trim_matches('\n')
        .split('\n')
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_measurement() {
        let line = Line::new("   - item");
        assert_eq!(line.indent, 3);
        assert_eq!(line.text(), "- item");
        assert_eq!(line.marker(), Some(b'-'));
    }

    #[test]
    fn test_tab_expansion_relative_to_column() {
        assert_eq!(expand_tabs("\tx"), "    x");
        assert_eq!(expand_tabs("ab\tx"), "ab  x");
        assert_eq!(expand_tabs("abcd\tx"), "abcd    x");
        assert_eq!(expand_tabs("\t\tx"), "        x");
    }

    #[test]
    fn test_tab_expansion_counts_characters() {
        assert_eq!(expand_tabs("℣\tx"), "℣   x");
    }

    #[test]
    fn test_tab_indent() {
        let line = Line::new("\tcode");
        assert_eq!(line.indent, 4);
        assert_eq!(line.body_from(4), "code");
    }

    #[test]
    fn test_blank_lines() {
        assert!(is_blank(""));
        assert!(is_blank("  \t \r"));
        assert!(is_blank("\x0B\0"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_split_document() {
        assert_eq!(split_document("\n\na\r\nb\rc\n\n"), vec!["a", "b", "c"]);
        assert_eq!(split_document(""), vec![""]);
    }
}
