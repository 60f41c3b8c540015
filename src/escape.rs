//! HTML escaping utilities.
//!
//! Fast path: a memchr scan decides whether anything needs escaping,
//! so clean segments are bulk-copied without going through the encoder.

use memchr::{memchr, memchr2, memchr3};

/// Escape text content into `out`.
///
/// Escapes `&`, `<`, `>` and `"`. Single quotes pass through.
///
/// # Example
/// ```
/// let mut out = String::new();
/// litmark::escape::escape_text_into(&mut out, "a < \"b\"");
/// assert_eq!(out, "a &lt; &quot;b&quot;");
/// ```
#[inline]
pub fn escape_text_into(out: &mut String, input: &str) {
    if !needs_text_escape(input) {
        out.push_str(input);
        return;
    }
    html_escape::encode_double_quoted_attribute_to_string(input, out);
}

/// Escape an attribute value into `out`.
///
/// Escapes `&`, `<`, `>`, `"` and `'`, the last as `&#039;`.
#[inline]
pub fn escape_attr_into(out: &mut String, input: &str) {
    if !needs_attr_escape(input) {
        out.push_str(input);
        return;
    }
    let mut segments = input.split('\'');
    if let Some(first) = segments.next() {
        escape_text_into(out, first);
    }
    for segment in segments {
        out.push_str("&#039;");
        escape_text_into(out, segment);
    }
}

/// Escape text content to a new string.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    escape_text_into(&mut out, input);
    out
}

/// Check if text content needs any escaping.
#[inline]
pub fn needs_text_escape(input: &str) -> bool {
    let bytes = input.as_bytes();
    memchr3(b'<', b'>', b'&', bytes).is_some() || memchr(b'"', bytes).is_some()
}

/// Check if an attribute value needs any escaping.
#[inline]
pub fn needs_attr_escape(input: &str) -> bool {
    let bytes = input.as_bytes();
    memchr3(b'<', b'>', b'&', bytes).is_some() || memchr2(b'"', b'\'', bytes).is_some()
}

/// ASCII case-insensitive prefix test.
#[inline]
pub fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.len() >= prefix.len()
        && haystack.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
