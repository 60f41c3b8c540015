//! `~~deleted~~` text.

use crate::element::Element;

use super::{Excerpt, Inline};

/// Whitespace as the pattern engine sees it, byte-wise.
#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

pub(super) fn parse(excerpt: &Excerpt<'_>) -> Option<Inline> {
    let text = excerpt.text;
    let bytes = text.as_bytes();
    if !text.starts_with("~~") || bytes.get(2).is_none_or(|&b| is_space(b)) {
        return None;
    }

    // content stays on one line
    let line_end = memchr::memchr(b'\n', bytes).unwrap_or(bytes.len());
    let close = (3..line_end)
        .find(|&pos| bytes[pos..].starts_with(b"~~") && !is_space(bytes[pos - 1]))?;

    let element = Element::pending_line(Some("del"), &text[2..close]);
    Some(Inline::new(close + 2, element))
}
