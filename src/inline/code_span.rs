//! Backtick code spans.
//!
//! The closer is the first later backtick run of exactly the opener's
//! length. Spaces just inside the delimiters are dropped and interior
//! line endings collapse to a single space.

use crate::element::{Content, Element};
use crate::limits::MAX_CODE_SPAN_BACKTICKS;

use super::{Excerpt, Inline};

/// Whether a run of exactly `len` backticks starts at `pos`.
#[inline]
fn is_closer(bytes: &[u8], pos: usize, len: usize) -> bool {
    if pos == 0 || bytes[pos - 1] == b'`' {
        return false;
    }
    let run = bytes[pos..].iter().take_while(|&&b| b == b'`').count();
    run == len
}

/// First closing run at or after `from`.
fn find_closer(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut pos = from;
    while pos < bytes.len() {
        let tick = pos + memchr::memchr(b'`', &bytes[pos..])?;
        if is_closer(bytes, tick, len) {
            return Some(tick);
        }
        pos = tick + bytes[tick..].iter().take_while(|&&b| b == b'`').count();
    }
    None
}

/// Replace every newline, with any spaces before it, by one space.
fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (index, piece) in text.split('\n').enumerate() {
        if index > 0 {
            out.truncate(out.trim_end_matches(' ').len());
            out.push(' ');
        }
        out.push_str(piece);
    }
    out
}

pub(super) fn parse(excerpt: &Excerpt<'_>) -> Option<Inline> {
    let text = excerpt.text;
    let bytes = text.as_bytes();
    let opener = bytes.iter().take_while(|&&b| b == b'`').count();
    if opener > MAX_CODE_SPAN_BACKTICKS {
        return None;
    }

    let padded = opener + bytes[opener..].iter().take_while(|&&b| b == b' ').count();

    // Content holds at least one byte. If only spaces precede the closer,
    // give one back to the content.
    let (start, close) = (opener..=padded)
        .rev()
        .find_map(|start| find_closer(bytes, start + 1, opener).map(|close| (start, close)))?;

    let trailing = bytes[start + 1..close].iter().rev().take_while(|&&b| b == b' ').count();
    let end = close - trailing;

    let code = collapse_newlines(&text[start..end]);
    let element = Element::tag("code").with_content(Content::Text(code));
    Some(Inline::new(close + opener, element))
}
