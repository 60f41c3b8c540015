//! Inline HTML, entity references and backslash escapes.
//!
//! Tag recognition is a small hand-written scanner rather than a general
//! HTML parser: it only decides how many bytes form one tag, comment or
//! closing tag, and the matched text is passed through verbatim.

use crate::Options;
use crate::element::Element;

use super::{Excerpt, Inline};

/// Characters a backslash can escape.
const ESCAPABLE: &[u8] = b"\\`*_{}[]()>#+-.!|~";

/// Whitespace as the pattern engine sees it, byte-wise.
#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

#[inline]
fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[inline]
fn count(bytes: &[u8], from: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes.get(from..).map_or(0, |rest| rest.iter().take_while(|&&b| pred(b)).count())
}

/// One attribute: a name, optionally `=` and a value. Returns the bytes
/// consumed from `from`, or `None` if no attribute name starts there.
fn scan_attribute(bytes: &[u8], from: usize) -> Option<usize> {
    let first = *bytes.get(from)?;
    if !(first.is_ascii_alphabetic() || first == b'_' || first == b':') {
        return None;
    }
    let mut pos = from + 1;
    pos += count(bytes, pos, |b| is_word(b) || matches!(b, b':' | b'.' | b'-'));

    // the value is all-or-nothing
    let eq = pos + count(bytes, pos, is_space);
    if bytes.get(eq) != Some(&b'=') {
        return Some(pos - from);
    }
    let value = eq + 1 + count(bytes, eq + 1, is_space);
    let end = match bytes.get(value) {
        Some(&quote @ (b'"' | b'\'')) => memchr::memchr(quote, &bytes[value + 1..]).map(|len| value + len + 2),
        Some(_) => {
            let run = count(bytes, value, |b| !is_space(b) && !b"\"'=<>`".contains(&b));
            (run > 0).then_some(value + run)
        }
        None => None,
    };
    Some(end.unwrap_or(pos) - from)
}

/// Attributes, spaces and the closing `/?>` of a tag whose name ends at
/// `from`. Returns the position just past `>`.
fn scan_tag_tail(bytes: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    loop {
        let spaces = count(bytes, pos, |b| b == b' ');
        match scan_attribute(bytes, pos + spaces) {
            Some(len) => pos += spaces + len,
            None => break,
        }
    }
    pos += count(bytes, pos, |b| b == b' ');
    if bytes.get(pos) == Some(&b'/') {
        pos += 1;
    }
    (bytes.get(pos) == Some(&b'>')).then_some(pos + 1)
}

/// Match a tag that may open a markup block: `<name attrs>`,
/// `</name>` or `<name/>`. Returns the tag name, which may be empty.
///
/// The name is the longest word prefix that still lets the rest of the
/// tag parse, so `<x-y>` yields an empty name with `x-y` as attribute.
pub(crate) fn scan_block_tag(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }
    let name_start = if bytes.get(1) == Some(&b'/') { 2 } else { 1 };
    let longest = name_start + count(bytes, name_start, is_word);
    // a shorter name may leave its tail to be read as an attribute
    (name_start..=longest)
        .rev()
        .find(|&name_end| scan_tag_tail(bytes, name_end).is_some())
        .map(|name_end| &text[name_start..name_end])
}

/// `</name >`
fn scan_closing_tag(bytes: &[u8]) -> Option<usize> {
    if !bytes.starts_with(b"</") || !bytes.get(2).copied().is_some_and(is_word) {
        return None;
    }
    let mut pos = 3 + count(bytes, 3, |b| is_word(b) || b == b'-');
    pos += count(bytes, pos, |b| b == b' ');
    (bytes.get(pos) == Some(&b'>')).then_some(pos + 1)
}

/// `<!-- ... -->` where the body never holds two dashes in a row.
fn scan_comment(bytes: &[u8]) -> Option<usize> {
    if !bytes.starts_with(b"<!--") {
        return None;
    }
    let mut pos = 4;
    if bytes.get(pos) == Some(&b'-') {
        pos += 1;
    }
    match bytes.get(pos) {
        Some(b'>' | b'-') | None => return None,
        Some(_) => pos += 1,
    }
    loop {
        let dash = usize::from(bytes.get(pos) == Some(&b'-'));
        match bytes.get(pos + dash) {
            Some(&b) if b != b'-' => pos += dash + 1,
            _ => break,
        }
    }
    bytes[pos..].starts_with(b"-->").then_some(pos + 3)
}

/// `<name attrs>` or `<name attrs/>`
fn scan_open_tag(bytes: &[u8]) -> Option<usize> {
    if !bytes.get(1).copied().is_some_and(is_word) {
        return None;
    }
    let name_end = 2 + count(bytes, 2, |b| is_word(b) || b == b'-');
    scan_tag_tail(bytes, name_end)
}

pub(super) fn parse_markup(excerpt: &Excerpt<'_>, options: &Options) -> Option<Inline> {
    let text = excerpt.text;
    let bytes = text.as_bytes();
    if options.markup_escaped || options.safe_mode || memchr::memchr(b'>', bytes).is_none() {
        return None;
    }

    let len = match bytes.get(1) {
        Some(b'/') => scan_closing_tag(bytes),
        Some(b'!') => scan_comment(bytes),
        Some(b' ') | None => None,
        Some(_) => scan_open_tag(bytes),
    }?;
    Some(Inline::new(len, Element::raw(&text[..len])))
}

pub(super) fn parse_special_character(excerpt: &Excerpt<'_>) -> Option<Inline> {
    let bytes = excerpt.text.as_bytes();
    if bytes.get(1) == Some(&b' ') {
        return None;
    }
    let hash = usize::from(bytes.get(1) == Some(&b'#'));
    let name_start = 1 + hash;
    let name = count(bytes, name_start, |b| b.is_ascii_alphanumeric());
    let semi = name_start + name;
    if name == 0 || bytes.get(semi) != Some(&b';') {
        return None;
    }
    let entity = &excerpt.text[..=semi];
    Some(Inline::new(entity.len(), Element::raw(entity)))
}

pub(super) fn parse_escape_sequence(excerpt: &Excerpt<'_>) -> Option<Inline> {
    let escaped = *excerpt.text.as_bytes().get(1)?;
    if !ESCAPABLE.contains(&escaped) {
        return None;
    }
    Some(Inline::new(2, Element::raw(char::from(escaped).to_string())))
}
