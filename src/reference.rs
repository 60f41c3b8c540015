//! Reference definitions (`[id]: url "title"`).

use std::collections::HashMap;

use rustc_hash::FxBuildHasher as FastHashBuilder;

/// A reference definition (URL + optional title).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub url: String,
    pub title: Option<String>,
}

/// Per-document table of reference definitions, keyed by lowercased id.
///
/// A later definition with the same id replaces the earlier one, so every
/// reference in the document resolves to the last definition.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    by_id: HashMap<String, Reference, FastHashBuilder>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a definition. Last definition wins.
    pub fn insert(&mut self, id: &str, reference: Reference) {
        let key = normalize_id(id);
        if self.by_id.insert(key, reference).is_some() {
            log::trace!("reference `{id}` redefined");
        }
    }

    pub fn get(&self, id: &str) -> Option<&Reference> {
        self.by_id.get(&normalize_id(id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Ids compare ASCII case-insensitively.
#[inline]
pub fn normalize_id(id: &str) -> String {
    id.to_ascii_lowercase()
}

/// Scan a dedented line for a reference definition.
///
/// The id is matched lazily: each `]:` is tried in turn and the first
/// one that leaves a valid destination wins. The destination may be
/// wrapped in angle brackets; the title is delimited by `"`, `'` or
/// `(` on the left and `"`, `'` or `)` on the right.
pub fn scan_definition(text: &str) -> Option<(&str, Reference)> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'[') || memchr::memchr(b']', bytes).is_none() {
        return None;
    }

    // id must be at least one byte, so the first candidate `]` is at 2
    let mut search = 2;
    while let Some(offset) = memchr::memchr(b']', bytes.get(search..)?) {
        let close = search + offset;
        if bytes.get(close + 1) == Some(&b':') {
            if let Some(reference) = scan_destination(&text[close + 2..]) {
                return Some((&text[1..close], reference));
            }
        }
        search = close + 1;
    }
    None
}

fn scan_destination(rest: &str) -> Option<Reference> {
    let rest = rest.trim_start_matches(' ');
    let bytes = rest.as_bytes();
    let word_end = bytes
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    if word_end == 0 {
        return None;
    }
    let word = &rest[..word_end];
    let url = strip_angle_brackets(word);

    let tail = &rest[word_end..];
    if tail.bytes().all(|b| b == b' ') {
        return Some(Reference {
            url: url.to_string(),
            title: None,
        });
    }

    let title = scan_title(tail)?;
    Some(Reference {
        url: url.to_string(),
        title: Some(title.to_string()),
    })
}

/// Each bracket is optional on its own, and the url keeps at least one byte.
fn strip_angle_brackets(word: &str) -> &str {
    let inner = match word.strip_prefix('<') {
        Some(inner) if !inner.is_empty() => inner,
        _ => word,
    };
    match inner.strip_suffix('>') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => inner,
    }
}

/// `[ ]+` opener, body of at least one byte, closer, then spaces.
fn scan_title(tail: &str) -> Option<&str> {
    let after_spaces = tail.trim_start_matches(' ');
    if after_spaces.len() == tail.len() {
        return None;
    }
    let bytes = after_spaces.as_bytes();
    if !matches!(bytes.first(), Some(b'"' | b'\'' | b'(')) {
        return None;
    }
    let trimmed = after_spaces.trim_end_matches(' ');
    let last = trimmed.as_bytes().last()?;
    if !matches!(last, b'"' | b'\'' | b')') || trimmed.len() < 3 {
        return None;
    }
    Some(&trimmed[1..trimmed.len() - 1])
}
