//! Star emphasis (`*em*`) and strong emphasis (`**strong**`).
//!
//! The content between delimiters is a sequence of units. A unit is an
//! escaped star, any non-star byte, or a balanced inner star group. The
//! closer is the nearest delimiter reachable by whole units, which keeps
//! `**a *b* c**` together and lets `*a **b** c*` nest.
//!
//! The scan walks unit by unit and gives up at the first star that is
//! neither a closer nor the start of an inner group, so a failed opener
//! costs no more than the distance to that star.

use crate::element::Element;

use super::{Excerpt, Inline};

/// Which delimiter pair is being matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strength {
    Em,
    Strong,
}

impl Strength {
    #[inline]
    fn len(self) -> usize {
        match self {
            Strength::Em => 1,
            Strength::Strong => 2,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Strength::Em => "em",
            Strength::Strong => "strong",
        }
    }

    /// A closing delimiter at `pos` that is not followed by another star.
    #[inline]
    fn closes_at(self, bytes: &[u8], pos: usize) -> bool {
        let end = pos + self.len();
        end <= bytes.len() && bytes[pos..end].iter().all(|&b| b == b'*') && bytes.get(end) != Some(&b'*')
    }

    /// Where an inner star group starting at `pos` ends, if it is one.
    fn inner_group(self, bytes: &[u8], pos: usize) -> Option<usize> {
        match self {
            // `*` ... `*` with no stars between
            Strength::Strong => memchr::memchr(b'*', &bytes[pos + 1..]).map(|off| pos + 1 + off + 1),
            // `**` + at least one non-star + `**`
            Strength::Em => {
                if bytes.get(pos + 1) != Some(&b'*') {
                    return None;
                }
                let body = pos + 2;
                let run = bytes[body..].iter().take_while(|&&b| b != b'*').count();
                let close = body + run;
                (run > 0 && bytes.get(close + 1) == Some(&b'*')).then_some(close + 2)
            }
        }
    }
}

/// Find the content end for a delimiter pair opening at the start.
///
/// Every unit has exactly one successor, so reachability is a single
/// walk that stops at the first star no unit can cover.
fn find_close(bytes: &[u8], strength: Strength) -> Option<usize> {
    let start = strength.len();
    let mut pos = start;
    while pos < bytes.len() {
        if pos > start && strength.closes_at(bytes, pos) {
            return Some(pos);
        }
        pos = match bytes[pos] {
            // an escaped star never closes
            b'\\' if bytes.get(pos + 1) == Some(&b'*') => pos + 2,
            b'*' => strength.inner_group(bytes, pos)?,
            _ => pos + 1,
        };
    }
    None
}

pub(super) fn parse(excerpt: &Excerpt<'_>) -> Option<Inline> {
    let text = excerpt.text;
    let bytes = text.as_bytes();

    let strong = (bytes.get(1) == Some(&b'*'))
        .then(|| find_close(bytes, Strength::Strong).map(|end| (Strength::Strong, end)))
        .flatten();
    let (strength, end) = match strong {
        Some(found) => found,
        None => (Strength::Em, find_close(bytes, Strength::Em)?),
    };

    let element = Element::pending_line(Some(strength.tag()), &text[strength.len()..end]);
    Some(Inline::new(end + strength.len(), element))
}
