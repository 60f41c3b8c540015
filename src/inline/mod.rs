//! Inline scanner.
//!
//! Works marker by marker over one logical line:
//! 1. Find the next marker character
//! 2. Try every inline kind registered for it, in priority order,
//!    skipping kinds the context forbids
//! 3. On a match, flush the literal text before it and emit the element;
//!    on a miss, flush through the marker and keep scanning
//!
//! Nested content (emphasis, link labels) is not scanned here. The
//! returned elements carry it as pending lines for the renderer.

mod code_span;
mod emphasis;
pub mod kind;
mod links;
pub(crate) mod markup;
mod strikethrough;
pub(crate) mod text;

use std::borrow::Cow;

pub use kind::{InlineKind, InlineSet, UnknownInlineKind};

use crate::Options;
use crate::element::{Content, Element};
use crate::liturgy;
use crate::reference::ReferenceTable;

/// The text from a marker onwards, plus the whole remaining line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Excerpt<'a> {
    /// Starts at the marker.
    pub text: &'a str,
    /// The unscanned remainder of the line, marker included.
    pub context: &'a str,
}

/// A matched inline span.
#[derive(Debug)]
pub(crate) struct Inline {
    /// Bytes consumed, counted from `position`.
    pub extent: usize,
    /// Start of the span within the context, when it is not the marker.
    pub position: Option<usize>,
    pub element: Element,
}

impl Inline {
    pub fn new(extent: usize, element: Element) -> Self {
        Self {
            extent,
            position: None,
            element,
        }
    }
}

/// A marker character. `‾` is the only multi-byte one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Ascii(u8),
    Overline,
}

const OVERLINE: &str = "‾";

impl Marker {
    fn len(self) -> usize {
        match self {
            Marker::Ascii(_) => 1,
            Marker::Overline => OVERLINE.len(),
        }
    }

    /// Inline kinds for this marker, in priority order.
    fn kinds(self, liturgical: bool) -> &'static [InlineKind] {
        use InlineKind::*;
        match self {
            Marker::Ascii(b'!') => &[Image],
            Marker::Ascii(b'&') => &[SpecialCharacter],
            Marker::Ascii(b'*') => &[Emphasis],
            Marker::Ascii(b':') => &[Url],
            Marker::Ascii(b'<') => &[UrlTag, EmailTag, Markup],
            Marker::Ascii(b'[') if liturgical => &[
                Link,
                LiturgicalCross,
                LiturgicalMidpoint,
                LiturgicalDagger,
                TextRed,
            ],
            Marker::Ascii(b'[') => &[Link],
            Marker::Ascii(b'`') => &[Code],
            Marker::Ascii(b'~') => &[Strikethrough],
            Marker::Ascii(b'\\') => &[EscapeSequence],
            Marker::Ascii(b'_') if liturgical => &[OverUnderLine],
            Marker::Overline if liturgical => &[OverUnderLine],
            _ => &[],
        }
    }
}

/// Lookup table of ASCII marker bytes, always active.
const MARKER_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    let markers = b"!&*:<[`~\\";
    let mut i = 0;
    while i < markers.len() {
        table[markers[i] as usize] = true;
        i += 1;
    }
    table
};

/// Find the first marker in `text`.
fn find_marker(text: &str, liturgical: bool) -> Option<(usize, Marker)> {
    let bytes = text.as_bytes();
    let overline = OVERLINE.as_bytes();
    for (pos, &b) in bytes.iter().enumerate() {
        if MARKER_TABLE[b as usize] {
            return Some((pos, Marker::Ascii(b)));
        }
        if liturgical {
            if b == b'_' {
                return Some((pos, Marker::Ascii(b)));
            }
            if b == overline[0] && bytes[pos..].starts_with(overline) {
                return Some((pos, Marker::Overline));
            }
        }
    }
    None
}

/// Inline scanner over one logical line.
pub struct InlineParser<'a> {
    options: &'a Options,
    refs: &'a ReferenceTable,
}

impl<'a> InlineParser<'a> {
    pub fn new(options: &'a Options, refs: &'a ReferenceTable) -> Self {
        Self { options, refs }
    }

    /// Scan `text` into inline elements. Kinds in `forbidden` are never
    /// produced, and every produced element inherits the set.
    pub fn parse(&self, text: &str, forbidden: InlineSet) -> Vec<Element> {
        let text = if memchr::memchr(b'\r', text.as_bytes()).is_some() {
            Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
        } else {
            Cow::Borrowed(text)
        };
        let liturgical = self.options.liturgical_elements;

        let mut elements = Vec::new();
        let mut rest: &str = &text;

        while let Some((marker_pos, marker)) = find_marker(rest, liturgical) {
            let excerpt = Excerpt {
                text: &rest[marker_pos..],
                context: rest,
            };

            let matched = marker
                .kinds(liturgical)
                .iter()
                .filter(|kind| !forbidden.contains(**kind))
                .find_map(|&kind| {
                    let inline = self.dispatch(kind, &excerpt)?;
                    let position = inline.position.unwrap_or(marker_pos);
                    // the span must belong to this marker
                    (position <= marker_pos).then_some((position, inline))
                });

            match matched {
                Some((position, mut inline)) => {
                    if let Content::Pending(pending) = &mut inline.element.content {
                        pending.forbidden = pending.forbidden.union(forbidden);
                    }
                    elements.push(self.text(&rest[..position]));
                    elements.push(inline.element);
                    rest = &rest[position + inline.extent..];
                }
                None => {
                    let end = marker_pos + marker.len();
                    elements.push(self.text(&rest[..end]));
                    rest = &rest[end..];
                }
            }
        }

        elements.push(self.text(rest));

        for element in &mut elements {
            element.autobreak.get_or_insert(false);
        }
        elements
    }

    fn text(&self, text: &str) -> Element {
        text::text_element(text, self.options.breaks_enabled, self.options.suppress_alleluia)
    }

    fn dispatch(&self, kind: InlineKind, excerpt: &Excerpt<'_>) -> Option<Inline> {
        let options = self.options;
        match kind {
            InlineKind::Code => code_span::parse(excerpt),
            InlineKind::EmailTag => links::parse_email_tag(excerpt),
            InlineKind::Emphasis => emphasis::parse(excerpt),
            InlineKind::EscapeSequence => markup::parse_escape_sequence(excerpt),
            InlineKind::Image => links::parse_image(excerpt, self.refs),
            InlineKind::Link => links::parse_link(excerpt, self.refs),
            InlineKind::Markup => markup::parse_markup(excerpt, options),
            InlineKind::SpecialCharacter => markup::parse_special_character(excerpt),
            InlineKind::Strikethrough => strikethrough::parse(excerpt),
            InlineKind::Url => links::parse_url(excerpt, options),
            InlineKind::UrlTag => links::parse_url_tag(excerpt),
            InlineKind::LiturgicalCross
            | InlineKind::LiturgicalMidpoint
            | InlineKind::LiturgicalDagger
            | InlineKind::TextRed
            | InlineKind::OverUnderLine => liturgy::parse_inline(kind, excerpt, options),
        }
    }
}
