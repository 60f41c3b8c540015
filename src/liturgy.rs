//! Liturgical annotations.
//!
//! Inline symbols (`[+]`, `[*]`, `[t]`), red text, over- and underlined
//! text, and the single-line responsory and intercession blocks. Every
//! construct renders either wrapped in a classed element or bare,
//! depending on [`Options::liturgical_markup`].

use crate::Options;
use crate::element::{Content, Element};
use crate::inline::{Excerpt, Inline, InlineKind};

const OVERLINE: &str = "‾";

/// `[+]`, `[*]` and `[t]`: marker, class and raw symbol.
fn symbol(kind: InlineKind) -> Option<(&'static str, &'static str, &'static str)> {
    match kind {
        InlineKind::LiturgicalCross => Some(("[+]", "symbol-cross", "&#10011;")),
        InlineKind::LiturgicalMidpoint => Some(("[*]", "symbol-star", "*")),
        InlineKind::LiturgicalDagger => Some(("[t]", "symbol-dagger", "&#8224;")),
        _ => None,
    }
}

/// Wrap `content` in a classed span, or leave it bare.
fn span(class: &'static str, content: Content, wrapped: bool) -> Element {
    let element = Element::default().with_content(content);
    if wrapped {
        Element {
            name: Some("span"),
            ..element
        }
        .with_attr("class", class)
    } else {
        element
    }
}

/// Text between `open` and the first following `close`.
fn delimited<'a>(text: &'a str, open: &str, close: &str) -> Option<(&'a str, usize)> {
    let body = text.strip_prefix(open)?;
    let len = body.find(close)?;
    Some((&body[..len], open.len() + len + close.len()))
}

/// Over/underline forms, tried in order.
fn scan_line_decoration(text: &str) -> Option<(&'static str, &str, usize)> {
    const BOTH: &str = "text-overline text-underline";
    const UNDER_OVER: &str = "_‾";
    const OVER_UNDER: &str = "‾_";

    delimited(text, UNDER_OVER, OVER_UNDER)
        .or_else(|| delimited(text, OVER_UNDER, UNDER_OVER))
        .map(|(body, extent)| (BOTH, body, extent))
        .or_else(|| delimited(text, OVERLINE, OVERLINE).map(|(body, extent)| ("text-overline", body, extent)))
        .or_else(|| delimited(text, "_", "_").map(|(body, extent)| ("text-underline", body, extent)))
}

/// Inline handler for every liturgical kind.
pub(crate) fn parse_inline(kind: InlineKind, excerpt: &Excerpt<'_>, options: &Options) -> Option<Inline> {
    let wrapped = options.liturgical_markup;
    let text = excerpt.text;

    if let Some((marker, class, raw)) = symbol(kind) {
        if !text.starts_with(marker) {
            return None;
        }
        let mut element = span(class, Content::Raw(raw.to_string()), wrapped);
        // the star is plain text, the other symbols are entities
        element.safe_raw = kind != InlineKind::LiturgicalMidpoint;
        return Some(Inline::new(marker.len(), element));
    }

    let (class, body, extent) = match kind {
        InlineKind::TextRed => {
            let (body, extent) = delimited(text, "[red]", "[/red]")?;
            ("color-red", body, extent)
        }
        InlineKind::OverUnderLine => scan_line_decoration(text)?,
        _ => return None,
    };
    Some(Inline::new(extent, span(class, Content::Text(body.to_string()), wrapped)))
}

/// The single-line liturgical blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiturgicalBlock {
    Versicle,
    Response,
    IntercessionIntro,
    IntercessionResponse,
    IntentionPart1,
    IntentionPart2,
}

impl LiturgicalBlock {
    const MARKERS: [(&'static str, LiturgicalBlock); 6] = [
        ("[V]", LiturgicalBlock::Versicle),
        ("[R]", LiturgicalBlock::Response),
        ("[II]", LiturgicalBlock::IntercessionIntro),
        ("[IR]", LiturgicalBlock::IntercessionResponse),
        ("[I1]", LiturgicalBlock::IntentionPart1),
        ("[I2]", LiturgicalBlock::IntentionPart2),
    ];

    fn class(self) -> &'static str {
        match self {
            LiturgicalBlock::Versicle => "versicle",
            LiturgicalBlock::Response => "response",
            LiturgicalBlock::IntercessionIntro => "intercession-intro",
            LiturgicalBlock::IntercessionResponse => "intercession-response",
            LiturgicalBlock::IntentionPart1 => "intention-part1",
            LiturgicalBlock::IntentionPart2 => "intention-part2",
        }
    }

    /// Leading symbol class and entity, for the responsory lines.
    fn symbol(self) -> Option<(&'static str, &'static str)> {
        match self {
            LiturgicalBlock::Versicle => Some(("symbol-versicle", "&#8483;")),
            LiturgicalBlock::Response => Some(("symbol-response", "&#8479;")),
            _ => None,
        }
    }
}

/// Split a dedented line into its block marker and the trimmed rest.
fn scan_block_marker(text: &str) -> Option<(LiturgicalBlock, &str)> {
    LiturgicalBlock::MARKERS.iter().find_map(|&(marker, block)| {
        let rest = text.strip_prefix(marker)?;
        (rest.is_empty() || rest.starts_with(' ')).then(|| (block, rest.trim_matches(' ')))
    })
}

/// Build the element for a liturgical block line, if it is one.
pub(crate) fn block_element(text: &str, options: &Options) -> Option<Element> {
    let (block, rest) = scan_block_marker(text)?;
    let wrapped = options.liturgical_markup;

    let mut element = match block.symbol() {
        Some((symbol_class, entity)) => {
            let mut symbol = span(symbol_class, Content::Raw(entity.to_string()), wrapped).with_autobreak(false);
            symbol.safe_raw = true;

            let mut children = vec![symbol];
            if !rest.is_empty() {
                children.push(Element::pending_line(None, format!(" {rest}")));
            }
            Element::tag("p").with_content(Content::Children(children))
        }
        None => Element::pending_line(Some("p"), rest),
    };
    if wrapped {
        element.set_attr("class", Some(block.class().to_string()));
    }
    log::trace!("liturgical block {block:?}");
    Some(element)
}
