//! Link and image parsing.
//!
//! Handles:
//! - Inline links: `[text](url "title")`
//! - Reference links: `[text][id]`, `[text][]` and `[text]`
//! - Images: `![alt](url "title")`
//! - Autolinks: `<https://example.com>` and `<email@example.com>`
//! - Bare URLs: `https://example.com` anywhere in running text

use crate::Options;
use crate::element::{Content, Element};
use crate::escape::starts_with_ignore_case;
use crate::limits::{MAX_BRACKET_DEPTH, MAX_HOSTNAME_LABEL};
use crate::reference::ReferenceTable;

use super::{Excerpt, Inline, InlineSet};

/// A matched link before it becomes an element.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkMatch<'a> {
    /// Bytes consumed from the opening bracket.
    extent: usize,
    /// Raw text between the outer brackets.
    label: &'a str,
    href: String,
    title: Option<String>,
}

/// Whitespace as the pattern engine sees it, byte-wise.
#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

#[inline]
fn skip_spaces(bytes: &[u8], from: usize) -> usize {
    from + bytes[from..].iter().take_while(|&&b| is_space(b)).count()
}

/// Match balanced brackets starting at `text[0] == '['`.
/// Returns the position of the closing `]`.
fn scan_label(bytes: &[u8]) -> Option<usize> {
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let mut depth = 0usize;
    for (pos, &b) in bytes.iter().enumerate() {
        match b {
            b'[' => {
                depth += 1;
                if depth > MAX_BRACKET_DEPTH {
                    return None;
                }
            }
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
    }
    None
}

/// Inline destination: `(href "title")`. Returns href, title and the
/// bytes consumed through the closing paren.
fn scan_inline_destination(text: &str) -> Option<(&str, Option<&str>, usize)> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'(') {
        return None;
    }

    let href_start = skip_spaces(bytes, 1);
    let mut pos = href_start;
    loop {
        match bytes.get(pos) {
            Some(b' ' | b')') | None => break,
            Some(b'(') => {
                // `(` + non-space, non-`)` bytes + `)`
                let run = bytes[pos + 1..]
                    .iter()
                    .take_while(|&&b| b != b' ' && b != b')')
                    .count();
                if run == 0 || bytes.get(pos + 1 + run) != Some(&b')') {
                    break;
                }
                pos += run + 2;
            }
            Some(_) => {
                pos += bytes[pos..]
                    .iter()
                    .take_while(|&&b| !matches!(b, b' ' | b'(' | b')'))
                    .count();
            }
        }
    }
    if pos == href_start {
        return None;
    }
    let href = &text[href_start..pos];

    let mut title = None;
    let spaces = bytes[pos..].iter().take_while(|&&b| b == b' ').count();
    if spaces > 0 {
        let quote_at = pos + spaces;
        if let Some(&quote @ (b'"' | b'\'')) = bytes.get(quote_at) {
            if let Some(len) = memchr::memchr(quote, &bytes[quote_at + 1..]) {
                title = Some(&text[quote_at + 1..quote_at + 1 + len]);
                pos = quote_at + len + 2;
            }
        }
    }

    let close = skip_spaces(bytes, pos);
    (bytes.get(close) == Some(&b')')).then_some((href, title, close + 1))
}

/// Reference suffix: optional whitespace, then `[id]` on one line.
/// Returns the id and the bytes consumed.
fn scan_reference_suffix(text: &str) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let open = skip_spaces(bytes, 0);
    if bytes.get(open) != Some(&b'[') {
        return None;
    }
    let id_start = open + 1;
    let len = bytes[id_start..]
        .iter()
        .position(|&b| b == b']' || b == b'\n')
        .filter(|&len| bytes[id_start + len] == b']')?;
    Some((&text[id_start..id_start + len], id_start + len + 1))
}

/// Match a link at the start of `text`.
fn scan_link<'a>(text: &'a str, refs: &ReferenceTable) -> Option<LinkMatch<'a>> {
    let close = scan_label(text.as_bytes())?;
    let label = &text[1..close];
    let mut extent = close + 1;
    let remainder = &text[extent..];

    if let Some((href, title, consumed)) = scan_inline_destination(remainder) {
        return Some(LinkMatch {
            extent: extent + consumed,
            label,
            href: href.to_string(),
            title: title.map(str::to_string),
        });
    }

    let id = match scan_reference_suffix(remainder) {
        Some((id, consumed)) => {
            extent += consumed;
            if id.is_empty() { label } else { id }
        }
        None => label,
    };

    let Some(reference) = refs.get(id) else {
        log::trace!("no reference definition for `{id}`");
        return None;
    };
    Some(LinkMatch {
        extent,
        label,
        href: reference.url.clone(),
        title: reference.title.clone(),
    })
}

pub(super) fn parse_link(excerpt: &Excerpt<'_>, refs: &ReferenceTable) -> Option<Inline> {
    let link = scan_link(excerpt.text, refs)?;
    let mut element = Element::pending_line(Some("a"), link.label);
    if let Content::Pending(pending) = &mut element.content {
        pending.forbidden = InlineSet::LINK_CONTEXT;
    }
    element.set_attr("href", Some(link.href));
    element.set_attr("title", link.title);
    Some(Inline::new(link.extent, element))
}

pub(super) fn parse_image(excerpt: &Excerpt<'_>, refs: &ReferenceTable) -> Option<Inline> {
    let rest = excerpt.text.strip_prefix('!')?;
    let link = scan_link(rest, refs)?;

    let mut element = Element::tag("img").with_autobreak(true);
    element.set_attr("src", Some(link.href));
    element.set_attr("alt", Some(link.label.to_string()));
    element.set_attr("title", link.title);
    Some(Inline::new(link.extent + 1, element))
}

/// `<a href="url">url</a>`
fn autolink(text: &str, href: String) -> Element {
    Element::tag("a")
        .with_content(Content::Text(text.to_string()))
        .with_attr("href", href)
}

pub(super) fn parse_url_tag(excerpt: &Excerpt<'_>) -> Option<Inline> {
    let bytes = excerpt.text.as_bytes();
    let scheme = bytes[1..]
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'_')
        .count();
    let after_scheme = 1 + scheme;
    if scheme == 0 || !bytes[after_scheme..].starts_with(b"://") {
        return None;
    }
    let rest_start = after_scheme + 3;
    let rest = bytes[rest_start..]
        .iter()
        .take_while(|&&b| b != b' ' && b != b'>')
        .count();
    let close = rest_start + rest;
    if rest == 0 || bytes.get(close) != Some(&b'>') {
        return None;
    }
    let url = &excerpt.text[1..close];
    Some(Inline::new(close + 1, autolink(url, url.to_string())))
}

/// A dot-separated hostname whose labels are 1-63 alphanumerics or
/// hyphens, never starting or ending with a hyphen. Returns its length.
fn scan_hostname(bytes: &[u8]) -> Option<usize> {
    let mut pos = 0;
    loop {
        let label = bytes[pos..]
            .iter()
            .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'-')
            .count();
        let valid = label > 0
            && label <= MAX_HOSTNAME_LABEL
            && bytes[pos] != b'-'
            && bytes[pos + label - 1] != b'-';
        if !valid {
            return None;
        }
        pos += label;
        if bytes.get(pos) != Some(&b'.') {
            return Some(pos);
        }
        pos += 1;
    }
}

#[inline]
fn is_email_local(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"._!#$%&'*+/=?^`{|}~-".contains(&b)
}

pub(super) fn parse_email_tag(excerpt: &Excerpt<'_>) -> Option<Inline> {
    let text = excerpt.text;
    if memchr::memchr(b'>', text.as_bytes()).is_none() {
        return None;
    }
    let bytes = text.as_bytes();
    let has_scheme = starts_with_ignore_case(&text[1..], "mailto:");
    let local_start = if has_scheme { 8 } else { 1 };

    let local = bytes[local_start..].iter().take_while(|&&b| is_email_local(b)).count();
    let at = local_start + local;
    if local == 0 || bytes.get(at) != Some(&b'@') {
        return None;
    }
    let close = at + 1 + scan_hostname(&bytes[at + 1..])?;
    if bytes.get(close) != Some(&b'>') {
        return None;
    }

    let address = &text[1..close];
    let href = if has_scheme {
        address.to_string()
    } else {
        format!("mailto:{address}")
    };
    Some(Inline::new(close + 1, autolink(address, href)))
}

#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Word boundary test at byte offset `pos`.
fn is_boundary(text: &str, pos: usize) -> bool {
    let before = text[..pos].chars().next_back().is_some_and(is_word_char);
    let after = text[pos..].chars().next().is_some_and(is_word_char);
    before != after
}

/// Match a bare `http://` or `https://` URL starting at `start`.
/// Returns the match end.
fn match_url_at(context: &str, start: usize) -> Option<usize> {
    if !is_boundary(context, start) || !starts_with_ignore_case(&context[start..], "http") {
        return None;
    }
    let mut pos = start + 4;
    if matches!(context.as_bytes().get(pos), Some(b's' | b'S')) {
        pos += 1;
    }
    if !context[pos..].starts_with("://") {
        return None;
    }
    let body_start = pos + 3;

    let body_len: usize = context[body_start..]
        .chars()
        .take_while(|&ch| !ch.is_whitespace() && ch != '<')
        .map(char::len_utf8)
        .sum();
    let body_end = body_start + body_len;

    // back off to the last word boundary inside the body
    let end = context[body_start..body_end]
        .char_indices()
        .map(|(offset, ch)| body_start + offset + ch.len_utf8())
        .rev()
        .find(|&end| is_boundary(context, end))?;

    let slashes = context.as_bytes()[end..].iter().take_while(|&&b| b == b'/').count();
    Some(end + slashes)
}

pub(super) fn parse_url(excerpt: &Excerpt<'_>, options: &Options) -> Option<Inline> {
    if !options.urls_linked || excerpt.text.as_bytes().get(2) != Some(&b'/') {
        return None;
    }
    let context = excerpt.context;
    let marker_pos = context.len() - excerpt.text.len();

    // the scheme ends at this marker: `https` or `http`
    let (start, end) = [5, 4]
        .into_iter()
        .filter_map(|scheme_len| marker_pos.checked_sub(scheme_len))
        .filter(|&start| context.is_char_boundary(start))
        .find_map(|start| match_url_at(context, start).map(|end| (start, end)))?;
    let url = &context[start..end];

    Some(Inline {
        extent: end - start,
        position: Some(start),
        element: autolink(url, url.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Reference;

    fn excerpt(text: &str) -> Excerpt<'_> {
        Excerpt { text, context: text }
    }

    fn refs() -> ReferenceTable {
        let mut refs = ReferenceTable::new();
        refs.insert(
            "Docs",
            Reference {
                url: "https://docs.example".into(),
                title: Some("Manual".into()),
            },
        );
        refs
    }

    #[test]
    fn test_label_balancing() {
        assert_eq!(scan_label(b"[a [b] c] d"), Some(8));
        assert_eq!(scan_label(b"[a [b c"), None);
        assert_eq!(scan_label(b"x[a]"), None);
        let deep = format!("{}{}", "[".repeat(MAX_BRACKET_DEPTH + 1), "]".repeat(MAX_BRACKET_DEPTH + 1));
        assert_eq!(scan_label(deep.as_bytes()), None);
    }

    #[test]
    fn test_inline_destination() {
        assert_eq!(scan_inline_destination("(/u)"), Some(("/u", None, 4)));
        assert_eq!(
            scan_inline_destination("( /u  \"T\" ) x"),
            Some(("/u", Some("T"), 11))
        );
        assert_eq!(scan_inline_destination("(/a(b)c)"), Some(("/a(b)c", None, 8)));
        assert_eq!(scan_inline_destination("()"), None);
        assert_eq!(scan_inline_destination("(/u 'open)"), None);
    }

    #[test]
    fn test_inline_link() {
        let table = ReferenceTable::new();
        let inline = parse_link(&excerpt("[a *b*](/u 'T') rest"), &table).map(|inline| {
            (inline.extent, inline.element.pending_text().map(str::to_string), inline.element.attributes)
        });
        let (extent, label, attributes) = inline.unwrap_or_default();
        assert_eq!(extent, 15);
        assert_eq!(label.as_deref(), Some("a *b*"));
        assert_eq!(attributes[0], ("href", Some("/u".to_string())));
        assert_eq!(attributes[1], ("title", Some("T".to_string())));
    }

    #[test]
    fn test_reference_forms() {
        let table = refs();
        let full = scan_link("[x][docs]", &table);
        assert_eq!(full.as_ref().map(|l| (l.extent, l.href.as_str())), Some((9, "https://docs.example")));
        let collapsed = scan_link("[Docs][] tail", &table);
        assert_eq!(collapsed.map(|l| l.extent), Some(8));
        let shortcut = scan_link("[DOCS] tail", &table);
        assert_eq!(shortcut.map(|l| (l.extent, l.title)), Some((6, Some("Manual".into()))));
        assert!(scan_link("[x][missing]", &table).is_none());
    }

    #[test]
    fn test_link_forbids_nested_links() {
        let table = ReferenceTable::new();
        let inline = parse_link(&excerpt("[a](/u)"), &table);
        let forbidden = inline.and_then(|inline| match inline.element.content {
            Content::Pending(pending) => Some(pending.forbidden),
            _ => None,
        });
        assert_eq!(forbidden, Some(InlineSet::LINK_CONTEXT));
    }

    #[test]
    fn test_image() {
        let table = ReferenceTable::new();
        let inline = parse_image(&excerpt("![alt *x*](/i.png \"T\")"), &table);
        let element = inline.as_ref().map(|inline| &inline.element);
        assert_eq!(inline.as_ref().map(|inline| inline.extent), Some(22));
        assert_eq!(element.and_then(|el| el.attr("src")), Some("/i.png"));
        assert_eq!(element.and_then(|el| el.attr("alt")), Some("alt *x*"));
        assert_eq!(element.and_then(|el| el.autobreak), Some(true));
        assert!(parse_image(&excerpt("!x"), &table).is_none());
    }

    #[test]
    fn test_url_tag() {
        let inline = parse_url_tag(&excerpt("<https://a.b/c> x"));
        assert_eq!(inline.as_ref().map(|inline| inline.extent), Some(15));
        assert_eq!(inline.and_then(|inline| inline.element.attr("href").map(str::to_string)).as_deref(), Some("https://a.b/c"));
        assert!(parse_url_tag(&excerpt("<a b://c>")).is_none());
        assert!(parse_url_tag(&excerpt("<http://a b>")).is_none());
    }

    #[test]
    fn test_email_tag() {
        let inline = parse_email_tag(&excerpt("<me@example.com>"));
        let element = inline.map(|inline| inline.element);
        assert_eq!(element.as_ref().and_then(|el| el.attr("href")), Some("mailto:me@example.com"));
        assert_eq!(
            element.map(|el| el.content),
            Some(Content::Text("me@example.com".into()))
        );

        let scheme = parse_email_tag(&excerpt("<MAILTO:me@x.org>")).map(|inline| inline.element);
        assert_eq!(scheme.as_ref().and_then(|el| el.attr("href")), Some("MAILTO:me@x.org"));
    }

    #[test]
    fn test_email_hostname_labels() {
        assert!(parse_email_tag(&excerpt("<a@-x.com>")).is_none());
        assert!(parse_email_tag(&excerpt("<a@x-.com>")).is_none());
        assert!(parse_email_tag(&excerpt("<a@x..com>")).is_none());
        let long = format!("<a@{}.com>", "x".repeat(MAX_HOSTNAME_LABEL + 1));
        assert!(parse_email_tag(&excerpt(&long)).is_none());
        assert!(parse_email_tag(&excerpt("<a@x-y.com>")).is_some());
    }

    #[test]
    fn test_bare_url_position() {
        let options = Options::default();
        let context = "see http://example.com/path. done";
        let marker = context.find(':').unwrap_or_default();
        let inline = parse_url(
            &Excerpt {
                text: &context[marker..],
                context,
            },
            &options,
        );
        let found = inline.map(|inline| (inline.position, inline.extent));
        assert_eq!(found, Some((Some(4), "http://example.com/path".len())));
    }

    #[test]
    fn test_bare_url_belongs_to_its_marker() {
        let options = Options::default();
        let at_first_colon = |context: &'static str| {
            let marker = context.find(':').unwrap_or_default();
            parse_url(
                &Excerpt {
                    text: &context[marker..],
                    context,
                },
                &options,
            )
            .map(|inline| (inline.position, inline.extent))
        };
        assert_eq!(at_first_colon("x://y http://z.com"), None);
        assert_eq!(at_first_colon("é://y"), None);
        assert_eq!(at_first_colon("https://z.com"), Some((Some(0), 13)));
    }

    #[test]
    fn test_bare_url_trailing_slashes() {
        assert_eq!(match_url_at("http://x.com/", 0), Some(13));
        assert_eq!(match_url_at("https://x.com/a/?", 0), Some(16));
        assert_eq!(match_url_at("xhttp://x.com", 1), None);
    }

    #[test]
    fn test_bare_url_disabled() {
        let options = Options {
            urls_linked: false,
            ..Options::default()
        };
        assert!(parse_url(&Excerpt { text: "://x", context: "http://x" }, &options).is_none());
    }
}
