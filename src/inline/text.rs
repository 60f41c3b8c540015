//! Literal text flushing: line breaks and the alleluia filter.

use std::borrow::Cow;

use crate::element::Element;

/// Find the next hard break in `text` at or after `from`.
///
/// Returns `(start, end)` of the break sequence, `end` being just past
/// the newline. With soft breaks enabled any run of spaces before a
/// newline breaks; otherwise two or more spaces, or spaces and a
/// backslash, are required.
fn next_break(text: &str, from: usize, breaks_enabled: bool) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut search = from;
    while let Some(offset) = memchr::memchr(b'\n', &bytes[search..]) {
        let newline = search + offset;
        let end = newline + 1;
        let spaces_before = |at: usize| {
            bytes[from..at].iter().rev().take_while(|&&b| b == b' ').count()
        };

        if breaks_enabled {
            return Some((newline - spaces_before(newline), end));
        }
        if newline > from && bytes[newline - 1] == b'\\' {
            let backslash = newline - 1;
            return Some((backslash - spaces_before(backslash), end));
        }
        let spaces = spaces_before(newline);
        if spaces >= 2 {
            return Some((newline - spaces, end));
        }
        search = end;
    }
    None
}

/// Build the transparent wrapper for a run of literal text: text pieces
/// separated by `<br />` + newline pairs.
pub(crate) fn text_element(text: &str, breaks_enabled: bool, suppress_alleluia: bool) -> Element {
    let piece = |s: &str| {
        if suppress_alleluia {
            Element::text(filter_alleluia(s))
        } else {
            Element::text(s)
        }
    };

    let mut children = Vec::new();
    let mut start = 0;
    let mut search = 0;
    while let Some((break_start, break_end)) = next_break(text, search, breaks_enabled) {
        children.push(piece(&text[start..break_start]));
        children.push(Element::tag("br"));
        children.push(Element::text("\n"));
        start = break_end;
        search = break_end;
    }
    children.push(piece(&text[start..]));
    Element::group(children)
}

const ALLELUIA: &[u8] = b"alleluia";

#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Drop every whole-word "alleluia" (any ASCII case), with trailing
/// `!`, `.` or `,` and the spaces before it.
pub(crate) fn filter_alleluia(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut pos = 0;

    while pos + ALLELUIA.len() <= bytes.len() {
        let end = pos + ALLELUIA.len();
        let candidate = bytes[pos..end].eq_ignore_ascii_case(ALLELUIA)
            && !text[..pos].chars().next_back().is_some_and(is_word_char)
            && !text[end..].chars().next().is_some_and(is_word_char);
        if !candidate {
            pos += 1;
            continue;
        }

        let start = pos - bytes[copied..pos].iter().rev().take_while(|&&b| b == b' ').count();
        let stop = end
            + bytes[end..]
                .iter()
                .take_while(|&&b| matches!(b, b'!' | b'.' | b','))
                .count();

        let buf = out.get_or_insert_with(|| String::with_capacity(text.len()));
        buf.push_str(&text[copied..start]);
        copied = stop;
        pos = stop;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&text[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Content;

    fn pieces(element: &Element) -> Vec<String> {
        let Content::Children(children) = &element.content else {
            return Vec::new();
        };
        children
            .iter()
            .map(|child| match (&child.name, &child.content) {
                (Some(name), _) => format!("<{name}>"),
                (None, Content::Text(text)) => text.clone(),
                _ => String::from("?"),
            })
            .collect()
    }

    #[test]
    fn test_soft_breaks_enabled() {
        let el = text_element("a  \nb\nc", true, false);
        assert_eq!(pieces(&el), vec!["a", "<br>", "\n", "b", "<br>", "\n", "c"]);
    }

    #[test]
    fn test_soft_breaks_disabled() {
        let el = text_element("a\nb  \nc \\\nd", false, false);
        assert_eq!(pieces(&el), vec!["a\nb", "<br>", "\n", "c", "<br>", "\n", "d"]);
    }

    #[test]
    fn test_single_space_without_breaks() {
        let el = text_element("a \nb", false, false);
        assert_eq!(pieces(&el), vec!["a \nb"]);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(pieces(&text_element("plain", true, false)), vec!["plain"]);
        assert_eq!(pieces(&text_element("", true, false)), vec![""]);
    }

    #[test]
    fn test_alleluia_filter() {
        assert_eq!(filter_alleluia("Praise the Lord, alleluia!"), "Praise the Lord,");
        assert_eq!(filter_alleluia("Alleluia, alleluia. Amen"), " Amen");
        assert_eq!(filter_alleluia("ALLELUIA"), "");
    }

    #[test]
    fn test_alleluia_whole_words_only() {
        assert_eq!(filter_alleluia("alleluias"), "alleluias");
        assert_eq!(filter_alleluia("xalleluia"), "xalleluia");
        assert!(matches!(filter_alleluia("nothing here"), Cow::Borrowed(_)));
    }
}
