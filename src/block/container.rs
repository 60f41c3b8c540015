//! Container blocks: lists and quotes.
//!
//! Neither container parses its content eagerly. A quote collects its
//! stripped lines, a list collects each item's lines, and the renderer
//! runs the block parser over them later.

use crate::element::{Content, Element, Fragment, Pending};
use crate::limits::MAX_LIST_MARKER_DIGITS;

use super::line::Line;
use super::parser::BlockParser;
use super::{Block, BlockState, BlockType, ListState};

/// A matched list marker at the start of a line.
struct ListMarker<'a> {
    ordered: bool,
    /// Marker plus the spaces that set the content indent.
    marker: String,
    marker_type: u8,
    /// Ordinal digits, for ordered lists.
    digits: &'a str,
    content: String,
}

/// Match `[*+-]` or `[0-9]{1,9}[.)]`, followed by spaces or end of line.
fn scan_list_marker(text: &str) -> Option<ListMarker<'_>> {
    let bytes = text.as_bytes();
    let first = *bytes.first()?;

    let (ordered, marker_len) = match first {
        b'*' | b'+' | b'-' => (false, 1),
        b'0'..=b'9' => {
            let run = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if run > MAX_LIST_MARKER_DIGITS || !matches!(bytes.get(run), Some(b'.' | b')')) {
                return None;
            }
            (true, run + 1)
        }
        _ => return None,
    };

    let spaces = bytes[marker_len..].iter().take_while(|&&b| b == b' ').count();
    if spaces == 0 && marker_len < bytes.len() {
        return None;
    }

    let rest = &text[marker_len + spaces..];
    let (marker, content) = if spaces >= 5 {
        let shifted = spaces - 1;
        (
            text[..marker_len + 1].to_string(),
            format!("{}{rest}", " ".repeat(shifted)),
        )
    } else if spaces == 0 {
        (format!("{} ", &text[..marker_len]), rest.to_string())
    } else {
        (text[..marker_len + spaces].to_string(), rest.to_string())
    };

    Some(ListMarker {
        ordered,
        marker,
        marker_type: bytes[marker_len - 1],
        digits: if ordered { &text[..marker_len - 1] } else { "" },
        content,
    })
}

/// Match a new item of the same list: the same bullet, or any ordinal
/// with the same delimiter. Returns the item's first-line content.
fn scan_sibling_marker<'a>(text: &'a str, state: &ListState) -> Option<&'a str> {
    let bytes = text.as_bytes();
    let digits = if state.ordered {
        let run = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
        if run == 0 {
            return None;
        }
        run
    } else {
        0
    };
    if bytes.get(digits) != Some(&state.marker_type) {
        return None;
    }
    let after = &text[digits + 1..];
    if after.is_empty() {
        return Some("");
    }
    let content = after.trim_start_matches(' ');
    (content.len() < after.len()).then_some(content)
}

fn item_lines(element: &mut Element, index: usize) -> Option<&mut Vec<String>> {
    match &mut element.content {
        Content::Children(items) => items.get_mut(index)?.item_lines_mut(),
        _ => None,
    }
}

fn quote_lines(element: &mut Element) -> Option<&mut Vec<String>> {
    match &mut element.content {
        Content::Pending(Pending {
            fragment: Fragment::Lines(lines),
            ..
        }) => Some(lines),
        _ => None,
    }
}

/// Strip `>` and one optional space.
fn strip_quote_marker(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

impl BlockParser<'_> {
    pub(super) fn start_list(line: &Line, current: Option<&Block>) -> Option<Block> {
        let ListMarker {
            ordered,
            marker,
            marker_type,
            digits,
            content,
        } = scan_list_marker(line.text())?;

        let mut element = Element::tag(if ordered { "ol" } else { "ul" });
        if ordered {
            let start = match digits.trim_start_matches('0') {
                "" => "0",
                start => start,
            };
            if start != "1" {
                // numbered prose inside a paragraph is not a list
                if current.is_some_and(Block::is_open_paragraph) {
                    return None;
                }
                element = element.with_attr("start", start);
            }
        }

        let lines = if content.is_empty() { Vec::new() } else { vec![content] };
        element.content = Content::Children(vec![Element::list_item(lines)]);

        let state = ListState {
            indent: line.indent,
            ordered,
            marker,
            marker_type,
            loose: false,
            item: 0,
        };
        Some(Block::new(BlockType::List, element).with_state(BlockState::List(state)))
    }

    pub(super) fn continue_list(&mut self, line: &Line, mut block: Block) -> Result<Block, Block> {
        let BlockState::List(state) = &mut block.state else {
            return Err(block);
        };
        let interrupted = block.interrupted > 0;

        let item_is_empty = item_lines(&mut block.element, state.item).is_none_or(|lines| lines.is_empty());
        if interrupted && item_is_empty {
            return Err(block);
        }

        let required = state.required_indent();

        if line.indent < required {
            if let Some(content) = scan_sibling_marker(line.text(), state) {
                if interrupted {
                    if let Some(lines) = item_lines(&mut block.element, state.item) {
                        lines.push(String::new());
                    }
                    state.loose = true;
                    block.interrupted = 0;
                }
                state.indent = line.indent;
                if let Content::Children(items) = &mut block.element.content {
                    items.push(Element::list_item(vec![content.to_string()]));
                    state.item = items.len() - 1;
                }
                return Ok(block);
            }
            if scan_list_marker(line.text()).is_some() {
                return Err(block);
            }
        }

        if line.marker() == Some(b'[') && self.start_reference(line).is_some() {
            return Ok(block);
        }

        if line.indent >= required {
            if interrupted {
                if let Some(lines) = item_lines(&mut block.element, state.item) {
                    lines.push(String::new());
                }
                state.loose = true;
                block.interrupted = 0;
            }
            if let Some(lines) = item_lines(&mut block.element, state.item) {
                lines.push(line.body_from(required).to_string());
            }
            return Ok(block);
        }

        if !interrupted {
            if let Some(lines) = item_lines(&mut block.element, state.item) {
                lines.push(line.text().to_string());
            }
            return Ok(block);
        }

        Err(block)
    }

    /// A loose list ends every item with a blank entry, so each item's
    /// paragraphs keep their `<p>` wrappers.
    pub(super) fn complete_list(mut block: Block) -> Block {
        let loose = matches!(&block.state, BlockState::List(state) if state.loose);
        if loose {
            if let Content::Children(items) = &mut block.element.content {
                for lines in items.iter_mut().filter_map(Element::item_lines_mut) {
                    if lines.last().is_none_or(|last| !last.is_empty()) {
                        lines.push(String::new());
                    }
                }
            }
        }
        block
    }

    pub(super) fn start_quote(line: &Line) -> Option<Block> {
        let rest = strip_quote_marker(line.text())?;
        let element = Element::pending_lines("blockquote", vec![rest.to_string()]);
        Some(Block::new(BlockType::Quote, element))
    }

    pub(super) fn continue_quote(line: &Line, mut block: Block) -> Result<Block, Block> {
        if block.is_interrupted() {
            return Err(block);
        }
        let text = line.text();
        let content = strip_quote_marker(text).unwrap_or(text);
        if let Some(lines) = quote_lines(&mut block.element) {
            lines.push(content.to_string());
        }
        Ok(block)
    }
}
