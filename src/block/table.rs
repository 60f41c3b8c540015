//! Pipe tables.
//!
//! A table is recognized only on the second line of a one-line paragraph:
//! the paragraph becomes the header row and the current line must be an
//! alignment divider with the same number of cells.

use smallvec::SmallVec;

use crate::element::{Content, Element};

use super::line::{Line, trim_edges};
use super::parser::BlockParser;
use super::{Alignment, Block, BlockState, BlockType};

type Alignments = SmallVec<[Option<Alignment>; 8]>;

/// Trim edge whitespace, then outer pipes.
fn trim_row(row: &str) -> &str {
    trim_edges(row).trim_matches('|')
}

fn parse_divider(line: &str) -> Option<Alignments> {
    trim_row(line)
        .split('|')
        .map(|cell| {
            let cell = trim_edges(cell);
            if cell.is_empty() {
                return None;
            }
            let left = cell.starts_with(':');
            let right = cell.ends_with(':');
            Some(match (left, right) {
                (true, true) => Some(Alignment::Center),
                (true, false) => Some(Alignment::Left),
                (false, true) => Some(Alignment::Right),
                (false, false) => None,
            })
        })
        .collect()
}

/// Split a body row into cells. Pipes escaped with a backslash or inside
/// a backtick span do not split; runs of empty cells are skipped.
pub(crate) fn split_row(row: &str) -> Vec<&str> {
    let bytes = row.as_bytes();
    let mut cells = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'|' => {
                if pos > start {
                    cells.push(&row[start..pos]);
                }
                pos += 1;
                start = pos;
            }
            b'\\' if bytes.get(pos + 1) == Some(&b'|') => pos += 2,
            b'`' => {
                let span_end = match bytes.get(pos + 1) {
                    Some(b'`') | None => None,
                    Some(_) => memchr::memchr(b'`', &bytes[pos + 2..]).map(|off| pos + 2 + off),
                };
                pos = span_end.map_or(pos + 1, |end| end + 1);
            }
            _ => pos += 1,
        }
    }
    if pos > start {
        cells.push(&row[start..pos]);
    }
    cells
}

fn cell(name: &'static str, text: &str, alignment: Option<Alignment>) -> Element {
    let mut element = Element::pending_line(Some(name), trim_edges(text));
    if let Some(alignment) = alignment {
        element = element.with_attr("style", alignment.style());
    }
    element
}

fn tbody_mut(table: &mut Element) -> Option<&mut Vec<Element>> {
    let Content::Children(sections) = &mut table.content else {
        return None;
    };
    match &mut sections.get_mut(1)?.content {
        Content::Children(rows) => Some(rows),
        _ => None,
    }
}

impl BlockParser<'_> {
    pub(super) fn start_table(line: &Line, current: &mut Option<Block>) -> Option<Block> {
        let paragraph = current.as_ref().filter(|block| block.is_open_paragraph())?;
        let header = paragraph.element.pending_text()?;
        let text = line.text();

        let looks_like_table = header.contains('|') || text.contains('|') || text.contains(':');
        if !looks_like_table || header.contains('\n') {
            return None;
        }
        if !text.bytes().all(|b| matches!(b, b' ' | b'-' | b':' | b'|')) {
            return None;
        }

        let alignments = parse_divider(text)?;
        let header_cells: Vec<&str> = trim_row(header).split('|').collect();
        if header_cells.len() != alignments.len() {
            log::trace!(
                "table candidate rejected: {} header cells, {} divider cells",
                header_cells.len(),
                alignments.len()
            );
            return None;
        }

        let headings = header_cells
            .iter()
            .zip(alignments.iter())
            .map(|(text, alignment)| cell("th", text, *alignment))
            .collect();

        let thead = Element::tag("thead").with_content(Content::Children(vec![
            Element::tag("tr").with_content(Content::Children(headings)),
        ]));
        let tbody = Element::tag("tbody").with_content(Content::Children(Vec::new()));
        let table = Element::tag("table").with_content(Content::Children(vec![thead, tbody]));

        // the paragraph became the header row
        current.take();

        let mut block = Block::new(BlockType::Table, table).with_state(BlockState::Table { alignments });
        block.identified = true;
        Some(block)
    }

    pub(super) fn continue_table(line: &Line, mut block: Block) -> Result<Block, Block> {
        if block.is_interrupted() {
            return Err(block);
        }
        let BlockState::Table { alignments } = &block.state else {
            return Err(block);
        };
        let text = line.text();
        if alignments.len() != 1 && !text.contains('|') {
            return Err(block);
        }

        let cells = split_row(trim_row(text));
        let row: Vec<Element> = alignments
            .iter()
            .enumerate()
            .map(|(index, alignment)| cell("td", cells.get(index).copied().unwrap_or(""), *alignment))
            .collect();

        if let Some(rows) = tbody_mut(&mut block.element) {
            rows.push(Element::tag("tr").with_content(Content::Children(row)));
        }
        Ok(block)
    }
}
