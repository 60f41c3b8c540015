//! Leaf blocks: code, headers, rules, raw markup, comments and
//! reference definitions.

use crate::element::{Content, Element};
use crate::inline::markup;
use crate::limits::MAX_HEADER_LEVEL;
use crate::reference;

use super::line::Line;
use super::parser::BlockParser;
use super::{Block, BlockState, BlockType};

const HEADER_TAGS: [&str; MAX_HEADER_LEVEL] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements that never open a markup block.
const TEXT_LEVEL_ELEMENTS: &[&str] = &[
    "a", "br", "bdo", "abbr", "blink", "nextid", "acronym", "basefont", "b", "em", "big", "cite",
    "small", "spacer", "listing", "i", "rp", "del", "code", "strike", "marquee", "q", "rt", "ins",
    "font", "strong", "s", "tt", "kbd", "mark", "u", "xm", "sub", "nobr", "sup", "ruby", "var",
    "span", "wbr", "time",
];

/// `<pre><code>text</code></pre>`
fn code_block(text: String, class: Option<String>) -> Element {
    let mut code = Element::tag("code").with_content(Content::Text(text));
    if let Some(class) = class {
        code = code.with_attr("class", class);
    }
    Element::tag("pre").with_content(Content::Child(Box::new(code)))
}

fn code_text_mut(element: &mut Element) -> Option<&mut String> {
    match &mut element.content {
        Content::Child(code) => match &mut code.content {
            Content::Text(text) => Some(text),
            _ => None,
        },
        _ => None,
    }
}

fn raw_mut(element: &mut Element) -> Option<&mut String> {
    match &mut element.content {
        Content::Raw(raw) => Some(raw),
        _ => None,
    }
}

/// Re-insert one newline per pending blank line.
fn flush_blank_lines(block: &mut Block) {
    let blanks = std::mem::take(&mut block.interrupted);
    if blanks > 0 {
        if let Some(text) = code_text_mut(&mut block.element) {
            text.extend(std::iter::repeat_n('\n', blanks));
        }
    }
}

impl BlockParser<'_> {
    pub(super) fn start_code(&self, line: &Line, current: Option<&Block>) -> Option<Block> {
        if current.is_some_and(Block::is_open_paragraph) {
            return None;
        }
        if line.indent < 4 {
            return None;
        }
        let text = line.body_from(4).to_string();
        Some(Block::new(BlockType::Code, code_block(text, None)))
    }

    pub(super) fn continue_code(line: &Line, mut block: Block) -> Result<Block, Block> {
        if line.indent < 4 {
            return Err(block);
        }
        flush_blank_lines(&mut block);
        if let Some(text) = code_text_mut(&mut block.element) {
            text.push('\n');
            text.push_str(line.body_from(4));
        }
        Ok(block)
    }

    pub(super) fn start_comment(&self, line: &Line) -> Option<Block> {
        if self.options.markup_escaped || self.options.safe_mode {
            return None;
        }
        let text = line.text();
        if !text.starts_with("<!--") {
            return None;
        }
        let element = Element::raw(line.body.as_str()).with_autobreak(true);
        let closed = text.contains("-->");
        Some(Block::new(BlockType::Comment, element).with_state(BlockState::Comment { closed }))
    }

    pub(super) fn continue_comment(line: &Line, mut block: Block) -> Result<Block, Block> {
        let BlockState::Comment { closed } = &mut block.state else {
            return Err(block);
        };
        if *closed {
            return Err(block);
        }
        *closed = line.text().contains("-->");
        if let Some(raw) = raw_mut(&mut block.element) {
            raw.push('\n');
            raw.push_str(&line.body);
        }
        Ok(block)
    }

    pub(super) fn start_fenced_code(&self, line: &Line) -> Option<Block> {
        let text = line.text();
        let marker = *text.as_bytes().first()?;
        let opener_len = text.bytes().take_while(|&b| b == marker).count();
        if opener_len < 3 {
            return None;
        }

        let info = text[opener_len..].trim_matches([' ', '\t']);
        if marker == b'`' && info.contains('`') {
            return None;
        }

        let class = (!info.is_empty()).then(|| {
            let end = info
                .find([' ', '\t', '\n', '\x0C', '\r'])
                .unwrap_or(info.len());
            format!("language-{}", &info[..end])
        });

        let state = BlockState::Fence {
            marker,
            opener_len,
            closed: false,
        };
        Some(Block::new(BlockType::FencedCode, code_block(String::new(), class)).with_state(state))
    }

    pub(super) fn continue_fenced_code(line: &Line, mut block: Block) -> Result<Block, Block> {
        let BlockState::Fence {
            marker,
            opener_len,
            closed,
        } = block.state
        else {
            return Err(block);
        };
        if closed {
            return Err(block);
        }

        flush_blank_lines(&mut block);

        let text = line.text();
        let run = text.bytes().take_while(|&b| b == marker).count();
        if run >= opener_len && text[run..].trim_end_matches(' ').is_empty() {
            strip_leading_newline(&mut block);
            block.state = BlockState::Fence {
                marker,
                opener_len,
                closed: true,
            };
            return Ok(block);
        }

        if let Some(code) = code_text_mut(&mut block.element) {
            code.push('\n');
            code.push_str(&line.body);
        }
        Ok(block)
    }

    pub(super) fn complete_fenced_code(mut block: Block) -> Block {
        if let BlockState::Fence { closed: false, .. } = block.state {
            log::debug!("fenced code block left open; closing at end of input");
            strip_leading_newline(&mut block);
        }
        block
    }

    pub(super) fn start_header(&self, line: &Line) -> Option<Block> {
        let text = line.text();
        let level = text.bytes().take_while(|&b| b == b'#').count();
        if level == 0 || level > MAX_HEADER_LEVEL {
            return None;
        }

        let inner = text.trim_matches('#');
        if self.options.strict_mode && !inner.is_empty() && !inner.starts_with(' ') {
            return None;
        }
        let inner = inner.trim_matches(' ');

        let element = Element::pending_line(Some(HEADER_TAGS[level - 1]), inner);
        Some(Block::new(BlockType::Header, element))
    }

    pub(super) fn start_markup(&self, line: &Line) -> Option<Block> {
        if self.options.markup_escaped || self.options.safe_mode {
            return None;
        }
        let text = line.text();
        let name = markup::scan_block_tag(text)?;
        if TEXT_LEVEL_ELEMENTS
            .iter()
            .any(|element| element.eq_ignore_ascii_case(name))
        {
            return None;
        }
        let element = Element::raw(text).with_autobreak(true);
        Some(Block::new(BlockType::Markup, element))
    }

    pub(super) fn continue_markup(line: &Line, mut block: Block) -> Result<Block, Block> {
        if block.is_interrupted() {
            return Err(block);
        }
        if let Some(raw) = raw_mut(&mut block.element) {
            raw.push('\n');
            raw.push_str(&line.body);
        }
        Ok(block)
    }

    pub(super) fn start_reference(&mut self, line: &Line) -> Option<Block> {
        let text = line.text();
        if memchr::memchr(b']', text.as_bytes()).is_none() {
            return None;
        }
        let (id, definition) = reference::scan_definition(text)?;
        self.refs.insert(id, definition);
        Some(Block::new(BlockType::Reference, Element::default()))
    }

    pub(super) fn start_rule(line: &Line) -> Option<Block> {
        let text = line.text();
        let marker = *text.as_bytes().first()?;
        let count = text.bytes().filter(|&b| b == marker).count();
        if count >= 3 && text.bytes().all(|b| b == marker || b == b' ') {
            return Some(Block::new(BlockType::Rule, Element::tag("hr")));
        }
        None
    }

    pub(super) fn start_setext_header(line: &Line, current: &mut Option<Block>) -> Option<Block> {
        if !current.as_ref().is_some_and(Block::is_open_paragraph) || line.indent >= 4 {
            return None;
        }
        let text = line.text();
        let marker = *text.as_bytes().first()?;
        if !text
            .trim_end_matches(' ')
            .trim_end_matches(marker as char)
            .is_empty()
        {
            return None;
        }
        let mut block = current.take()?;
        block.element.name = Some(if marker == b'=' { "h1" } else { "h2" });
        Some(block)
    }
}

fn strip_leading_newline(block: &mut Block) {
    if let Some(text) = code_text_mut(&mut block.element) {
        if text.starts_with('\n') {
            text.remove(0);
        }
    }
}
