//! Block parser implementation.

use crate::Options;
use crate::element::Element;
use crate::reference::ReferenceTable;

use super::line::{self, Line};
use super::{Block, BlockType};

/// Block parser state for one run over a sequence of lines.
///
/// Reference definitions found along the way are written into the
/// borrowed table.
pub struct BlockParser<'a> {
    pub(super) options: &'a Options,
    pub(super) refs: &'a mut ReferenceTable,
}

impl<'a> BlockParser<'a> {
    /// Create a new block parser.
    pub fn new(options: &'a Options, refs: &'a mut ReferenceTable) -> Self {
        Self { options, refs }
    }

    /// Parse a whole document.
    pub fn parse_document(&mut self, text: &str) -> Vec<Element> {
        let lines = line::split_document(text);
        self.parse_lines(&lines)
    }

    /// Parse an ordered sequence of lines into top-level elements.
    pub fn parse_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Vec<Element> {
        let mut elements = Vec::new();
        let mut current: Option<Block> = None;

        for raw in lines {
            let raw = raw.as_ref();
            if line::is_blank(raw) {
                if let Some(block) = current.as_mut() {
                    block.interrupted += 1;
                }
                continue;
            }

            let line = Line::new(raw);

            if let Some(block) = current.take() {
                if block.continuable {
                    let ty = block.ty;
                    match self.continue_block(&line, block) {
                        Ok(continued) => {
                            current = Some(continued);
                            continue;
                        }
                        Err(stopped) if ty.has_completion() => {
                            current = Some(self.complete_block(stopped));
                        }
                        Err(stopped) => current = Some(stopped),
                    }
                } else {
                    current = Some(block);
                }
            }

            let marker = line.marker().unwrap_or(b' ');
            let candidates = std::iter::once(BlockType::Code)
                .chain(BlockType::candidates(marker, self.options.liturgical_elements).iter().copied());

            let mut started = None;
            for ty in candidates {
                if let Some(block) = self.start_block(ty, &line, &mut current) {
                    started = Some(block);
                    break;
                }
            }

            if let Some(mut block) = started {
                if !block.identified {
                    if let Some(previous) = current.take() {
                        elements.push(previous.element);
                    }
                    block.identified = true;
                }
                if block.ty.has_continuation() {
                    block.continuable = true;
                }
                current = Some(block);
                continue;
            }

            match current.take() {
                Some(block) if block.is_open_paragraph() => {
                    current = Some(Self::continue_paragraph(&line, block));
                }
                previous => {
                    if let Some(previous) = previous {
                        elements.push(previous.element);
                    }
                    let mut paragraph = Self::paragraph(&line);
                    paragraph.identified = true;
                    current = Some(paragraph);
                }
            }
        }

        if let Some(mut block) = current {
            if block.continuable && block.ty.has_completion() {
                block = self.complete_block(block);
            }
            elements.push(block.element);
        }

        elements
    }

    /// Try to start a block of kind `ty` on `line`. Kinds that convert the
    /// open paragraph take it out of `current`.
    fn start_block(&mut self, ty: BlockType, line: &Line, current: &mut Option<Block>) -> Option<Block> {
        let mut block = match ty {
            BlockType::Code => self.start_code(line, current.as_ref()),
            BlockType::Comment => self.start_comment(line),
            BlockType::FencedCode => self.start_fenced_code(line),
            BlockType::Header => self.start_header(line),
            BlockType::List => Self::start_list(line, current.as_ref()),
            BlockType::Markup => self.start_markup(line),
            BlockType::Quote => Self::start_quote(line),
            BlockType::Reference => self.start_reference(line),
            BlockType::Rule => Self::start_rule(line),
            BlockType::SetextHeader => Self::start_setext_header(line, current),
            BlockType::Table => Self::start_table(line, current),
            BlockType::Liturgical => crate::liturgy::block_element(line.text(), self.options)
                .map(|element| Block::new(BlockType::Liturgical, element)),
            BlockType::Paragraph => None,
        }?;
        block.ty = ty;
        Some(block)
    }

    /// Continue the open block with `line`, handing the block back on
    /// failure.
    fn continue_block(&mut self, line: &Line, block: Block) -> Result<Block, Block> {
        match block.ty {
            BlockType::Code => Self::continue_code(line, block),
            BlockType::Comment => Self::continue_comment(line, block),
            BlockType::FencedCode => Self::continue_fenced_code(line, block),
            BlockType::List => self.continue_list(line, block),
            BlockType::Markup => Self::continue_markup(line, block),
            BlockType::Quote => Self::continue_quote(line, block),
            BlockType::Table => Self::continue_table(line, block),
            BlockType::Header
            | BlockType::Reference
            | BlockType::Rule
            | BlockType::SetextHeader
            | BlockType::Liturgical
            | BlockType::Paragraph => Err(block),
        }
    }

    fn complete_block(&mut self, block: Block) -> Block {
        match block.ty {
            BlockType::FencedCode => Self::complete_fenced_code(block),
            BlockType::List => Self::complete_list(block),
            _ => block,
        }
    }

    fn paragraph(line: &Line) -> Block {
        Block::new(BlockType::Paragraph, Element::pending_line(Some("p"), line.text()))
    }

    fn continue_paragraph(line: &Line, mut block: Block) -> Block {
        if let Some(text) = block.element.pending_text_mut() {
            text.push('\n');
            text.push_str(line.text());
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Content, Fragment, Pending};

    fn parse(text: &str) -> Vec<Element> {
        let options = Options::default();
        let mut refs = ReferenceTable::new();
        BlockParser::new(&options, &mut refs).parse_document(text)
    }

    fn names(elements: &[Element]) -> Vec<Option<&'static str>> {
        elements.iter().map(|el| el.name).collect()
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let elements = parse("one\ntwo\n\nthree");
        assert_eq!(names(&elements), vec![Some("p"), Some("p")]);
        assert_eq!(elements[0].pending_text(), Some("one\ntwo"));
        assert_eq!(elements[1].pending_text(), Some("three"));
    }

    #[test]
    fn test_indented_code_after_blank() {
        let elements = parse("para\n\n    code\n\n    more");
        assert_eq!(names(&elements), vec![Some("p"), Some("pre")]);
        let Content::Child(code) = &elements[1].content else {
            panic!("expected code child");
        };
        assert_eq!(code.content, Content::Text("code\n\nmore".into()));
    }

    #[test]
    fn test_indented_line_continues_paragraph() {
        let elements = parse("para\n    still para");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].pending_text(), Some("para\nstill para"));
    }

    #[test]
    fn test_reference_leaves_empty_element() {
        let options = Options::default();
        let mut refs = ReferenceTable::new();
        let elements = BlockParser::new(&options, &mut refs).parse_document("[a]: /x\n\ntext");
        assert!(elements[0].is_empty());
        assert_eq!(refs.get("A").map(|r| r.url.as_str()), Some("/x"));
    }

    #[test]
    fn test_quote_collects_lines() {
        let elements = parse("> a\nb\n> c");
        assert_eq!(
            elements[0].content,
            Content::Pending(Pending {
                fragment: Fragment::Lines(vec!["a".into(), "b".into(), "c".into()]),
                forbidden: crate::inline::InlineSet::EMPTY,
            })
        );
    }

    #[test]
    fn test_setext_converts_paragraph() {
        let elements = parse("Title\n---");
        assert_eq!(names(&elements), vec![Some("h2")]);
        assert_eq!(elements[0].pending_text(), Some("Title"));
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let elements = parse("~~~\na\n\nb");
        assert_eq!(elements.len(), 1);
        let Content::Child(code) = &elements[0].content else {
            panic!("expected code child");
        };
        assert_eq!(code.content, Content::Text("a\n\nb".into()));
    }
}
