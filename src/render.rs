//! HTML serialization of the element tree.
//!
//! [`HtmlWriter`] is a thin string buffer with escaping helpers.
//! [`Renderer`] walks the tree, expanding pending fragments on the way:
//! a pending line goes through the inline scanner, pending lines through
//! the block parser. Every expansion counts toward a nesting limit; past
//! it the fragment is written as escaped text.

use crate::Options;
use crate::block::BlockParser;
use crate::element::{Content, Element, Fragment, Pending};
use crate::escape;
use crate::inline::InlineParser;
use crate::limits::MAX_NESTING_DEPTH;
use crate::reference::ReferenceTable;
use crate::sanitize;

/// HTML output buffer with escaping helpers.
#[derive(Debug, Default)]
pub(crate) struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    /// Create with pre-allocated capacity based on expected input size.
    ///
    /// Output is typically a little larger than the input.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self {
            out: String::with_capacity(input_len + input_len / 4),
        }
    }

    /// Write a string without escaping.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    #[inline]
    pub fn newline(&mut self) {
        self.out.push('\n');
    }

    /// Write text content, escaping `&`, `<`, `>` and `"`.
    #[inline]
    pub fn write_escaped_text(&mut self, text: &str) {
        escape::escape_text_into(&mut self.out, text);
    }

    /// Write an attribute value, escaping quotes of both kinds as well.
    #[inline]
    pub fn write_escaped_attr(&mut self, value: &str) {
        escape::escape_attr_into(&mut self.out, value);
    }

    /// Write ` name="value"`.
    #[inline]
    pub fn attribute(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.write_escaped_attr(value);
        self.out.push('"');
    }

    /// Write `</name>`.
    #[inline]
    pub fn close_tag(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.out
    }
}

/// Tree walker that expands and serializes elements.
pub(crate) struct Renderer<'a> {
    options: &'a Options,
    /// Nested block parses may register definitions, so the renderer
    /// works on its own copy of the document's table.
    refs: ReferenceTable,
    writer: HtmlWriter,
    depth: usize,
    overflow: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a Options, refs: ReferenceTable, input_len: usize) -> Self {
        Self {
            options,
            refs,
            writer: HtmlWriter::with_capacity_for(input_len),
            depth: 0,
            overflow: false,
        }
    }

    /// Render a sibling sequence.
    pub fn render(&mut self, elements: &[Element]) {
        self.write_siblings(elements);
    }

    /// The output, and whether any fragment hit the nesting limit.
    pub fn finish(self) -> (String, bool) {
        (self.writer.into_string(), self.overflow)
    }

    /// Siblings are separated by newlines only where both neighbors
    /// allow it. A named element allows a break unless it says otherwise.
    fn write_siblings(&mut self, elements: &[Element]) {
        let mut autobreak = true;
        for element in elements.iter().filter(|element| !element.is_empty()) {
            let next = element.autobreak.unwrap_or(element.name.is_some());
            autobreak = autobreak && next;
            if autobreak {
                self.writer.newline();
            }
            self.write_element(element);
            autobreak = next;
        }
        if autobreak {
            self.writer.newline();
        }
    }

    fn write_element(&mut self, element: &Element) {
        if let Some(name) = element.name {
            self.writer.write_str("<");
            self.writer.write_str(name);
            self.write_attributes(name, element);
        }

        if matches!(element.content, Content::Empty) {
            if element.name.is_some() {
                self.writer.write_str(" />");
            }
            return;
        }

        if element.name.is_some() {
            self.writer.write_str(">");
        }
        match &element.content {
            Content::Empty => {}
            Content::Text(text) => self.writer.write_escaped_text(text),
            Content::Raw(raw) => {
                if self.options.safe_mode && !element.safe_raw {
                    self.writer.write_escaped_text(raw);
                } else {
                    self.writer.write_str(raw);
                }
            }
            Content::Child(child) => self.write_element(child),
            Content::Children(children) => self.write_siblings(children),
            Content::Pending(pending) => {
                let children = self.expand(pending);
                self.depth += 1;
                self.write_siblings(&children);
                self.depth -= 1;
            }
        }
        if let Some(name) = element.name {
            self.writer.close_tag(name);
        }
    }

    fn write_attributes(&mut self, name: &str, element: &Element) {
        let safe_mode = self.options.safe_mode;
        let url_attribute = if safe_mode { sanitize::url_attribute(name) } else { None };

        for (key, value) in &element.attributes {
            let Some(value) = value else {
                continue;
            };
            if safe_mode && !sanitize::is_safe_attribute_name(key) {
                log::debug!("dropped attribute `{key}` on <{name}>");
                continue;
            }
            if url_attribute == Some(*key) {
                self.writer.attribute(key, &sanitize::filter_url(value));
            } else {
                self.writer.attribute(key, value);
            }
        }
    }

    /// Expand a pending fragment into elements.
    fn expand(&mut self, pending: &Pending) -> Vec<Element> {
        if self.depth >= MAX_NESTING_DEPTH {
            if !self.overflow {
                log::debug!("nesting limit of {MAX_NESTING_DEPTH} reached; writing fragment as text");
            }
            self.overflow = true;
            return vec![Element::text(pending.fragment.to_text())];
        }

        match &pending.fragment {
            Fragment::Line(text) => InlineParser::new(self.options, &self.refs).parse(text, pending.forbidden),
            Fragment::Lines(lines) => BlockParser::new(self.options, &mut self.refs).parse_lines(lines),
            Fragment::ListItem(lines) => {
                let mut elements = BlockParser::new(self.options, &mut self.refs).parse_lines(lines);
                // a tight item shows its first paragraph bare
                let tight = !lines.iter().any(String::is_empty);
                if let Some(first) = elements.first_mut().filter(|first| tight && first.name == Some("p")) {
                    first.name = None;
                }
                elements
            }
        }
    }
}
