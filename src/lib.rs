//! litmark: a Markdown dialect with liturgical annotations, compiled to HTML.
//!
//! Parsing runs in two phases over a shared element tree:
//! - A line-driven block parser segments the document into paragraphs,
//!   headers, lists, quotes, tables, code and raw markup
//! - A marker-driven inline scanner turns block text into spans
//!
//! Nested text is stored as pending fragments and expanded only while
//! rendering, so the tree stays small until it is serialized.
//!
//! # Design Principles
//! - No regex: explicit byte and char scanners
//! - Total: every input renders, nothing panics
//! - Bounded nesting: deep documents degrade to escaped text
//!
//! # Example
//! ```
//! let html = litmark::to_html("# Hello\n\n*World*");
//! assert_eq!(html, "<h1>Hello</h1>\n<p><em>World</em></p>");
//! ```

pub mod block;
pub mod element;
pub mod error;
pub mod escape;
pub mod inline;
pub mod limits;
mod liturgy;
pub mod reference;
pub mod registry;
mod render;
mod sanitize;

pub use block::BlockParser;
pub use element::{Attributes, Content, Element, Fragment, Pending};
pub use error::Error;
pub use inline::{InlineKind, InlineParser, InlineSet, UnknownInlineKind};
pub use reference::{Reference, ReferenceTable};
pub use registry::ParserRegistry;

use block::line::split_document;
use render::Renderer;

/// Parsing/rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Any spaces before a newline make a hard break, not only two.
    pub breaks_enabled: bool,
    /// Treat raw HTML as text.
    pub markup_escaped: bool,
    /// Link bare `http://` and `https://` URLs.
    pub urls_linked: bool,
    /// Require a space after the `#` run of a header.
    pub strict_mode: bool,
    /// Escape raw markup, neutralize unknown URL schemes and drop
    /// event-handler attributes.
    pub safe_mode: bool,
    /// Recognize the liturgical block and inline constructs.
    pub liturgical_elements: bool,
    /// Wrap liturgical constructs in classed elements instead of
    /// emitting bare symbols.
    pub liturgical_markup: bool,
    /// Drop every "alleluia" from literal text.
    pub suppress_alleluia: bool,
    /// Reserved; not interpreted.
    pub footnotes_enabled: bool,
    /// Response text for intercessions; stored for callers, never inserted.
    pub intercession_response: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            breaks_enabled: true,
            markup_escaped: true,
            urls_linked: true,
            strict_mode: false,
            safe_mode: false,
            liturgical_elements: false,
            liturgical_markup: true,
            suppress_alleluia: false,
            footnotes_enabled: false,
            intercession_response: None,
        }
    }
}

/// A parsed document: top-level elements plus the reference definitions
/// collected while parsing. Render it with [`Parser::render`], as often
/// as needed.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    references: ReferenceTable,
    source_len: usize,
}

impl Document {
    /// Top-level elements. Nested content is still pending.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn references(&self) -> &ReferenceTable {
        &self.references
    }
}

/// Configured converter. Cheap to clone, and `Send + Sync`, so one
/// instance can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: Options,
}

impl Parser {
    /// A parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// The configured intercession response, if any.
    pub fn intercession_response(&self) -> Option<&str> {
        self.options.intercession_response.as_deref()
    }

    /// Run the block phase over a whole document.
    pub fn parse(&self, text: &str) -> Document {
        let mut references = ReferenceTable::new();
        let elements = BlockParser::new(&self.options, &mut references).parse_lines(&split_document(text));
        log::trace!(
            "parsed {} top-level elements, {} references",
            elements.len(),
            references.len()
        );
        Document {
            elements,
            references,
            source_len: text.len(),
        }
    }

    /// Serialize a parsed document. Leading and trailing newlines are
    /// trimmed.
    pub fn render(&self, document: &Document) -> String {
        self.render_document(document).0
    }

    /// Convert a whole document to HTML.
    ///
    /// # Example
    /// ```
    /// let parser = litmark::Parser::new();
    /// assert_eq!(parser.text("a\nb"), "<p>a<br />\nb</p>");
    /// ```
    pub fn text(&self, text: &str) -> String {
        self.render(&self.parse(text))
    }

    /// Like [`Parser::text`], but reports documents nested deeper than
    /// [`limits::MAX_NESTING_DEPTH`] instead of degrading them to text.
    pub fn try_text(&self, text: &str) -> Result<String, Error> {
        let (html, overflow) = self.render_document(&self.parse(text));
        if overflow {
            return Err(Error::NestingTooDeep {
                limit: limits::MAX_NESTING_DEPTH,
            });
        }
        Ok(html)
    }

    /// Convert a single line of inline markup, without block structure.
    /// Kinds in `forbidden` are left as literal text. Reference links do
    /// not resolve, as there are no definitions.
    ///
    /// # Example
    /// ```
    /// use litmark::{InlineKind, InlineSet, Parser};
    ///
    /// let parser = Parser::new();
    /// assert_eq!(parser.line("*a* `b`", InlineSet::EMPTY), "<em>a</em> <code>b</code>");
    /// assert_eq!(parser.line("*a*", InlineSet::of(&[InlineKind::Emphasis])), "*a*");
    /// ```
    pub fn line(&self, text: &str, forbidden: InlineSet) -> String {
        let references = ReferenceTable::new();
        let elements = InlineParser::new(&self.options, &references).parse(text, forbidden);
        let mut renderer = Renderer::new(&self.options, references, text.len());
        renderer.render(&elements);
        renderer.finish().0
    }

    fn render_document(&self, document: &Document) -> (String, bool) {
        let mut renderer = Renderer::new(&self.options, document.references.clone(), document.source_len);
        renderer.render(&document.elements);
        let (html, overflow) = renderer.finish();
        (html.trim_matches('\n').to_string(), overflow)
    }
}

/// Convert a document to HTML with default options.
///
/// # Example
/// ```
/// let html = litmark::to_html("- a\n- b");
/// assert_eq!(html, "<ul>\n<li>a</li>\n<li>b</li>\n</ul>");
/// ```
pub fn to_html(input: &str) -> String {
    Parser::new().text(input)
}

/// Convert a document to HTML with options.
pub fn to_html_with_options(input: &str, options: &Options) -> String {
    Parser::with_options(options.clone()).text(input)
}
