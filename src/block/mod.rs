//! Block-level parser.
//!
//! The block parser is line-oriented. It keeps one block open at a time
//! and, for every line, either continues that block or starts a new one
//! chosen from a per-marker priority list:
//! - Indented and fenced code
//! - ATX and setext headers
//! - Lists and quotes
//! - Tables
//! - Rules, raw markup and comments
//! - Reference definitions
//! - Paragraphs (fallback, with lazy continuation)

mod container;
mod leaf;
pub mod line;
mod parser;
mod table;

use smallvec::SmallVec;

use crate::element::Element;

pub use line::Line;
pub use parser::BlockParser;

/// Closed set of block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Code,
    Comment,
    FencedCode,
    Header,
    List,
    Markup,
    Quote,
    Reference,
    Rule,
    SetextHeader,
    Table,
    Liturgical,
    Paragraph,
}

impl BlockType {
    /// Whether the kind defines a continue operation.
    pub fn has_continuation(self) -> bool {
        match self {
            BlockType::Code
            | BlockType::Comment
            | BlockType::FencedCode
            | BlockType::List
            | BlockType::Markup
            | BlockType::Quote
            | BlockType::Table => true,
            BlockType::Header
            | BlockType::Reference
            | BlockType::Rule
            | BlockType::SetextHeader
            | BlockType::Liturgical
            | BlockType::Paragraph => false,
        }
    }

    /// Whether the kind defines a complete operation.
    pub fn has_completion(self) -> bool {
        match self {
            BlockType::Code | BlockType::FencedCode | BlockType::List => true,
            BlockType::Comment
            | BlockType::Header
            | BlockType::Markup
            | BlockType::Quote
            | BlockType::Reference
            | BlockType::Rule
            | BlockType::SetextHeader
            | BlockType::Table
            | BlockType::Liturgical
            | BlockType::Paragraph => false,
        }
    }

    /// Candidate kinds for a line starting with `marker`, in priority
    /// order. Indented code is tried before all of them.
    pub fn candidates(marker: u8, liturgical: bool) -> &'static [BlockType] {
        use BlockType::*;
        match marker {
            b'#' => &[Header],
            b'*' => &[Rule, List],
            b'+' => &[List],
            b'-' => &[SetextHeader, Table, Rule, List],
            b'0'..=b'9' => &[List],
            b':' => &[Table],
            b'<' => &[Comment, Markup],
            b'=' => &[SetextHeader],
            b'>' => &[Quote],
            b'[' if liturgical => &[Reference, Liturgical],
            b'[' => &[Reference],
            b'_' => &[Rule],
            b'`' | b'~' => &[FencedCode],
            b'|' => &[Table],
            _ => &[],
        }
    }
}

/// Column alignment of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn style(self) -> &'static str {
        match self {
            Alignment::Left => "text-align: left;",
            Alignment::Center => "text-align: center;",
            Alignment::Right => "text-align: right;",
        }
    }
}

/// Per-kind parse state.
#[derive(Debug, Clone)]
enum BlockState {
    Plain,
    List(ListState),
    Fence {
        marker: u8,
        opener_len: usize,
        closed: bool,
    },
    Table {
        alignments: SmallVec<[Option<Alignment>; 8]>,
    },
    Comment {
        closed: bool,
    },
}

#[derive(Debug, Clone)]
struct ListState {
    /// Indent of the line that opened the current item.
    indent: usize,
    ordered: bool,
    /// Marker plus its trailing content indent.
    marker: String,
    /// `*`, `+` or `-` for bullets; `.` or `)` for ordinals.
    marker_type: u8,
    loose: bool,
    /// Index of the open item in the list's children.
    item: usize,
}

impl ListState {
    fn required_indent(&self) -> usize {
        self.indent + self.marker.len()
    }
}

/// An in-progress block.
#[derive(Debug, Clone)]
struct Block {
    ty: BlockType,
    element: Element,
    /// Blank lines seen since the last content line.
    interrupted: usize,
    identified: bool,
    continuable: bool,
    state: BlockState,
}

impl Block {
    fn new(ty: BlockType, element: Element) -> Self {
        Self {
            ty,
            element,
            interrupted: 0,
            identified: false,
            continuable: false,
            state: BlockState::Plain,
        }
    }

    fn with_state(mut self, state: BlockState) -> Self {
        self.state = state;
        self
    }

    #[inline]
    fn is_interrupted(&self) -> bool {
        self.interrupted > 0
    }

    /// An open paragraph with no blank line after it.
    #[inline]
    fn is_open_paragraph(&self) -> bool {
        self.ty == BlockType::Paragraph && !self.is_interrupted()
    }
}
