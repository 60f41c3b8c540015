//! The element tree shared by the block parser, the inline scanner and
//! the renderer.
//!
//! Block and inline parsing never expand nested text eagerly. Instead they
//! store a [`Pending`] fragment that the renderer resolves on first visit,
//! so quotes, list items and emphasis are parsed only when they are
//! actually serialized.

use smallvec::SmallVec;

use crate::inline::InlineSet;

/// Ordered attribute list. `None` values are skipped when rendering.
pub type Attributes = SmallVec<[(&'static str, Option<String>); 2]>;

/// A renderable node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Tag name, or `None` for a transparent wrapper.
    pub name: Option<&'static str>,
    pub attributes: Attributes,
    pub content: Content,
    /// Serialization hint for the sibling whitespace rule.
    pub autobreak: Option<bool>,
    /// Raw content survives safe mode unescaped.
    pub safe_raw: bool,
}

/// What an element holds between its tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Content {
    #[default]
    Empty,
    /// Literal text, escaped on output.
    Text(String),
    /// Markup emitted verbatim.
    Raw(String),
    Child(Box<Element>),
    Children(Vec<Element>),
    /// Not yet expanded; resolved by the renderer.
    Pending(Pending),
}

/// A stored fragment plus the inline kinds it may not contain.
#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    pub fragment: Fragment,
    pub forbidden: InlineSet,
}

/// How a pending fragment is expanded.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// One logical line, run through the inline scanner.
    Line(String),
    /// Several lines, run through the block parser.
    Lines(Vec<String>),
    /// The collected lines of one list item.
    ListItem(Vec<String>),
}

impl Fragment {
    /// The fragment as plain text, lines joined by newlines.
    pub fn to_text(&self) -> String {
        match self {
            Fragment::Line(text) => text.clone(),
            Fragment::Lines(lines) | Fragment::ListItem(lines) => lines.join("\n"),
        }
    }
}

impl Element {
    /// A tagged element with no content (`<hr />`, `<br />`).
    pub fn tag(name: &'static str) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    /// A transparent text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: Content::Text(text.into()),
            ..Self::default()
        }
    }

    /// A transparent raw-markup node.
    pub fn raw(markup: impl Into<String>) -> Self {
        Self {
            content: Content::Raw(markup.into()),
            ..Self::default()
        }
    }

    /// A transparent node holding a sequence of siblings.
    pub fn group(children: Vec<Element>) -> Self {
        Self {
            content: Content::Children(children),
            ..Self::default()
        }
    }

    /// Element whose content is a line to be inline-scanned later.
    pub fn pending_line(name: Option<&'static str>, text: impl Into<String>) -> Self {
        Self {
            name,
            content: Content::Pending(Pending {
                fragment: Fragment::Line(text.into()),
                forbidden: InlineSet::EMPTY,
            }),
            ..Self::default()
        }
    }

    /// Element whose content is a block of lines to be parsed later.
    pub fn pending_lines(name: &'static str, lines: Vec<String>) -> Self {
        Self {
            name: Some(name),
            content: Content::Pending(Pending {
                fragment: Fragment::Lines(lines),
                forbidden: InlineSet::EMPTY,
            }),
            ..Self::default()
        }
    }

    /// A list item collecting its lines.
    pub fn list_item(lines: Vec<String>) -> Self {
        Self {
            name: Some("li"),
            content: Content::Pending(Pending {
                fragment: Fragment::ListItem(lines),
                forbidden: InlineSet::EMPTY,
            }),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    pub fn with_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.set_attr(name, Some(value.into()));
        self
    }

    pub fn with_autobreak(mut self, autobreak: bool) -> Self {
        self.autobreak = Some(autobreak);
        self
    }

    /// Set or replace an attribute, keeping its original position.
    pub fn set_attr(&mut self, name: &'static str, value: Option<String>) {
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Look up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// True for the nameless, contentless node blocks like reference
    /// definitions leave behind.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && matches!(self.content, Content::Empty)
    }

    /// Lines collected by a list item, if this is one.
    pub fn item_lines_mut(&mut self) -> Option<&mut Vec<String>> {
        match &mut self.content {
            Content::Pending(Pending {
                fragment: Fragment::ListItem(lines),
                ..
            }) => Some(lines),
            _ => None,
        }
    }

    /// The pending line text, if any.
    pub fn pending_text(&self) -> Option<&str> {
        match &self.content {
            Content::Pending(Pending {
                fragment: Fragment::Line(text),
                ..
            }) => Some(text),
            _ => None,
        }
    }

    pub fn pending_text_mut(&mut self) -> Option<&mut String> {
        match &mut self.content {
            Content::Pending(Pending {
                fragment: Fragment::Line(text),
                ..
            }) => Some(text),
            _ => None,
        }
    }
}
