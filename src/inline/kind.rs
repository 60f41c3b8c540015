//! Closed set of inline kinds and a compact bit set over them.

use std::fmt;
use std::str::FromStr;

/// Every inline construct the scanner knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InlineKind {
    Code,
    EmailTag,
    Emphasis,
    EscapeSequence,
    Image,
    Link,
    Markup,
    SpecialCharacter,
    Strikethrough,
    Url,
    UrlTag,
    LiturgicalCross,
    LiturgicalMidpoint,
    LiturgicalDagger,
    TextRed,
    OverUnderLine,
}

impl InlineKind {
    /// All kinds, in declaration order.
    pub const ALL: [InlineKind; 16] = [
        InlineKind::Code,
        InlineKind::EmailTag,
        InlineKind::Emphasis,
        InlineKind::EscapeSequence,
        InlineKind::Image,
        InlineKind::Link,
        InlineKind::Markup,
        InlineKind::SpecialCharacter,
        InlineKind::Strikethrough,
        InlineKind::Url,
        InlineKind::UrlTag,
        InlineKind::LiturgicalCross,
        InlineKind::LiturgicalMidpoint,
        InlineKind::LiturgicalDagger,
        InlineKind::TextRed,
        InlineKind::OverUnderLine,
    ];

    /// Identifier used by the line-level API.
    pub fn name(self) -> &'static str {
        match self {
            InlineKind::Code => "Code",
            InlineKind::EmailTag => "EmailTag",
            InlineKind::Emphasis => "Emphasis",
            InlineKind::EscapeSequence => "EscapeSequence",
            InlineKind::Image => "Image",
            InlineKind::Link => "Link",
            InlineKind::Markup => "Markup",
            InlineKind::SpecialCharacter => "SpecialCharacter",
            InlineKind::Strikethrough => "Strikethrough",
            InlineKind::Url => "Url",
            InlineKind::UrlTag => "UrlTag",
            InlineKind::LiturgicalCross => "LiturgicalCross",
            InlineKind::LiturgicalMidpoint => "LiturgicalMidpoint",
            InlineKind::LiturgicalDagger => "LiturgicalDagger",
            InlineKind::TextRed => "TextRed",
            InlineKind::OverUnderLine => "OverUnderLine",
        }
    }

    #[inline]
    const fn bit(self) -> u32 {
        1 << self as u8
    }
}

impl fmt::Display for InlineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a kind name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown inline kind `{0}`")]
pub struct UnknownInlineKind(pub String);

impl FromStr for InlineKind {
    type Err = UnknownInlineKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InlineKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownInlineKind(s.to_string()))
    }
}

/// Set of inline kinds, used for forbidden-nesting contexts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InlineSet(u32);

impl InlineSet {
    /// The empty set.
    pub const EMPTY: InlineSet = InlineSet(0);

    /// Kinds a link label may not contain.
    pub const LINK_CONTEXT: InlineSet = InlineSet(InlineKind::Url.bit() | InlineKind::Link.bit());

    /// Build a set from a slice of kinds.
    pub fn of(kinds: &[InlineKind]) -> Self {
        kinds.iter().fold(Self::EMPTY, |set, &kind| set.with(kind))
    }

    /// Parse kind names, silently skipping unknown ones.
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|name| name.parse::<InlineKind>().ok())
            .fold(Self::EMPTY, |set, kind| set.with(kind))
    }

    #[inline]
    pub const fn with(self, kind: InlineKind) -> Self {
        InlineSet(self.0 | kind.bit())
    }

    #[inline]
    pub const fn union(self, other: InlineSet) -> Self {
        InlineSet(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, kind: InlineKind) -> bool {
        self.0 & kind.bit() != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = InlineKind> {
        InlineKind::ALL.into_iter().filter(move |kind| self.contains(*kind))
    }
}

impl FromIterator<InlineKind> for InlineSet {
    fn from_iter<T: IntoIterator<Item = InlineKind>>(iter: T) -> Self {
        iter.into_iter().fold(Self::EMPTY, |set, kind| set.with(kind))
    }
}
