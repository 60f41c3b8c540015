//! Error types.

/// Conditions reported by [`Parser::try_text`](crate::Parser::try_text).
///
/// The infallible entry points never surface these; they degrade to the
/// most literal rendering instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The document nests quotes, list items or inline spans deeper than
    /// the renderer is willing to expand.
    #[error("document nesting exceeds the limit of {limit} levels")]
    NestingTooDeep {
        /// The configured depth limit.
        limit: usize,
    },
}
