//! DoS prevention constants.
//!
//! These limits keep pathological inputs from exhausting the stack
//! or driving the scanners into quadratic behavior.

/// Maximum depth of nested deferred expansions (quotes, list items,
/// emphasis, link labels). Deeper fragments render as literal text.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Maximum bracket depth in a link label `[[[...]]]`
pub const MAX_BRACKET_DEPTH: usize = 32;

/// Maximum backtick run length for code spans.
/// Longer runs are treated as literal text.
pub const MAX_CODE_SPAN_BACKTICKS: usize = 32;

/// Maximum digits in an ordered list marker (prevents big-integer parsing)
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Maximum header level (`######`).
pub const MAX_HEADER_LEVEL: usize = 6;

/// Maximum length of one hostname label in an email autolink.
pub const MAX_HOSTNAME_LABEL: usize = 63;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_reasonable() {
        const { assert!(MAX_NESTING_DEPTH >= 16) };
        const { assert!(MAX_NESTING_DEPTH <= 256) };
        const { assert!(MAX_BRACKET_DEPTH >= 8) };
        const { assert!(MAX_CODE_SPAN_BACKTICKS >= 16) };
        const { assert!(MAX_LIST_MARKER_DIGITS == 9) };
    }
}
