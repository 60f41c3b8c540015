//! Safe-mode attribute filtering.
//!
//! Applied while rendering, never while parsing: the tree keeps what the
//! author wrote and the writer decides what reaches the output.

use std::borrow::Cow;

use crate::escape::starts_with_ignore_case;

/// URL prefixes that pass through untouched.
const SAFE_LINK_PREFIXES: &[&str] = &[
    "http://",
    "https://",
    "ftp://",
    "ftps://",
    "mailto:",
    "tel:",
    "data:image/png;base64,",
    "data:image/gif;base64,",
    "data:image/jpeg;base64,",
    "irc:",
    "ircs:",
    "git:",
    "ssh:",
    "news:",
    "steam:",
];

/// The attribute that carries a URL for `element`, if any.
#[inline]
pub(crate) fn url_attribute(element: &str) -> Option<&'static str> {
    match element {
        "a" => Some("href"),
        "img" => Some("src"),
        _ => None,
    }
}

/// Attribute names must be `[a-zA-Z0-9][a-zA-Z0-9_-]*` and may not be
/// event handlers.
pub(crate) fn is_safe_attribute_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    let well_formed = bytes.first().is_some_and(u8::is_ascii_alphanumeric)
        && bytes[1..]
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    well_formed && !starts_with_ignore_case(name, "on")
}

/// Neutralize a URL with an unknown scheme by encoding its colons.
pub(crate) fn filter_url(url: &str) -> Cow<'_, str> {
    if SAFE_LINK_PREFIXES
        .iter()
        .any(|prefix| starts_with_ignore_case(url, prefix))
    {
        return Cow::Borrowed(url);
    }
    if memchr::memchr(b':', url.as_bytes()).is_none() {
        return Cow::Borrowed(url);
    }
    log::debug!("unsafe URL neutralized: {url}");
    Cow::Owned(url.replace(':', "%3A"))
}
