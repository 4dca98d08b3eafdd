//! Anti-forgery token lookup.
//!
//! # Design
//! - The token is read from the cookie store at request time; it is never
//!   interpolated into script content.
//! - A missing token is not an error here. The server rejects the request and
//!   the rejection surfaces through the normal response path.

use std::borrow::Cow;

/// Cookie the backend sets for the anti-forgery token.
pub const DEFAULT_COOKIE_NAME: &str = "csrftoken";
/// Header the backend reads the token from.
pub const DEFAULT_HEADER_NAME: &str = "X-CSRFToken";

/// Source of the anti-forgery token attached to bulk requests.
pub trait TokenSource {
    /// Current token, if one is available.
    fn token(&self) -> Option<String>;
}

/// Header name/value pair sent alongside a bulk request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfHeader {
    /// Header name.
    pub name: String,
    /// Token value.
    pub value: String,
}

impl CsrfHeader {
    /// Pair a header name with the token from `source`, when present.
    #[must_use]
    pub fn resolve(name: &str, source: &dyn TokenSource) -> Option<Self> {
        source.token().map(|value| Self {
            name: name.to_string(),
            value,
        })
    }
}

/// Extract and URL-decode the named cookie from a `document.cookie` string.
///
/// Empty or undecodable values are treated as absent.
#[must_use]
pub fn token_from_cookies(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|entry| entry.strip_prefix(name)?.strip_prefix('='))
        .and_then(|raw| urlencoding::decode(raw).ok())
        .map(Cow::into_owned)
        .filter(|value| !value.is_empty())
}
