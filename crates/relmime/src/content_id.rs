//! Content-ID values (RFC 2045): `<local@domain>` on the wire.

use std::fmt;

/// A Content-ID value addressing one part of a compound message.
///
/// Stores the bare message-identifier token (`local@domain`); the wire form
/// adds a single pair of angle brackets. Equality and hashing use the bare
/// token only, so `ContentID::new("a@b")` and `ContentID::parse("<a@b>")`
/// compare equal. Values are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentID(String);

impl ContentID {
    /// Creates a Content-ID from a bare token.
    ///
    /// The token is stored verbatim; message-identifier grammar is not
    /// checked here.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Parses a Content-ID from a header value.
    ///
    /// Strips one layer of surrounding angle brackets. A value without a
    /// matched bracket pair is taken as the token itself, tolerating lenient
    /// input.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let token = value
            .strip_prefix('<')
            .and_then(|v| v.strip_suffix('>'))
            .unwrap_or(value);
        Self::new(token)
    }

    /// Returns the bare token without angle brackets.
    #[must_use]
    pub fn as_token(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}
