//! Generic multipart envelope encoding and decoding (RFC 2046).
//!
//! The envelope layer knows nothing about RFC 2387 semantics: it assembles
//! a subtype, an ordered part list, a boundary, and outer content-type
//! parameters into delimited bytes, and splits such bytes back into parts.

use std::fmt;

use rand::Rng;

use crate::content_type::{ContentType, InvalidContentType};
use crate::header::Headers;
use crate::part::Part;

/// Errors surfaced by the multipart envelope codec.
#[derive(Debug, thiserror::Error)]
pub enum MultipartError {
    /// Boundary violates the RFC 2046 grammar.
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),

    /// No close delimiter (`--boundary--`) was found.
    #[error("Unterminated multipart body: missing close delimiter")]
    MissingCloseDelimiter,

    /// A part's header block could not be read.
    #[error("Invalid part headers: {0}")]
    InvalidPartHeaders(String),

    /// A content type could not be parsed.
    #[error(transparent)]
    ContentType(#[from] InvalidContentType),
}

/// A multipart boundary token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary(String);

impl Boundary {
    /// Creates a boundary, checking the RFC 2046 grammar: 1-70 characters
    /// from the bchars set, not ending in a space.
    ///
    /// # Errors
    ///
    /// Returns [`MultipartError::InvalidBoundary`] when the grammar is
    /// violated.
    pub fn new(value: impl Into<String>) -> Result<Self, MultipartError> {
        let value = value.into();
        if value.is_empty() || value.len() > 70 {
            return Err(MultipartError::InvalidBoundary(
                "must be 1-70 characters".to_string(),
            ));
        }
        if value.ends_with(' ') {
            return Err(MultipartError::InvalidBoundary(
                "must not end with a space".to_string(),
            ));
        }
        for ch in value.chars() {
            let valid = ch.is_ascii_alphanumeric()
                || matches!(
                    ch,
                    '\'' | '(' | ')' | '+' | '_' | ',' | '-' | '.' | '/' | ':' | '=' | '?' | ' '
                );
            if !valid {
                return Err(MultipartError::InvalidBoundary(format!(
                    "character {ch:?} not allowed"
                )));
            }
        }
        Ok(Self(value))
    }

    /// Generates a random 40-character alphanumeric boundary.
    #[must_use]
    pub fn random() -> Self {
        let value: String = rand::thread_rng()
            .sample_iter(rand::distributions::Alphanumeric)
            .take(40)
            .map(char::from)
            .collect();
        Self(value)
    }

    /// Returns the boundary token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A generic multipart envelope: ordered parts, a boundary, and the outer
/// content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multipart {
    content_type: ContentType,
    boundary: Boundary,
    parts: Vec<Part>,
}

impl Multipart {
    /// Assembles an envelope.
    ///
    /// The outer content type becomes `multipart/<subtype>` with the
    /// `boundary` parameter first and `parameters` following in the given
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`MultipartError::InvalidBoundary`] when the boundary is
    /// rejected.
    pub fn new(
        subtype: &str,
        parts: Vec<Part>,
        boundary: impl Into<String>,
        parameters: Vec<(String, String)>,
    ) -> Result<Self, MultipartError> {
        let boundary = Boundary::new(boundary)?;
        let mut content_type =
            ContentType::new("multipart", subtype).with_parameter("boundary", boundary.as_str());
        for (name, value) in parameters {
            content_type = content_type.with_parameter(name, value);
        }
        Ok(Self {
            content_type,
            boundary,
            parts,
        })
    }

    /// Parses a multipart body delimited by `boundary`.
    ///
    /// Content before the first delimiter (the RFC 2046 preamble, including
    /// any outer header block) and after the close delimiter is discarded;
    /// the reconstructed outer content type carries only the subtype and
    /// boundary.
    ///
    /// # Errors
    ///
    /// Returns an error when the boundary is rejected, no close delimiter
    /// is found, or a part's header block cannot be read.
    pub fn parse(
        bytes: &[u8],
        boundary: impl Into<String>,
        subtype: &str,
    ) -> Result<Self, MultipartError> {
        let boundary = Boundary::new(boundary)?;
        let raw_parts = split_parts(bytes, boundary.as_str())?;

        let mut parts = Vec::with_capacity(raw_parts.len());
        for raw in raw_parts {
            parts.push(parse_part(raw)?);
        }

        let content_type =
            ContentType::new("multipart", subtype).with_parameter("boundary", boundary.as_str());
        Ok(Self {
            content_type,
            boundary,
            parts,
        })
    }

    /// The outer content type.
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// The boundary token.
    #[must_use]
    pub const fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// The ordered part list.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Serializes the envelope: the outer `Content-Type` header, a blank
    /// line, then boundary-delimited parts and the close delimiter.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(format!("Content-Type: {}\r\n\r\n", self.content_type).as_bytes());

        for part in &self.parts {
            out.extend_from_slice(b"--");
            out.extend_from_slice(self.boundary.as_str().as_bytes());
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(part.headers.to_string().as_bytes());
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(&part.body);
            out.extend_from_slice(b"\r\n");
        }

        out.extend_from_slice(b"--");
        out.extend_from_slice(self.boundary.as_str().as_bytes());
        out.extend_from_slice(b"--\r\n");
        out
    }
}

/// Splits `bytes` at delimiter lines into raw part slices (headers + body).
///
/// The CRLF preceding a delimiter belongs to the delimiter, not to the part
/// body.
fn split_parts<'a>(bytes: &'a [u8], boundary: &str) -> Result<Vec<&'a [u8]>, MultipartError> {
    let delimiter = format!("--{boundary}").into_bytes();
    let mut parts = Vec::new();
    let mut part_start: Option<usize> = None;
    let mut i = 0;

    while i + delimiter.len() <= bytes.len() {
        let at_line_start = i == 0 || bytes[i - 1] == b'\n';
        if !(at_line_start && bytes[i..].starts_with(&delimiter)) {
            i += 1;
            continue;
        }

        let after = &bytes[i + delimiter.len()..];
        let is_close = after.starts_with(b"--") && is_padding_to_eol(&after[2..]);
        if !is_close && !is_padding_to_eol(after) {
            // A longer token that merely starts with the delimiter.
            i += 1;
            continue;
        }

        if let Some(start) = part_start.take() {
            parts.push(trim_trailing_newline(&bytes[start..i]));
        }

        if is_close {
            return Ok(parts);
        }

        match after.iter().position(|&b| b == b'\n') {
            Some(n) => {
                // Part content starts after the delimiter line's newline.
                let next = i + delimiter.len() + n + 1;
                part_start = Some(next);
                i = next;
            }
            None => break, // open delimiter at end of input
        }
    }

    Err(MultipartError::MissingCloseDelimiter)
}

/// True when `after` holds only transport padding up to the end of the line
/// (or of the input), i.e. the delimiter match is a real delimiter line.
fn is_padding_to_eol(after: &[u8]) -> bool {
    for &b in after {
        match b {
            b' ' | b'\t' | b'\r' => {}
            b'\n' => return true,
            _ => return false,
        }
    }
    true
}

fn trim_trailing_newline(raw: &[u8]) -> &[u8] {
    raw.strip_suffix(b"\r\n")
        .or_else(|| raw.strip_suffix(b"\n"))
        .unwrap_or(raw)
}

/// Parses one raw part into headers and body, split at the first blank
/// line.
fn parse_part(raw: &[u8]) -> Result<Part, MultipartError> {
    let (header_bytes, body) = split_header_block(raw);
    let header_text = std::str::from_utf8(header_bytes).map_err(|_| {
        MultipartError::InvalidPartHeaders("header block is not valid UTF-8".to_string())
    })?;
    Ok(Part::new(Headers::parse(header_text), body.to_vec()))
}

fn split_header_block(raw: &[u8]) -> (&[u8], &[u8]) {
    if let Some(rest) = raw.strip_prefix(b"\r\n") {
        return (&[], rest);
    }
    if let Some(rest) = raw.strip_prefix(b"\n") {
        return (&[], rest);
    }
    if let Some(idx) = find_subslice(raw, b"\r\n\r\n") {
        (&raw[..idx], &raw[idx + 4..])
    } else if let Some(idx) = find_subslice(raw, b"\n\n") {
        (&raw[..idx], &raw[idx + 2..])
    } else {
        // Header block without a body.
        (raw, &[])
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn part(headers: &[(&str, &str)], body: &[u8]) -> Part {
        let mut h = Headers::new();
        for (name, value) in headers {
            h.add(*name, *value);
        }
        Part::new(h, body.to_vec())
    }

    #[test]
    fn test_boundary_validation() {
        assert!(Boundary::new("simple-boundary").is_ok());
        assert!(Boundary::new("CustomBoundary123").is_ok());
        assert!(Boundary::new("").is_err());
        assert!(Boundary::new("a".repeat(71)).is_err());
        assert!(Boundary::new("ends-with-space ").is_err());
        assert!(Boundary::new("no\"quotes").is_err());
    }

    #[test]
    fn test_boundary_random() {
        let a = Boundary::random();
        let b = Boundary::random();
        assert_eq!(a.as_str().len(), 40);
        assert!(a.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_to_bytes_framing() {
        let envelope = Multipart::new(
            "related",
            vec![
                part(&[("Content-Type", "text/plain")], b"first"),
                part(&[("Content-Type", "text/plain")], b"second"),
            ],
            "b42",
            Vec::new(),
        )
        .unwrap();

        let expected = concat!(
            "Content-Type: multipart/related; boundary=\"b42\"\r\n",
            "\r\n",
            "--b42\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "first\r\n",
            "--b42\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "second\r\n",
            "--b42--\r\n"
        );
        assert_eq!(envelope.to_bytes(), expected.as_bytes());
    }

    #[test]
    fn test_parse_round_trip_binary_body() {
        let body = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x0D, 0x0A, 0x00];
        let envelope = Multipart::new(
            "related",
            vec![part(&[("Content-Type", "image/png")], &body)],
            "b42",
            Vec::new(),
        )
        .unwrap();

        let parsed = Multipart::parse(&envelope.to_bytes(), "b42", "related").unwrap();
        assert_eq!(parsed.parts(), envelope.parts());
        assert_eq!(parsed.boundary().as_str(), "b42");
    }

    #[test]
    fn test_parse_skips_preamble_and_epilogue() {
        let bytes = concat!(
            "This is the preamble and is ignored.\r\n",
            "--b42\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "payload\r\n",
            "--b42--\r\n",
            "This is the epilogue.\r\n"
        );

        let parsed = Multipart::parse(bytes.as_bytes(), "b42", "related").unwrap();
        assert_eq!(parsed.parts().len(), 1);
        assert_eq!(parsed.parts()[0].body, b"payload");
    }

    #[test]
    fn test_parse_close_only_yields_no_parts() {
        let parsed = Multipart::parse(b"--b42--\r\n", "b42", "related").unwrap();
        assert!(parsed.parts().is_empty());
    }

    #[test]
    fn test_parse_missing_close_delimiter() {
        let bytes = b"--b42\r\nContent-Type: text/plain\r\n\r\ntruncated";
        let err = Multipart::parse(bytes, "b42", "related").unwrap_err();
        assert!(matches!(err, MultipartError::MissingCloseDelimiter));
    }

    #[test]
    fn test_parse_ignores_longer_token_lines() {
        let bytes = concat!(
            "--b42\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "--b42x is not a delimiter\r\n",
            "--b42--trailing text is not a close delimiter\r\n",
            "--b42--\r\n"
        );

        let parsed = Multipart::parse(bytes.as_bytes(), "b42", "related").unwrap();
        assert_eq!(parsed.parts().len(), 1);
        assert_eq!(
            parsed.parts()[0].body,
            b"--b42x is not a delimiter\r\n--b42--trailing text is not a close delimiter"
        );
    }

    #[test]
    fn test_parse_part_without_headers() {
        let bytes = b"--b42\r\n\r\nbare body\r\n--b42--\r\n";
        let parsed = Multipart::parse(bytes, "b42", "related").unwrap();
        assert_eq!(parsed.parts().len(), 1);
        assert!(parsed.parts()[0].headers.get("Content-Type").is_none());
        assert_eq!(parsed.parts()[0].body, b"bare body");
    }

    #[test]
    fn test_parameter_order_after_boundary() {
        let envelope = Multipart::new(
            "related",
            vec![part(&[], b"")],
            "b42",
            vec![
                ("type".to_string(), "text/html".to_string()),
                ("start".to_string(), "<a@b>".to_string()),
            ],
        )
        .unwrap();

        assert_eq!(
            envelope.content_type().to_string(),
            "multipart/related; boundary=\"b42\"; type=\"text/html\"; start=\"<a@b>\""
        );
    }
}
