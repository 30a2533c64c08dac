//! Message body parts and the inline-part factory.

use std::fmt;

use crate::content_id::ContentID;
use crate::content_type::{ContentType, InvalidContentType};
use crate::header::Headers;

/// Transfer encoding header values.
///
/// Advertised in `Content-Transfer-Encoding`; this crate never applies the
/// encodings to payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit, // Default (includes "7bit")
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// A single message body part: headers plus a raw byte payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body (raw bytes, already transfer-encoded by the caller).
    pub body: Vec<u8>,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Builds an inline part with the default base64 transfer encoding.
    #[must_use]
    pub fn inline(content_id: &ContentID, content_type: &ContentType, body: Vec<u8>) -> Self {
        Self::inline_with_encoding(content_id, content_type, TransferEncoding::Base64, body)
    }

    /// Builds an inline part referenced by Content-ID.
    ///
    /// The header set carries `Content-ID`, `Content-Type`, and
    /// `Content-Transfer-Encoding` in that order. The payload is stored as
    /// given; empty payloads are legal.
    #[must_use]
    pub fn inline_with_encoding(
        content_id: &ContentID,
        content_type: &ContentType,
        encoding: TransferEncoding,
        body: Vec<u8>,
    ) -> Self {
        let mut headers = Headers::new();
        headers.set("Content-ID", content_id.to_string());
        headers.set("Content-Type", content_type.to_string());
        headers.set("Content-Transfer-Encoding", encoding.to_string());
        Self { headers, body }
    }

    /// Gets the parsed content type, or `None` if the header is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is present but malformed.
    pub fn content_type(&self) -> Result<Option<ContentType>, InvalidContentType> {
        self.headers
            .get("Content-Type")
            .map(ContentType::parse)
            .transpose()
    }

    /// Gets the transfer encoding, defaulting to 7bit.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("Content-Transfer-Encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Gets the Content-ID, or `None` if the header is absent.
    ///
    /// The angle-bracket wire form is stripped; a bracket-free value is
    /// accepted as-is.
    #[must_use]
    pub fn content_id(&self) -> Option<ContentID> {
        self.headers.get("Content-ID").map(ContentID::parse)
    }

    /// Sets the `Content-ID` header to the wire form of `content_id`.
    pub fn set_content_id(&mut self, content_id: &ContentID) {
        self.headers.set("Content-ID", content_id.to_string());
    }
}
