//! RFC 2387 multipart/related construction and parsing.
//!
//! A related message aggregates a root part (typically HTML) and the
//! sibling parts it references by Content-ID. The root part is always first
//! in the part list; the `start` parameter is an advisory cross-reference,
//! never a re-ordering key.

use crate::content_id::ContentID;
use crate::content_type::ContentType;
use crate::error::{Error, Result};
use crate::multipart::{Boundary, Multipart};
use crate::part::Part;

/// A compound multipart/related message.
///
/// Immutable once constructed; re-derivation (e.g. appending a part) means
/// building a new value from the accessors.
#[derive(Debug, Clone)]
pub struct Related {
    multipart: Multipart,
    root_type: ContentType,
    start: Option<ContentID>,
    start_info: Option<String>,
}

impl Related {
    /// Starts building a message around `root`.
    #[must_use]
    pub const fn builder(root: Part) -> RelatedBuilder {
        RelatedBuilder {
            root,
            related_parts: Vec::new(),
            boundary: None,
            root_type: None,
            start: None,
            start_info: None,
        }
    }

    /// Parses a multipart/related body delimited by `boundary`.
    ///
    /// The structural identity is re-derived from the parsed parts: the
    /// first part is the root and supplies the root type. The outer
    /// `start`/`start-info` parameters are not recovered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Multipart`] when the envelope cannot be decoded,
    /// [`Error::EmptyParts`] when it holds no parts, and
    /// [`Error::MissingRootType`] when the first part has no content-type
    /// header.
    pub fn parse(bytes: &[u8], boundary: impl Into<String>) -> Result<Self> {
        let multipart = Multipart::parse(bytes, boundary, "related")?;

        let root = multipart.parts().first().ok_or(Error::EmptyParts)?;
        let root_type = root
            .content_type()
            .map_err(|e| Error::Multipart(e.into()))?
            .ok_or(Error::MissingRootType)?;

        Ok(Self {
            multipart,
            root_type,
            start: None,
            start_info: None,
        })
    }

    /// The outer content type (`multipart/related` plus parameters).
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        self.multipart.content_type()
    }

    /// The full ordered part list, root first.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        self.multipart.parts()
    }

    /// The boundary token.
    #[must_use]
    pub fn boundary(&self) -> &str {
        self.multipart.boundary().as_str()
    }

    /// The root part.
    ///
    /// `None` only if the non-empty part-list invariant were violated,
    /// which construction rules out.
    #[must_use]
    pub fn root_part(&self) -> Option<&Part> {
        self.parts().first()
    }

    /// The content type of the root part, mirrored by the outer `type`
    /// parameter.
    #[must_use]
    pub const fn root_type(&self) -> &ContentType {
        &self.root_type
    }

    /// The advisory `start` Content-ID, if any.
    #[must_use]
    pub const fn start(&self) -> Option<&ContentID> {
        self.start.as_ref()
    }

    /// The opaque `start-info` value, if any.
    #[must_use]
    pub fn start_info(&self) -> Option<&str> {
        self.start_info.as_deref()
    }

    /// Serializes the message. Byte-level framing is entirely delegated to
    /// the envelope.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.multipart.to_bytes()
    }
}

/// Builder for [`Related`] messages.
#[derive(Debug, Clone)]
pub struct RelatedBuilder {
    root: Part,
    related_parts: Vec<Part>,
    boundary: Option<String>,
    root_type: Option<ContentType>,
    start: Option<ContentID>,
    start_info: Option<String>,
}

impl RelatedBuilder {
    /// Appends a related part; order is preserved in the message.
    #[must_use]
    pub fn related_part(mut self, part: Part) -> Self {
        self.related_parts.push(part);
        self
    }

    /// Sets the boundary token. A random one is generated when unset.
    #[must_use]
    pub fn boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Overrides the root media type advertised by the `type` parameter.
    ///
    /// Defaults to the root part's own content type.
    #[must_use]
    pub fn root_type(mut self, content_type: ContentType) -> Self {
        self.root_type = Some(content_type);
        self
    }

    /// Sets the advisory `start` parameter naming the root's Content-ID.
    #[must_use]
    pub fn start(mut self, content_id: ContentID) -> Self {
        self.start = Some(content_id);
        self
    }

    /// Sets the opaque `start-info` parameter, passed through
    /// uninterpreted.
    #[must_use]
    pub fn start_info(mut self, info: impl Into<String>) -> Self {
        self.start_info = Some(info.into());
        self
    }

    /// Assembles the message.
    ///
    /// The part list is the root followed by the related parts, in the
    /// order they were added. Outer parameters are emitted in a fixed
    /// order: `type`, then `start`, then `start-info`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRootType`] when neither an override nor the
    /// root part yields a content type, [`Error::StartNotFound`] when a
    /// `start` Content-ID matches no part, and [`Error::Multipart`] when
    /// the envelope rejects the input (e.g. a malformed boundary).
    pub fn build(self) -> Result<Related> {
        let root_type = match self.root_type {
            Some(content_type) => content_type,
            None => self
                .root
                .content_type()
                .map_err(|e| Error::Multipart(e.into()))?
                .ok_or(Error::MissingRootType)?,
        };

        let mut parts = Vec::with_capacity(1 + self.related_parts.len());
        parts.push(self.root);
        parts.extend(self.related_parts);

        if let Some(start) = &self.start {
            let found = parts
                .iter()
                .any(|part| part.content_id().as_ref() == Some(start));
            if !found {
                return Err(Error::StartNotFound(start.clone()));
            }
        }

        let mut parameters = vec![("type".to_string(), root_type.essence())];
        if let Some(start) = &self.start {
            parameters.push(("start".to_string(), start.to_string()));
        }
        if let Some(info) = &self.start_info {
            parameters.push(("start-info".to_string(), info.clone()));
        }

        let boundary = self
            .boundary
            .unwrap_or_else(|| Boundary::random().to_string());
        let multipart = Multipart::new("related", parts, boundary, parameters)?;

        Ok(Related {
            multipart,
            root_type,
            start: self.start,
            start_info: self.start_info,
        })
    }
}
