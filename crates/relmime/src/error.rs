//! Error types for multipart/related operations.

use crate::content_id::ContentID;
use crate::multipart::MultipartError;

/// Result type alias for multipart/related operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or parsing a multipart/related message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The part list has no elements.
    #[error("Multipart/related message has no parts")]
    EmptyParts,

    /// The root part has no resolvable content type.
    #[error("Root part has no content type")]
    MissingRootType,

    /// The `start` parameter names a Content-ID no part carries.
    #[error("No part carries the start Content-ID {0}")]
    StartNotFound(ContentID),

    /// The underlying multipart envelope failed.
    #[error("Multipart envelope error: {0}")]
    Multipart(#[from] MultipartError),
}
