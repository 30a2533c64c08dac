//! # relmime
//!
//! RFC 2387 `multipart/related` message construction and parsing.
//!
//! A multipart/related message is a compound document: a root part
//! (typically HTML) references sibling parts (images, style sheets, fonts)
//! by `Content-ID` token instead of embedding them inline. This crate
//! models the related message itself — the root-first part list, the
//! RFC 2387 `type`/`start`/`start-info` parameters, and Content-ID
//! assignment and lookup — on top of a generic multipart envelope codec.
//!
//! ## Building a message
//!
//! ```ignore
//! use relmime::{ContentID, ContentType, Headers, Part, Related};
//!
//! let mut headers = Headers::new();
//! headers.set("Content-Type", "text/html; charset=utf-8");
//! let html = Part::new(headers, b"<img src='cid:logo@example.com'>".to_vec());
//!
//! let logo = Part::inline(
//!     &ContentID::new("logo@example.com"),
//!     &ContentType::new("image", "png"),
//!     png_bytes,
//! );
//!
//! let related = Related::builder(html)
//!     .related_part(logo)
//!     .boundary("CustomBoundary123")
//!     .build()?;
//!
//! let bytes = related.to_bytes();
//! ```
//!
//! ## Parsing a message
//!
//! ```ignore
//! use relmime::Related;
//!
//! let related = Related::parse(&bytes, "CustomBoundary123")?;
//! println!("root type: {}", related.root_type());
//! for part in related.parts() {
//!     println!("part: {:?}", part.content_id());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_id;
mod content_type;
mod error;
mod header;
mod multipart;
mod part;
mod related;

pub use content_id::ContentID;
pub use content_type::{ContentType, InvalidContentType};
pub use error::{Error, Result};
pub use header::Headers;
pub use multipart::{Boundary, Multipart, MultipartError};
pub use part::{Part, TransferEncoding};
pub use related::{Related, RelatedBuilder};
