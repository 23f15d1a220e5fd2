//! Error types for tree parsing.

use std::str::Utf8Error;

/// Error while parsing XHTML into an [`Element`](crate::Element) tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TreeError {
    /// XML syntax error (including mismatched end tags).
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error")]
    Utf8(#[from] Utf8Error),

    /// Malformed attribute.
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error while decoding names or text.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Input ended while an element was still open.
    #[error("unexpected end of input inside <{tag}>")]
    UnexpectedEnd {
        /// Tag of the element left open.
        tag: String,
    },
}
