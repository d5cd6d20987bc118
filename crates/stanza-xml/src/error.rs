//! Error types for markup parsing.

use thiserror::Error;

/// Result type alias for stanza-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during markup parsing.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Syntax error reported by quick-xml.
    #[error("XML syntax error: {message}")]
    Syntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// Input ended while an element was still open.
    #[error("Unexpected end of input, expected closing tag </{expected}>")]
    UnexpectedEof { expected: String },

    /// A closing tag that does not match the open element.
    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    /// A closing tag with no matching open element.
    #[error("Unexpected closing tag </{found}>")]
    UnexpectedEndTag { found: String },

    /// No root element.
    #[error("Empty document: no root element found")]
    EmptyDocument,

    /// More than one root element.
    #[error("Invalid markup: multiple root elements")]
    MultipleRoots,
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Syntax {
            message: err.to_string(),
            position: None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Syntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}
