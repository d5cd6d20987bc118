//! Error types for stanza-core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No registered block type for a markup tag. Fatal, aborts the parse.
    #[error("No block type registered for tag <{tag}>")]
    UnknownTag { tag: String },

    /// A qualified persistence name was required but the block has no
    /// identity.
    #[error("Block name must be set to a non-empty value")]
    MissingName,

    /// Assignment to a field the block type does not declare.
    #[error("Block type '{type_name}' has no field named '{field}'")]
    UnknownField { type_name: String, field: String },

    #[error("Markup error: {0}")]
    Xml(#[from] stanza_xml::Error),

    #[error("Corrupt student record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record store error: {0}")]
    Store(String),
}

impl Error {
    /// Create a store error from any message.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
