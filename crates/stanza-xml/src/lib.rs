//! Markup parsing for stanza light blocks.
//!
//! This crate wraps [`quick-xml`] to produce a plain tree of [`XmlElement`]s
//! from authored block markup. Unlike a general-purpose XML library it keeps
//! exactly what the block layer needs:
//!
//! - Comments are preserved as explicit [`XmlNode::Comment`] children, so the
//!   tree builder can skip them without them ever occupying a child slot, and
//!   [`XmlElement::to_xml`] can serialize authored markup back out verbatim.
//! - [`XmlElement::child_elements`] enumerates element children only, in
//!   document order.
//! - [`XmlElement::leading_text`] exposes the inline text before the first
//!   child element, which is where authored block content lives.
//!
//! # Example
//!
//! ```rust
//! use stanza_xml::parse;
//!
//! let root = parse(r#"<unit><item kind="a">hello</item></unit>"#).unwrap();
//! assert_eq!(root.name, "unit");
//!
//! let items = root.child_elements();
//! assert_eq!(items.len(), 1);
//! assert_eq!(items[0].attribute("kind"), Some("a"));
//! assert_eq!(items[0].leading_text().as_deref(), Some("hello"));
//! ```

pub mod error;
pub mod parser;
pub mod types;

// Re-export main types
pub use error::{Error, Result};
pub use parser::parse;
pub use types::{XmlAttribute, XmlElement, XmlNode, escape_text};
