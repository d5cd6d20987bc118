//! Lightweight child blocks for XML-authored courseware units.
//!
//! A container unit hosts nested child blocks that behave like the host's
//! plugin units (markup parsing, rendering, per-student field persistence)
//! without full plugin registration, usage-identity allocation, or
//! host-managed field storage. The host's native child model is heavyweight
//! for deep nesting; this crate is the parallel, minimal child model built
//! on the same authoring and rendering conventions.
//!
//! # Architecture
//!
//! - [`Container`] - host unit owning the authored markup and the child tree
//! - [`LightBlock`] - one node: structural identity, typed fields, lazy
//!   per-student state, explicit save
//! - [`BlockRegistry`] / [`BlockType`] - explicit tag-to-type resolution
//! - [`FieldSet`] - typed attribute storage with write coercion
//! - [`StudentRecordStore`] - persisted-row boundary: one JSON blob per
//!   student, course and qualified name
//! - [`HostRuntime`] / [`LinkRewriter`] - host collaborators, with
//!   workbench fallbacks
//!
//! Trees are request-scoped: built from the container's durable
//! `xml_content` at construction, hydrated lazily per student on first
//! field read, flushed bottom-up on an explicit save, and discarded with
//! the request. The record store is the only shared mutable resource;
//! concurrent saves for the same student and name are last-write-wins.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stanza_core::{
//!     BlockRegistry, BlockType, Container, ContainerConfig, ContentRenderer, FieldKind,
//!     FieldSpec,
//! };
//!
//! let mut registry = BlockRegistry::new();
//! registry.register(
//!     BlockType::new("item", "ItemBlock", Arc::new(ContentRenderer))
//!         .with_field(FieldSpec::new("kind", FieldKind::Text)),
//! );
//!
//! let container = Container::from_xml(
//!     r#"<container url_name="unit1"><item kind="a">hello</item></container>"#,
//!     Arc::new(registry),
//!     ContainerConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(container.children[0].name(), Some("unit1_0"));
//! assert_eq!(container.children[0].content(), Some("hello"));
//! ```

pub mod block;
pub mod container;
pub mod error;
pub mod field;
pub mod fragment;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod store;
pub mod tree;

// Re-export commonly used types
pub use block::LightBlock;
pub use container::{Container, ContainerConfig};
pub use error::{Error, Result};
pub use field::{FieldKind, FieldSet, FieldSpec, FieldValue};
pub use fragment::{Fragment, Resource, ResourceKind, ViewResponse};
pub use registry::{BlockRegistry, BlockType};
pub use render::{BlockRenderer, ContentRenderer, RenderCtx, children_fragment, render_child};
pub use runtime::{BlockEnv, HostRuntime, LinkRewriter, NoopRewriter, WorkbenchRuntime};
pub use store::{MemoryStore, RecordKey, StudentRecordStore};
