/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Explicit tag-to-block-type resolution.
 */

//! Tag to block type resolution.
//!
//! Block types are registered explicitly at startup; markup tags resolve
//! against the registry while the tree is built. An unresolved tag is a
//! normal error, not a dynamic-dispatch fallback.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::field::FieldSpec;
use crate::render::BlockRenderer;

/// A registered block type: markup tag, declared fields, persistence
/// opt-in, and renderer.
pub struct BlockType {
    tag: String,
    type_name: String,
    fields: Vec<FieldSpec>,
    saved_fields: Vec<String>,
    renderer: Arc<dyn BlockRenderer>,
}

impl BlockType {
    pub fn new(
        tag: impl Into<String>,
        type_name: impl Into<String>,
        renderer: Arc<dyn BlockRenderer>,
    ) -> Self {
        Self {
            tag: tag.into(),
            type_name: type_name.into(),
            fields: Vec::new(),
            saved_fields: Vec::new(),
            renderer,
        }
    }

    /// Declare a field on this block type.
    pub fn with_field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Opt a declared field into per-student persistence.
    ///
    /// Persistence is opt-in; a type with no saved fields never touches
    /// the record store.
    pub fn with_saved_field(mut self, name: impl Into<String>) -> Self {
        self.saved_fields.push(name.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn saved_fields(&self) -> &[String] {
        &self.saved_fields
    }

    pub fn renderer(&self) -> &Arc<dyn BlockRenderer> {
        &self.renderer
    }
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockType")
            .field("tag", &self.tag)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Explicit tag registry, populated at startup.
#[derive(Debug, Default)]
pub struct BlockRegistry {
    types: HashMap<String, Arc<BlockType>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block type under its tag. A later registration for the
    /// same tag replaces the earlier one.
    pub fn register(&mut self, block_type: BlockType) {
        self.types
            .insert(block_type.tag.clone(), Arc::new(block_type));
    }

    /// Resolve a markup tag to its block type.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTag`] when no type is registered for the tag.
    pub fn resolve(&self, tag: &str) -> Result<Arc<BlockType>> {
        self.types
            .get(tag)
            .cloned()
            .ok_or_else(|| Error::UnknownTag {
                tag: tag.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use crate::render::ContentRenderer;

    #[test]
    fn test_resolve_registered_tag() {
        let mut registry = BlockRegistry::new();
        registry.register(
            BlockType::new("item", "ItemBlock", Arc::new(ContentRenderer))
                .with_field(FieldSpec::new("kind", FieldKind::Text)),
        );

        let block_type = registry.resolve("item").unwrap();
        assert_eq!(block_type.type_name(), "ItemBlock");
        assert_eq!(block_type.fields().len(), 1);
    }

    #[test]
    fn test_resolve_unknown_tag() {
        let registry = BlockRegistry::new();
        let err = registry.resolve("mystery").unwrap_err();
        assert!(matches!(err, Error::UnknownTag { tag } if tag == "mystery"));
    }
}
