/*
 * tree.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Recursive construction of the block tree from parsed markup.
 */

//! Building the block tree from markup.
//!
//! Children are enumerated in document order and assigned zero-based
//! structural indices; a block's identity is `{owner_identity}_{index}`.
//! Identities are stable only within one build of the tree: re-parsing
//! after sibling order changes reassigns them from scratch.

use serde_json::Value;
use stanza_xml::XmlElement;

use crate::block::LightBlock;
use crate::error::{Error, Result};
use crate::registry::BlockRegistry;

/// Build the child blocks of `owner_name` from a markup element.
///
/// Comments are not elements and never occupy an index slot.
///
/// # Errors
///
/// [`Error::UnknownTag`] for an unregistered tag; [`Error::UnknownField`]
/// for a markup attribute the block type does not declare (except the
/// reserved `url_name`).
pub fn build_children(
    owner_name: &str,
    element: &XmlElement,
    registry: &BlockRegistry,
) -> Result<Vec<LightBlock>> {
    let elements = element.child_elements();
    let mut children = Vec::with_capacity(elements.len());
    for (index, child) in elements.into_iter().enumerate() {
        children.push(build_block(owner_name, index, child, registry)?);
    }
    Ok(children)
}

fn build_block(
    owner_name: &str,
    index: usize,
    element: &XmlElement,
    registry: &BlockRegistry,
) -> Result<LightBlock> {
    let block_type = registry.resolve(&element.name)?;
    tracing::debug!(tag = %element.name, index, "Adding child block");

    let mut block = LightBlock::new(block_type);
    let name = format!("{}_{}", owner_name, index);

    // The subtree is built before the block's own attributes are applied
    block.children = build_children(&name, element, registry)?;
    block.set_name(name);

    apply_attributes(&mut block, element)?;

    if let Some(text) = element.leading_text() {
        let text = text.trim();
        if !text.is_empty() {
            block.set_content(text);
        }
    }

    Ok(block)
}

/// Apply markup attributes as field writes.
///
/// `url_name` belongs to the identity scheme: when the block type rejects
/// it, the attribute is dropped. Any other rejected attribute propagates.
fn apply_attributes(block: &mut LightBlock, element: &XmlElement) -> Result<()> {
    for attr in &element.attributes {
        match block.set(&attr.name, Value::String(attr.value.clone())) {
            Ok(()) => {}
            Err(Error::UnknownField { .. }) if attr.name == "url_name" => {}
            Err(err) => return Err(err),
        }
    }
    Ok(())
}
