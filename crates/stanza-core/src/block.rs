/*
 * block.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The light child block: identity, lazy state, explicit save.
 */

//! The light child block.
//!
//! A [`LightBlock`] is one node of the authored tree. Its identity is
//! derived from its structural position (`{parent_identity}_{index}`) and
//! doubles as its persistence key, qualified by the container's url_name.
//!
//! Per-student state moves through three stages: constructed, state
//! unloaded, state loaded. The first field read through [`LightBlock::get`]
//! merges the persisted row into the field set; writes never trigger a
//! load; [`LightBlock::save`] flushes the subtree bottom-up and skips the
//! row write when nothing changed.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::field::{FieldSet, FieldValue};
use crate::registry::BlockType;
use crate::runtime::BlockEnv;
use crate::store::RecordKey;

#[derive(Debug)]
pub struct LightBlock {
    name: Option<String>,
    block_type: Arc<BlockType>,
    pub children: Vec<LightBlock>,
    content: Option<String>,
    fields: FieldSet,
    state_loaded: bool,
}

impl LightBlock {
    /// Construct a block of the given type with default field values.
    pub fn new(block_type: Arc<BlockType>) -> Self {
        let fields = FieldSet::from_specs(block_type.fields());
        Self {
            name: None,
            block_type,
            children: Vec::new(),
            content: None,
            fields,
            state_loaded: false,
        }
    }

    /// The block's structural identity, if assigned.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn block_type(&self) -> &Arc<BlockType> {
        &self.block_type
    }

    /// Inline text captured from the authored markup.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(content.into());
    }

    pub fn state_loaded(&self) -> bool {
        self.state_loaded
    }

    /// Current value of a field without touching persisted state.
    ///
    /// Renderers use this after the render pass has hydrated the block;
    /// everything else should go through [`get`](Self::get).
    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Read a field, hydrating per-student state first.
    ///
    /// This is the only read path that triggers a state load.
    pub fn get(&mut self, env: &BlockEnv<'_>, field: &str) -> Result<FieldValue> {
        self.load_state(env)?;
        self.fields
            .get(field)
            .cloned()
            .ok_or_else(|| self.unknown_field(field))
    }

    /// Write a field. Never triggers a state load.
    pub fn set(&mut self, field: &str, value: Value) -> Result<()> {
        if self.fields.set(field, value) {
            Ok(())
        } else {
            Err(self.unknown_field(field))
        }
    }

    fn unknown_field(&self, field: &str) -> Error {
        Error::UnknownField {
            type_name: self.block_type.type_name().to_string(),
            field: field.to_string(),
        }
    }

    /// Merge this student's persisted state into the field set.
    ///
    /// Idempotent. Does nothing when state was already merged, when the
    /// block has no identity, when the type opts no fields into
    /// persistence, or when no row content exists yet.
    pub fn load_state(&mut self, env: &BlockEnv<'_>) -> Result<()> {
        if self.state_loaded || self.name.is_none() {
            return Ok(());
        }
        let block_type = Arc::clone(&self.block_type);
        if block_type.saved_fields().is_empty() {
            return Ok(());
        }

        let key = self.record_key(env, None)?;
        let Some(data) = env.store.load(&key)? else {
            return Ok(());
        };
        if data.is_empty() {
            return Ok(());
        }

        let decoded: serde_json::Map<String, Value> = serde_json::from_str(&data)?;
        for field in block_type.saved_fields() {
            if let Some(value) = decoded.get(field) {
                self.fields.set(field, value.clone());
            }
        }
        self.state_loaded = true;
        tracing::debug!(name = %key.name, "Merged student state");
        Ok(())
    }

    /// Persist this block and its subtree, children first.
    ///
    /// The row is written only when the declared field values differ from
    /// its current decoded content.
    ///
    /// # Errors
    ///
    /// [`Error::MissingName`] when the block has no identity.
    pub fn save(&mut self, env: &BlockEnv<'_>) -> Result<()> {
        for child in &mut self.children {
            child.save(env)?;
        }

        let key = self.record_key(env, None)?;
        let data = self.fields.to_json(self.block_type.saved_fields());

        let current = match env.store.load(&key)?.as_deref() {
            Some(text) if !text.is_empty() => serde_json::from_str(text)?,
            _ => serde_json::Map::new(),
        };
        if current != data {
            tracing::debug!(name = %key.name, "Writing student record");
            env.store.save(&key, &Value::Object(data).to_string())?;
        }
        Ok(())
    }

    /// Compute the qualified persistence key for this block, or for an
    /// explicitly named sibling.
    ///
    /// # Errors
    ///
    /// [`Error::MissingName`] when neither `name` nor the block's own
    /// identity is set.
    pub fn record_key(&self, env: &BlockEnv<'_>, name: Option<&str>) -> Result<RecordKey> {
        let name = name
            .map(str::to_string)
            .or_else(|| self.name.clone())
            .filter(|n| !n.is_empty())
            .ok_or(Error::MissingName)?;
        Ok(RecordKey {
            student_id: env.runtime.student_id(),
            course_id: env.runtime.course_id(),
            name: format!("{}-{}", env.url_name, name),
        })
    }

    /// Resolve a static resource URL, tagged with this block's type.
    pub fn resource_url(&self, env: &BlockEnv<'_>, uri: &str) -> String {
        env.runtime.local_resource_url(self.block_type.type_name(), uri)
    }
}
