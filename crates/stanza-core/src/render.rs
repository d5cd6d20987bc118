/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Child rendering: views, wrapper markup and fragment aggregation.
 */

//! Child rendering.
//!
//! Each block type registers a [`BlockRenderer`]; the container asks it for
//! a named view and wraps the result in a marker element carrying the
//! child's identity, concrete type name and optional step number, so the
//! client can address individual children.

use crate::block::LightBlock;
use crate::error::Result;
use crate::fragment::Fragment;
use crate::runtime::BlockEnv;

/// Renders a named view of a block to a fragment.
///
/// Renderers are registered per block type and must be `Send + Sync`.
pub trait BlockRenderer: Send + Sync {
    fn render(&self, block: &LightBlock, view_name: &str, ctx: &RenderCtx<'_>) -> Result<Fragment>;
}

/// Context handed to renderers.
pub struct RenderCtx<'a> {
    pub env: &'a BlockEnv<'a>,

    /// Free-form values passed down from the caller.
    pub values: serde_json::Map<String, serde_json::Value>,
}

impl<'a> RenderCtx<'a> {
    pub fn new(env: &'a BlockEnv<'a>) -> Self {
        Self {
            env,
            values: serde_json::Map::new(),
        }
    }
}

/// Default renderer: the block's inline content, escaped, in a div.
pub struct ContentRenderer;

impl BlockRenderer for ContentRenderer {
    fn render(&self, block: &LightBlock, _view_name: &str, _ctx: &RenderCtx<'_>) -> Result<Fragment> {
        let content = block.content().unwrap_or("");
        Ok(Fragment::from_html(format!(
            "<div class=\"stanza-content\">{}</div>",
            stanza_xml::escape_text(content)
        )))
    }
}

/// Render one child and wrap it for client-side addressing.
///
/// The child's per-student state is hydrated before its renderer runs, so
/// renderers read current values through [`LightBlock::value`].
pub fn render_child(child: &mut LightBlock, view_name: &str, ctx: &RenderCtx<'_>) -> Result<Fragment> {
    child.load_state(ctx.env)?;
    let inner = child.block_type().renderer().render(child, view_name, ctx)?;

    let step = child
        .value("step_number")
        .and_then(|v| v.as_integer())
        .map(|n| n.to_string())
        .unwrap_or_default();
    let html = format!(
        "<div class=\"stanza-light-child\" name=\"{}\" data-type=\"{}\" data-step=\"{}\">{}</div>",
        child.name().unwrap_or(""),
        child.block_type().type_name(),
        step,
        inner.html
    );
    Ok(Fragment {
        html,
        resources: inner.resources,
    })
}

/// Render direct children into one merged fragment.
///
/// Children can be filtered by concrete type name. Resources are merged
/// and deduplicated; the per-child fragments are returned alongside the
/// aggregate for callers that need individual access.
pub fn children_fragment(
    children: &mut [LightBlock],
    view_name: &str,
    ctx: &RenderCtx<'_>,
    include_type: Option<&str>,
    exclude_type: Option<&str>,
) -> Result<(Fragment, Vec<(String, Fragment)>)> {
    let mut fragment = Fragment::new();
    let mut named = Vec::new();

    for child in children.iter_mut() {
        let type_name = child.block_type().type_name().to_string();
        if include_type.is_some_and(|t| t != type_name) {
            continue;
        }
        if exclude_type.is_some_and(|t| t == type_name) {
            continue;
        }

        let frag = render_child(child, view_name, ctx)?;
        fragment.add_resources_from(&frag);
        fragment.html.push_str(&frag.html);
        named.push((child.name().unwrap_or("").to_string(), frag));
    }

    Ok((fragment, named))
}
