/*
 * container.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The host unit that owns a light-block tree.
 */

//! The container unit.
//!
//! A [`Container`] is the host-facing unit: it stores the authored markup
//! as its durable representation, projects it into a disposable tree of
//! [`LightBlock`]s, exposes the tree to rendering, and cascades saves.
//! The tree is rebuilt from `xml_content` on every construction; nothing
//! about the in-memory graph itself is persisted.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use stanza_xml::XmlElement;

use crate::block::LightBlock;
use crate::error::Result;
use crate::fragment::{Fragment, ViewResponse};
use crate::registry::BlockRegistry;
use crate::render::{self, RenderCtx};
use crate::runtime::{BlockEnv, HostRuntime, LinkRewriter};
use crate::store::StudentRecordStore;
use crate::tree;

/// Container settings, deserializable from host configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerConfig {
    /// Stable name of the container unit; prefix of every qualified
    /// persistence name. A `url_name` attribute on the markup root takes
    /// precedence.
    #[serde(default)]
    pub url_name: String,

    /// Name of the primary student-facing view.
    #[serde(default = "default_view_name")]
    pub view_name: String,

    /// Overrides the runtime's cross-reference base URL.
    #[serde(default)]
    pub base_jump_url: Option<String>,
}

fn default_view_name() -> String {
    "student_view".to_string()
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            url_name: String::new(),
            view_name: default_view_name(),
            base_jump_url: None,
        }
    }
}

/// The host unit owning the root of the light-block tree.
pub struct Container {
    config: ContainerConfig,
    url_name: String,

    /// Serialized authored markup; the durable source of truth.
    xml_content: String,

    /// Root attributes other than `url_name`, kept as authored.
    attributes: IndexMap<String, String>,

    pub children: Vec<LightBlock>,
    registry: Arc<BlockRegistry>,
}

impl Container {
    /// Construct a container from authored markup.
    ///
    /// This matches the host's block-construction entry point: the markup
    /// is parsed, the child tree is built, and while the durable markup
    /// field is still at its factory default the serialized original is
    /// captured into it, before any round-trip normalization could alter
    /// it.
    pub fn from_xml(
        markup: &str,
        registry: Arc<BlockRegistry>,
        config: ContainerConfig,
    ) -> Result<Self> {
        tracing::debug!("parse_xml called");
        let root = stanza_xml::parse(markup)?;

        let url_name = root
            .attribute("url_name")
            .map(str::to_string)
            .unwrap_or_else(|| config.url_name.clone());

        let mut container = Self {
            config,
            url_name,
            xml_content: String::new(),
            attributes: IndexMap::new(),
            children: Vec::new(),
            registry,
        };
        container.init_from_root(&root)?;

        if container.xml_content.is_empty() {
            container.xml_content = root.to_xml();
        }
        Ok(container)
    }

    fn init_from_root(&mut self, root: &XmlElement) -> Result<()> {
        self.children = tree::build_children(&self.url_name, root, &self.registry)?;
        self.attributes.clear();
        for attr in &root.attributes {
            // Identity is owned by the naming scheme, not attribute injection
            if attr.name == "url_name" {
                continue;
            }
            self.attributes.insert(attr.name.clone(), attr.value.clone());
        }
        Ok(())
    }

    /// Rebuild the child tree from the stored markup.
    ///
    /// No-op (beyond clearing the tree) when no markup has been stored.
    /// Comments are stripped before building.
    pub fn reload_children(&mut self) -> Result<()> {
        self.children.clear();
        if self.xml_content.trim().is_empty() {
            return Ok(());
        }
        let mut root = stanza_xml::parse(&self.xml_content)?;
        root.strip_comments();
        self.init_from_root(&root)
    }

    pub fn url_name(&self) -> &str {
        &self.url_name
    }

    /// The durable serialized markup.
    pub fn xml_content(&self) -> &str {
        &self.xml_content
    }

    /// A root attribute as authored (excluding `url_name`).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Build the per-request environment for this container's tree.
    pub fn block_env<'a>(
        &self,
        runtime: &'a dyn HostRuntime,
        store: &'a dyn StudentRecordStore,
    ) -> BlockEnv<'a> {
        BlockEnv::new(runtime, store, self.url_name.clone())
    }

    /// Render direct children into one merged fragment, optionally
    /// filtered by concrete type name.
    pub fn children_fragment(
        &mut self,
        ctx: &RenderCtx<'_>,
        view_name: &str,
        include_type: Option<&str>,
        exclude_type: Option<&str>,
    ) -> Result<(Fragment, Vec<(String, Fragment)>)> {
        render::children_fragment(&mut self.children, view_name, ctx, include_type, exclude_type)
    }

    /// The primary student-facing view: every child in document order.
    pub fn student_view(&mut self, ctx: &RenderCtx<'_>) -> Result<Fragment> {
        let view_name = self.config.view_name.clone();
        let (mut fragment, _named) =
            render::children_fragment(&mut self.children, &view_name, ctx, None, None)?;
        fragment.html = format!(
            "<div class=\"stanza-container\" name=\"{}\">{}</div>",
            self.url_name, fragment.html
        );
        Ok(fragment)
    }

    /// Re-render the primary view for a client-triggered refresh.
    ///
    /// Outbound links are rewritten first. The base URL comes from the
    /// configuration when set, otherwise from the runtime; the workbench
    /// sentinels apply when no fuller context exists.
    pub fn refresh_view(
        &mut self,
        ctx: &RenderCtx<'_>,
        rewriter: &dyn LinkRewriter,
    ) -> Result<ViewResponse> {
        let fragment = self.student_view(ctx)?;

        let course_id = ctx.env.runtime.course_id();
        let base_url = self
            .config
            .base_jump_url
            .clone()
            .unwrap_or_else(|| ctx.env.runtime.jump_to_url(&course_id));
        let view_name = self.config.view_name.clone();
        let fragment = rewriter.rewrite(&course_id, &base_url, &view_name, fragment);

        Ok(ViewResponse {
            html: fragment.html,
        })
    }

    /// Persist the whole tree, leaves first.
    pub fn save(&mut self, env: &BlockEnv<'_>) -> Result<()> {
        for child in &mut self.children {
            child.save(env)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, FieldSpec};
    use crate::render::ContentRenderer;
    use crate::registry::BlockType;
    use crate::runtime::{NoopRewriter, WorkbenchRuntime};
    use crate::store::MemoryStore;

    fn registry() -> Arc<BlockRegistry> {
        let mut registry = BlockRegistry::new();
        registry.register(
            BlockType::new("item", "ItemBlock", Arc::new(ContentRenderer))
                .with_field(FieldSpec::new("kind", FieldKind::Text)),
        );
        Arc::new(registry)
    }

    #[test]
    fn test_from_xml_adopts_root_url_name() {
        let container = Container::from_xml(
            r#"<container url_name="unit1"><item kind="a"/></container>"#,
            registry(),
            ContainerConfig::default(),
        )
        .unwrap();
        assert_eq!(container.url_name(), "unit1");
        assert_eq!(container.children[0].name(), Some("unit1_0"));
    }

    #[test]
    fn test_from_xml_captures_markup_verbatim() {
        let markup = r#"<container url_name="unit1"><!--draft--><item kind="a">hi</item></container>"#;
        let container =
            Container::from_xml(markup, registry(), ContainerConfig::default()).unwrap();
        // Comments survive the capture; only tree building skips them
        assert_eq!(container.xml_content(), markup);
    }

    #[test]
    fn test_root_attributes_kept() {
        let container = Container::from_xml(
            r#"<container url_name="unit1" display_name="Unit One"/>"#,
            registry(),
            ContainerConfig::default(),
        )
        .unwrap();
        assert_eq!(container.attribute("display_name"), Some("Unit One"));
        assert_eq!(container.attribute("url_name"), None);
    }

    #[test]
    fn test_reload_children_strips_comments() {
        let mut container = Container::from_xml(
            r#"<container url_name="unit1"><item kind="a"/><!--x--><item kind="b"/></container>"#,
            registry(),
            ContainerConfig::default(),
        )
        .unwrap();

        container.reload_children().unwrap();
        let names: Vec<_> = container
            .children
            .iter()
            .map(|c| c.name().unwrap())
            .collect();
        assert_eq!(names, vec!["unit1_0", "unit1_1"]);
    }

    #[test]
    fn test_student_view_wraps_children() {
        let runtime = WorkbenchRuntime;
        let store = MemoryStore::new();

        let mut container = Container::from_xml(
            r#"<container url_name="unit1"><item kind="a">hello</item></container>"#,
            registry(),
            ContainerConfig::default(),
        )
        .unwrap();

        let env = container.block_env(&runtime, &store);
        let ctx = RenderCtx::new(&env);
        let fragment = container.student_view(&ctx).unwrap();

        assert!(fragment.html.starts_with("<div class=\"stanza-container\" name=\"unit1\">"));
        assert!(fragment.html.contains("name=\"unit1_0\""));
        assert!(fragment.html.contains("hello"));
    }

    #[test]
    fn test_refresh_view_returns_html_payload() {
        let runtime = WorkbenchRuntime;
        let store = MemoryStore::new();

        let mut container = Container::from_xml(
            r#"<container url_name="unit1"><item kind="a">hello</item></container>"#,
            registry(),
            ContainerConfig::default(),
        )
        .unwrap();

        let env = container.block_env(&runtime, &store);
        let ctx = RenderCtx::new(&env);
        let response = container.refresh_view(&ctx, &NoopRewriter).unwrap();
        assert!(response.html.contains("hello"));
    }

    #[test]
    fn test_refresh_view_rewrites_with_configured_base_url() {
        struct RecordingRewriter;

        impl LinkRewriter for RecordingRewriter {
            fn rewrite(
                &self,
                course_id: &str,
                base_url: &str,
                view_name: &str,
                mut fragment: Fragment,
            ) -> Fragment {
                fragment.html = format!("{}|{}|{}|{}", course_id, base_url, view_name, fragment.html);
                fragment
            }
        }

        let runtime = WorkbenchRuntime;
        let store = MemoryStore::new();

        let config = ContainerConfig {
            base_jump_url: Some("/courses/sample/jump_to_id".to_string()),
            ..ContainerConfig::default()
        };
        let mut container = Container::from_xml(
            r#"<container url_name="unit1"><item kind="a"/></container>"#,
            registry(),
            config,
        )
        .unwrap();

        let env = container.block_env(&runtime, &store);
        let ctx = RenderCtx::new(&env);
        let response = container.refresh_view(&ctx, &RecordingRewriter).unwrap();
        assert!(
            response
                .html
                .starts_with("sample-course|/courses/sample/jump_to_id|student_view|")
        );
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ContainerConfig =
            serde_json::from_str(r#"{"url_name": "unit1"}"#).unwrap();
        assert_eq!(config.url_name, "unit1");
        assert_eq!(config.view_name, "student_view");
        assert_eq!(config.base_jump_url, None);
    }
}
