/*
 * fragment.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rendered output fragments and their static resources.
 */

//! Rendered output fragments.
//!
//! A [`Fragment`] is a piece of rendered HTML plus the static resources
//! (CSS, JS) it references. Child fragments are merged into their parent's
//! fragment during rendering; resources deduplicate by URL.

use serde::{Deserialize, Serialize};

/// Kind of a referenced static resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Css,
    Js,
}

/// A static resource referenced by rendered output.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub kind: ResourceKind,
    pub url: String,
}

/// Rendered HTML plus referenced static resources.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    pub html: String,
    pub resources: Vec<Resource>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            resources: Vec::new(),
        }
    }

    /// Reference a static resource. Duplicate URLs are kept once.
    pub fn add_resource(&mut self, kind: ResourceKind, url: impl Into<String>) {
        let url = url.into();
        if !self.resources.iter().any(|r| r.url == url) {
            self.resources.push(Resource { kind, url });
        }
    }

    /// Merge another fragment's resources into this one.
    pub fn add_resources_from(&mut self, other: &Fragment) {
        for resource in &other.resources {
            self.add_resource(resource.kind, resource.url.clone());
        }
    }
}

/// Payload returned by the client-refresh view handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResponse {
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_resource_dedups_by_url() {
        let mut fragment = Fragment::new();
        fragment.add_resource(ResourceKind::Css, "/static/blocks.css");
        fragment.add_resource(ResourceKind::Css, "/static/blocks.css");
        fragment.add_resource(ResourceKind::Js, "/static/blocks.js");
        assert_eq!(fragment.resources.len(), 2);
    }

    #[test]
    fn test_merge_resources() {
        let mut parent = Fragment::from_html("<div/>");
        parent.add_resource(ResourceKind::Css, "/static/blocks.css");

        let mut child = Fragment::from_html("<p/>");
        child.add_resource(ResourceKind::Css, "/static/blocks.css");
        child.add_resource(ResourceKind::Js, "/static/quiz.js");

        parent.add_resources_from(&child);
        assert_eq!(parent.resources.len(), 2);
        assert_eq!(parent.resources[1].url, "/static/quiz.js");
    }

    #[test]
    fn test_view_response_serializes() {
        let response = ViewResponse {
            html: "<div>ok</div>".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"html":"<div>ok</div>"}"#);
    }
}
