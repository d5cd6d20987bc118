/*
 * runtime.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Host runtime collaborators and the per-request block environment.
 */

//! Host runtime collaborators.
//!
//! Blocks run inside a host plugin runtime that knows the active student
//! and course, resolves static resource URLs, and rewrites outbound links.
//! Those services are consumed through the traits here; the workbench
//! implementations keep the system usable outside a full host environment.

use crate::fragment::Fragment;
use crate::store::StudentRecordStore;

/// Services provided by the host plugin runtime.
pub trait HostRuntime: Send + Sync {
    /// Identity of the active course.
    fn course_id(&self) -> String;

    /// Anonymous identity of the active student.
    fn student_id(&self) -> String;

    /// Resolve a static resource URI for a block type.
    fn local_resource_url(&self, block_type: &str, uri: &str) -> String;

    /// Base URL for cross-reference links within a course.
    fn jump_to_url(&self, course_id: &str) -> String;
}

/// Fallback runtime with sentinel identities.
pub struct WorkbenchRuntime;

impl HostRuntime for WorkbenchRuntime {
    fn course_id(&self) -> String {
        "sample-course".to_string()
    }

    fn student_id(&self) -> String {
        "student1".to_string()
    }

    fn local_resource_url(&self, block_type: &str, uri: &str) -> String {
        format!("/resource/{}/{}", block_type, uri.trim_start_matches('/'))
    }

    fn jump_to_url(&self, _course_id: &str) -> String {
        "/jump_to_id".to_string()
    }
}

/// Outbound-link rewriting applied before a refreshed view is returned.
pub trait LinkRewriter: Send + Sync {
    fn rewrite(
        &self,
        course_id: &str,
        base_url: &str,
        view_name: &str,
        fragment: Fragment,
    ) -> Fragment;
}

/// Rewriter that leaves fragments untouched.
pub struct NoopRewriter;

impl LinkRewriter for NoopRewriter {
    fn rewrite(
        &self,
        _course_id: &str,
        _base_url: &str,
        _view_name: &str,
        fragment: Fragment,
    ) -> Fragment {
        fragment
    }
}

/// Everything a block needs from its surroundings to load, save and render.
///
/// Built per request; one environment serves the whole tree walk.
pub struct BlockEnv<'a> {
    pub runtime: &'a dyn HostRuntime,
    pub store: &'a dyn StudentRecordStore,
    /// The owning container's url_name, prefix of every qualified name.
    pub url_name: String,
}

impl<'a> BlockEnv<'a> {
    pub fn new(
        runtime: &'a dyn HostRuntime,
        store: &'a dyn StudentRecordStore,
        url_name: impl Into<String>,
    ) -> Self {
        Self {
            runtime,
            store,
            url_name: url_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbench_sentinels() {
        let runtime = WorkbenchRuntime;
        assert_eq!(runtime.course_id(), "sample-course");
        assert_eq!(runtime.student_id(), "student1");
        assert_eq!(runtime.jump_to_url("sample-course"), "/jump_to_id");
        assert_eq!(
            runtime.local_resource_url("ItemBlock", "/public/item.css"),
            "/resource/ItemBlock/public/item.css"
        );
    }

    #[test]
    fn test_noop_rewriter_passes_through() {
        let fragment = Fragment::from_html("<a href=\"/jump_to_id/other\">x</a>");
        let out = NoopRewriter.rewrite("sample-course", "/jump_to_id", "student_view", fragment);
        assert_eq!(out.html, "<a href=\"/jump_to_id/other\">x</a>");
    }
}
