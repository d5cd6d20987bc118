/*
 * store.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-student record persistence boundary.
 */

//! Per-student record persistence.
//!
//! Each named block persists one JSON blob per student and course, keyed by
//! its qualified name (`{container_url_name}-{block_identity}`). The store
//! itself is an external collaborator; this module defines the boundary
//! trait plus the in-memory implementation used in tests and the workbench.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};

/// Key of one student's record for one named block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub student_id: String,
    pub course_id: String,
    /// Qualified name: `{container_url_name}-{block_identity}`.
    pub name: String,
}

/// Storage for serialized per-student block state.
///
/// An absent row is reported as `None` from [`load`](Self::load);
/// get-or-create is implicit in [`save`](Self::save). The store adds no
/// locking of its own beyond per-operation atomicity, so concurrent saves
/// for the same key are last-write-wins.
pub trait StudentRecordStore: Send + Sync {
    fn load(&self, key: &RecordKey) -> Result<Option<String>>;
    fn save(&self, key: &RecordKey, data: &str) -> Result<()>;
}

/// In-memory store used in tests and the workbench.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<RecordKey, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes performed, for asserting the redundant-write guard.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl StudentRecordStore for MemoryStore {
    fn load(&self, key: &RecordKey) -> Result<Option<String>> {
        let records = self
            .records
            .read()
            .map_err(|_| Error::store("record store lock poisoned"))?;
        Ok(records.get(key).cloned())
    }

    fn save(&self, key: &RecordKey, data: &str) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| Error::store("record store lock poisoned"))?;
        records.insert(key.clone(), data.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
