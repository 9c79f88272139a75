//! Per-run memo of which boundary directories expose an index.
//!
//! Many imports in a project cross the same directory. Probing that
//! directory's index means a round of filesystem lookups, so the answer is
//! recorded the first time and reused for the rest of the run. Entries are
//! write-once: the filesystem is treated as immutable while a run lasts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// What a boundary directory resolves to when imported as a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    index: Option<PathBuf>,
}

impl IndexEntry {
    /// Whether the directory resolves to an index file.
    #[must_use]
    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// The resolved index file, if any.
    #[must_use]
    pub fn index_target(&self) -> Option<&Path> {
        self.index.as_deref()
    }
}

/// Memo of boundary directory → index resolution for one analysis run.
///
/// Never shared between runs; build a new one per run.
#[derive(Debug, Default)]
pub struct IndexCache {
    entries: HashMap<PathBuf, IndexEntry>,
    hits: usize,
    misses: usize,
}

impl IndexCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `boundary`, running `lookup` on first query only.
    ///
    /// A failing lookup records nothing, so a later query retries.
    ///
    /// # Errors
    ///
    /// Propagates the lookup's error unchanged.
    pub fn resolve_with<F, E>(&mut self, boundary: &Path, lookup: F) -> Result<&IndexEntry, E>
    where
        F: FnOnce() -> Result<Option<PathBuf>, E>,
    {
        if self.entries.contains_key(boundary) {
            self.hits += 1;
            return Ok(&self.entries[boundary]);
        }

        self.misses += 1;
        let index = lookup()?;
        Ok(self
            .entries
            .entry(boundary.to_path_buf())
            .or_insert(IndexEntry { index }))
    }

    /// Whether `boundary` has an index, if it was already looked up.
    #[must_use]
    pub fn has_index(&self, boundary: &Path) -> Option<bool> {
        self.entries.get(boundary).map(IndexEntry::has_index)
    }

    /// The recorded index file of `boundary`, if looked up and present.
    #[must_use]
    pub fn index_target_of(&self, boundary: &Path) -> Option<&Path> {
        self.entries
            .get(boundary)
            .and_then(IndexEntry::index_target)
    }

    /// Number of looked-up boundaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was looked up yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queries answered from the cache.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Queries that ran a lookup.
    #[must_use]
    pub fn misses(&self) -> usize {
        self.misses
    }
}
