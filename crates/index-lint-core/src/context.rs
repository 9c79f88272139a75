//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::boundary::{BoundaryResolver, BoundaryViolation, ScanOrder};
use crate::cache::IndexCache;
use crate::resolver::{ModuleResolver, ResolveError};

/// Context provided to rules for the file being checked.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
        }
    }
}

/// State that lives for exactly one analysis run.
///
/// Owns the [`IndexCache`], so two runs never observe each other's
/// filesystem snapshot.
pub struct RunContext<'r> {
    boundaries: BoundaryResolver,
    resolver: &'r dyn ModuleResolver,
    cache: IndexCache,
}

impl<'r> RunContext<'r> {
    /// Starts a run rooted at `root` with an empty cache.
    #[must_use]
    pub fn new(root: impl AsRef<Path>, resolver: &'r dyn ModuleResolver) -> Self {
        Self {
            boundaries: BoundaryResolver::new(root),
            resolver,
            cache: IndexCache::new(),
        }
    }

    /// Sets the order in which boundaries are checked.
    #[must_use]
    pub fn with_scan_order(mut self, order: ScanOrder) -> Self {
        self.boundaries = self.boundaries.with_scan_order(order);
        self
    }

    /// Returns the index cache of this run.
    #[must_use]
    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Finds the boundary bypassed by `specifier` written in `importer`.
    ///
    /// # Errors
    ///
    /// Propagates resolver faults.
    pub fn find_violating_boundary(
        &mut self,
        specifier: &str,
        importer: &Path,
    ) -> Result<Option<BoundaryViolation>, ResolveError> {
        self.boundaries
            .find_violating_boundary(specifier, importer, self.resolver, &mut self.cache)
    }

    /// Finds every boundary bypassed by `specifier`, walking in `order`
    /// regardless of the run's own scan order.
    ///
    /// # Errors
    ///
    /// Propagates resolver faults.
    pub fn find_violating_boundaries(
        &mut self,
        specifier: &str,
        importer: &Path,
        order: ScanOrder,
    ) -> Result<Vec<BoundaryViolation>, ResolveError> {
        self.boundaries.find_violating_boundaries(
            order,
            specifier,
            importer,
            self.resolver,
            &mut self.cache,
        )
    }
}

impl std::fmt::Debug for RunContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("boundaries", &self.boundaries)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
