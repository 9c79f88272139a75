//! Ancestor-boundary resolution.
//!
//! A directory holding an index file is a module boundary: code outside it
//! may only import the index. For one import, the walk below finds the
//! first boundary between importer and target that the import bypasses.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cache::IndexCache;
use crate::resolver::{ModuleResolver, ResolveError};
use crate::utils::paths::{ancestors_of, is_relative_specifier, normalize, relative_specifier};

/// Order in which the target's ancestors are checked.
///
/// Only the first violated boundary is reported, so with nested boundaries
/// the order decides which one the user sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanOrder {
    /// Root to target: report the outermost bypassed boundary.
    #[default]
    OutermostFirst,
    /// Target to root: report the boundary closest to the target.
    InnermostFirst,
}

/// An import that bypasses a boundary's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryViolation {
    /// The bypassed boundary directory.
    pub boundary: PathBuf,
    /// The file the import actually resolves to.
    pub target: PathBuf,
    /// Specifier that imports the boundary's index instead.
    pub suggested_specifier: String,
}

/// Walks the ancestor chains of importer and target below a fixed root.
#[derive(Debug, Clone)]
pub struct BoundaryResolver {
    root: PathBuf,
    order: ScanOrder,
}

impl BoundaryResolver {
    /// Creates a resolver whose walks never leave `root`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: normalize(root.as_ref()),
            order: ScanOrder::default(),
        }
    }

    /// Sets the scan order.
    #[must_use]
    pub fn with_scan_order(mut self, order: ScanOrder) -> Self {
        self.order = order;
        self
    }

    /// Finds the boundary `specifier` bypasses when imported from `importer`.
    ///
    /// Non-relative and unresolvable specifiers, imports within a shared
    /// directory, boundaries without an index and imports that already
    /// target the index are all `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Only resolver faults are returned, unchanged.
    pub fn find_violating_boundary(
        &self,
        specifier: &str,
        importer: &Path,
        resolver: &dyn ModuleResolver,
        cache: &mut IndexCache,
    ) -> Result<Option<BoundaryViolation>, ResolveError> {
        let found = self.walk(self.order, Report::First, specifier, importer, resolver, cache)?;
        Ok(found.into_iter().next())
    }

    /// Finds every boundary `specifier` bypasses, walking in `order`
    /// rather than the resolver's own scan order.
    ///
    /// The walk goes on past a reported boundary and ends at one whose
    /// index is the target itself.
    ///
    /// # Errors
    ///
    /// Only resolver faults are returned, unchanged.
    pub fn find_violating_boundaries(
        &self,
        order: ScanOrder,
        specifier: &str,
        importer: &Path,
        resolver: &dyn ModuleResolver,
        cache: &mut IndexCache,
    ) -> Result<Vec<BoundaryViolation>, ResolveError> {
        self.walk(order, Report::All, specifier, importer, resolver, cache)
    }

    fn walk(
        &self,
        order: ScanOrder,
        report: Report,
        specifier: &str,
        importer: &Path,
        resolver: &dyn ModuleResolver,
        cache: &mut IndexCache,
    ) -> Result<Vec<BoundaryViolation>, ResolveError> {
        let mut found = Vec::new();
        if !is_relative_specifier(specifier) {
            return Ok(found);
        }

        let importer = normalize(importer);
        let Some(resolved) = resolver.resolve(specifier, &importer)? else {
            debug!("Unresolved '{}' in {}", specifier, importer.display());
            return Ok(found);
        };
        let target = normalize(&resolved.resolved_file);

        let importer_ancestors = ancestors_of(&importer, &self.root);
        let mut target_ancestors = ancestors_of(&target, &self.root);
        if order == ScanOrder::InnermostFirst {
            target_ancestors.reverse();
        }
        let importer_dir = importer.parent().unwrap_or(self.root.as_path());

        for boundary in target_ancestors {
            if importer_ancestors.contains(&boundary) {
                continue;
            }

            let to_boundary = relative_specifier(importer_dir, &boundary);
            let entry = cache.resolve_with(&boundary, || {
                resolver
                    .resolve(&to_boundary, &importer)
                    .map(|found| found.map(|m| normalize(&m.resolved_file)))
            })?;

            let Some(index) = entry.index_target() else {
                continue;
            };

            if index == target.as_path() {
                debug!(
                    "'{}' in {} already imports the index of {}",
                    specifier,
                    importer.display(),
                    boundary.display()
                );
                break;
            }

            debug!(
                "'{}' in {} bypasses {}",
                specifier,
                importer.display(),
                index.display()
            );
            found.push(BoundaryViolation {
                boundary,
                target: target.clone(),
                suggested_specifier: to_boundary,
            });
            if report == Report::First {
                break;
            }
        }

        Ok(found)
    }
}

/// How many bypassed boundaries a walk collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Report {
    First,
    All,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{FsResolver, ResolvedModule};
    use std::collections::HashSet;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Project fixture; every path handed out is normalized.
    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new(files: &[&str]) -> Self {
            let dir = TempDir::new().unwrap();
            for rel in files {
                let path = dir.path().join(rel);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(&path, "export {}\n").unwrap();
            }
            Self { dir }
        }

        fn root(&self) -> PathBuf {
            normalize(self.dir.path())
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.root().join(rel)
        }

        fn check(&self, specifier: &str, importer: &str) -> Option<BoundaryViolation> {
            self.check_ordered(specifier, importer, ScanOrder::OutermostFirst)
        }

        fn check_ordered(
            &self,
            specifier: &str,
            importer: &str,
            order: ScanOrder,
        ) -> Option<BoundaryViolation> {
            BoundaryResolver::new(self.root())
                .with_scan_order(order)
                .find_violating_boundary(
                    specifier,
                    &self.path(importer),
                    &FsResolver::new(),
                    &mut IndexCache::new(),
                )
                .unwrap()
        }
    }

    /// Counts resolver calls per specifier.
    struct CountingResolver {
        inner: FsResolver,
        calls: AtomicUsize,
        seen: std::sync::Mutex<Vec<String>>,
    }

    impl CountingResolver {
        fn new() -> Self {
            Self {
                inner: FsResolver::new(),
                calls: AtomicUsize::new(0),
                seen: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    impl ModuleResolver for CountingResolver {
        fn resolve(
            &self,
            specifier: &str,
            from_file: &Path,
        ) -> Result<Option<ResolvedModule>, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(specifier.to_string());
            self.inner.resolve(specifier, from_file)
        }
    }

    struct FailingResolver;

    impl ModuleResolver for FailingResolver {
        fn resolve(
            &self,
            _: &str,
            from_file: &Path,
        ) -> Result<Option<ResolvedModule>, ResolveError> {
            Err(ResolveError::Io {
                path: from_file.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    const BASIC: &[&str] = &["a/index.ts", "a/inner.ts", "b/main.ts", "c/file.ts"];

    #[test]
    fn reaching_into_indexed_directory_is_flagged() {
        let fx = Fixture::new(BASIC);
        let found = fx.check("../a/inner", "b/main.ts").expect("violation");
        assert_eq!(found.suggested_specifier, "../a");
        assert_eq!(found.boundary, fx.path("a"));
        assert_eq!(found.target, fx.path("a/inner.ts"));
    }

    #[test]
    fn same_directory_import_is_exempt() {
        let fx = Fixture::new(BASIC);
        assert_eq!(fx.check("./inner", "a/index.ts"), None);
    }

    #[test]
    fn importing_the_directory_is_fine() {
        let fx = Fixture::new(BASIC);
        assert_eq!(fx.check("../a", "b/main.ts"), None);
        assert_eq!(fx.check("../a/index", "b/main.ts"), None);
    }

    #[test]
    fn directory_without_index_is_silent() {
        let fx = Fixture::new(&["c/deep/er/file.ts", "c/other.ts", "b/main.ts"]);
        assert_eq!(fx.check("../c/other", "b/main.ts"), None);
        assert_eq!(fx.check("../c/deep/er/file", "b/main.ts"), None);
    }

    #[test]
    fn bare_specifier_is_exempt() {
        let fx = Fixture::new(BASIC);
        assert_eq!(fx.check("a/inner", "b/main.ts"), None);
    }

    #[test]
    fn unresolvable_specifier_is_silent() {
        let fx = Fixture::new(BASIC);
        assert_eq!(fx.check("../a/missing", "b/main.ts"), None);
    }

    #[test]
    fn importing_a_parent_module_is_exempt() {
        let fx = Fixture::new(&["a/index.ts", "a/util.ts", "a/sub/leaf.ts"]);
        // a/ is shared by importer and target
        assert_eq!(fx.check("../util", "a/sub/leaf.ts"), None);
    }

    #[test]
    fn child_directory_with_index_is_flagged_from_parent() {
        let fx = Fixture::new(&["a/index.ts", "a/sub/index.ts", "a/sub/leaf.ts"]);
        let found = fx.check("./sub/leaf", "a/index.ts").expect("violation");
        assert_eq!(found.suggested_specifier, "./sub");
    }

    #[test]
    fn nested_boundaries_follow_scan_order() {
        let fx = Fixture::new(&[
            "a/index.ts",
            "a/sub/index.ts",
            "a/sub/leaf.ts",
            "b/main.ts",
        ]);

        let outer = fx
            .check_ordered("../a/sub/leaf", "b/main.ts", ScanOrder::OutermostFirst)
            .expect("violation");
        assert_eq!(outer.suggested_specifier, "../a");

        let inner = fx
            .check_ordered("../a/sub/leaf", "b/main.ts", ScanOrder::InnermostFirst)
            .expect("violation");
        assert_eq!(inner.suggested_specifier, "../a/sub");
    }

    #[test]
    fn every_bypassed_boundary_is_collected() {
        let fx = Fixture::new(&[
            "a/index.ts",
            "a/sub/index.ts",
            "a/sub/leaf.ts",
            "b/main.ts",
        ]);
        let all = |order| {
            BoundaryResolver::new(fx.root())
                .find_violating_boundaries(
                    order,
                    "../a/sub/leaf",
                    &fx.path("b/main.ts"),
                    &FsResolver::new(),
                    &mut IndexCache::new(),
                )
                .unwrap()
                .into_iter()
                .map(|v| v.suggested_specifier)
                .collect::<Vec<_>>()
        };

        assert_eq!(all(ScanOrder::InnermostFirst), vec!["../a/sub", "../a"]);
        assert_eq!(all(ScanOrder::OutermostFirst), vec!["../a", "../a/sub"]);
    }

    #[test]
    fn collecting_stops_at_the_targets_own_index() {
        let fx = Fixture::new(&["a/index.ts", "a/sub/index.ts", "b/main.ts"]);
        let importer = fx.path("b/main.ts");
        let resolver = FsResolver::new();
        let mut cache = IndexCache::new();

        let boundaries = BoundaryResolver::new(fx.root());
        let outer_first = boundaries
            .find_violating_boundaries(
                ScanOrder::OutermostFirst,
                "../a/sub",
                &importer,
                &resolver,
                &mut cache,
            )
            .unwrap();
        assert_eq!(outer_first.len(), 1);
        assert_eq!(outer_first[0].suggested_specifier, "../a");

        let inner_first = boundaries
            .find_violating_boundaries(
                ScanOrder::InnermostFirst,
                "../a/sub",
                &importer,
                &resolver,
                &mut cache,
            )
            .unwrap();
        assert!(inner_first.is_empty());
    }

    #[test]
    fn inner_index_is_reported_through_outer_boundary() {
        let fx = Fixture::new(&["a/index.ts", "a/sub/index.ts", "b/main.ts"]);
        // Importing a/sub's index still bypasses a's index
        let found = fx.check("../a/sub", "b/main.ts").expect("violation");
        assert_eq!(found.suggested_specifier, "../a");
        // Scanning from the target side stops at a/sub, whose index is the target
        assert_eq!(
            fx.check_ordered("../a/sub", "b/main.ts", ScanOrder::InnermostFirst),
            None
        );
    }

    #[test]
    fn index_less_outer_directory_is_skipped() {
        let fx = Fixture::new(&["x/a/index.ts", "x/a/inner.ts", "b/main.ts"]);
        let found = fx.check("../x/a/inner", "b/main.ts").expect("violation");
        assert_eq!(found.suggested_specifier, "../x/a");
    }

    #[test]
    fn target_outside_root_is_silent() {
        let fx = Fixture::new(&["outside/a/index.ts", "outside/a/inner.ts", "proj/b/main.ts"]);
        let found = BoundaryResolver::new(fx.path("proj"))
            .find_violating_boundary(
                "../../outside/a/inner",
                &fx.path("proj/b/main.ts"),
                &FsResolver::new(),
                &mut IndexCache::new(),
            )
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn boundary_lookup_runs_once_per_run() {
        let fx = Fixture::new(&[
            "a/index.ts",
            "a/one.ts",
            "a/two.ts",
            "b/main.ts",
            "b/other.ts",
        ]);
        let boundaries = BoundaryResolver::new(fx.root());
        let resolver = CountingResolver::new();
        let mut cache = IndexCache::new();

        for (specifier, importer) in [
            ("../a/one", "b/main.ts"),
            ("../a/two", "b/main.ts"),
            ("../a/one", "b/other.ts"),
        ] {
            let found = boundaries
                .find_violating_boundary(specifier, &fx.path(importer), &resolver, &mut cache)
                .unwrap()
                .expect("violation");
            assert_eq!(found.suggested_specifier, "../a");
        }

        let seen = resolver.seen.lock().unwrap();
        let boundary_lookups = seen.iter().filter(|s| s.as_str() == "../a").count();
        assert_eq!(boundary_lookups, 1);
        // three real imports plus one boundary lookup
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 4);
        assert_eq!(cache.has_index(&fx.path("a")), Some(true));
        assert_eq!(cache.hits(), 2);
    }

    #[test]
    fn resolver_fault_propagates() {
        let err = BoundaryResolver::new("/proj")
            .find_violating_boundary(
                "../a/inner",
                Path::new("/proj/b/main.ts"),
                &FailingResolver,
                &mut IndexCache::new(),
            )
            .unwrap_err();
        assert!(matches!(err, ResolveError::Io { .. }));
    }

    #[test]
    fn no_violation_for_any_same_directory_pair() {
        let files = ["a/index.ts", "a/x.ts", "a/y.ts", "a/z.ts"];
        let fx = Fixture::new(&files);
        let names: HashSet<&str> = ["./x", "./y", "./z", "./index", "."].into_iter().collect();
        for importer in files {
            for specifier in &names {
                assert_eq!(fx.check(specifier, importer), None, "{specifier} from {importer}");
            }
        }
    }
}
