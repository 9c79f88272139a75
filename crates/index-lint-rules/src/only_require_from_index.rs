//! The earliest form of the index rule, kept for projects that still rely on
//! its reporting.
//!
//! It differs from [`OnlyImportFromIndex`](crate::OnlyImportFromIndex) in
//! three ways:
//!
//! - only `import` statements are checked, `export … from` is not;
//! - boundaries are scanned from the target's directory outwards;
//! - every bypassed boundary is reported, so one import can yield several
//!   violations.
//!
//! ```ts
//! // src/b/main.ts, with src/a/index.ts and src/a/sub/index.ts present
//! import { x } from '../a/sub/inner'
//! // violation: Please require from '../a/sub'
//! // violation: Please require from '../a'
//! ```
//!
//! # Configuration
//!
//! Disabled unless the config says `enabled = true`. Otherwise only the
//! generic `severity` key.

use index_lint_core::utils::paths::to_forward_slashes;
use index_lint_core::{
    FileContext, ImportEdge, Location, ResolveError, Rule, RuleKind, RunContext, ScanOrder,
    Severity, StatementKind, Suggestion, Violation,
};
use tracing::debug;

/// Rule code for only-require-from-index.
pub const CODE: &str = "IDX002";

/// Rule name for only-require-from-index.
pub const NAME: &str = "only-require-from-index";

/// Reports each index an import reaches past, innermost first.
#[derive(Debug, Clone)]
pub struct OnlyRequireFromIndex {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for OnlyRequireFromIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl OnlyRequireFromIndex {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Message for an import that should go through `module`.
#[must_use]
pub fn message(module: &str) -> String {
    format!("Directory '{module}' has index file. Please require from '{module}' instead.")
}

impl Rule for OnlyRequireFromIndex {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "When a directory contains a file named index (e.g. index.ts, index.js), \
         files outside of the directory can no longer require other files in the \
         directory except the index. Only import statements are checked."
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Style
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn enabled_by_default(&self) -> bool {
        false
    }

    fn check(
        &self,
        run: &mut RunContext<'_>,
        ctx: &FileContext<'_>,
        edges: &[ImportEdge],
    ) -> Result<Vec<Violation>, ResolveError> {
        let mut violations = Vec::new();

        for edge in edges.iter().filter(|e| e.kind == StatementKind::Import) {
            let found =
                run.find_violating_boundaries(&edge.specifier, ctx.path, ScanOrder::InnermostFirst)?;

            for boundary in found {
                let module = to_forward_slashes(&boundary.suggested_specifier);
                debug!(
                    "{}:{}: '{}' bypasses index of {}",
                    ctx.relative_path.display(),
                    edge.line,
                    edge.specifier,
                    boundary.boundary.display()
                );

                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        Location::new(ctx.relative_path.clone(), edge.line, edge.column)
                            .with_span(edge.offset, edge.length),
                        message(&module),
                    )
                    .with_suggestion(Suggestion::new(format!("Require from '{module}'"))),
                );
            }
        }

        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use index_lint_core::utils::paths::normalize;
    use index_lint_core::FsResolver;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const TREE: &[&str] = &[
        "a/index.ts",
        "a/sub/index.ts",
        "a/sub/inner.ts",
        "a/plain/leaf.ts",
        "b/main.ts",
    ];

    fn project() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        for rel in TREE {
            let path = tmp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "export {}\n").unwrap();
        }
        let root = normalize(tmp.path());
        (tmp, root)
    }

    fn check(root: &Path, edges: &[ImportEdge]) -> Vec<Violation> {
        let resolver = FsResolver::new();
        let mut run = RunContext::new(root, &resolver);
        let path = root.join("b/main.ts");
        let ctx = FileContext::new(&path, "", root);
        OnlyRequireFromIndex::new()
            .check(&mut run, &ctx, edges)
            .unwrap()
    }

    fn messages(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.message.as_str()).collect()
    }

    #[test]
    fn reports_every_bypassed_index_innermost_first() {
        let (_tmp, root) = project();
        let edges = [ImportEdge::new("../a/sub/inner", StatementKind::Import, 3, 19)];
        let v = check(&root, &edges);

        assert_eq!(
            messages(&v),
            vec![
                "Directory '../a/sub' has index file. Please require from '../a/sub' instead.",
                "Directory '../a' has index file. Please require from '../a' instead.",
            ]
        );
        assert!(v.iter().all(|v| v.code == "IDX002" && v.location.line == 3));
        assert_eq!(
            v[0].suggestion.as_ref().map(|s| s.message.as_str()),
            Some("Require from '../a/sub'")
        );
    }

    #[test]
    fn stops_at_the_index_being_imported() {
        let (_tmp, root) = project();
        let edges = [ImportEdge::new("../a/sub", StatementKind::Import, 1, 1)];
        assert!(check(&root, &edges).is_empty());
    }

    #[test]
    fn index_less_directories_are_skipped() {
        let (_tmp, root) = project();
        let edges = [ImportEdge::new("../a/plain/leaf", StatementKind::Import, 1, 1)];
        assert_eq!(
            messages(&check(&root, &edges)),
            vec!["Directory '../a' has index file. Please require from '../a' instead."]
        );
    }

    #[test]
    fn re_exports_are_not_checked() {
        let (_tmp, root) = project();
        let edges = [ImportEdge::new("../a/sub/inner", StatementKind::Export, 1, 1)];
        assert!(check(&root, &edges).is_empty());
    }

    #[test]
    fn meta_marks_rule_opt_in() {
        let meta = OnlyRequireFromIndex::new().meta();
        assert_eq!(meta.name, "only-require-from-index");
        assert_eq!(meta.code, "IDX002");
        assert_eq!(meta.kind, RuleKind::Style);
        assert!(!meta.enabled_by_default);
    }
}
