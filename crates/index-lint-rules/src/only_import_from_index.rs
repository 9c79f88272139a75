//! Rule to forbid reaching past a directory's index file.
//!
//! # Rationale
//!
//! When a directory contains an index file (e.g. `index.ts`, `index.js`), the
//! index is the directory's public surface. Files outside the directory may
//! import the directory, but not the files inside it.
//!
//! ```ts
//! // src/b/main.ts, with src/a/index.ts present
//! import { x } from '../a/inner' // violation: import from '../a'
//! import { x } from '../a'       // ok
//! ```
//!
//! Only relative specifiers are checked. Imports inside a directory the
//! importer already lives in are exempt. With nested boundaries, only the
//! outermost bypassed one is reported.
//!
//! # Configuration
//!
//! Only the generic `enabled` and `severity` keys.

use index_lint_core::utils::paths::to_forward_slashes;
use index_lint_core::{
    FileContext, ImportEdge, Location, ResolveError, Rule, RuleKind, RunContext,
    Severity, Suggestion, Violation,
};
use tracing::debug;

/// Rule code for only-import-from-index.
pub const CODE: &str = "IDX001";

/// Rule name for only-import-from-index.
pub const NAME: &str = "only-import-from-index";

/// Forbids importing files nested in a directory that has an index.
#[derive(Debug, Clone)]
pub struct OnlyImportFromIndex {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for OnlyImportFromIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl OnlyImportFromIndex {
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
    format!("Directory '{module}' has index file. Please import from '{module}' instead.")
}

impl Rule for OnlyImportFromIndex {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "When a directory contains a file named index (e.g. index.ts, index.js), \
         files outside of the directory can no longer import other files in the \
         directory except the index."
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Style
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(
        &self,
        run: &mut RunContext<'_>,
        ctx: &FileContext<'_>,
        edges: &[ImportEdge],
    ) -> Result<Vec<Violation>, ResolveError> {
        let mut violations = Vec::new();

        for edge in edges {
            let Some(found) = run.find_violating_boundary(&edge.specifier, ctx.path)? else {
                continue;
            };

            let module = to_forward_slashes(&found.suggested_specifier);
            debug!(
                "{}:{}: {} '{}' bypasses index of {}",
                ctx.relative_path.display(),
                edge.line,
                edge.kind,
                edge.specifier,
                found.boundary.display()
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
                .with_suggestion(Suggestion::new(format!("Import from '{module}'"))),
            );
        }

        Ok(violations)
    }
}
