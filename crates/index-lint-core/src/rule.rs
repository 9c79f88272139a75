//! Rule traits for defining lint rules.

use serde::Serialize;

use crate::context::{FileContext, RunContext};
use crate::extractor::ImportEdge;
use crate::resolver::ResolveError;
use crate::types::{Severity, Violation};

/// Category of a rule, as shown by `list-rules`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Conventions about how code is organized.
    Style,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Style => "style",
        })
    }
}

/// Declarative description of a rule, used for registration and listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMeta {
    /// Kebab-case rule name.
    pub name: &'static str,
    /// Rule code.
    pub code: &'static str,
    /// Rule category.
    pub kind: RuleKind,
    /// What the rule checks.
    pub description: &'static str,
    /// Whether the rule runs when the config does not mention it.
    pub enabled_by_default: bool,
}

/// A per-file lint rule over extracted import edges.
///
/// # Example
///
/// ```ignore
/// use index_lint_core::{FileContext, ImportEdge, ResolveError, Rule, RunContext, Violation};
///
/// pub struct NoParentImports;
///
/// impl Rule for NoParentImports {
///     fn name(&self) -> &'static str { "no-parent-imports" }
///     fn code(&self) -> &'static str { "IDX100" }
///
///     fn check(
///         &self,
///         _run: &mut RunContext<'_>,
///         ctx: &FileContext<'_>,
///         edges: &[ImportEdge],
///     ) -> Result<Vec<Violation>, ResolveError> {
///         Ok(edges
///             .iter()
///             .filter(|e| e.specifier.starts_with("../"))
///             .map(|e| /* build violation */ todo!())
///             .collect())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "only-import-from-index").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "IDX001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the rule category.
    fn kind(&self) -> RuleKind {
        RuleKind::Style
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether the rule runs without `enabled = true` in the config.
    fn enabled_by_default(&self) -> bool {
        true
    }

    /// Returns the declarative descriptor of this rule.
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            name: self.name(),
            code: self.code(),
            kind: self.kind(),
            description: self.description(),
            enabled_by_default: self.enabled_by_default(),
        }
    }

    /// Checks the import edges of one file, in source order.
    ///
    /// # Errors
    ///
    /// Returns resolver faults unchanged; everything else about an edge
    /// that cannot be checked means "no violation".
    fn check(
        &self,
        run: &mut RunContext<'_>,
        ctx: &FileContext<'_>,
        edges: &[ImportEdge],
    ) -> Result<Vec<Violation>, ResolveError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
