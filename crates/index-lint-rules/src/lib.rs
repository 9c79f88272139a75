//! # index-lint-rules
//!
//! Built-in lint rules for index-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | IDX001 | `only-import-from-index` | Forbids importing files behind a directory's index |
//! | IDX002 | `only-require-from-index` | Opt-in: reports every index an import bypasses |
//!
//! ## Usage
//!
//! ```ignore
//! use index_lint_core::Analyzer;
//! use index_lint_rules::OnlyImportFromIndex;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .extractor(TypeScriptExtractor::typescript())
//!     .rule(OnlyImportFromIndex::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod only_import_from_index;
mod only_require_from_index;
mod registry;

pub use only_import_from_index::OnlyImportFromIndex;
pub use only_require_from_index::OnlyRequireFromIndex;
pub use registry::{all_rules, rules_by_names};

/// Re-export core types for convenience.
pub use index_lint_core::{Rule, Severity, Violation};
