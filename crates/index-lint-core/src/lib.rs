//! # index-lint-core
//!
//! Core framework for enforcing index-file module boundaries.
//!
//! A directory that contains an index file (`index.ts`, `index.js`, …) is a
//! module boundary: code outside it may import the directory itself, but not
//! the files inside it. This crate provides:
//!
//! - [`ancestors_of`] and the other path utilities the boundary walk runs on
//! - [`ModuleResolver`] and the filesystem-backed [`FsResolver`]
//! - [`IndexCache`] memoizing per-directory index resolution within a run
//! - [`BoundaryResolver`] finding the boundary an import bypasses
//! - [`Rule`] and [`ImportExtractor`] extension points
//! - [`Analyzer`] for orchestrating a lint run
//!
//! ## Example
//!
//! ```ignore
//! use index_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .extractor(MyExtractor::new())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod boundary;
mod cache;
mod config;
mod context;
mod extractor;
mod resolver;
mod rule;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use boundary::{BoundaryResolver, BoundaryViolation, ScanOrder};
pub use cache::{IndexCache, IndexEntry};
pub use config::{AnalyzerConfig, Config, ConfigError, ResolveConfig, RuleConfig};
pub use context::{FileContext, RunContext};
pub use extractor::{
    ExtractError, ExtractorBox, FileAnalysis, ImportEdge, ImportExtractor, StatementKind,
};
pub use resolver::{FsResolver, ModuleResolver, ResolveError, ResolvedModule};
pub use rule::{Rule, RuleBox, RuleKind, RuleMeta};
pub use types::{LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic};
pub use utils::paths::{ancestors_of, is_relative_specifier, relative_specifier};
