//! # index-lint-ts
//!
//! Tree-sitter based import extraction for TypeScript and JavaScript.
//!
//! This crate plugs into `index-lint-core` through the
//! [`ImportExtractor`](index_lint_core::ImportExtractor) trait and provides
//! [`TypeScriptExtractor`], which reads the top-level `import`,
//! `import x = require(...)` and `export ... from` statements of a file.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod typescript;

pub use typescript::TypeScriptExtractor;
