//! Language-agnostic extraction types and trait.
//!
//! `ImportExtractor` is the extension point for adding source languages.
//! Implement it to teach index-lint how to pull module specifiers out of a
//! file; the analyzer and rules only ever see [`ImportEdge`]s.

use std::path::PathBuf;

/// Which kind of statement carried the specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `import … from '…'`, `import '…'`, `import x = require('…')`
    Import,
    /// `export … from '…'`
    Export,
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Import => write!(f, "import"),
            Self::Export => write!(f, "export"),
        }
    }
}

/// One module reference in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    /// The raw specifier text, quotes stripped.
    pub specifier: String,
    /// Statement the specifier belongs to.
    pub kind: StatementKind,
    /// Line of the specifier literal (1-indexed).
    pub line: usize,
    /// Column of the specifier literal (1-indexed).
    pub column: usize,
    /// Byte offset of the specifier literal, quotes included.
    pub offset: usize,
    /// Byte length of the specifier literal, quotes included.
    pub length: usize,
}

impl ImportEdge {
    /// Creates an edge at the given position with an empty span.
    #[must_use]
    pub fn new(
        specifier: impl Into<String>,
        kind: StatementKind,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            specifier: specifier.into(),
            kind,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte span of the specifier literal.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// Result of extracting one source file.
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    /// Path relative to project root. Filled in by the analyzer.
    pub file_path: PathBuf,
    /// Module references in source order.
    pub edges: Vec<ImportEdge>,
}

/// Errors raised while extracting a file.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Loader message.
        message: String,
    },
    /// The parser gave up without producing a tree.
    #[error("{language} parser produced no syntax tree")]
    NoTree {
        /// Language identifier.
        language: &'static str,
    },
}

/// Trait for language-specific import extraction.
///
/// The extractor receives raw source text and returns every top-level
/// import/export specifier in source order.
pub trait ImportExtractor: Send + Sync {
    /// Language identifier (e.g., `"typescript"`, `"tsx"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".ts", ".mts"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extract module references from source code.
    ///
    /// # Errors
    ///
    /// Returns an error if the source could not be parsed at all.
    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError>;

    /// Whether this extractor handles the given file name.
    fn handles(&self, file_name: &str) -> bool {
        self.extensions().iter().any(|ext| file_name.ends_with(ext))
    }
}

/// Type alias for boxed extractor trait objects.
pub type ExtractorBox = Box<dyn ImportExtractor>;
