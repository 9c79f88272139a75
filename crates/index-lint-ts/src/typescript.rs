//! TypeScript and JavaScript import extractor using Tree-sitter.

use index_lint_core::{ExtractError, FileAnalysis, ImportEdge, ImportExtractor, StatementKind};
use tree_sitter::{Language, Node, Parser};

/// Grammar flavor used by a [`TypeScriptExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    TypeScript,
    Tsx,
}

/// Extracts top-level import and re-export specifiers.
///
/// Two flavors exist because the TypeScript grammar rejects JSX while the
/// TSX grammar rejects angle-bracket casts:
///
/// - [`TypeScriptExtractor::typescript`] for `.ts`, `.mts`, `.cts`
/// - [`TypeScriptExtractor::tsx`] for `.tsx` and plain JavaScript
pub struct TypeScriptExtractor {
    dialect: Dialect,
    language: Language,
}

impl TypeScriptExtractor {
    /// Extractor for TypeScript sources.
    #[must_use]
    pub fn typescript() -> Self {
        Self {
            dialect: Dialect::TypeScript,
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }

    /// Extractor for TSX and JavaScript sources.
    #[must_use]
    pub fn tsx() -> Self {
        Self {
            dialect: Dialect::Tsx,
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Builds an edge from a `string` node, skipping anything else.
    fn edge(node: Node<'_>, src: &[u8], kind: StatementKind) -> Option<ImportEdge> {
        if node.kind() != "string" {
            return None;
        }
        let raw = node.utf8_text(src).ok()?;
        let specifier = raw
            .strip_prefix(['\'', '"'])
            .and_then(|s| s.strip_suffix(['\'', '"']))
            .unwrap_or(raw);
        let pos = node.start_position();
        Some(
            ImportEdge::new(specifier, kind, pos.row + 1, pos.column + 1)
                .with_span(node.start_byte(), node.end_byte() - node.start_byte()),
        )
    }

    fn import_source(node: Node<'_>) -> Option<Node<'_>> {
        if let Some(source) = node.child_by_field_name("source") {
            return Some(source);
        }
        // import x = require('...')
        let mut cursor = node.walk();
        let clause = node
            .named_children(&mut cursor)
            .find(|child| child.kind() == "import_require_clause")?;
        clause.child_by_field_name("source")
    }
}

impl std::fmt::Debug for TypeScriptExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeScriptExtractor")
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}

impl ImportExtractor for TypeScriptExtractor {
    fn language_id(&self) -> &'static str {
        match self.dialect {
            Dialect::TypeScript => "typescript",
            Dialect::Tsx => "tsx",
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        match self.dialect {
            Dialect::TypeScript => &[".ts", ".mts", ".cts"],
            Dialect::Tsx => &[".tsx", ".js", ".jsx", ".mjs", ".cjs"],
        }
    }

    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError> {
        let language = self.language_id();
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ExtractError::Language {
                language,
                message: e.to_string(),
            })?;

        let src = source.as_bytes();
        let tree = parser
            .parse(src, None)
            .ok_or(ExtractError::NoTree { language })?;
        let root = tree.root_node();

        let mut result = FileAnalysis::default();
        let mut cursor = root.walk();
        for node in root.children(&mut cursor) {
            let edge = match node.kind() {
                "import_statement" => Self::import_source(node)
                    .and_then(|s| Self::edge(s, src, StatementKind::Import)),
                "export_statement" => node
                    .child_by_field_name("source")
                    .and_then(|s| Self::edge(s, src, StatementKind::Export)),
                _ => None,
            };
            if let Some(edge) = edge {
                result.edges.push(edge);
            }
        }

        Ok(result)
    }
}
