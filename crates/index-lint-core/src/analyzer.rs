//! Core analyzer for orchestrating lint execution.

use crate::boundary::ScanOrder;
use crate::config::Config;
use crate::context::{FileContext, RunContext};
use crate::extractor::{ExtractError, ExtractorBox, ImportExtractor};
use crate::resolver::{FsResolver, ModuleResolver, ResolveError};
use crate::rule::{Rule, RuleBox};
use crate::types::{LintResult, Violation};
use crate::utils::paths::normalize;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error outside of reading a source file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source file could not be read or is not valid UTF-8.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path to the unreadable file.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },

    /// Error walking the project tree.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Error extracting imports from a source file.
    #[error("Parse error in {path}: {source}")]
    Extract {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Extractor error.
        source: ExtractError,
    },

    /// The module resolver failed.
    #[error("Resolution error in {path}: {source}")]
    Resolve {
        /// File whose imports were being resolved.
        path: PathBuf,
        /// Resolver error.
        source: ResolveError,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// No extractor was registered.
    #[error("No import extractor registered")]
    NoExtractor,

    /// No extractor handles the given file.
    #[error("No extractor handles {0}")]
    UnsupportedFile(PathBuf),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    extractors: Vec<ExtractorBox>,
    resolver: Option<Box<dyn ModuleResolver>>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    scan_order: ScanOrder,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the boundary root; files are discovered below it.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an import extractor.
    #[must_use]
    pub fn extractor<E: ImportExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Sets the module resolver (default: [`FsResolver`] from config).
    #[must_use]
    pub fn resolver<R: ModuleResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the boundary scan order.
    #[must_use]
    pub fn scan_order(mut self, order: ScanOrder) -> Self {
        self.scan_order = order;
        self
    }

    /// Sets whether an unreadable or unparsable file fails the run
    /// (default: false, the file is skipped).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if no extractor is registered, an exclude pattern
    /// is not a valid glob, or the current directory cannot be read.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        if self.extractors.is_empty() {
            return Err(AnalyzerError::NoExtractor);
        }

        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .or_else(|| config.analyzer.root.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        // Merge exclude patterns from config
        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.clone());
        for pattern in &exclude_patterns {
            glob::Pattern::new(pattern)?;
        }

        let resolver = self
            .resolver
            .unwrap_or_else(|| Box::new(FsResolver::from_config(&config.resolve)));

        Ok(Analyzer {
            root: normalize(&root),
            rules: self.rules,
            extractors: self.extractors,
            resolver,
            exclude_patterns,
            config,
            scan_order: self.scan_order,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    extractors: Vec<ExtractorBox>,
    resolver: Box<dyn ModuleResolver>,
    exclude_patterns: Vec<String>,
    config: Config,
    scan_order: ScanOrder,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the boundary root being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Starts a new run with an empty index cache.
    #[must_use]
    pub fn start_run(&self) -> RunContext<'_> {
        RunContext::new(&self.root, self.resolver.as_ref()).with_scan_order(self.scan_order)
    }

    /// Analyzes all files below the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or module resolution fails, or
    /// a file cannot be read or parsed while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        let mut run = self.start_run();
        for file_path in &files {
            match self.analyze_file(&mut run, file_path) {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(err @ (AnalyzerError::Read { .. } | AnalyzerError::Extract { .. })) => {
                    warn!("Skipping file: {}", err);
                    if self.fail_on_parse_error {
                        return Err(err);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        debug!(
            "Index cache: {} boundaries, {} hits, {} misses",
            run.cache().len(),
            run.cache().hits(),
            run.cache().misses()
        );
        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Checks one in-memory source file in a fresh run.
    ///
    /// # Errors
    ///
    /// Returns an error if no extractor handles `path`, the source cannot
    /// be parsed, or module resolution fails.
    pub fn check_source(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<Vec<Violation>, AnalyzerError> {
        let mut run = self.start_run();
        self.check_in_run(&mut run, path, content)
    }

    /// Analyzes a single file within a run and returns violations.
    fn analyze_file(
        &self,
        run: &mut RunContext<'_>,
        path: &Path,
    ) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.check_in_run(run, path, &content)
    }

    fn check_in_run(
        &self,
        run: &mut RunContext<'_>,
        path: &Path,
        content: &str,
    ) -> Result<Vec<Violation>, AnalyzerError> {
        let path = normalize(path);
        let extractor = self
            .extractor_for(&path)
            .ok_or_else(|| AnalyzerError::UnsupportedFile(path.clone()))?;

        let ctx = FileContext::new(&path, content, &self.root);
        let mut analysis = extractor
            .analyze(content)
            .map_err(|source| AnalyzerError::Extract {
                path: path.clone(),
                source,
            })?;
        analysis.file_path = ctx.relative_path.clone();

        let mut violations = Vec::new();
        for rule in &self.rules {
            if !self.config.rule_enabled_or(rule.name(), rule.enabled_by_default()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let rule_violations = rule
                .check(run, &ctx, &analysis.edges)
                .map_err(|source| AnalyzerError::Resolve {
                    path: path.clone(),
                    source,
                })?;
            violations.extend(self.apply_severity_override(rule.name(), rule_violations));
        }

        Ok(violations)
    }

    fn extractor_for(&self, path: &Path) -> Option<&dyn ImportExtractor> {
        let name = path.file_name()?.to_str()?;
        self.extractors
            .iter()
            .find(|e| e.handles(name))
            .map(|extractor| &**extractor)
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    /// Discovers all source files some extractor handles.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if self.extractor_for(path).is_none() {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(normalize(path));
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/node_modules/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty()
                && normalized_pattern != "/"
                && path_str.contains(&normalized_pattern)
            {
                return true;
            }
        }

        false
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("root", &self.root)
            .field("rules", &self.rules.len())
            .field("extractors", &self.extractors.len())
            .field("exclude_patterns", &self.exclude_patterns)
            .field("scan_order", &self.scan_order)
            .finish_non_exhaustive()
    }
}
