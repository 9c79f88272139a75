//! Check command implementation.

use anyhow::{Context, Result};
use index_lint_core::{Analyzer, Config, RuleBox, Severity};
use index_lint_rules::{all_rules, rules_by_names};
use index_lint_ts::TypeScriptExtractor;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Arguments of the check command.
pub struct CheckArgs<'a> {
    /// Project directory.
    pub path: &'a Path,
    /// Boundary root override.
    pub root: Option<&'a Path>,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules_filter: Option<&'a str>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Lowest severity that fails the run.
    pub fail_on: Severity,
    /// Where the configuration comes from.
    pub source: &'a ConfigSource,
}

/// Runs the check command.
pub fn run(args: &CheckArgs<'_>) -> Result<()> {
    let config = load_config(args.source)?;

    let root = boundary_root(args.path, args.root, &config, args.source);
    let mut builder = Analyzer::builder()
        .root(&root)
        .config(config)
        .extractor(TypeScriptExtractor::typescript())
        .extractor(TypeScriptExtractor::tsx())
        .excludes(args.exclude.iter().cloned());

    for rule in selected_rules(args.rules_filter) {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        analyzer.root().display(),
        analyzer.rule_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, args.format, analyzer.root())?;

    if result.has_violations_at(args.fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

/// `--root` wins. Otherwise a relative `analyzer.root` is taken from the
/// directory of the config file that set it, or from the project when the
/// config is global. Without either, the project is the root.
fn boundary_root(
    project: &Path,
    explicit: Option<&Path>,
    config: &Config,
    source: &ConfigSource,
) -> PathBuf {
    if let Some(root) = explicit {
        return root.to_path_buf();
    }
    let Some(configured) = &config.analyzer.root else {
        return project.to_path_buf();
    };
    let base = match source {
        ConfigSource::Explicit(file) | ConfigSource::Project(file) => {
            file.parent().unwrap_or(project)
        }
        ConfigSource::Global(_) | ConfigSource::Default => project,
    };
    base.join(configured)
}

fn selected_rules(filter: Option<&str>) -> Vec<RuleBox> {
    match filter {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            rules_by_names(&names)
        }
        None => all_rules(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_overrides_config() {
        let config = Config::parse("[analyzer]\nroot = \"src\"\n").unwrap();
        let source = ConfigSource::Project(PathBuf::from("/repo/index-lint.toml"));
        assert_eq!(
            boundary_root(Path::new("proj"), Some(Path::new("/abs")), &config, &source),
            PathBuf::from("/abs")
        );
        assert_eq!(
            boundary_root(Path::new("proj"), None, &config, &ConfigSource::Default),
            PathBuf::from("proj/src")
        );
    }

    #[test]
    fn config_root_is_relative_to_its_file() {
        let config = Config::parse("[analyzer]\nroot = \"src\"\n").unwrap();
        let project = Path::new("/repo/packages/app");

        let found = ConfigSource::Project(PathBuf::from("/repo/index-lint.toml"));
        assert_eq!(
            boundary_root(project, None, &config, &found),
            PathBuf::from("/repo/src")
        );

        let explicit = ConfigSource::Explicit(PathBuf::from("/etc/lint/custom.toml"));
        assert_eq!(
            boundary_root(project, None, &config, &explicit),
            PathBuf::from("/etc/lint/src")
        );

        let global = ConfigSource::Global(PathBuf::from("/home/u/.index-lint/config.toml"));
        assert_eq!(
            boundary_root(project, None, &config, &global),
            PathBuf::from("/repo/packages/app/src")
        );
    }

    #[test]
    fn unset_root_is_the_project() {
        let found = ConfigSource::Project(PathBuf::from("/repo/index-lint.toml"));
        assert_eq!(
            boundary_root(Path::new("/repo/packages/app"), None, &Config::default(), &found),
            PathBuf::from("/repo/packages/app")
        );
    }

    #[test]
    fn absolute_config_root_is_kept() {
        let config = Config::parse("[analyzer]\nroot = \"/srv/app\"\n").unwrap();
        let found = ConfigSource::Project(PathBuf::from("/repo/index-lint.toml"));
        assert_eq!(
            boundary_root(Path::new("/repo"), None, &config, &found),
            PathBuf::from("/srv/app")
        );
    }

    #[test]
    fn rules_filter_selects_by_name_or_code() {
        assert_eq!(selected_rules(None).len(), 2);
        assert_eq!(selected_rules(Some("IDX001")).len(), 1);
        assert_eq!(selected_rules(Some(" only-import-from-index ")).len(), 1);
        assert!(selected_rules(Some("unknown")).is_empty());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let source = ConfigSource::Explicit(PathBuf::from("/nonexistent/index-lint.toml"));
        assert!(load_config(&source).is_err());
    }
}
