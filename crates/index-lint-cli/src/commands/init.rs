//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# index-lint configuration

[analyzer]
# Boundary root, relative to this file. Defaults to the checked directory.
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
]

# Respect .gitignore files
respect_gitignore = true

[resolve]
# Extensions tried when an import omits one, in order
extensions = [".ts", ".tsx", ".d.ts", ".js", ".jsx", ".mts", ".cts", ".mjs", ".cjs"]

# File stems that make a directory a module boundary
index_names = ["index"]

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.only-import-from-index]
enabled = true
# severity = "warning"

# Earliest form of the rule: import statements only, every bypassed index
# reported innermost first. Off by default.
[rules.only-require-from-index]
enabled = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("index-lint.toml"), force)?;

    println!("Created index-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit index-lint.toml to set the boundary root");
    println!("  2. Run: index-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use index_lint_core::Config;
    use tempfile::TempDir;

    #[test]
    fn template_parses_with_defaults() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.analyzer.root, None);
        assert_eq!(config.resolve.index_names, vec!["index".to_string()]);
        assert!(config.is_rule_enabled("only-import-from-index"));
        assert_eq!(config.rule_severity("only-import-from-index"), None);
        assert!(!config.rule_enabled_or("only-require-from-index", true));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index-lint.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
