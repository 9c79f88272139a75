//! Module resolution: maps a specifier written in a source file to the file
//! it loads.
//!
//! [`ModuleResolver`] is the seam between the boundary walk and the host's
//! module semantics. [`FsResolver`] follows TypeScript's rules for relative
//! and absolute specifiers: extension probing, `.js` to `.ts` substitution,
//! `package.json` entry points and implicit `index` files.

use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

use crate::config::ResolveConfig;
use crate::utils::paths::{is_relative_specifier, normalize};

/// A specifier that resolved to a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Normalized absolute path of the file the specifier loads.
    pub resolved_file: PathBuf,
}

impl ResolvedModule {
    /// Creates a resolved module, normalizing the path.
    #[must_use]
    pub fn new(resolved_file: impl AsRef<Path>) -> Self {
        Self {
            resolved_file: normalize(resolved_file.as_ref()),
        }
    }
}

/// Errors raised by a resolver itself.
///
/// A specifier that simply does not resolve is `Ok(None)`, not an error.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The filesystem refused to answer.
    #[error("failed to inspect {path}: {source}")]
    Io {
        /// Path being inspected.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Resolves module specifiers the way the host's module loader would.
pub trait ModuleResolver: Send + Sync {
    /// Resolves `specifier` as written in `from_file`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the resolver cannot do its job; an
    /// unresolvable specifier is `Ok(None)`.
    fn resolve(
        &self,
        specifier: &str,
        from_file: &Path,
    ) -> Result<Option<ResolvedModule>, ResolveError>;
}

/// Filesystem-backed resolver for relative and absolute specifiers.
///
/// Bare specifiers (`react`, `@scope/pkg`) never resolve: packages are
/// outside every boundary the lint cares about.
#[derive(Debug, Clone)]
pub struct FsResolver {
    extensions: Vec<String>,
    index_names: Vec<String>,
}

/// Entry-point fields of a `package.json`, in lookup order.
#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    types: Option<String>,
    typings: Option<String>,
    main: Option<String>,
}

impl FsResolver {
    /// Creates a resolver with the default extensions and index names.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&ResolveConfig::default())
    }

    /// Creates a resolver from the `[resolve]` section of the config.
    #[must_use]
    pub fn from_config(config: &ResolveConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            index_names: config.index_names.clone(),
        }
    }

    fn resolve_path(&self, candidate: &Path) -> Result<Option<PathBuf>, ResolveError> {
        if let Some(file) = self.try_file(candidate)? {
            return Ok(Some(file));
        }
        self.try_directory(candidate)
    }

    fn try_file(&self, candidate: &Path) -> Result<Option<PathBuf>, ResolveError> {
        let name = candidate.to_string_lossy();

        // `./a.js` written in TypeScript sources points at `a.ts`
        for (js, ts_exts) in JS_TO_TS {
            if let Some(stem) = name.strip_suffix(js) {
                for ts in *ts_exts {
                    let swapped = PathBuf::from(format!("{stem}{ts}"));
                    if is_file(&swapped)? {
                        return Ok(Some(swapped));
                    }
                }
            }
        }

        if self.extensions.iter().any(|ext| name.ends_with(ext.as_str())) && is_file(candidate)? {
            return Ok(Some(candidate.to_path_buf()));
        }

        for ext in &self.extensions {
            let with_ext = PathBuf::from(format!("{name}{ext}"));
            if is_file(&with_ext)? {
                return Ok(Some(with_ext));
            }
        }

        Ok(None)
    }

    fn try_directory(&self, dir: &Path) -> Result<Option<PathBuf>, ResolveError> {
        if !is_dir(dir)? {
            return Ok(None);
        }

        if let Some(entry) = package_entry(dir)? {
            let target = normalize(&dir.join(entry));
            if let Some(file) = self.try_file(&target)? {
                return Ok(Some(file));
            }
            if let Some(file) = self.try_index(&target)? {
                return Ok(Some(file));
            }
        }

        self.try_index(dir)
    }

    fn try_index(&self, dir: &Path) -> Result<Option<PathBuf>, ResolveError> {
        if !is_dir(dir)? {
            return Ok(None);
        }
        for name in &self.index_names {
            for ext in &self.extensions {
                let candidate = dir.join(format!("{name}{ext}"));
                if is_file(&candidate)? {
                    return Ok(Some(candidate));
                }
            }
        }
        Ok(None)
    }
}

impl Default for FsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleResolver for FsResolver {
    fn resolve(
        &self,
        specifier: &str,
        from_file: &Path,
    ) -> Result<Option<ResolvedModule>, ResolveError> {
        let unresolved = if is_relative_specifier(specifier) {
            from_file
                .parent()
                .map_or_else(PathBuf::new, Path::to_path_buf)
                .join(specifier)
        } else if Path::new(specifier).is_absolute() {
            PathBuf::from(specifier)
        } else {
            trace!("Bare specifier '{}' is not resolved", specifier);
            return Ok(None);
        };

        let resolved = self.resolve_path(&normalize(&unresolved))?;
        trace!(
            "Resolved '{}' from {} to {:?}",
            specifier,
            from_file.display(),
            resolved
        );
        Ok(resolved.map(ResolvedModule::new))
    }
}

/// JavaScript extensions and the TypeScript sources that may stand behind them.
const JS_TO_TS: &[(&str, &[&str])] = &[
    (".js", &[".ts", ".tsx", ".d.ts"]),
    (".jsx", &[".tsx"]),
    (".mjs", &[".mts", ".d.mts"]),
    (".cjs", &[".cts", ".d.cts"]),
];

fn package_entry(dir: &Path) -> Result<Option<String>, ResolveError> {
    let manifest_path = dir.join("package.json");
    let content = match std::fs::read_to_string(&manifest_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(ResolveError::Io {
                path: manifest_path,
                source: e,
            })
        }
        Err(_) => return Ok(None),
    };

    match serde_json::from_str::<PackageManifest>(&content) {
        Ok(manifest) => Ok(manifest.types.or(manifest.typings).or(manifest.main)),
        Err(e) => {
            warn!("Ignoring malformed {}: {}", manifest_path.display(), e);
            Ok(None)
        }
    }
}

fn is_file(path: &Path) -> Result<bool, ResolveError> {
    metadata_matches(path, std::fs::Metadata::is_file)
}

fn is_dir(path: &Path) -> Result<bool, ResolveError> {
    metadata_matches(path, std::fs::Metadata::is_dir)
}

/// Missing paths (including paths running through a regular file) are
/// `false`; only a refused lookup is an error.
fn metadata_matches(
    path: &Path,
    check: fn(&std::fs::Metadata) -> bool,
) -> Result<bool, ResolveError> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(check(&meta)),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => Err(ResolveError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
        Err(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "export {}\n").unwrap();
        normalize(&path)
    }

    fn resolve(root: &Path, specifier: &str, from: &str) -> Option<PathBuf> {
        FsResolver::new()
            .resolve(specifier, &root.join(from))
            .unwrap()
            .map(|m| m.resolved_file)
    }

    #[test]
    fn appends_extension() {
        let tmp = TempDir::new().unwrap();
        let inner = touch(tmp.path(), "a/inner.ts");
        touch(tmp.path(), "b/main.ts");
        assert_eq!(resolve(tmp.path(), "../a/inner", "b/main.ts"), Some(inner));
    }

    #[test]
    fn prefers_ts_over_js() {
        let tmp = TempDir::new().unwrap();
        let ts = touch(tmp.path(), "a/x.ts");
        touch(tmp.path(), "a/x.js");
        assert_eq!(resolve(tmp.path(), "./a/x", "main.ts"), Some(ts));
    }

    #[test]
    fn js_specifier_maps_to_ts_source() {
        let tmp = TempDir::new().unwrap();
        let ts = touch(tmp.path(), "a/x.ts");
        assert_eq!(resolve(tmp.path(), "./a/x.js", "main.ts"), Some(ts));
    }

    #[test]
    fn exact_file_with_extension() {
        let tmp = TempDir::new().unwrap();
        let js = touch(tmp.path(), "a/x.js");
        assert_eq!(resolve(tmp.path(), "./a/x.js", "main.ts"), Some(js));
    }

    #[test]
    fn directory_resolves_to_index() {
        let tmp = TempDir::new().unwrap();
        let index = touch(tmp.path(), "a/index.ts");
        touch(tmp.path(), "b/main.ts");
        assert_eq!(resolve(tmp.path(), "../a", "b/main.ts"), Some(index));
    }

    #[test]
    fn directory_without_index_is_unresolved() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "c/file.ts");
        assert_eq!(resolve(tmp.path(), "./c", "main.ts"), None);
    }

    #[test]
    fn package_json_entry_wins_over_index() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "pkg/index.ts");
        let entry = touch(tmp.path(), "pkg/src/entry.ts");
        fs::write(
            tmp.path().join("pkg/package.json"),
            r#"{ "types": "./src/entry.ts" }"#,
        )
        .unwrap();
        assert_eq!(resolve(tmp.path(), "./pkg", "main.ts"), Some(entry));
    }

    #[test]
    fn malformed_package_json_falls_back_to_index() {
        let tmp = TempDir::new().unwrap();
        let index = touch(tmp.path(), "pkg/index.ts");
        fs::write(tmp.path().join("pkg/package.json"), "{ not json").unwrap();
        assert_eq!(resolve(tmp.path(), "./pkg", "main.ts"), Some(index));
    }

    #[test]
    fn bare_specifier_is_unresolved() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "react.ts");
        assert_eq!(resolve(tmp.path(), "react", "main.ts"), None);
    }

    #[test]
    fn custom_index_names() {
        let tmp = TempDir::new().unwrap();
        let module = touch(tmp.path(), "a/mod.ts");
        let resolver = FsResolver::from_config(&ResolveConfig {
            extensions: vec![".ts".into()],
            index_names: vec!["mod".into()],
        });
        let resolved = resolver
            .resolve("./a", &tmp.path().join("main.ts"))
            .unwrap()
            .map(|m| m.resolved_file);
        assert_eq!(resolved, Some(module));
    }
}
