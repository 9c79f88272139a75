//! Path utilities for boundary analysis.
//!
//! All comparisons in the boundary walk happen on lexically normalized
//! paths, so `/proj/b/../a` and `/proj/a` are the same directory.

use std::path::{Component, Path, PathBuf};

/// Lexically normalizes a path.
///
/// Removes `.` components and folds `..` into the preceding component.
/// `..` never climbs above the filesystem root. Separators are
/// canonicalized by the component walk. The filesystem is not touched.
///
/// # Example
///
/// ```ignore
/// assert_eq!(normalize(Path::new("/proj/b/../a/./x.ts")), PathBuf::from("/proj/a/x.ts"));
/// ```
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Returns the directories containing `file`, bounded by `root`.
///
/// The chain starts at the directory of `file` and climbs while the
/// directory is still `root` or below it. It is returned root-first, with
/// the directory closest to `file` last. `root` itself is part of the chain.
/// A file outside `root` has no ancestors.
#[must_use]
pub fn ancestors_of(file: &Path, root: &Path) -> Vec<PathBuf> {
    let root = normalize(root);
    let file = normalize(file);

    let mut chain: Vec<PathBuf> = file
        .parent()
        .into_iter()
        .flat_map(Path::ancestors)
        .take_while(|dir| dir.starts_with(&root))
        .map(Path::to_path_buf)
        .collect();
    chain.reverse();
    chain
}

/// Checks if a module specifier is written as a relative path.
///
/// Only `.`, `..`, `./…` and `../…` count. Bare package names and
/// dot-prefixed package names (`.bin`) do not.
#[must_use]
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Builds the specifier that imports `to_dir` from a file living in `from_dir`.
///
/// Both directories should be normalized. The result always uses forward
/// slashes and always starts with a relative marker (`./` is prepended
/// when the walk alone would not produce one).
#[must_use]
pub fn relative_specifier(from_dir: &Path, to_dir: &Path) -> String {
    let from: Vec<Component<'_>> = from_dir.components().collect();
    let to: Vec<Component<'_>> = to_dir.components().collect();

    let shared = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat("..".to_string()).take(from.len() - shared));
    parts.extend(
        to[shared..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    let joined = parts.join("/");
    if joined.is_empty() {
        ".".to_string()
    } else if is_relative_specifier(&joined) {
        joined
    } else {
        format!("./{joined}")
    }
}

/// Replaces every backslash with a forward slash.
#[must_use]
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}
