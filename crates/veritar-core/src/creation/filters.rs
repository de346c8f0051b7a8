//! Path filtering logic for archive creation.
//!
//! Filters are applied to archive-relative paths, never to the absolute
//! location of a source, so a source living under a hidden directory is
//! still archived.

use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::VeritarError;
use crate::creation::config::CreationConfig;

/// Checks if a path should be skipped based on configuration.
///
/// A path is skipped if it is hidden and `include_hidden` is false, or if
/// it matches an exclude pattern.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use veritar_core::creation::CreationConfig;
/// use veritar_core::creation::filters;
///
/// let config = CreationConfig::default().with_include_hidden(false);
/// assert!(filters::should_skip(Path::new("src/.gitignore"), &config));
/// assert!(!filters::should_skip(Path::new("src/main.rs"), &config));
/// ```
#[must_use]
pub fn should_skip(path: &Path, config: &CreationConfig) -> bool {
    if !config.include_hidden && is_hidden(path) {
        return true;
    }

    config
        .exclude_patterns
        .iter()
        .any(|pattern| matches_pattern(path, pattern))
}

/// Checks if a path is hidden (its file name starts with '.').
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use veritar_core::creation::filters;
///
/// assert!(filters::is_hidden(Path::new("dir/.hidden")));
/// assert!(!filters::is_hidden(Path::new("dir/normal.rs")));
/// ```
#[must_use]
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Matches path against glob-style pattern.
///
/// Supports:
/// - Exact match: `".git"` matches only `.git`
/// - Extension wildcard: `"*.txt"` matches files ending with `.txt`
/// - Prefix wildcard: `"temp*"` matches files starting with `temp`
/// - Component match: matches against any path component, not just the full
///   path
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use veritar_core::creation::filters;
///
/// assert!(filters::matches_pattern(Path::new("dir/.git"), ".git"));
/// assert!(filters::matches_pattern(Path::new("dir/test.tmp"), "*.tmp"));
/// assert!(filters::matches_pattern(Path::new("temp_file"), "temp*"));
/// assert!(!filters::matches_pattern(Path::new("file_temp"), "temp*"));
/// ```
#[must_use]
pub fn matches_pattern(path: &Path, pattern: &str) -> bool {
    let component_match = path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|s| pattern_matches(s, pattern))
    });

    component_match || path.to_str().is_some_and(|s| pattern_matches(s, pattern))
}

/// Matches a string against a simple glob pattern.
fn pattern_matches(s: &str, pattern: &str) -> bool {
    if pattern == s {
        return true;
    }

    if let Some(prefix) = pattern.strip_suffix('*') {
        return s.starts_with(prefix);
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        return s.ends_with(suffix);
    }

    false
}

/// Computes the archive path of `source_path` relative to `base`.
///
/// # Errors
///
/// Returns [`VeritarError::Walk`] if `source_path` is not under `base`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use veritar_core::creation::filters;
///
/// let base = Path::new("/home/user");
/// let source = Path::new("/home/user/project/src/main.rs");
/// let archive_path = filters::compute_archive_path(source, base).unwrap();
/// assert_eq!(archive_path, Path::new("project/src/main.rs"));
/// ```
pub fn compute_archive_path(source_path: &Path, base: &Path) -> Result<PathBuf> {
    source_path
        .strip_prefix(base)
        .map(Path::to_path_buf)
        .map_err(|_| {
            VeritarError::Walk(format!(
                "path {} is not under {}",
                source_path.display(),
                base.display()
            ))
        })
}
