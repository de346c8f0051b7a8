//! Source collection for archive creation.
//!
//! Every source is resolved to an absolute path and walked in file-name
//! order. Archive paths are taken relative to the source's parent, so the
//! source's own name becomes the top-level component.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use walkdir::DirEntry;
use walkdir::WalkDir;

use crate::Result;
use crate::VeritarError;
use crate::creation::config::CreationConfig;
use crate::creation::filters;

/// Kind of a filesystem entry selected for archiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link stored as a link.
    Symlink {
        /// Link target as read from the filesystem.
        target: PathBuf,
    },
    /// Socket, device or pipe. These are not archived.
    Unsupported,
}

/// A filesystem entry with its computed archive path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Absolute filesystem path.
    pub path: PathBuf,
    /// Relative path inside the archive.
    pub archive_path: PathBuf,
    /// Entry kind.
    pub kind: SourceKind,
    /// Size in bytes, zero for anything but regular files.
    pub size: u64,
}

/// Collects the entries of every source, in order.
///
/// # Examples
///
/// ```no_run
/// use veritar_core::creation::CreationConfig;
/// use veritar_core::creation::walker::collect_entries;
///
/// let entries = collect_entries(&["./src"], &CreationConfig::default())?;
/// for entry in &entries {
///     println!("{}", entry.archive_path.display());
/// }
/// # Ok::<(), veritar_core::VeritarError>(())
/// ```
///
/// # Errors
///
/// Returns [`VeritarError::SourceNotFound`] for a missing source and
/// [`VeritarError::Walk`] if a directory cannot be traversed.
pub fn collect_entries<P: AsRef<Path>>(
    sources: &[P],
    config: &CreationConfig,
) -> Result<Vec<SourceEntry>> {
    let mut entries = Vec::new();

    for source in sources {
        let source = source.as_ref();
        if fs::symlink_metadata(source).is_err() {
            return Err(VeritarError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        let absolute = resolve_path(source)?;
        let base = absolute.parent().unwrap_or(&absolute).to_path_buf();
        tracing::debug!(source = %absolute.display(), "collecting source");

        let walker = WalkDir::new(&absolute)
            .follow_links(config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_filtered(entry, &base, config));

        for entry in walker {
            let entry = entry.map_err(|e| VeritarError::Walk(e.to_string()))?;
            let archive_path = filters::compute_archive_path(entry.path(), &base)?;
            if archive_path.as_os_str().is_empty() {
                continue;
            }
            entries.push(build_entry(&entry, archive_path)?);
        }
    }

    Ok(entries)
}

fn is_filtered(entry: &DirEntry, base: &Path, config: &CreationConfig) -> bool {
    entry
        .path()
        .strip_prefix(base)
        .is_ok_and(|relative| filters::should_skip(relative, config))
}

fn build_entry(entry: &DirEntry, archive_path: PathBuf) -> Result<SourceEntry> {
    let path = entry.path().to_path_buf();
    let file_type = entry.file_type();

    let (kind, size) = if file_type.is_symlink() {
        let target = fs::read_link(&path).map_err(|e| {
            VeritarError::Walk(format!(
                "cannot read symlink target for {}: {e}",
                path.display()
            ))
        })?;
        (SourceKind::Symlink { target }, 0)
    } else if file_type.is_dir() {
        (SourceKind::Directory, 0)
    } else if file_type.is_file() {
        let metadata = entry.metadata().map_err(|e| {
            VeritarError::Walk(format!(
                "cannot read metadata for {}: {e}",
                path.display()
            ))
        })?;
        (SourceKind::File, metadata.len())
    } else {
        (SourceKind::Unsupported, 0)
    };

    Ok(SourceEntry {
        path,
        archive_path,
        kind,
        size,
    })
}

/// Resolves the parent directory of `source` without following `source`
/// itself, so a symlink given on the command line stays a symlink.
pub(crate) fn resolve_path(source: &Path) -> Result<PathBuf> {
    let Some(name) = source.file_name() else {
        return Ok(source.canonicalize()?);
    };
    let parent = source
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok(parent.canonicalize()?.join(name))
}
