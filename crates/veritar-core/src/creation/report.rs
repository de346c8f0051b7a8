//! Archive creation reporting.

use std::path::PathBuf;
use std::time::Duration;

use crate::digest::ContentDigest;
use crate::formats::CompressionCodec;
use crate::types::MemberKind;

/// One entry written to the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedEntry {
    /// Path as stored in the archive.
    pub archive_path: String,
    /// Member kind written to the header.
    pub kind: MemberKind,
    /// Content digest, present for regular files only.
    pub digest: Option<ContentDigest>,
    /// Content size in bytes.
    pub size: u64,
}

/// Report of an archive creation operation.
///
/// # Examples
///
/// ```
/// use veritar_core::creation::CreationReport;
///
/// let mut report = CreationReport::default();
/// report.files_added = 10;
/// report.bytes_written = 1024;
/// report.bytes_compressed = 512;
///
/// assert_eq!(report.compression_ratio(), 2.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreationReport {
    /// Entries in archive order.
    pub entries: Vec<AddedEntry>,

    /// Number of files added to the archive.
    pub files_added: usize,

    /// Number of directories added to the archive.
    pub directories_added: usize,

    /// Number of symlinks added to the archive.
    pub symlinks_added: usize,

    /// Total content bytes written (uncompressed).
    pub bytes_written: u64,

    /// Size of the archive file on disk.
    pub bytes_compressed: u64,

    /// Duration of the creation operation.
    pub duration: Duration,

    /// Where the manifest was written.
    pub manifest_path: PathBuf,

    /// Number of lines written to the manifest.
    pub manifest_entries: usize,

    /// Output compression, `None` for plain tar.
    pub codec: Option<CompressionCodec>,

    /// Warnings generated during creation.
    pub warnings: Vec<String>,
}

impl CreationReport {
    /// Creates a new empty creation report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    ///
    /// # Examples
    ///
    /// ```
    /// use veritar_core::creation::CreationReport;
    ///
    /// let mut report = CreationReport::new();
    /// report.add_warning("socket skipped");
    /// assert!(report.has_warnings());
    /// ```
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the compression ratio (uncompressed / compressed).
    ///
    /// Returns 0.0 if either size is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use veritar_core::creation::CreationReport;
    ///
    /// let mut report = CreationReport::new();
    /// report.bytes_written = 1000;
    /// report.bytes_compressed = 500;
    /// assert_eq!(report.compression_ratio(), 2.0);
    ///
    /// report.bytes_compressed = 0;
    /// assert_eq!(report.compression_ratio(), 0.0);
    /// ```
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.bytes_compressed as f64
    }

    /// Total number of entries written.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_added + self.directories_added + self.symlinks_added
    }

    pub(crate) fn record(&mut self, entry: AddedEntry) {
        match entry.kind {
            MemberKind::Regular => {
                self.files_added += 1;
                self.bytes_written += entry.size;
            }
            MemberKind::Directory => self.directories_added += 1,
            MemberKind::Symlink => self.symlinks_added += 1,
            _ => {}
        }
        self.entries.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, kind: MemberKind, size: u64) -> AddedEntry {
        AddedEntry {
            archive_path: path.to_string(),
            kind,
            digest: (kind == MemberKind::Regular).then(|| ContentDigest::of(b"x")),
            size,
        }
    }

    #[test]
    fn test_record_counts_by_kind() {
        let mut report = CreationReport::new();
        report.record(entry("d", MemberKind::Directory, 0));
        report.record(entry("d/a", MemberKind::Regular, 10));
        report.record(entry("d/b", MemberKind::Regular, 5));
        report.record(entry("d/l", MemberKind::Symlink, 0));

        assert_eq!(report.files_added, 2);
        assert_eq!(report.directories_added, 1);
        assert_eq!(report.symlinks_added, 1);
        assert_eq!(report.bytes_written, 15);
        assert_eq!(report.total_items(), 4);
        assert_eq!(report.entries[1].archive_path, "d/a");
    }

    #[test]
    fn test_warnings() {
        let mut report = CreationReport::new();
        assert!(!report.has_warnings());
        report.add_warning(String::from("w"));
        assert_eq!(report.warnings, vec!["w"]);
    }
}
