//! Error types for archive verification and creation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `VeritarError`.
pub type Result<T> = std::result::Result<T, VeritarError>;

/// Errors that can occur while verifying or producing an archive.
///
/// Only configuration and parse failures are represented here. Integrity
/// faults found inside an archive (mismatched checksums, damaged headers,
/// manifest remnants) are reported as
/// [`Finding`](crate::verification::Finding)s and never stop a scan.
#[derive(Error, Debug)]
pub enum VeritarError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading member content failed partway through.
    ///
    /// Distinct from [`VeritarError::Io`] so the verification engine can
    /// tell an unreadable member apart from a stream that simply ended.
    #[error("read error: {0}")]
    Read(#[source] std::io::Error),

    /// A non-blank manifest line lacks the two-space separator.
    #[error("bad checksum file: line {line_number}: {line:?}")]
    ManifestFormat {
        /// 1-based line number in the manifest.
        line_number: usize,
        /// The offending line, without its terminator.
        line: String,
    },

    /// The stream could not be recognized as a tar archive.
    #[error("cannot open archive: {0}")]
    ArchiveOpen(String),

    /// Source file or directory not found during creation.
    #[error("source path not found: {path}")]
    SourceNotFound {
        /// The source path that was not found.
        path: PathBuf,
    },

    /// Directory traversal failed during creation.
    #[error("cannot walk source tree: {0}")]
    Walk(String),

    /// Compression level outside 1-9.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },
}

impl VeritarError {
    /// Returns `true` if this error aborts a verification run.
    ///
    /// [`VeritarError::Read`] is the only variant the engine recovers from
    /// locally.
    ///
    /// # Examples
    ///
    /// ```
    /// use veritar_core::VeritarError;
    ///
    /// let err = VeritarError::ArchiveOpen("empty archive".to_string());
    /// assert!(err.is_fatal());
    ///
    /// let err = VeritarError::Read(std::io::Error::other("bad block"));
    /// assert!(!err.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Read(_))
    }
}
