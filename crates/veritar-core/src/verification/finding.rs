//! Per-member classification results.

use std::fmt;

use crate::archive::DamageCause;
use crate::digest::ContentDigest;
use crate::types::MemberKind;

/// Outcome class of a finding.
///
/// Every member, damaged region and manifest remnant lands in exactly one
/// class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Content matched the recorded checksum.
    Good,
    /// Member is not a regular file and carries no checksummed content.
    Skipped,
    /// Integrity failure: mismatch, unreadable data, damaged archive
    /// region or a manifest entry absent from the archive.
    Corrupted,
    /// Regular file without a manifest entry.
    Missing,
}

impl Outcome {
    /// Returns a lowercase name for this outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Skipped => "skipped",
            Self::Corrupted => "corrupted",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classification of one archive member, damaged region or manifest
/// remnant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// Content digest equals the manifest entry.
    Verified {
        /// Member path.
        path: String,
    },

    /// Content digest differs from the manifest entry.
    ChecksumMismatch {
        /// Member path.
        path: String,
        /// Digest recorded in the manifest.
        expected: String,
        /// Digest computed from the archive.
        actual: ContentDigest,
    },

    /// Member content could not be read to the end.
    Unreadable {
        /// Member path.
        path: String,
        /// Read failure.
        error: String,
    },

    /// A span of the archive that yielded no member.
    DamagedRegion {
        /// Offset in the decoded stream.
        offset: u64,
        /// Length in bytes.
        length: u64,
        /// Reason the span was unreadable.
        cause: DamageCause,
    },

    /// Manifest entry with no matching member in the archive.
    NotInArchive {
        /// Path recorded in the manifest.
        path: String,
    },

    /// Member that is not a regular file.
    NotRegularFile {
        /// Member path.
        path: String,
        /// Member kind.
        kind: MemberKind,
    },

    /// Regular file without a manifest entry.
    NoChecksum {
        /// Member path.
        path: String,
    },
}

impl Finding {
    /// Returns the outcome class of this finding.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        match self {
            Self::Verified { .. } => Outcome::Good,
            Self::NotRegularFile { .. } => Outcome::Skipped,
            Self::NoChecksum { .. } => Outcome::Missing,
            Self::ChecksumMismatch { .. }
            | Self::Unreadable { .. }
            | Self::DamagedRegion { .. }
            | Self::NotInArchive { .. } => Outcome::Corrupted,
        }
    }

    /// Returns the member or manifest path, `None` for damaged regions.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Verified { path }
            | Self::ChecksumMismatch { path, .. }
            | Self::Unreadable { path, .. }
            | Self::NotInArchive { path }
            | Self::NotRegularFile { path, .. }
            | Self::NoChecksum { path } => Some(path),
            Self::DamagedRegion { .. } => None,
        }
    }

    /// Returns what the finding is about: a path, or a region description.
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::DamagedRegion { offset, length, .. } => {
                format!("<{length} bytes at offset {offset}>")
            }
            _ => self.path().unwrap_or_default().to_string(),
        }
    }

    /// Returns a short explanation, if the outcome alone does not say it.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Verified { .. } | Self::NoChecksum { .. } => None,
            Self::ChecksumMismatch { expected, actual, .. } => {
                Some(format!("checksum mismatch: expected {expected}, got {actual}"))
            }
            Self::Unreadable { error, .. } => Some(format!("unreadable: {error}")),
            Self::DamagedRegion { cause, .. } => Some(format!("damaged archive: {cause}")),
            Self::NotInArchive { .. } => Some("not found in archive".to_string()),
            Self::NotRegularFile { kind, .. } => Some(kind.label().to_string()),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.outcome(), self.subject())?;
        if let Some(reason) = self.reason() {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}
