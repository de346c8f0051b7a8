//! Verification counters, verdict and final report.

use std::fmt;
use std::time::Duration;

use super::finding::Finding;
use super::finding::Outcome;
use crate::formats::CompressionCodec;

/// Per-outcome counters of one verification run.
///
/// `processed` always equals the sum of the four outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Findings recorded.
    pub processed: usize,
    /// Members whose content matched.
    pub good: usize,
    /// Non-regular members.
    pub skipped: usize,
    /// Mismatches, unreadable members, damaged regions and remnants.
    pub corrupted: usize,
    /// Regular files without a manifest entry.
    pub missing: usize,
}

impl Statistics {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one finding.
    pub const fn record(&mut self, finding: &Finding) {
        self.processed += 1;
        match finding.outcome() {
            Outcome::Good => self.good += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Corrupted => self.corrupted += 1,
            Outcome::Missing => self.missing += 1,
        }
    }

    /// Derives the verdict: corruption first, then missing checksums.
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        if self.corrupted > 0 {
            Verdict::Failed
        } else if self.missing > 0 {
            Verdict::MissingChecksums
        } else {
            Verdict::Success
        }
    }
}

/// Overall result of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Every checksummed member matched and nothing is missing.
    Success,
    /// No corruption found, but some regular files had no checksum.
    MissingChecksums,
    /// At least one corrupted finding.
    Failed,
}

impl Verdict {
    /// Returns the verdict text shown in the summary.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::MissingChecksums => "MISSING CHECKSUMS, integrity OK so far",
            Self::Failed => "FAILED",
        }
    }

    /// Returns `true` unless corruption was found.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report of a completed verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    /// Final counters.
    pub statistics: Statistics,
    /// Verdict derived from the counters.
    pub verdict: Verdict,
    /// Wall-clock time spent reading the archive.
    pub duration: Duration,
    /// Compression recognized on the archive stream.
    pub codec: Option<CompressionCodec>,
    /// Decoded bytes read from the archive.
    pub bytes_read: u64,
}

impl VerificationReport {
    /// Returns `true` unless corruption was found.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.verdict.is_ok()
    }
}
