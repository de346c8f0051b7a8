//! Member-by-member checksum verification.

use std::time::Instant;

use super::callback::OutcomeCallback;
use super::finding::Finding;
use super::report::Statistics;
use super::report::VerificationReport;
use crate::archive::ArchiveEvent;
use crate::archive::ArchiveReader;
use crate::archive::DamagedRegion;
use crate::archive::Member;
use crate::digest::DigestBuffer;
use crate::digest::digest_reader;
use crate::manifest::ChecksumManifest;

/// Reconciles an archive stream against a checksum manifest.
///
/// A `Verifier` is consumed by [`Verifier::run`]; its manifest shrinks as
/// members are matched and whatever is left afterwards is reported as
/// [`Finding::NotInArchive`].
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use veritar_core::archive::ArchiveReader;
/// use veritar_core::manifest::ChecksumManifest;
/// use veritar_core::test_utils::TarTestBuilder;
/// use veritar_core::verification::NoopCallback;
/// use veritar_core::verification::Verdict;
/// use veritar_core::verification::Verifier;
///
/// let tar = TarTestBuilder::new().add_file("a.txt", b"hello").build();
/// let manifest = ChecksumManifest::from_reader(
///     "5d41402abc4b2a76b9719d911017c592  a.txt\n".as_bytes(),
/// )
/// .unwrap();
///
/// let reader = ArchiveReader::from_reader(Cursor::new(tar)).unwrap();
/// let report = Verifier::new(manifest, &mut NoopCallback).run(reader);
/// assert_eq!(report.verdict, Verdict::Success);
/// assert_eq!(report.statistics.good, 1);
/// ```
pub struct Verifier<'a> {
    manifest: ChecksumManifest,
    callback: &'a mut dyn OutcomeCallback,
    statistics: Statistics,
    buffer: DigestBuffer,
}

impl<'a> Verifier<'a> {
    /// Creates a verifier for `manifest`, reporting findings to `callback`.
    #[must_use]
    pub fn new(manifest: ChecksumManifest, callback: &'a mut dyn OutcomeCallback) -> Self {
        Self {
            manifest,
            callback,
            statistics: Statistics::new(),
            buffer: DigestBuffer::new(),
        }
    }

    /// Reads the whole archive and returns the final report.
    ///
    /// Per-member failures never abort the run; they become findings. The
    /// archive reader is dropped before remnants are reported.
    pub fn run(mut self, mut reader: ArchiveReader) -> VerificationReport {
        let start = Instant::now();
        let codec = reader.codec();

        while let Some(event) = reader.next_event() {
            match event {
                ArchiveEvent::Member(member) => self.check_member(member, &mut reader),
                ArchiveEvent::Damaged(region) => self.record_damage(region),
            }
        }

        let bytes_read = reader.offset();
        drop(reader);

        let remnants = self.manifest.drain_remnants();
        if !remnants.is_empty() {
            tracing::debug!(count = remnants.len(), "manifest entries not found in archive");
        }
        for path in remnants {
            self.record(&Finding::NotInArchive { path });
        }

        let statistics = self.statistics;
        VerificationReport {
            statistics,
            verdict: statistics.verdict(),
            duration: start.elapsed(),
            codec,
            bytes_read,
        }
    }

    fn check_member(&mut self, member: Member, reader: &mut ArchiveReader) {
        self.callback.on_member(&member);
        let Member { path, kind, .. } = member;

        if !kind.is_regular() {
            // Non-regular members consume a same-path entry so it is not
            // reported as a remnant.
            self.manifest.take(&path);
            self.record(&Finding::NotRegularFile { path, kind });
            return;
        }

        let Some(expected) = self.manifest.take(&path) else {
            self.record(&Finding::NoChecksum { path });
            return;
        };

        let finding = match digest_reader(&mut reader.content(), &mut self.buffer) {
            Ok(actual) if actual.matches_hex(&expected) => Finding::Verified { path },
            Ok(actual) => Finding::ChecksumMismatch {
                path,
                expected,
                actual,
            },
            Err(err) => {
                tracing::debug!(%path, error = %err, "member content unreadable");
                Finding::Unreadable {
                    path,
                    error: err.to_string(),
                }
            }
        };
        self.record(&finding);
    }

    fn record_damage(&mut self, region: DamagedRegion) {
        let DamagedRegion {
            offset,
            length,
            cause,
        } = region;
        self.record(&Finding::DamagedRegion {
            offset,
            length,
            cause,
        });
    }

    fn record(&mut self, finding: &Finding) {
        self.statistics.record(finding);
        self.callback.on_finding(finding);
    }
}
