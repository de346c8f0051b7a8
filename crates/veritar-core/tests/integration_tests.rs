//! Integration tests for veritar-core.
//!
//! These tests drive the public API end to end with real files on disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;
use veritar_core::VeritarError;
use veritar_core::create_archive;
use veritar_core::creation::CreationConfig;
use veritar_core::digest::ContentDigest;
use veritar_core::formats::CompressionCodec;
use veritar_core::test_utils::TarTestBuilder;
use veritar_core::test_utils::corrupt_block;
use veritar_core::test_utils::manifest_text;
use veritar_core::verification::Finding;
use veritar_core::verification::FindingLog;
use veritar_core::verification::Outcome;
use veritar_core::verification::Verdict;
use veritar_core::verification::VerificationReport;
use veritar_core::verify_archive;

fn write_pair(temp: &TempDir, archive: &[u8], manifest: &str) -> (PathBuf, PathBuf) {
    let archive_path = temp.path().join("archive.tar");
    let manifest_path = temp.path().join("archive.tar.md5");
    fs::write(&archive_path, archive).unwrap();
    fs::write(&manifest_path, manifest).unwrap();
    (archive_path, manifest_path)
}

fn verify(archive: &Path, manifest: &Path) -> (VerificationReport, Vec<Finding>) {
    let mut log = FindingLog::new();
    let report = verify_archive(archive, manifest, &mut log).unwrap();
    (report, log.findings)
}

fn assert_counters_balance(report: &VerificationReport) {
    let s = report.statistics;
    assert_eq!(s.processed, s.good + s.skipped + s.corrupted + s.missing);
}

#[test]
fn test_file_and_directory_scenario() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_file("a.txt", b"hello")
        .add_directory("dir")
        .build();
    let (archive, manifest) =
        write_pair(&temp, &archive, "5d41402abc4b2a76b9719d911017c592  a.txt\n");

    let (report, findings) = verify(&archive, &manifest);

    assert_eq!(report.statistics.processed, 2);
    assert_eq!(report.statistics.good, 1);
    assert_eq!(report.statistics.skipped, 1);
    assert_eq!(report.statistics.corrupted, 0);
    assert_eq!(report.statistics.missing, 0);
    assert_eq!(report.verdict, Verdict::Success);
    assert_eq!(report.verdict.to_string(), "SUCCESS");
    assert_eq!(
        findings
            .iter()
            .map(|f| (f.outcome(), f.subject()))
            .collect::<Vec<_>>(),
        vec![
            (Outcome::Good, "a.txt".to_string()),
            (Outcome::Skipped, "dir".to_string()),
        ]
    );
}

#[test]
fn test_missing_checksum_verdict() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_file("a.txt", b"hello")
        .add_file("b.txt", b"unlisted")
        .build();
    let manifest = manifest_text(&[("a.txt", b"hello".as_slice())]);
    let (archive, manifest) = write_pair(&temp, &archive, &manifest);

    let (report, _) = verify(&archive, &manifest);

    assert_eq!(report.statistics.missing, 1);
    assert_eq!(report.verdict, Verdict::MissingChecksums);
    assert!(report.is_ok());
    assert_counters_balance(&report);
}

#[test]
fn test_failed_verdict_on_mismatch_and_remnant() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new().add_file("a.txt", b"changed").build();
    let manifest = manifest_text(&[
        ("a.txt", b"hello".as_slice()),
        ("gone.txt", b"x".as_slice()),
    ]);
    let (archive, manifest) = write_pair(&temp, &archive, &manifest);

    let (report, findings) = verify(&archive, &manifest);

    assert_eq!(report.statistics.corrupted, 2);
    assert_eq!(report.statistics.processed, 2);
    assert_eq!(report.verdict, Verdict::Failed);
    assert!(!report.is_ok());
    assert!(matches!(&findings[0], Finding::ChecksumMismatch { path, .. } if path == "a.txt"));
    assert!(matches!(&findings[1], Finding::NotInArchive { path } if path == "gone.txt"));
}

#[test]
fn test_damaged_header_between_members() {
    let temp = TempDir::new().unwrap();
    let mut archive = TarTestBuilder::new()
        .add_file("first.txt", b"one")
        .add_file("middle.txt", b"two")
        .add_file("last.txt", b"three")
        .build();
    // header of middle.txt sits after first.txt's header and data block
    corrupt_block(&mut archive, 2);
    let manifest = manifest_text(&[
        ("first.txt", b"one".as_slice()),
        ("last.txt", b"three".as_slice()),
    ]);
    let (archive, manifest) = write_pair(&temp, &archive, &manifest);

    let (report, findings) = verify(&archive, &manifest);

    assert_eq!(report.statistics.good, 2);
    assert_eq!(report.statistics.corrupted, 1);
    assert_eq!(report.verdict, Verdict::Failed);
    assert_counters_balance(&report);
    assert!(
        findings
            .iter()
            .any(|f| matches!(f, Finding::DamagedRegion { offset: 1024, .. }))
    );
}

#[test]
fn test_truncated_member_is_corrupted() {
    let temp = TempDir::new().unwrap();
    let mut archive = TarTestBuilder::new()
        .add_file("big.bin", &vec![1u8; 4096])
        .build();
    archive.truncate(512 + 1000);
    let manifest = manifest_text(&[("big.bin", vec![1u8; 4096].as_slice())]);
    let (archive, manifest) = write_pair(&temp, &archive, &manifest);

    let (report, findings) = verify(&archive, &manifest);

    assert_eq!(report.statistics.corrupted, 1);
    assert_eq!(report.statistics.processed, 1);
    assert!(matches!(&findings[0], Finding::Unreadable { path, .. } if path == "big.bin"));
}

#[test]
fn test_gzip_archive_is_detected() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new().add_file("a.txt", b"hello").build_gzip();
    let manifest = manifest_text(&[("a.txt", b"hello".as_slice())]);
    let (archive, manifest) = write_pair(&temp, &archive, &manifest);

    let (report, _) = verify(&archive, &manifest);

    assert_eq!(report.codec, Some(CompressionCodec::Gzip));
    assert_eq!(report.verdict, Verdict::Success);
}

#[test]
fn test_malformed_manifest_is_fatal() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new().add_file("a.txt", b"hello").build();
    let (archive, manifest) = write_pair(
        &temp,
        &archive,
        "5d41402abc4b2a76b9719d911017c592  a.txt\nbroken line\n",
    );

    let mut log = FindingLog::new();
    let err = verify_archive(&archive, &manifest, &mut log).unwrap_err();

    assert!(matches!(err, VeritarError::ManifestFormat { line_number: 2, .. }));
    assert!(err.is_fatal());
    assert!(log.findings.is_empty());
}

#[test]
fn test_not_a_tar_archive_is_fatal() {
    let temp = TempDir::new().unwrap();
    let (archive, manifest) = write_pair(&temp, &[0x42; 2048], "");

    let err = verify_archive(&archive, &manifest, &mut FindingLog::new()).unwrap_err();
    assert!(matches!(err, VeritarError::ArchiveOpen(_)));
}

fn round_trip(output_name: &str) {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("project");
    fs::create_dir_all(source.join("docs/img")).unwrap();
    fs::write(source.join("README"), "readme").unwrap();
    fs::write(source.join("docs/guide.md"), "# guide\n".repeat(200)).unwrap();
    fs::write(source.join("docs/img/logo.bin"), vec![0xEEu8; 70_000]).unwrap();
    fs::write(source.join("empty"), "").unwrap();
    let output = temp.path().join(output_name);

    let created = create_archive(&output, &[&source], &CreationConfig::default()).unwrap();
    let (report, _) = verify(&output, &created.manifest_path);

    assert_eq!(report.statistics.good, created.files_added);
    assert_eq!(report.statistics.good, 4);
    assert_eq!(report.statistics.skipped, created.directories_added);
    assert_eq!(report.statistics.corrupted, 0);
    assert_eq!(report.statistics.missing, 0);
    assert_eq!(report.verdict, Verdict::Success);
    assert_eq!(report.codec, created.codec);
}

#[test]
fn test_round_trip_plain() {
    round_trip("out.tar");
}

#[test]
fn test_round_trip_gzip() {
    round_trip("out.tar.gz");
}

#[test]
fn test_round_trip_bzip2() {
    round_trip("out.tbz2");
}

#[test]
fn test_round_trip_xz() {
    round_trip("out.tar.xz");
}

#[test]
fn test_round_trip_zstd() {
    round_trip("out.tar.zst");
}

#[test]
fn test_round_trip_detects_later_modification() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("data.txt");
    fs::write(&source, "original").unwrap();
    let output = temp.path().join("data.tar");

    let created = create_archive(&output, &[&source], &CreationConfig::default()).unwrap();
    let manifest = fs::read_to_string(&created.manifest_path).unwrap();
    assert_eq!(
        manifest,
        format!("{}  data.txt\n", ContentDigest::of(b"original"))
    );

    fs::write(
        &created.manifest_path,
        format!("{}  data.txt\n", ContentDigest::of(b"tampered")),
    )
    .unwrap();
    let (report, _) = verify(&output, &created.manifest_path);
    assert_eq!(report.verdict, Verdict::Failed);
}

#[test]
fn test_create_missing_source() {
    let temp = TempDir::new().unwrap();
    let err = create_archive(
        temp.path().join("out.tar"),
        &[temp.path().join("missing")],
        &CreationConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, VeritarError::SourceNotFound { .. }));
}
