//! Property-based tests for the verification counters.
//!
//! Arbitrary archives (optionally damaged or truncated) are verified against
//! arbitrary manifests; every finding must be counted exactly once.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use std::collections::BTreeMap;
use std::io::Cursor;

use proptest::prelude::*;
use veritar_core::archive::ArchiveReader;
use veritar_core::digest::ContentDigest;
use veritar_core::manifest::ChecksumManifest;
use veritar_core::test_utils::TarTestBuilder;
use veritar_core::verification::FindingLog;
use veritar_core::verification::Outcome;
use veritar_core::verification::Verdict;
use veritar_core::verification::Verifier;

#[derive(Debug, Clone)]
enum Listing {
    Absent,
    Correct,
    Wrong,
}

#[derive(Debug, Clone)]
struct MemberSpec {
    directory: bool,
    data: Vec<u8>,
    listing: Listing,
}

fn member_spec() -> impl Strategy<Value = MemberSpec> {
    (
        any::<bool>(),
        prop::collection::vec(any::<u8>(), 0..1500),
        prop_oneof![Just(Listing::Absent), Just(Listing::Correct), Just(Listing::Wrong)],
    )
        .prop_map(|(directory, data, listing)| MemberSpec {
            directory,
            data,
            listing,
        })
}

fn build_case(
    members: &BTreeMap<String, MemberSpec>,
    extra: &[String],
    garbage_after: Option<usize>,
) -> (Vec<u8>, ChecksumManifest) {
    let mut builder = TarTestBuilder::new();
    let mut manifest = ChecksumManifest::new();

    for (index, (name, spec)) in members.iter().enumerate() {
        builder = if spec.directory {
            builder.add_directory(name)
        } else {
            builder.add_file(name, &spec.data)
        };
        if garbage_after == Some(index) {
            builder = builder.add_garbage_block();
        }

        let digest = match spec.listing {
            Listing::Absent => continue,
            Listing::Correct => ContentDigest::of(&spec.data),
            Listing::Wrong => ContentDigest::of(b"something else entirely"),
        };
        manifest.insert(name.clone(), digest.to_hex());
    }
    for name in extra {
        manifest.insert(format!("extra/{name}"), ContentDigest::of(b"x").to_hex());
    }

    (builder.build(), manifest)
}

proptest! {
    /// Processed always equals the sum of the outcome counters, and every
    /// counted classification was reported to the callback.
    #[test]
    fn prop_counters_balance(
        members in prop::collection::btree_map("[a-z]{1,12}", member_spec(), 1..8),
        extra in prop::collection::vec("[a-z]{1,6}", 0..4),
        garbage_after in prop::option::of(0usize..8),
        cut in prop::option::of(0.0f64..1.0),
    ) {
        let (mut archive, manifest) = build_case(&members, &extra, garbage_after);
        if let Some(fraction) = cut {
            let len = 512 + ((archive.len() - 512) as f64 * fraction) as usize;
            archive.truncate(len);
        }

        let reader = ArchiveReader::from_reader(Cursor::new(archive)).unwrap();
        let mut log = FindingLog::new();
        let report = Verifier::new(manifest, &mut log).run(reader);
        let s = report.statistics;

        prop_assert_eq!(s.processed, s.good + s.skipped + s.corrupted + s.missing);
        prop_assert_eq!(s.processed, log.findings.len());
        let count = |outcome: Outcome| log.findings.iter().filter(|f| f.outcome() == outcome).count();
        prop_assert_eq!(s.good, count(Outcome::Good));
        prop_assert_eq!(s.skipped, count(Outcome::Skipped));
        prop_assert_eq!(s.corrupted, count(Outcome::Corrupted));
        prop_assert_eq!(s.missing, count(Outcome::Missing));
        prop_assert_eq!(report.verdict, s.verdict());
    }

    /// An intact archive with a complete and correct manifest verifies
    /// every regular file and skips every directory.
    #[test]
    fn prop_intact_archive_succeeds(
        members in prop::collection::btree_map("[a-z]{1,12}", member_spec(), 1..8),
    ) {
        let members: BTreeMap<String, MemberSpec> = members
            .into_iter()
            .map(|(name, spec)| (name, MemberSpec { listing: Listing::Correct, ..spec }))
            .collect();
        let files = members.values().filter(|spec| !spec.directory).count();
        let (archive, manifest) = build_case(&members, &[], None);

        let reader = ArchiveReader::from_reader(Cursor::new(archive)).unwrap();
        let report = Verifier::new(manifest, &mut FindingLog::new()).run(reader);

        prop_assert_eq!(report.statistics.good, files);
        prop_assert_eq!(report.statistics.skipped, members.len() - files);
        prop_assert_eq!(report.verdict, Verdict::Success);
    }
}
