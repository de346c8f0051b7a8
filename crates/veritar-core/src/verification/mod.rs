//! Archive verification against a checksum manifest.
//!
//! Every archive member, damaged archive region and unmatched manifest
//! entry becomes one [`Finding`], counted in [`Statistics`] and handed to
//! an [`OutcomeCallback`] as it is classified.
//!
//! # Examples
//!
//! ```no_run
//! use veritar_core::verification::NoopCallback;
//! use veritar_core::verify_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = verify_archive("backup.tar.gz", "backup.tar.gz.md5", &mut NoopCallback)?;
//! println!("{}: {} verified", report.verdict, report.statistics.good);
//! # Ok(())
//! # }
//! ```

pub mod callback;
pub mod engine;
pub mod finding;
pub mod report;

pub use callback::FindingLog;
pub use callback::NoopCallback;
pub use callback::OutcomeCallback;
pub use engine::Verifier;
pub use finding::Finding;
pub use finding::Outcome;
pub use report::Statistics;
pub use report::Verdict;
pub use report::VerificationReport;
