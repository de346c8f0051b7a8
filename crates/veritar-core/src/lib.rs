//! Streaming checksum verification of tar archives.
//!
//! `veritar-core` reads a tar archive (plain or gzip, bzip2, xz, zstd
//! compressed) member by member, hashes each regular file with MD5 and
//! compares it with a `<md5>  <path>` manifest, without extracting anything.
//! Damaged regions of the archive are reported and skipped instead of
//! aborting the scan. It can also create an archive together with its
//! manifest.
//!
//! # Examples
//!
//! ```no_run
//! use veritar_core::verification::NoopCallback;
//! use veritar_core::verify_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = verify_archive("backup.tar.gz", "backup.tar.gz.md5", &mut NoopCallback)?;
//! println!("{} ({} verified)", report.verdict, report.statistics.good);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod creation;
pub mod digest;
pub mod error;
pub mod formats;
pub mod io;
pub mod manifest;
pub mod report;
pub mod types;
pub mod verification;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::create_archive;
pub use api::create_archive_with_progress;
pub use api::verify_archive;
pub use error::Result;
pub use error::VeritarError;
pub use manifest::ChecksumManifest;
pub use report::NoopProgress;
pub use report::ProgressCallback;

pub use types::MemberKind;
