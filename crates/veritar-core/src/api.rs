//! High-level public API for archive verification and creation.

use std::path::Path;

use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::archive::ArchiveReader;
use crate::creation::CreationConfig;
use crate::creation::CreationReport;
use crate::manifest::ChecksumManifest;
use crate::verification::OutcomeCallback;
use crate::verification::VerificationReport;
use crate::verification::Verifier;

/// Verifies the members of an archive against a checksum manifest.
///
/// The manifest is loaded completely before the archive is opened, so a
/// malformed manifest fails the call without any finding being reported.
/// Compression is detected from the archive content.
///
/// # Arguments
///
/// * `archive_path` - Path to the tar archive, optionally compressed
/// * `manifest_path` - Path to the `<md5>  <path>` manifest
/// * `callback` - Receives every finding as it is classified
///
/// # Errors
///
/// Returns an error if:
/// - The manifest cannot be read or has a malformed line
/// - The archive cannot be opened or is not a tar stream
///
/// Damaged members and mismatches are findings, not errors.
///
/// # Examples
///
/// ```no_run
/// use veritar_core::verification::FindingLog;
/// use veritar_core::verify_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut log = FindingLog::new();
/// let report = verify_archive("backup.tar.gz", "backup.tar.gz.md5", &mut log)?;
/// for finding in &log.findings {
///     println!("{finding}");
/// }
/// println!("{}", report.verdict);
/// # Ok(())
/// # }
/// ```
pub fn verify_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    manifest_path: Q,
    callback: &mut dyn OutcomeCallback,
) -> Result<VerificationReport> {
    let manifest = ChecksumManifest::from_path(manifest_path)?;
    let reader = ArchiveReader::open(archive_path)?;
    Ok(Verifier::new(manifest, callback).run(reader))
}

/// Creates a tar archive and its checksum manifest.
///
/// Compression is taken from `config.codec` or the output extension. The
/// manifest goes to `config.manifest_path`, or `<output>.md5`.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - A source does not exist
/// - The archive or manifest cannot be written
///
/// # Examples
///
/// ```no_run
/// use veritar_core::create_archive;
/// use veritar_core::creation::CreationConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CreationConfig::default();
/// let report = create_archive("output.tar.gz", &["src/", "Cargo.toml"], &config)?;
/// println!(
///     "Created archive with {} files, manifest at {}",
///     report.files_added,
///     report.manifest_path.display()
/// );
/// # Ok(())
/// # }
/// ```
pub fn create_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    output_path: P,
    sources: &[Q],
    config: &CreationConfig,
) -> Result<CreationReport> {
    create_archive_with_progress(output_path, sources, config, &mut NoopProgress)
}

/// Creates a tar archive and manifest, reporting progress per entry.
///
/// # Errors
///
/// Same as [`create_archive`].
pub fn create_archive_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    output_path: P,
    sources: &[Q],
    config: &CreationConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<CreationReport> {
    crate::creation::tar::write_tar_archive(output_path.as_ref(), sources, config, progress)
}
