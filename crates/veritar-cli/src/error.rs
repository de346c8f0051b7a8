//! Error conversion utilities for CLI.
//!
//! Converts veritar-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use veritar_core::VeritarError;

/// Exit code for a FAILED verdict.
pub const EXIT_FAILED: u8 = 1;

/// Exit code for usage, parse and open errors.
pub const EXIT_ERROR: u8 = 2;

/// Exit code after Ctrl-C.
pub const EXIT_INTERRUPTED: i32 = 130;

const SUPPORTED_FORMATS: &str = "tar, tar.gz, tar.bz2, tar.xz, tar.zst";

/// Converts an error raised while loading the checksum file.
pub fn convert_manifest_error(err: VeritarError, manifest: &Path) -> anyhow::Error {
    match err {
        VeritarError::ManifestFormat { line_number, line } => {
            anyhow!(
                "Malformed checksum file '{}' at line {line_number}: {line:?}\n\
                 HINT: Each line must be '<md5>  <path>' with two spaces between the fields.",
                manifest.display()
            )
        }
        VeritarError::Io(io_err) => {
            anyhow!(
                "Cannot read checksum file '{}': {io_err}",
                manifest.display()
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error loading checksum file '{}'", manifest.display())),
    }
}

/// Converts an error raised while opening an archive.
pub fn convert_archive_error(err: VeritarError, archive: &Path) -> anyhow::Error {
    match err {
        VeritarError::ArchiveOpen(reason) => {
            anyhow!(
                "Cannot read '{}' as a tar archive: {reason}\n\
                 HINT: Supported formats: {SUPPORTED_FORMATS}",
                archive.display()
            )
        }
        VeritarError::Io(io_err) => {
            anyhow!("Cannot open archive '{}': {io_err}", archive.display())
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Converts an error raised while creating an archive.
pub fn convert_creation_error(err: VeritarError, output: &Path) -> anyhow::Error {
    match err {
        VeritarError::SourceNotFound { path } => {
            anyhow!(
                "Source not found: '{}'\n\
                 HINT: Check the path, or quote patterns so the shell does not expand them.",
                path.display()
            )
        }
        VeritarError::InvalidCompressionLevel { level } => {
            anyhow!(
                "Invalid compression level {level}\n\
                 HINT: Use a level between 1 (fastest) and 9 (smallest)."
            )
        }
        VeritarError::Walk(reason) => {
            anyhow!("Cannot read source tree: {reason}")
        }
        VeritarError::Io(io_err) => {
            anyhow!(
                "I/O error while creating '{}': {io_err}",
                output.display()
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error creating archive '{}'", output.display())),
    }
}

/// Adds checksum-file context to a core result.
pub fn add_manifest_context<T>(
    result: Result<T, VeritarError>,
    manifest: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_manifest_error(e, manifest))
}

/// Adds archive context to a core result.
pub fn add_archive_context<T>(
    result: Result<T, VeritarError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, archive))
}

/// Adds output-archive context to a creation result.
pub fn add_creation_context<T>(
    result: Result<T, VeritarError>,
    output: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_creation_error(e, output))
}
