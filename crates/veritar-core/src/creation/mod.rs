//! Archive creation module.
//!
//! Builds a tar archive from filesystem sources and writes the checksum
//! manifest that [`crate::verify_archive`] later consumes.

pub mod compression;
pub mod filters;
pub mod progress;
pub mod walker;

pub mod config;
pub mod report;
pub mod tar;

// Re-exports for public API
pub use config::CreationConfig;
pub use report::AddedEntry;
pub use report::CreationReport;
pub use walker::SourceEntry;
pub use walker::SourceKind;
