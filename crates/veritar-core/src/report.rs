//! Progress reporting for archive creation.

use std::path::Path;

/// Callback trait for progress reporting while an archive is written.
///
/// Implement this trait to receive progress updates during creation. The
/// trait requires `Send` to allow use in multi-threaded contexts.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use veritar_core::ProgressCallback;
///
/// struct SimpleProgress;
///
/// impl ProgressCallback for SimpleProgress {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("Processing {}/{}: {}", current, total, path.display());
///     }
///
///     fn on_bytes_written(&mut self, bytes: u64) {
///         // Track bytes written
///     }
///
///     fn on_entry_complete(&mut self, path: &Path) {
///         println!("Completed: {}", path.display());
///     }
///
///     fn on_complete(&mut self) {
///         println!("Archive written");
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called when starting to process an entry.
    ///
    /// # Arguments
    ///
    /// * `path` - Archive path of the entry being processed
    /// * `total` - Total number of entries to write
    /// * `current` - Current entry number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called as file content is read into the archive.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Number of bytes read in this update
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when an entry has been completely written.
    ///
    /// # Arguments
    ///
    /// * `path` - Archive path of the entry that was completed
    fn on_entry_complete(&mut self, path: &Path);

    /// Called when the archive and its manifest are complete.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback` that does nothing.
///
/// Use this when you don't need progress reporting but the API requires
/// a callback implementation.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
