//! Progress tracking utilities for archive creation.
//!
//! - **`ProgressTracker`**: numbers entries and forwards lifecycle events
//! - **`ProgressReader`**: reports bytes read from file content in batches

use std::io::Read;
use std::path::Path;

use crate::ProgressCallback;

/// Manages progress callbacks with automatic entry counting.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use veritar_core::NoopProgress;
/// use veritar_core::creation::progress::ProgressTracker;
///
/// let mut progress = NoopProgress;
/// let mut tracker = ProgressTracker::new(&mut progress, 2);
/// tracker.on_entry_start(Path::new("a.txt"));
/// tracker.on_entry_complete(Path::new("a.txt"));
/// assert_eq!(tracker.current_entry(), 1);
/// ```
pub struct ProgressTracker<'a> {
    progress: &'a mut dyn ProgressCallback,
    current_entry: usize,
    total_entries: usize,
}

impl<'a> ProgressTracker<'a> {
    /// Creates a tracker for `total_entries` entries.
    #[must_use]
    pub fn new(progress: &'a mut dyn ProgressCallback, total_entries: usize) -> Self {
        Self {
            progress,
            current_entry: 0,
            total_entries,
        }
    }

    /// Number of entries started so far.
    #[must_use]
    pub const fn current_entry(&self) -> usize {
        self.current_entry
    }

    /// Reports that processing started for an entry.
    pub fn on_entry_start(&mut self, path: &Path) {
        self.current_entry += 1;
        self.progress
            .on_entry_start(path, self.total_entries, self.current_entry);
    }

    /// Reports that processing completed for an entry.
    pub fn on_entry_complete(&mut self, path: &Path) {
        self.progress.on_entry_complete(path);
    }

    /// Reports that the entire operation completed.
    pub fn on_complete(&mut self) {
        self.progress.on_complete();
    }

    /// Borrows the callback for byte-level reporting.
    pub fn callback(&mut self) -> &mut dyn ProgressCallback {
        &mut *self.progress
    }
}

/// Wrapper reader that reports bytes read to a progress callback.
///
/// Updates are batched (1 MB by default); the remainder is flushed on drop.
pub struct ProgressReader<'a, R> {
    inner: R,
    progress: &'a mut dyn ProgressCallback,
    bytes_since_last_update: u64,
    batch_threshold: u64,
}

impl<'a, R> ProgressReader<'a, R> {
    /// Creates a reader with the default 1 MB batch threshold.
    #[must_use]
    pub fn new(inner: R, progress: &'a mut dyn ProgressCallback) -> Self {
        Self::with_batch_threshold(inner, progress, 1024 * 1024)
    }

    /// Creates a reader reporting every `batch_threshold` bytes.
    #[must_use]
    pub fn with_batch_threshold(
        inner: R,
        progress: &'a mut dyn ProgressCallback,
        batch_threshold: u64,
    ) -> Self {
        Self {
            inner,
            progress,
            bytes_since_last_update: 0,
            batch_threshold,
        }
    }

    /// Reports any bytes not yet passed to the callback.
    pub fn flush_progress(&mut self) {
        if self.bytes_since_last_update > 0 {
            self.progress.on_bytes_written(self.bytes_since_last_update);
            self.bytes_since_last_update = 0;
        }
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let bytes_read = self.inner.read(buf)?;
        if bytes_read > 0 {
            self.bytes_since_last_update += bytes_read as u64;
            if self.bytes_since_last_update >= self.batch_threshold {
                self.flush_progress();
            }
        }
        Ok(bytes_read)
    }
}

impl<R> Drop for ProgressReader<'_, R> {
    fn drop(&mut self) {
        self.flush_progress();
    }
}
