//! Byte-counting writer used to measure the size of a written archive.

use std::io::Write;
use std::io::{self};

/// Writer that counts the bytes accepted by the wrapped writer.
///
/// Placed between the compression encoder and the output file, it yields
/// the on-disk size of the archive without a second `stat`.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use veritar_core::io::CountingWriter;
///
/// let mut writer = CountingWriter::new(Vec::new());
/// writer.write_all(b"Hello, ")?;
/// write!(writer, "{}!", "World")?;
///
/// assert_eq!(writer.total_bytes(), 13);
/// assert_eq!(writer.into_inner(), b"Hello, World!");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W> CountingWriter<W> {
    /// Wraps `inner` with a zero count.
    #[must_use]
    pub const fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Bytes accepted by the inner writer so far. Partial writes count only
    /// what was actually written.
    #[must_use]
    pub const fn total_bytes(&self) -> u64 {
        self.bytes_written
    }

    /// Returns a reference to the inner writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consumes the counter and returns the inner writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.bytes_written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
