//! Test utilities for building tar archives in memory.
//!
//! Besides well-formed members, [`TarTestBuilder`] can splice damaged
//! blocks into the stream and wrap the result in gzip or bzip2, which is
//! what the verification tests need to exercise recovery paths.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Write;

use crate::archive::BLOCK_SIZE;
use crate::digest::ContentDigest;

/// Creates an in-memory TAR archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are created with mode 0o644.
///
/// # Examples
///
/// ```
/// use veritar_core::test_utils::create_test_tar;
///
/// let tar_data = create_test_tar(vec![("file.txt", b"hello".as_slice()), ("dir/nested.txt", b"world")]);
/// ```
#[must_use]
pub fn create_test_tar(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(TarTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Renders manifest text for `(path, content)` pairs.
///
/// # Examples
///
/// ```
/// use veritar_core::test_utils::manifest_text;
///
/// let text = manifest_text(&[("a.txt", b"hello".as_slice())]);
/// assert_eq!(text, "5d41402abc4b2a76b9719d911017c592  a.txt\n");
/// ```
#[must_use]
pub fn manifest_text(entries: &[(&str, &[u8])]) -> String {
    entries
        .iter()
        .map(|(path, data)| format!("{}  {path}\n", ContentDigest::of(data)))
        .collect()
}

/// Builder for creating TAR test archives with various entry types.
///
/// # Examples
///
/// ```
/// use veritar_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_file("file.txt", b"content")
///     .add_directory("dir/")
///     .add_garbage_block()
///     .add_symlink("link", "file.txt")
///     .build();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new TAR test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file to the archive.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a directory to the archive.
    #[must_use]
    pub fn add_directory(self, path: &str) -> Self {
        self.add_special(path, tar::EntryType::Directory, 0o755, None)
    }

    /// Adds a symlink to the archive.
    #[must_use]
    pub fn add_symlink(self, path: &str, target: &str) -> Self {
        self.add_special(path, tar::EntryType::Symlink, 0o777, Some(target))
    }

    /// Adds a hardlink to the archive.
    #[must_use]
    pub fn add_hardlink(self, path: &str, target: &str) -> Self {
        self.add_special(path, tar::EntryType::Link, 0o644, Some(target))
    }

    /// Adds a named pipe to the archive.
    #[must_use]
    pub fn add_fifo(self, path: &str) -> Self {
        self.add_special(path, tar::EntryType::Fifo, 0o644, None)
    }

    /// Adds a regular file whose path is carried by a PAX extended header.
    ///
    /// `header_path` is written into the ustar header itself and must be
    /// overridden by readers that honor PAX records.
    #[must_use]
    pub fn add_pax_file(mut self, pax_path: &str, header_path: &str, data: &[u8]) -> Self {
        self.builder
            .append_pax_extensions([("path", pax_path.as_bytes())])
            .unwrap();
        let mut header = tar::Header::new_ustar();
        header.set_path(header_path).unwrap();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Appends a prepared header and its data without any path handling.
    #[must_use]
    pub fn add_raw_entry(mut self, header: &tar::Header, data: &[u8]) -> Self {
        self.builder.append(header, data).unwrap();
        self
    }

    /// Appends one block that fails header checksum validation.
    #[must_use]
    pub fn add_garbage_block(mut self) -> Self {
        self.builder
            .get_mut()
            .extend_from_slice(&[0xAA; BLOCK_SIZE]);
        self
    }

    /// Builds and returns the TAR archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }

    /// Builds the archive and compresses it with gzip.
    #[must_use]
    pub fn build_gzip(self) -> Vec<u8> {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        encoder.write_all(&self.build()).unwrap();
        encoder.finish().unwrap()
    }

    /// Builds the archive and compresses it with bzip2.
    #[must_use]
    pub fn build_bzip2(self) -> Vec<u8> {
        let mut encoder =
            bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::fast());
        encoder.write_all(&self.build()).unwrap();
        encoder.finish().unwrap()
    }

    fn add_special(
        mut self,
        path: &str,
        entry_type: tar::EntryType,
        mode: u32,
        link: Option<&str>,
    ) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(mode);
        header.set_entry_type(entry_type);
        if let Some(target) = link {
            header.set_link_name(target).unwrap();
        }
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Flips bytes inside block `index` of `data` so its header checksum fails.
pub fn corrupt_block(data: &mut [u8], index: usize) {
    let start = index * BLOCK_SIZE;
    for byte in &mut data[start..start + 16] {
        *byte ^= 0x5a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_tar() {
        let tar_data = create_test_tar(vec![("file.txt", b"hello".as_slice())]);
        // header + one data block + two-block terminator
        assert_eq!(tar_data.len(), 4 * BLOCK_SIZE);
    }

    #[test]
    fn test_garbage_block_is_appended() {
        let plain = TarTestBuilder::new().add_file("a", b"a").build();
        let damaged = TarTestBuilder::new()
            .add_file("a", b"a")
            .add_garbage_block()
            .build();
        assert_eq!(damaged.len(), plain.len() + BLOCK_SIZE);
        assert_eq!(damaged[2 * BLOCK_SIZE], 0xAA);
    }

    #[test]
    fn test_compressed_builds_have_magic() {
        let gz = TarTestBuilder::new().add_file("a", b"a").build_gzip();
        assert_eq!(&gz[..2], &[0x1f, 0x8b]);
        let bz = TarTestBuilder::new().add_file("a", b"a").build_bzip2();
        assert_eq!(&bz[..3], b"BZh");
    }

    #[test]
    fn test_manifest_text() {
        let text = manifest_text(&[("a", b"".as_slice()), ("b", b"hello".as_slice())]);
        assert_eq!(
            text,
            "d41d8cd98f00b204e9800998ecf8427e  a\n5d41402abc4b2a76b9719d911017c592  b\n"
        );
    }

    #[test]
    fn test_corrupt_block() {
        let mut data = create_test_tar(vec![("a", b"a".as_slice())]);
        let before = data[3];
        corrupt_block(&mut data, 0);
        assert_ne!(data[3], before);
    }
}
