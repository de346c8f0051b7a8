//! Checksum manifest parsing and formatting.
//!
//! A manifest is plain text with one entry per line:
//!
//! ```text
//! 5d41402abc4b2a76b9719d911017c592  a.txt
//! d41d8cd98f00b204e9800998ecf8427e  dir/empty.txt
//! ```
//!
//! The digest and the member path are separated by exactly two spaces, the
//! layout `md5sum` produces. Blank lines are ignored.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use crate::Result;
use crate::VeritarError;
use crate::digest::ContentDigest;

/// Separator between the digest and path columns.
pub const FIELD_SEPARATOR: &str = "  ";

/// In-memory checksum manifest keyed by archived member path.
///
/// Entries are removed as the verifier matches them against archive
/// members; whatever is left afterwards are the remnants, manifest entries
/// with no counterpart in the archive. Keys are kept sorted so remnants are
/// always reported in the same order.
///
/// # Examples
///
/// ```
/// use veritar_core::ChecksumManifest;
///
/// let text = "5d41402abc4b2a76b9719d911017c592  a.txt\n";
/// let mut manifest = ChecksumManifest::from_reader(text.as_bytes())?;
/// assert_eq!(manifest.len(), 1);
/// assert_eq!(
///     manifest.take("a.txt").as_deref(),
///     Some("5d41402abc4b2a76b9719d911017c592")
/// );
/// assert!(manifest.is_empty());
/// # Ok::<(), veritar_core::VeritarError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumManifest {
    entries: BTreeMap<String, String>,
}

impl ChecksumManifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`VeritarError::Io`] if the file cannot be read and
    /// [`VeritarError::ManifestFormat`] for the first malformed line.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Parses a manifest from any reader.
    ///
    /// Each non-blank line is split at the first occurrence of two
    /// consecutive spaces; surrounding whitespace is trimmed from both
    /// fields. When a path appears more than once the last line wins.
    ///
    /// # Errors
    ///
    /// Returns [`VeritarError::ManifestFormat`] if a non-blank line has no
    /// separator. Parsing stops at that line and nothing is returned.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut manifest = Self::new();

        for (index, raw) in BufReader::new(reader).split(b'\n').enumerate() {
            let raw = raw?;
            let line = String::from_utf8_lossy(&raw);
            if line.trim().is_empty() {
                continue;
            }

            let Some((digest, path)) = line.split_once(FIELD_SEPARATOR) else {
                return Err(VeritarError::ManifestFormat {
                    line_number: index + 1,
                    line: line.trim_end_matches(['\r', '\n']).to_string(),
                });
            };

            let path = path.trim();
            if manifest.insert(path, digest.trim()).is_some() {
                tracing::warn!(path, line = index + 1, "duplicate manifest entry, last one wins");
            }
        }

        tracing::debug!(entries = manifest.len(), "loaded checksum manifest");
        Ok(manifest)
    }

    /// Inserts an entry, returning the digest it replaced.
    pub fn insert(&mut self, path: impl Into<String>, digest: impl Into<String>) -> Option<String> {
        self.entries.insert(path.into(), digest.into())
    }

    /// Returns the expected digest for a path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Returns `true` if the manifest has an entry for `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Removes and returns the entry for `path`, marking it as seen.
    pub fn take(&mut self, path: &str) -> Option<String> {
        self.entries.remove(path)
    }

    /// Number of entries not yet matched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if every entry has been matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns every remaining path in sorted order.
    pub fn drain_remnants(&mut self) -> Vec<String> {
        std::mem::take(&mut self.entries).into_keys().collect()
    }

    /// Iterates over `(path, digest)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, d)| (p.as_str(), d.as_str()))
    }
}

/// Formats one manifest line, including the trailing newline.
///
/// # Examples
///
/// ```
/// use veritar_core::digest::ContentDigest;
/// use veritar_core::manifest::format_manifest_line;
///
/// let line = format_manifest_line(&ContentDigest::of(b"hello"), "a.txt");
/// assert_eq!(line, "5d41402abc4b2a76b9719d911017c592  a.txt\n");
/// ```
#[must_use]
pub fn format_manifest_line(digest: &ContentDigest, path: &str) -> String {
    format!("{digest}{FIELD_SEPARATOR}{path}\n")
}

/// Returns `true` if `path` can be written as a manifest entry and read
/// back unchanged.
///
/// Paths with line breaks or surrounding whitespace would not survive the
/// line-oriented, trimmed format.
#[must_use]
pub fn is_representable(path: &str) -> bool {
    !path.is_empty() && !path.contains(['\n', '\r']) && path.trim() == path
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic() {
        let text = "5d41402abc4b2a76b9719d911017c592  a.txt\n\
                    d41d8cd98f00b204e9800998ecf8427e  dir/b.txt\n";
        let manifest = ChecksumManifest::from_reader(text.as_bytes()).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get("a.txt"), Some("5d41402abc4b2a76b9719d911017c592"));
        assert_eq!(manifest.get("dir/b.txt"), Some("d41d8cd98f00b204e9800998ecf8427e"));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = "\n   \n5d41402abc4b2a76b9719d911017c592  a.txt\n\n";
        let manifest = ChecksumManifest::from_reader(text.as_bytes()).unwrap();
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_parse_trims_fields_and_crlf() {
        let text = "  5d41402abc4b2a76b9719d911017c592  a.txt  \r\n";
        let manifest = ChecksumManifest::from_reader(text.as_bytes()).unwrap();
        assert!(manifest.contains("a.txt"));
    }

    #[test]
    fn test_parse_path_with_spaces() {
        let text = "5d41402abc4b2a76b9719d911017c592  my file  copy.txt\n";
        let manifest = ChecksumManifest::from_reader(text.as_bytes()).unwrap();
        assert!(manifest.contains("my file  copy.txt"));
    }

    #[test]
    fn test_parse_without_trailing_newline() {
        let text = "5d41402abc4b2a76b9719d911017c592  a.txt";
        let manifest = ChecksumManifest::from_reader(text.as_bytes()).unwrap();
        assert!(manifest.contains("a.txt"));
    }

    #[test]
    fn test_parse_single_space_is_fatal() {
        let text = "5d41402abc4b2a76b9719d911017c592  a.txt\n\
                    d41d8cd98f00b204e9800998ecf8427e b.txt\n";
        let err = ChecksumManifest::from_reader(text.as_bytes()).unwrap_err();
        match err {
            VeritarError::ManifestFormat { line_number, line } => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "d41d8cd98f00b204e9800998ecf8427e b.txt");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_last_wins() {
        let text = "00000000000000000000000000000000  a.txt\n\
                    5d41402abc4b2a76b9719d911017c592  a.txt\n";
        let manifest = ChecksumManifest::from_reader(text.as_bytes()).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.get("a.txt"), Some("5d41402abc4b2a76b9719d911017c592"));
    }

    #[test]
    fn test_take_and_remnants_sorted() {
        let text = "11111111111111111111111111111111  zeta\n\
                    22222222222222222222222222222222  alpha\n\
                    33333333333333333333333333333333  mid\n";
        let mut manifest = ChecksumManifest::from_reader(text.as_bytes()).unwrap();
        assert!(manifest.take("mid").is_some());
        assert!(manifest.take("mid").is_none());
        assert_eq!(manifest.drain_remnants(), vec!["alpha", "zeta"]);
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "5d41402abc4b2a76b9719d911017c592  a.txt").unwrap();
        file.flush().unwrap();

        let manifest = ChecksumManifest::from_path(file.path()).unwrap();
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = ChecksumManifest::from_path("/nonexistent/checksums.md5");
        assert!(matches!(result, Err(VeritarError::Io(_))));
    }

    #[test]
    fn test_format_line_parses_back() {
        let digest = ContentDigest::of(b"content");
        let line = format_manifest_line(&digest, "nested/dir/file.bin");
        let manifest = ChecksumManifest::from_reader(line.as_bytes()).unwrap();
        assert_eq!(manifest.get("nested/dir/file.bin"), Some(digest.to_hex().as_str()));
    }

    #[test]
    fn test_is_representable() {
        assert!(is_representable("dir/file.txt"));
        assert!(is_representable("with  two spaces"));
        assert!(!is_representable("line\nbreak"));
        assert!(!is_representable(" leading"));
        assert!(!is_representable("trailing "));
        assert!(!is_representable(""));
    }
}
