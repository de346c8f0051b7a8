//! Incremental content digests over streams of unknown length.
//!
//! Member content is hashed with MD5 while it is read in fixed-size blocks,
//! so neither the archive nor a member ever has to fit in memory.

use std::fmt;
use std::io::Read;
use std::io::{self};

use md5::Digest;
use md5::Md5;

use crate::Result;
use crate::VeritarError;

/// Size of each read issued by the digest engine (64 KiB).
pub const DIGEST_BLOCK_SIZE: usize = 64 * 1024;

/// Reusable read buffer for the digest engine.
///
/// One buffer is allocated per verification run and shared by every member.
#[derive(Debug)]
pub struct DigestBuffer {
    buf: Box<[u8]>,
}

impl DigestBuffer {
    /// Creates a new zero-initialized buffer of [`DIGEST_BLOCK_SIZE`] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; DIGEST_BLOCK_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for DigestBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// A 128-bit MD5 content digest.
///
/// Renders as 32 lowercase hexadecimal characters, the form used in
/// checksum manifests.
///
/// # Examples
///
/// ```
/// use veritar_core::digest::ContentDigest;
///
/// let digest = ContentDigest::of(b"hello");
/// assert_eq!(digest.to_string(), "5d41402abc4b2a76b9719d911017c592");
/// assert!(digest.matches_hex("5D41402ABC4B2A76B9719D911017C592"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 16]);

impl ContentDigest {
    /// Computes the digest of an in-memory byte slice.
    #[must_use]
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(data);
        Self::from_hasher(hasher)
    }

    pub(crate) fn from_hasher(hasher: Md5) -> Self {
        let out = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&out);
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns the lowercase hexadecimal form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Compares against a hex digest as written in a manifest.
    ///
    /// Comparison ignores ASCII case; any other difference (length,
    /// non-hex characters) is a mismatch.
    #[must_use]
    pub fn matches_hex(&self, expected: &str) -> bool {
        let mut decoded = [0u8; 16];
        hex::decode_to_slice(expected, &mut decoded).is_ok() && decoded == self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", self.to_hex())
    }
}

/// Digests a reader until it is exhausted.
///
/// Reads in blocks of [`DIGEST_BLOCK_SIZE`] bytes; the total length does not
/// need to be known in advance. Reads failing with
/// [`io::ErrorKind::Interrupted`] are retried.
///
/// # Errors
///
/// Returns [`VeritarError::Read`] if the reader fails partway through. This
/// is never returned for a stream that ends normally, so a short member is
/// never silently hashed as if it were complete.
///
/// # Examples
///
/// ```
/// use veritar_core::digest::{DigestBuffer, digest_reader};
///
/// let mut buffer = DigestBuffer::new();
/// let digest = digest_reader(&mut &b"hello"[..], &mut buffer)?;
/// assert_eq!(digest.to_hex(), "5d41402abc4b2a76b9719d911017c592");
/// # Ok::<(), veritar_core::VeritarError>(())
/// ```
pub fn digest_reader<R: Read + ?Sized>(
    reader: &mut R,
    buffer: &mut DigestBuffer,
) -> Result<ContentDigest> {
    let mut hasher = Md5::new();

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(VeritarError::Read(e)),
        };
        hasher.update(&buffer.buf[..bytes_read]);
    }

    Ok(ContentDigest::from_hasher(hasher))
}

/// Reader adapter that hashes everything read through it.
///
/// Used by the archive producer so each file is hashed in the same pass that
/// streams it into the tar writer.
pub struct HashingReader<R> {
    inner: R,
    hasher: Md5,
    bytes_read: u64,
}

impl<R> HashingReader<R> {
    /// Wraps a reader.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Md5::new(),
            bytes_read: 0,
        }
    }

    /// Returns the number of bytes hashed so far.
    #[must_use]
    pub const fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Consumes the adapter and returns the digest of everything read.
    #[must_use]
    pub fn finalize(self) -> ContentDigest {
        ContentDigest::from_hasher(self.hasher)
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes_read += n as u64;
        Ok(n)
    }
}
