//! Compression codec support for tar streams.
//!
//! The same codecs are used for reading (decompression, sniffed from the
//! stream content) and writing (compression, chosen from configuration or
//! the output file name).
//!
//! # Supported Codecs
//!
//! - **Gzip** (.tar.gz, .tgz)
//! - **Bzip2** (.tar.bz2, .tbz2)
//! - **Xz** (.tar.xz, .txz)
//! - **Zstd** (.tar.zst, .tzst)

use std::io::BufRead;
use std::io::Read;
use std::io::{self};

/// Compression codec wrapping a tar stream.
///
/// # Examples
///
/// ```
/// use veritar_core::formats::CompressionCodec;
///
/// assert_eq!(CompressionCodec::from_magic(&[0x1f, 0x8b, 0x08]), Some(CompressionCodec::Gzip));
/// assert_eq!(CompressionCodec::from_magic(b"BZh91AY&SY"), Some(CompressionCodec::Bzip2));
/// assert_eq!(CompressionCodec::from_magic(b"ustar"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip compression (deflate algorithm).
    Gzip,

    /// Bzip2 compression (Burrows-Wheeler algorithm).
    Bzip2,

    /// Xz compression (LZMA2 algorithm).
    Xz,

    /// Zstd compression (Zstandard algorithm).
    Zstd,
}

/// Gzip member header.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Bzip2 stream header (`BZh`).
const BZIP2_MAGIC: [u8; 3] = *b"BZh";

/// Xz stream header.
const XZ_MAGIC: [u8; 6] = [0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00];

/// Zstd frame header.
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// Number of leading bytes needed to recognize every codec.
pub const MAGIC_LEN: usize = 6;

impl CompressionCodec {
    /// Every supported codec.
    pub const ALL: [Self; 4] = [Self::Gzip, Self::Bzip2, Self::Xz, Self::Zstd];

    /// Recognizes a codec from the first bytes of a stream.
    ///
    /// Returns `None` for anything that does not start with a known
    /// compression header, which is then read as an uncompressed tar.
    #[must_use]
    pub fn from_magic(head: &[u8]) -> Option<Self> {
        if head.starts_with(&GZIP_MAGIC) {
            Some(Self::Gzip)
        } else if head.starts_with(&BZIP2_MAGIC) {
            Some(Self::Bzip2)
        } else if head.starts_with(&XZ_MAGIC) {
            Some(Self::Xz)
        } else if head.starts_with(&ZSTD_MAGIC) {
            Some(Self::Zstd)
        } else {
            None
        }
    }

    /// Returns the typical file extension for this codec when used with TAR.
    ///
    /// # Examples
    ///
    /// ```
    /// use veritar_core::formats::CompressionCodec;
    ///
    /// assert_eq!(CompressionCodec::Gzip.extension(), "tar.gz");
    /// assert_eq!(CompressionCodec::Zstd.extension(), "tar.zst");
    /// ```
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Gzip => "tar.gz",
            Self::Bzip2 => "tar.bz2",
            Self::Xz => "tar.xz",
            Self::Zstd => "tar.zst",
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    /// Wraps a buffered stream in the matching decoder.
    ///
    /// Gzip, bzip2 and xz decoders continue across concatenated streams;
    /// zstd does so natively.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder cannot be initialized.
    pub fn decoder<R: BufRead + 'static>(self, reader: R) -> io::Result<Box<dyn Read>> {
        Ok(match self {
            Self::Gzip => Box::new(flate2::bufread::MultiGzDecoder::new(reader)),
            Self::Bzip2 => Box::new(bzip2::bufread::MultiBzDecoder::new(reader)),
            Self::Xz => Box::new(xz2::bufread::XzDecoder::new_multi_decoder(reader)),
            Self::Zstd => Box::new(zstd::stream::read::Decoder::with_buffer(reader)?),
        })
    }
}
