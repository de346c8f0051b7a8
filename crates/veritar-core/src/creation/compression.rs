//! Output compression for new archives.
//!
//! User levels follow one scale for every codec:
//!
//! - **1-3**: Fast compression (lower CPU usage, larger files)
//! - **6**: Default compression (balanced)
//! - **7-9**: Best compression (higher CPU usage, smaller files)
//!
//! Each codec maps these levels to its own internal scale.

use std::io::Write;
use std::io::{self};

use crate::formats::CompressionCodec;

/// Converts user compression level (1-9) to flate2 compression level.
#[must_use]
pub fn compression_level_to_flate2(level: Option<u8>) -> flate2::Compression {
    match level {
        None | Some(6) => flate2::Compression::default(),
        Some(1..=3) => flate2::Compression::fast(),
        Some(7..=9) => flate2::Compression::best(),
        Some(n) => flate2::Compression::new(u32::from(n)),
    }
}

/// Converts user compression level (1-9) to bzip2 compression level.
#[must_use]
pub fn compression_level_to_bzip2(level: Option<u8>) -> bzip2::Compression {
    match level {
        None | Some(6) => bzip2::Compression::default(),
        Some(1) => bzip2::Compression::fast(),
        Some(7..=9) => bzip2::Compression::best(),
        Some(n) => bzip2::Compression::new(u32::from(n.clamp(1, 9))),
    }
}

/// Converts user compression level (1-9) to xz preset.
#[must_use]
pub fn compression_level_to_xz(level: Option<u8>) -> u32 {
    level.map_or(6, |n| u32::from(n.min(9)))
}

/// Converts user compression level (1-9) to zstd compression level.
///
/// Zstd has a wider range (1-22) than the user scale; levels 7-9 map to
/// 10, 15 and 19.
///
/// # Examples
///
/// ```
/// use veritar_core::creation::compression::compression_level_to_zstd;
///
/// assert_eq!(compression_level_to_zstd(None), 3);
/// assert_eq!(compression_level_to_zstd(Some(1)), 1);
/// assert_eq!(compression_level_to_zstd(Some(9)), 19);
/// ```
#[allow(clippy::match_same_arms)]
#[must_use]
pub fn compression_level_to_zstd(level: Option<u8>) -> i32 {
    match level {
        None | Some(6) => 3,
        Some(1) => 1,
        Some(2) => 2,
        Some(7) => 10,
        Some(8) => 15,
        Some(9) => 19,
        _ => 3,
    }
}

/// Writer wrapping the output in the selected compression codec.
///
/// [`ArchiveEncoder::finish`] must be called to write the codec trailer.
pub enum ArchiveEncoder<W: Write> {
    /// Uncompressed tar.
    Plain(W),
    /// Gzip stream.
    Gzip(flate2::write::GzEncoder<W>),
    /// Bzip2 stream.
    Bzip2(bzip2::write::BzEncoder<W>),
    /// Xz stream.
    Xz(xz2::write::XzEncoder<W>),
    /// Zstd frame with content checksum.
    Zstd(zstd::Encoder<'static, W>),
}

impl<W: Write> ArchiveEncoder<W> {
    /// Wraps `writer` for `codec` at the given user level.
    ///
    /// # Errors
    ///
    /// Returns an error if the zstd encoder cannot be initialized.
    pub fn new(writer: W, codec: Option<CompressionCodec>, level: Option<u8>) -> io::Result<Self> {
        Ok(match codec {
            None => Self::Plain(writer),
            Some(CompressionCodec::Gzip) => Self::Gzip(flate2::write::GzEncoder::new(
                writer,
                compression_level_to_flate2(level),
            )),
            Some(CompressionCodec::Bzip2) => Self::Bzip2(bzip2::write::BzEncoder::new(
                writer,
                compression_level_to_bzip2(level),
            )),
            Some(CompressionCodec::Xz) => Self::Xz(xz2::write::XzEncoder::new(
                writer,
                compression_level_to_xz(level),
            )),
            Some(CompressionCodec::Zstd) => {
                let mut encoder = zstd::Encoder::new(writer, compression_level_to_zstd(level))?;
                encoder.include_checksum(true)?;
                Self::Zstd(encoder)
            }
        })
    }

    /// Writes the codec trailer and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the trailer cannot be written.
    pub fn finish(self) -> io::Result<W> {
        match self {
            Self::Plain(writer) => Ok(writer),
            Self::Gzip(encoder) => encoder.finish(),
            Self::Bzip2(encoder) => encoder.finish(),
            Self::Xz(encoder) => encoder.finish(),
            Self::Zstd(encoder) => encoder.finish(),
        }
    }
}

impl<W: Write> Write for ArchiveEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(writer) => writer.write(buf),
            Self::Gzip(encoder) => encoder.write(buf),
            Self::Bzip2(encoder) => encoder.write(buf),
            Self::Xz(encoder) => encoder.write(buf),
            Self::Zstd(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(writer) => writer.flush(),
            Self::Gzip(encoder) => encoder.flush(),
            Self::Bzip2(encoder) => encoder.flush(),
            Self::Xz(encoder) => encoder.flush(),
            Self::Zstd(encoder) => encoder.flush(),
        }
    }
}
