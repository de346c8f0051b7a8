//! Output compression detection from file names.
//!
//! Reading never trusts file names (see [`CompressionCodec::from_magic`]);
//! this module only picks the codec used when writing a new archive.

use std::path::Path;

use super::compression::CompressionCodec;

/// Picks the compression codec for an output archive from its file name.
///
/// Returns `None` (uncompressed tar) for `.tar` and for any name without a
/// recognized compressed-tar suffix.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use veritar_core::formats::CompressionCodec;
/// use veritar_core::formats::detect::codec_for_output;
///
/// assert_eq!(codec_for_output(Path::new("backup.tar.gz")), Some(CompressionCodec::Gzip));
/// assert_eq!(codec_for_output(Path::new("backup.tar")), None);
/// ```
#[must_use]
pub fn codec_for_output(path: &Path) -> Option<CompressionCodec> {
    let extension = path.extension().and_then(|e| e.to_str())?;

    match extension.to_ascii_lowercase().as_str() {
        "gz" | "tgz" => Some(CompressionCodec::Gzip),
        "bz2" | "tbz" | "tbz2" => Some(CompressionCodec::Bzip2),
        "xz" | "txz" => Some(CompressionCodec::Xz),
        "zst" | "tzst" => Some(CompressionCodec::Zstd),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_tar() {
        assert_eq!(codec_for_output(&PathBuf::from("archive.tar")), None);
    }

    #[test]
    fn test_detect_tar_gz() {
        assert_eq!(
            codec_for_output(&PathBuf::from("archive.tar.gz")),
            Some(CompressionCodec::Gzip)
        );
        assert_eq!(
            codec_for_output(&PathBuf::from("archive.tgz")),
            Some(CompressionCodec::Gzip)
        );
    }

    #[test]
    fn test_detect_tar_bz2() {
        for name in ["archive.tar.bz2", "archive.tbz", "archive.tbz2"] {
            assert_eq!(
                codec_for_output(&PathBuf::from(name)),
                Some(CompressionCodec::Bzip2)
            );
        }
    }

    #[test]
    fn test_detect_tar_xz_and_zst() {
        assert_eq!(
            codec_for_output(&PathBuf::from("archive.txz")),
            Some(CompressionCodec::Xz)
        );
        assert_eq!(
            codec_for_output(&PathBuf::from("archive.tar.zst")),
            Some(CompressionCodec::Zstd)
        );
    }

    #[test]
    fn test_detect_case_insensitive() {
        assert_eq!(
            codec_for_output(&PathBuf::from("ARCHIVE.TAR.GZ")),
            Some(CompressionCodec::Gzip)
        );
    }

    #[test]
    fn test_detect_unknown_defaults_to_plain() {
        assert_eq!(codec_for_output(&PathBuf::from("archive.bak")), None);
        assert_eq!(codec_for_output(&PathBuf::from("archive")), None);
    }
}
