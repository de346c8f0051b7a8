//! Configuration for archive creation operations.

use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::VeritarError;
use crate::formats::CompressionCodec;
use crate::formats::detect::codec_for_output;

/// Extension appended to the archive name for the default manifest path.
pub const MANIFEST_EXTENSION: &str = "md5";

/// Configuration for archive creation operations.
///
/// # Examples
///
/// ```
/// use veritar_core::creation::CreationConfig;
///
/// let config = CreationConfig::default()
///     .with_follow_symlinks(true)
///     .with_compression_level(9)
///     .with_exclude_patterns(vec!["*.tmp".to_string()]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationConfig {
    /// Archive the targets of symlinks instead of the links themselves.
    ///
    /// Default: `false`.
    pub follow_symlinks: bool,

    /// Include hidden files (names starting with '.').
    ///
    /// Default: `true`. Backups are expected to be complete.
    pub include_hidden: bool,

    /// Patterns to exclude from the archive.
    ///
    /// See [`filters::matches_pattern`](super::filters::matches_pattern).
    ///
    /// Default: empty.
    pub exclude_patterns: Vec<String>,

    /// Compression level (1-9), ignored for plain tar.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Store file mode, owner and modification time.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,

    /// Compression codec. `None` picks one from the output file name.
    ///
    /// Default: `None`.
    pub codec: Option<CompressionCodec>,

    /// Where to write the checksum manifest. `None` means the archive path
    /// with `.md5` appended.
    ///
    /// Default: `None`.
    pub manifest_path: Option<PathBuf>,
}

impl Default for CreationConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: true,
            exclude_patterns: Vec::new(),
            compression_level: Some(6),
            preserve_permissions: true,
            codec: None,
            manifest_path: None,
        }
    }
}

impl CreationConfig {
    /// Creates a new `CreationConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to follow symlinks.
    #[must_use]
    pub const fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets whether to include hidden files.
    #[must_use]
    pub const fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Sets the exclude patterns.
    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Sets the compression level.
    ///
    /// Out-of-range levels are rejected by [`CreationConfig::validate`].
    #[must_use]
    pub const fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Sets whether to preserve permissions.
    #[must_use]
    pub const fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_codec(mut self, codec: Option<CompressionCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Sets the manifest output path.
    #[must_use]
    pub fn with_manifest_path(mut self, path: Option<PathBuf>) -> Self {
        self.manifest_path = path;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VeritarError::InvalidCompressionLevel`] if the compression
    /// level is set but not in range 1-9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(VeritarError::InvalidCompressionLevel { level });
        }
        Ok(())
    }

    /// Codec used for `output`: the configured one, else the one implied by
    /// the file name, else none.
    #[must_use]
    pub fn resolve_codec(&self, output: &Path) -> Option<CompressionCodec> {
        self.codec.or_else(|| codec_for_output(output))
    }

    /// Manifest path used for `output`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use veritar_core::creation::CreationConfig;
    ///
    /// let config = CreationConfig::default();
    /// assert_eq!(
    ///     config.resolve_manifest_path(Path::new("backup.tar.gz")),
    ///     Path::new("backup.tar.gz.md5")
    /// );
    /// ```
    #[must_use]
    pub fn resolve_manifest_path(&self, output: &Path) -> PathBuf {
        self.manifest_path.clone().unwrap_or_else(|| {
            let mut name = output.as_os_str().to_owned();
            name.push(".");
            name.push(MANIFEST_EXTENSION);
            PathBuf::from(name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_config_default() {
        let config = CreationConfig::default();
        assert!(!config.follow_symlinks);
        assert!(config.include_hidden);
        assert!(config.exclude_patterns.is_empty());
        assert_eq!(config.compression_level, Some(6));
        assert!(config.preserve_permissions);
        assert_eq!(config.codec, None);
        assert_eq!(config.manifest_path, None);
    }

    #[test]
    fn test_creation_config_builder() {
        let config = CreationConfig::new()
            .with_follow_symlinks(true)
            .with_include_hidden(false)
            .with_exclude_patterns(vec!["*.log".to_string()])
            .with_compression_level(9)
            .with_preserve_permissions(false)
            .with_codec(Some(CompressionCodec::Xz))
            .with_manifest_path(Some(PathBuf::from("sums.md5")));

        assert!(config.follow_symlinks);
        assert!(!config.include_hidden);
        assert_eq!(config.exclude_patterns, vec!["*.log".to_string()]);
        assert_eq!(config.compression_level, Some(9));
        assert!(!config.preserve_permissions);
        assert_eq!(config.codec, Some(CompressionCodec::Xz));
        assert_eq!(config.manifest_path, Some(PathBuf::from("sums.md5")));
    }

    #[test]
    fn test_creation_config_validate() {
        assert!(CreationConfig::default().validate().is_ok());
        assert!(
            CreationConfig::default()
                .with_compression_level(1)
                .validate()
                .is_ok()
        );

        for level in [0, 10] {
            let config = CreationConfig::default().with_compression_level(level);
            assert!(matches!(
                config.validate(),
                Err(VeritarError::InvalidCompressionLevel { level: l }) if l == level
            ));
        }
    }

    #[test]
    fn test_resolve_codec() {
        let config = CreationConfig::default();
        assert_eq!(
            config.resolve_codec(Path::new("out.tgz")),
            Some(CompressionCodec::Gzip)
        );
        assert_eq!(config.resolve_codec(Path::new("out.tar")), None);

        let forced = config.with_codec(Some(CompressionCodec::Zstd));
        assert_eq!(
            forced.resolve_codec(Path::new("out.tar")),
            Some(CompressionCodec::Zstd)
        );
    }

    #[test]
    fn test_resolve_manifest_path() {
        let config = CreationConfig::default();
        assert_eq!(
            config.resolve_manifest_path(Path::new("/tmp/out.tar")),
            PathBuf::from("/tmp/out.tar.md5")
        );

        let custom = config.with_manifest_path(Some(PathBuf::from("/tmp/sums")));
        assert_eq!(
            custom.resolve_manifest_path(Path::new("/tmp/out.tar")),
            PathBuf::from("/tmp/sums")
        );
    }
}
