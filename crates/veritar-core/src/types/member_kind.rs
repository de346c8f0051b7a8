//! Archive member kind enumeration.

use std::fmt;

/// Kind of a tar archive member.
///
/// Only [`MemberKind::Regular`] members carry content that is checksummed;
/// every other kind is reported as skipped.
///
/// # Examples
///
/// ```
/// use veritar_core::types::MemberKind;
///
/// let kind = MemberKind::from_tar(tar::EntryType::Symlink);
/// assert_eq!(kind, MemberKind::Symlink);
/// assert_eq!(kind.label(), "symbolic link");
/// assert!(!kind.is_regular());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum MemberKind {
    /// Regular file (including contiguous files).
    Regular = 0,
    /// Directory.
    Directory = 1,
    /// Symbolic link.
    Symlink = 2,
    /// Hard link to an earlier member.
    Hardlink = 3,
    /// Character device node.
    CharDevice = 4,
    /// Block device node.
    BlockDevice = 5,
    /// Named pipe.
    Fifo = 6,
    /// Any other type flag, GNU sparse files included.
    Other = 7,
}

/// Human-readable labels indexed by discriminant.
const LABELS: [&str; 8] = [
    "regular file",
    "directory",
    "symbolic link",
    "hard link",
    "character device",
    "block device",
    "fifo",
    "unknown type",
];

impl MemberKind {
    /// Every kind, in discriminant order.
    pub const ALL: [Self; 8] = [
        Self::Regular,
        Self::Directory,
        Self::Symlink,
        Self::Hardlink,
        Self::CharDevice,
        Self::BlockDevice,
        Self::Fifo,
        Self::Other,
    ];

    /// Maps a tar header type flag to a member kind.
    #[must_use]
    pub const fn from_tar(entry_type: tar::EntryType) -> Self {
        match entry_type {
            tar::EntryType::Regular | tar::EntryType::Continuous => Self::Regular,
            tar::EntryType::Directory => Self::Directory,
            tar::EntryType::Symlink => Self::Symlink,
            tar::EntryType::Link => Self::Hardlink,
            tar::EntryType::Char => Self::CharDevice,
            tar::EntryType::Block => Self::BlockDevice,
            tar::EntryType::Fifo => Self::Fifo,
            _ => Self::Other,
        }
    }

    /// Returns the tar type flag written for this kind.
    #[must_use]
    pub const fn to_tar(self) -> tar::EntryType {
        match self {
            Self::Regular | Self::Other => tar::EntryType::Regular,
            Self::Directory => tar::EntryType::Directory,
            Self::Symlink => tar::EntryType::Symlink,
            Self::Hardlink => tar::EntryType::Link,
            Self::CharDevice => tar::EntryType::Char,
            Self::BlockDevice => tar::EntryType::Block,
            Self::Fifo => tar::EntryType::Fifo,
        }
    }

    /// Returns the human-readable label for this kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        LABELS[self as usize]
    }

    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_regular(self) -> bool {
        matches!(self, Self::Regular)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_types() {
        assert_eq!(MemberKind::from_tar(tar::EntryType::Regular), MemberKind::Regular);
        assert_eq!(MemberKind::from_tar(tar::EntryType::Continuous), MemberKind::Regular);
        assert_eq!(MemberKind::from_tar(tar::EntryType::new(0)), MemberKind::Regular);
    }

    #[test]
    fn test_special_types() {
        assert_eq!(MemberKind::from_tar(tar::EntryType::Directory), MemberKind::Directory);
        assert_eq!(MemberKind::from_tar(tar::EntryType::Link), MemberKind::Hardlink);
        assert_eq!(MemberKind::from_tar(tar::EntryType::Char), MemberKind::CharDevice);
        assert_eq!(MemberKind::from_tar(tar::EntryType::Block), MemberKind::BlockDevice);
        assert_eq!(MemberKind::from_tar(tar::EntryType::Fifo), MemberKind::Fifo);
    }

    #[test]
    fn test_unknown_and_sparse_are_other() {
        assert_eq!(MemberKind::from_tar(tar::EntryType::GNUSparse), MemberKind::Other);
        assert_eq!(MemberKind::from_tar(tar::EntryType::new(b'Z')), MemberKind::Other);
    }

    #[test]
    fn test_labels_cover_every_kind() {
        for kind in MemberKind::ALL {
            assert!(!kind.label().is_empty());
            assert_eq!(kind.to_string(), kind.label());
        }
        assert_eq!(MemberKind::Fifo.label(), "fifo");
        assert_eq!(MemberKind::Other.label(), "unknown type");
    }

    #[test]
    fn test_to_tar_round_trips_known_kinds() {
        for kind in MemberKind::ALL {
            if kind != MemberKind::Other {
                assert_eq!(MemberKind::from_tar(kind.to_tar()), kind);
            }
        }
    }

    #[test]
    fn test_predicates() {
        assert!(MemberKind::Regular.is_regular());
        assert!(!MemberKind::Regular.is_directory());
        assert!(MemberKind::Directory.is_directory());
        assert!(!MemberKind::Symlink.is_regular());
    }
}
