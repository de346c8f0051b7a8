//! Sequential tar stream reading.
//!
//! [`ArchiveReader`] walks a (possibly compressed) tar stream one block at
//! a time. Unlike [`tar::Archive::entries`], it does not stop at the first
//! bad header: damaged blocks are reported as [`DamagedRegion`] events and
//! scanning resumes at the next valid header.

mod header;
mod reader;

use std::fmt;

pub use header::BLOCK_SIZE;
pub use header::MAX_METADATA_LEN;
pub use reader::ArchiveReader;
pub use reader::MemberContent;

use crate::types::MemberKind;

/// A member header read from the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member path as stored in the archive, decoded lossily as UTF-8.
    /// Directory paths carry no trailing `/`.
    pub path: String,
    /// Member kind.
    pub kind: MemberKind,
    /// Size of the data following the header. Zero for kinds without data.
    pub size: u64,
    /// Offset of the member header in the decoded stream.
    pub offset: u64,
}

/// Why a region of the archive could not be read as members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DamageCause {
    /// Header blocks failed checksum validation or held unparsable fields.
    InvalidHeader,
    /// The stream ended in the middle of a block or of member data.
    Truncated,
    /// A GNU long name or PAX header exceeded [`MAX_METADATA_LEN`].
    OversizedMetadata,
    /// The underlying stream failed.
    Io(String),
}

impl fmt::Display for DamageCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHeader => f.write_str("invalid header"),
            Self::Truncated => f.write_str("unexpected end of archive"),
            Self::OversizedMetadata => f.write_str("oversized extended header"),
            Self::Io(message) => write!(f, "read error: {message}"),
        }
    }
}

/// A contiguous span of the decoded stream that yielded no member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamagedRegion {
    /// Offset of the first damaged byte.
    pub offset: u64,
    /// Length of the region in bytes.
    pub length: u64,
    /// What went wrong.
    pub cause: DamageCause,
}

impl fmt::Display for DamagedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes at offset {} ({})",
            self.length, self.offset, self.cause
        )
    }
}

/// One step of archive iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveEvent {
    /// A member header was read; its content is available through
    /// [`ArchiveReader::content`] until the next event is requested.
    Member(Member),
    /// A region of the stream could not be read.
    Damaged(DamagedRegion),
}
