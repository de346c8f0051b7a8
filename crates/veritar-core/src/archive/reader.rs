//! Resynchronizing tar stream reader.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::{self};
use std::path::Path;

use super::ArchiveEvent;
use super::DamageCause;
use super::DamagedRegion;
use super::Member;
use super::header::BLOCK_SIZE;
use super::header::Block;
use super::header::MAX_METADATA_LEN;
use super::header::PendingExtensions;
use super::header::has_valid_checksum;
use super::header::is_zero_block;
use super::header::padding_for;
use crate::error::Result;
use crate::error::VeritarError;
use crate::formats::CompressionCodec;
use crate::types::MemberKind;

/// Outcome of reading one block from the stream.
enum BlockRead {
    Full,
    Partial(usize),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active,
    /// A content read failed; the stream position is unknown.
    Poisoned,
    Finished,
}

/// Sequential reader over the members of a tar stream.
///
/// The reader owns the underlying stream and closes it when dropped.
///
/// # Examples
///
/// ```no_run
/// use std::io::Read;
/// use veritar_core::archive::ArchiveEvent;
/// use veritar_core::archive::ArchiveReader;
///
/// # fn main() -> veritar_core::Result<()> {
/// let mut reader = ArchiveReader::open("backup.tar.gz")?;
/// while let Some(event) = reader.next_event() {
///     match event {
///         ArchiveEvent::Member(member) => {
///             let mut data = Vec::new();
///             reader.content().read_to_end(&mut data)?;
///             println!("{} ({} bytes)", member.path, data.len());
///         }
///         ArchiveEvent::Damaged(region) => eprintln!("damaged: {region}"),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct ArchiveReader {
    inner: Box<dyn Read>,
    codec: Option<CompressionCodec>,
    /// Bytes consumed from the decoded stream.
    offset: u64,
    block: Box<Block>,
    /// Offset of a header already held in `block` and not yet processed.
    pending: Option<u64>,
    extensions: PendingExtensions,
    /// Unread data of the current member.
    remaining: u64,
    /// Padding after the current member's data.
    padding: u64,
    state: State,
}

impl ArchiveReader {
    /// Opens an archive file.
    ///
    /// # Errors
    ///
    /// Returns [`VeritarError::Io`] if the file cannot be opened and
    /// [`VeritarError::ArchiveOpen`] if its content is not a tar stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Creates a reader over an arbitrary byte stream.
    ///
    /// Compression is recognized from the first bytes of the stream. The
    /// first block is read immediately.
    ///
    /// # Errors
    ///
    /// Returns [`VeritarError::ArchiveOpen`] if the stream is empty, cannot
    /// be decoded, is shorter than one block, or starts with a block that is
    /// neither a valid header nor a zero block.
    pub fn from_reader<R: Read + 'static>(reader: R) -> Result<Self> {
        let mut buffered = BufReader::new(reader);
        let head = buffered
            .fill_buf()
            .map_err(|e| VeritarError::ArchiveOpen(format!("cannot read stream: {e}")))?;
        if head.is_empty() {
            return Err(VeritarError::ArchiveOpen("archive is empty".into()));
        }

        let codec = CompressionCodec::from_magic(head);
        let inner: Box<dyn Read> = match codec {
            Some(codec) => codec.decoder(buffered).map_err(|e| {
                VeritarError::ArchiveOpen(format!("cannot decode {} stream: {e}", codec.name()))
            })?,
            None => Box::new(buffered),
        };

        let mut archive = Self {
            inner,
            codec,
            offset: 0,
            block: Box::new([0u8; BLOCK_SIZE]),
            pending: None,
            extensions: PendingExtensions::default(),
            remaining: 0,
            padding: 0,
            state: State::Active,
        };

        let stream = codec.map_or("tar", CompressionCodec::name);
        match archive.read_block() {
            Ok(BlockRead::Full) => {}
            Ok(BlockRead::Eof) => {
                return Err(VeritarError::ArchiveOpen(format!("{stream} stream is empty")));
            }
            Ok(BlockRead::Partial(n)) => {
                return Err(VeritarError::ArchiveOpen(format!(
                    "stream too short for a tar header ({n} bytes)"
                )));
            }
            Err(e) => {
                return Err(VeritarError::ArchiveOpen(format!(
                    "cannot decode {stream} stream: {e}"
                )));
            }
        }

        if !is_zero_block(&archive.block[..]) && !has_valid_checksum(&archive.block) {
            return Err(VeritarError::ArchiveOpen(
                "first block is not a tar header".into(),
            ));
        }
        archive.pending = Some(0);

        tracing::debug!(codec = stream, "opened archive stream");
        Ok(archive)
    }

    /// Compression codec recognized on open, `None` for a plain tar.
    #[must_use]
    pub const fn codec(&self) -> Option<CompressionCodec> {
        self.codec
    }

    /// Number of decoded bytes consumed so far.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Advances to the next member or damaged region.
    ///
    /// Content of the previous member that was not read is skipped. Returns
    /// `None` at the end of the stream, after a fatal stream error has been
    /// reported, or after a content read failed.
    pub fn next_event(&mut self) -> Option<ArchiveEvent> {
        if self.state != State::Active {
            return None;
        }

        let start = self.offset;
        if let Err(cause) = self.skip_current() {
            return Some(self.finish_damaged(start, cause));
        }

        let mut damage_start: Option<u64> = None;
        loop {
            let offset = match self.pending.take() {
                Some(offset) => offset,
                None => {
                    let offset = self.offset;
                    match self.read_block() {
                        Ok(BlockRead::Full) => offset,
                        Ok(BlockRead::Eof) => {
                            self.state = State::Finished;
                            return damage_start.map(|start| {
                                self.damaged(start, offset, DamageCause::InvalidHeader)
                            });
                        }
                        Ok(BlockRead::Partial(n)) => {
                            if damage_start.is_none() && is_zero_block(&self.block[..n]) {
                                self.state = State::Finished;
                                return None;
                            }
                            let start = damage_start.unwrap_or(offset);
                            return Some(self.finish_damaged(start, DamageCause::Truncated));
                        }
                        Err(e) => {
                            let start = damage_start.unwrap_or(offset);
                            return Some(
                                self.finish_damaged(start, DamageCause::Io(e.to_string())),
                            );
                        }
                    }
                }
            };

            if is_zero_block(&self.block[..]) {
                self.extensions = PendingExtensions::default();
                if let Some(start) = damage_start {
                    return Some(self.damaged(start, offset, DamageCause::InvalidHeader));
                }
                continue;
            }

            if !has_valid_checksum(&self.block) {
                // Long names and PAX records only apply to the header that
                // directly follows them.
                self.extensions = PendingExtensions::default();
                damage_start.get_or_insert(offset);
                continue;
            }

            if let Some(start) = damage_start {
                self.pending = Some(offset);
                return Some(self.damaged(start, offset, DamageCause::InvalidHeader));
            }

            match self.process_header(offset) {
                Ok(Some(member)) => {
                    tracing::trace!(path = %member.path, kind = %member.kind, size = member.size, "member");
                    return Some(ArchiveEvent::Member(member));
                }
                Ok(None) => {}
                Err(event) => return Some(event),
            }
        }
    }

    /// Returns a reader over the current member's data.
    ///
    /// The reader yields at most the member's declared size. It is empty
    /// before the first member, for kinds without data, and once the data
    /// has been consumed.
    pub fn content(&mut self) -> MemberContent<'_> {
        MemberContent { archive: self }
    }

    /// Turns the header in `block` into a member, or consumes a metadata
    /// header and returns `Ok(None)`.
    fn process_header(&mut self, offset: u64) -> std::result::Result<Option<Member>, ArchiveEvent> {
        let header = tar::Header::from_byte_slice(&self.block[..]);
        let entry_type = header.entry_type();
        let header_path = header.path_bytes().into_owned();
        let Ok(declared) = header.entry_size() else {
            self.extensions = PendingExtensions::default();
            let end = self.offset;
            return Err(self.damaged(offset, end, DamageCause::InvalidHeader));
        };

        let is_metadata = entry_type.is_gnu_longname()
            || entry_type.is_gnu_longlink()
            || entry_type.is_pax_local_extensions()
            || entry_type.is_pax_global_extensions();
        if is_metadata {
            if declared > MAX_METADATA_LEN {
                self.remaining = declared;
                self.padding = padding_for(declared);
                let end = self.offset + declared + self.padding;
                return Err(self.damaged(offset, end, DamageCause::OversizedMetadata));
            }

            let payload = self.read_metadata(declared)?;
            if entry_type.is_gnu_longname() {
                self.extensions.set_long_name(&payload);
            } else if entry_type.is_pax_local_extensions() {
                self.extensions.apply_pax(&payload);
            }
            return Ok(None);
        }

        let raw_path = self.extensions.take_path().unwrap_or(header_path);
        let size = self.extensions.pax_size.take().unwrap_or(declared);
        let mut path = String::from_utf8_lossy(&raw_path).into_owned();

        let mut kind = MemberKind::from_tar(entry_type);
        if kind.is_regular() && path.ends_with('/') {
            kind = MemberKind::Directory;
        }
        if kind.is_directory() {
            let trimmed = path.trim_end_matches('/').len();
            if trimmed > 0 {
                path.truncate(trimmed);
            }
        }

        let data_len = match kind {
            MemberKind::Regular | MemberKind::Other => size,
            _ => 0,
        };
        self.remaining = data_len;
        self.padding = padding_for(data_len);

        Ok(Some(Member {
            path,
            kind,
            size: data_len,
            offset,
        }))
    }

    /// Reads a metadata payload and its padding.
    fn read_metadata(&mut self, len: u64) -> std::result::Result<Vec<u8>, ArchiveEvent> {
        let start = self.offset;
        let mut payload = Vec::new();
        let read = (&mut self.inner)
            .take(len)
            .read_to_end(&mut payload)
            .map_err(|e| DamageCause::Io(e.to_string()));
        self.offset += payload.len() as u64;

        let result = match read {
            Ok(n) if n as u64 == len => self.discard(padding_for(len)),
            Ok(_) => Err(DamageCause::Truncated),
            Err(cause) => Err(cause),
        };
        match result {
            Ok(()) => Ok(payload),
            Err(cause) => Err(self.finish_damaged(start, cause)),
        }
    }

    /// Skips the unread data and padding of the current member.
    fn skip_current(&mut self) -> std::result::Result<(), DamageCause> {
        let len = self.remaining + self.padding;
        self.remaining = 0;
        self.padding = 0;
        self.discard(len)
    }

    fn discard(&mut self, len: u64) -> std::result::Result<(), DamageCause> {
        if len == 0 {
            return Ok(());
        }
        let skipped = io::copy(&mut (&mut self.inner).take(len), &mut io::sink())
            .map_err(|e| DamageCause::Io(e.to_string()))?;
        self.offset += skipped;
        if skipped < len {
            return Err(DamageCause::Truncated);
        }
        Ok(())
    }

    /// Fills `block`, retrying interrupted reads.
    fn read_block(&mut self) -> io::Result<BlockRead> {
        let mut filled = 0;
        while filled < BLOCK_SIZE {
            match self.inner.read(&mut self.block[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.offset += filled as u64;
                    return Err(e);
                }
            }
        }
        self.offset += filled as u64;

        Ok(match filled {
            0 => BlockRead::Eof,
            BLOCK_SIZE => BlockRead::Full,
            n => BlockRead::Partial(n),
        })
    }

    fn damaged(&self, start: u64, end: u64, cause: DamageCause) -> ArchiveEvent {
        let region = DamagedRegion {
            offset: start,
            length: end.saturating_sub(start),
            cause,
        };
        tracing::debug!(%region, "damaged region");
        ArchiveEvent::Damaged(region)
    }

    /// Reports a region ending at the current offset and stops iteration.
    fn finish_damaged(&mut self, start: u64, cause: DamageCause) -> ArchiveEvent {
        self.state = State::Finished;
        self.extensions = PendingExtensions::default();
        self.damaged(start, self.offset, cause)
    }
}

impl std::fmt::Debug for ArchiveReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("codec", &self.codec)
            .field("offset", &self.offset)
            .field("remaining", &self.remaining)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Bounded reader over one member's data.
///
/// Returned by [`ArchiveReader::content`]. A failed read poisons the
/// archive reader: no further events are produced.
pub struct MemberContent<'a> {
    archive: &'a mut ArchiveReader,
}

impl Read for MemberContent<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let archive = &mut *self.archive;
        match archive.state {
            State::Active => {}
            State::Poisoned => {
                return Err(io::Error::other("archive stream failed earlier"));
            }
            State::Finished => return Ok(0),
        }
        if archive.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let max = usize::try_from(archive.remaining).map_or(buf.len(), |r| r.min(buf.len()));
        match archive.inner.read(&mut buf[..max]) {
            Ok(0) => {
                archive.state = State::Poisoned;
                Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "archive ended inside member data",
                ))
            }
            Ok(n) => {
                archive.remaining -= n as u64;
                archive.offset += n as u64;
                Ok(n)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(e),
            Err(e) => {
                archive.state = State::Poisoned;
                Err(e)
            }
        }
    }
}
