//! Block-level tar header parsing.
//!
//! Header fields are decoded with [`tar::Header`]; this module adds what the
//! `tar` crate does not expose for a resynchronizing reader: checksum
//! validation of a raw block, zero-block detection and PAX record parsing.

use std::ops::Range;

/// Size of a tar block.
pub const BLOCK_SIZE: usize = 512;

/// Largest GNU long name or PAX payload accepted before the header is
/// treated as damaged.
pub const MAX_METADATA_LEN: u64 = 1024 * 1024;

/// Position of the checksum field inside a header block.
const CHECKSUM_FIELD: Range<usize> = 148..156;

/// One raw tar block.
pub type Block = [u8; BLOCK_SIZE];

/// Returns `true` if every byte of `bytes` is zero.
#[must_use]
pub fn is_zero_block(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == 0)
}

/// Validates the header checksum of a block.
///
/// The stored value is compared against both the unsigned and the signed
/// byte sum (historic implementations disagree), with the checksum field
/// itself counted as eight spaces.
#[must_use]
pub fn has_valid_checksum(block: &Block) -> bool {
    let Ok(stored) = tar::Header::from_byte_slice(block).cksum() else {
        return false;
    };

    let mut unsigned: u32 = 0;
    let mut signed: i32 = 0;
    for (index, &byte) in block.iter().enumerate() {
        let byte = if CHECKSUM_FIELD.contains(&index) {
            b' '
        } else {
            byte
        };
        unsigned += u32::from(byte);
        signed += i32::from(i8::from_ne_bytes([byte]));
    }

    stored == unsigned || i64::from(stored) == i64::from(signed)
}

/// Number of padding bytes following `size` bytes of member data.
#[must_use]
pub const fn padding_for(size: u64) -> u64 {
    let block = BLOCK_SIZE as u64;
    (block - size % block) % block
}

/// Header fields carried over from GNU and PAX metadata headers to the next
/// member.
#[derive(Debug, Default)]
pub struct PendingExtensions {
    /// Name from a GNU `L` header.
    pub long_name: Option<Vec<u8>>,
    /// `path` record from a PAX `x` header.
    pub pax_path: Option<Vec<u8>>,
    /// `size` record from a PAX `x` header.
    pub pax_size: Option<u64>,
}

impl PendingExtensions {
    /// Stores a GNU long name payload, which ends at its first NUL.
    pub fn set_long_name(&mut self, payload: &[u8]) {
        let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
        self.long_name = Some(payload[..end].to_vec());
    }

    /// Applies the records of a PAX extended header.
    ///
    /// Records are `"<len> <key>=<value>\n"`. Parsing stops at the first
    /// malformed record; records already read are kept.
    pub fn apply_pax(&mut self, payload: &[u8]) {
        for (key, value) in pax_records(payload) {
            match key {
                b"path" => self.pax_path = Some(value.to_vec()),
                b"size" => {
                    self.pax_size = std::str::from_utf8(value)
                        .ok()
                        .and_then(|s| s.parse().ok());
                }
                _ => {}
            }
        }
    }

    /// Path override for the next member, PAX first.
    #[must_use]
    pub fn take_path(&mut self) -> Option<Vec<u8>> {
        let pax = self.pax_path.take();
        let long = self.long_name.take();
        pax.or(long)
    }
}

/// Iterates `(key, value)` pairs of a PAX payload.
fn pax_records(mut payload: &[u8]) -> impl Iterator<Item = (&[u8], &[u8])> {
    std::iter::from_fn(move || {
        let space = payload.iter().position(|&b| b == b' ')?;
        let len: usize = std::str::from_utf8(&payload[..space]).ok()?.parse().ok()?;
        if len <= space + 1 || len > payload.len() {
            return None;
        }

        let record = &payload[space + 1..len];
        payload = &payload[len..];

        let record = record.strip_suffix(b"\n").unwrap_or(record);
        let eq = record.iter().position(|&b| b == b'=')?;
        Some((&record[..eq], &record[eq + 1..]))
    })
}
