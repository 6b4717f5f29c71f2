//! Low-level listing walker.
//!
//! This module walks the archive-listing table embedded in a supported
//! executable image, reading from any source that implements the
//! [`ReadAt`] trait.
//!
//! ## Table layout
//!
//! The listing is a two-level indirection structure:
//! 1. A root array of 4-byte slots at a fixed file offset, one per pak.
//!    Each slot is all-zero (unused), the build's sentinel (end of table),
//!    or a pointer to that pak's string-pointer array.
//! 2. Per pak, a string-pointer array of 4-byte slots, each pointing to a
//!    NUL-terminated file name, terminated by the same sentinel.
//!
//! Pointers are little-endian 32-bit virtual addresses; subtracting the
//! per-build section delta turns one into a file offset. The walk is
//! inherently serial: no pointer target is known before the slot holding
//! it has been read.

use byteorder::{ByteOrder, LittleEndian};
use std::sync::Arc;

use crate::io::ReadAt;

use super::builds::OffsetTable;
use super::error::PakError;

/// Width of every table slot, at both indirection levels.
const SLOT_SIZE: u64 = 4;

/// An all-zero root slot: unused, but it still consumes a name index.
const ZERO_SLOT: [u8; 4] = [0, 0, 0, 0];

/// Chunk size for scanning NUL-terminated names. Large enough that almost
/// every name lands in one read, which matters for the HTTP source.
const NAME_CHUNK: usize = 256;

/// Prefix of every generated pak name.
const NAME_PREFIX: &str = "bg_";

/// One pak recovered from the listing: its generated name and the file
/// names it references, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PakEntry {
    /// Generated name, `bg_` plus the zero-padded root slot index
    pub name: String,
    /// File names referenced by this pak, in string-array order
    pub files: Vec<String>,
}

/// Walks the embedded listing table of one executable image.
///
/// The walker owns no state beyond the reader, the table geometry and the
/// sentinel; [`walk()`](Self::walk) can be called repeatedly and always
/// starts from the root offset.
///
/// ## Example
///
/// ```ignore
/// let walker = ListingWalker::new(reader, build.offsets(), build.sentinel());
/// for entry in walker.walk().await? {
///     println!("{}: {} files", entry.name, entry.files.len());
/// }
/// ```
pub struct ListingWalker<R: ReadAt> {
    /// The underlying image
    reader: Arc<R>,
    /// Total size of the image in bytes, used to bound every read
    size: u64,
    table: OffsetTable,
    sentinel: [u8; 4],
}

impl<R: ReadAt> ListingWalker<R> {
    /// Create a new walker over the given image.
    ///
    /// # Arguments
    ///
    /// * `reader` - A shared reference to a reader implementing [`ReadAt`]
    /// * `table` - The per-build table geometry
    /// * `sentinel` - The per-build 4-byte end-of-table marker
    pub fn new(reader: Arc<R>, table: OffsetTable, sentinel: [u8; 4]) -> Self {
        let size = reader.size();
        Self {
            reader,
            size,
            table,
            sentinel,
        }
    }

    /// Walk the root array and produce every pak entry, in slot order.
    ///
    /// The walk ends normally in one of two ways: the cursor reaches the
    /// configured terminal offset, or a root slot holds the sentinel
    /// before that. Both are expected end conditions and yield whatever
    /// was collected up to that point.
    ///
    /// Unused (all-zero) root slots produce no entry but still advance the
    /// name index, so generated names are stable for a given build no
    /// matter which slots are populated.
    ///
    /// # Errors
    ///
    /// Any structural failure aborts the whole walk with no partial
    /// result: a slot or name read crossing the end of the image, a
    /// rebased pointer landing outside it, or an underlying I/O error.
    pub async fn walk(&self) -> Result<Vec<PakEntry>, PakError> {
        let mut entries = Vec::new();

        let mut cursor = self.table.root_offset;
        let mut index = 0u32;

        loop {
            // Pre-known end of the root array for this build
            if cursor == self.table.terminal_offset {
                break;
            }

            let slot = self.read_slot(cursor).await?;

            // End of listing before the terminal offset
            if slot == self.sentinel {
                break;
            }
            if slot == ZERO_SLOT {
                cursor += SLOT_SIZE;
                index += 1;
                continue;
            }

            let entry_offset = self.rebase(slot, self.table.data_delta)?;
            let files = self.read_file_list(entry_offset).await?;

            entries.push(PakEntry {
                name: format!("{NAME_PREFIX}{index:03}"),
                files,
            });

            cursor += SLOT_SIZE;
            index += 1;
        }

        Ok(entries)
    }

    /// Read one 4-byte table slot, bounds-checked against the image size.
    ///
    /// A slot that would cross the end of the image means the table never
    /// reached its sentinel: the listing is truncated or the offsets are
    /// for a different build. Either way the walk must fail rather than
    /// silently stop.
    async fn read_slot(&self, offset: u64) -> Result<[u8; 4], PakError> {
        if offset + SLOT_SIZE > self.size {
            return Err(PakError::TruncatedTable { offset });
        }

        let mut buf = [0u8; SLOT_SIZE as usize];
        self.reader.read_exact_at(offset, &mut buf).await?;
        Ok(buf)
    }

    /// Rebase a raw pointer slot into a file offset.
    ///
    /// The slot holds a little-endian 32-bit signed virtual address;
    /// subtracting the section delta yields the on-disk offset. An offset
    /// outside `[0, size)` can never be read and is rejected here, before
    /// any seek happens.
    fn rebase(&self, slot: [u8; 4], delta: i64) -> Result<u64, PakError> {
        let pointer = LittleEndian::read_i32(&slot);
        let offset = i64::from(pointer) - delta;

        if offset < 0 || offset as u64 >= self.size {
            return Err(PakError::PointerOutOfRange { pointer, offset });
        }

        Ok(offset as u64)
    }

    /// Read one pak's string-pointer array.
    ///
    /// Slots are consumed at `entry_offset`, `entry_offset + 4`, ... until
    /// the sentinel. Each non-sentinel slot is rebased through the rdata
    /// delta and the NUL-terminated name at the target is collected.
    async fn read_file_list(&self, entry_offset: u64) -> Result<Vec<String>, PakError> {
        let mut files = Vec::new();
        let mut slot_offset = entry_offset;

        loop {
            let slot = self.read_slot(slot_offset).await?;

            if slot == self.sentinel {
                break;
            }

            let name_offset = self.rebase(slot, self.table.rdata_delta)?;
            files.push(self.read_name(name_offset).await?);

            slot_offset += SLOT_SIZE;
        }

        Ok(files)
    }

    /// Read a NUL-terminated file name starting at `offset`.
    ///
    /// Scans forward in chunks until the first zero byte (exclusive). The
    /// only length bound is the image itself; a name that reaches the end
    /// of the image without a terminator fails the walk.
    ///
    /// Names are single-byte text: every byte maps to the char with the
    /// same value, no multi-byte decoding.
    async fn read_name(&self, offset: u64) -> Result<String, PakError> {
        let mut bytes = Vec::new();
        let mut pos = offset;
        let mut chunk = [0u8; NAME_CHUNK];

        loop {
            if pos >= self.size {
                return Err(PakError::UnterminatedString { offset });
            }

            let want = (self.size - pos).min(NAME_CHUNK as u64) as usize;
            let n = self.reader.read_at(pos, &mut chunk[..want]).await?;
            if n == 0 {
                return Err(PakError::UnterminatedString { offset });
            }

            if let Some(end) = chunk[..n].iter().position(|&b| b == 0) {
                bytes.extend_from_slice(&chunk[..end]);
                break;
            }

            bytes.extend_from_slice(&chunk[..n]);
            pos += n as u64;
        }

        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }
}
