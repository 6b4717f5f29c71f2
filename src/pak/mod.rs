//! Embedded pak-listing extraction.
//!
//! This module recovers the archive-listing table a supported game
//! executable carries in its data sections and turns it into a
//! name → file-list mapping.
//!
//! ## Architecture
//!
//! The module is organized into four components:
//!
//! - [`builds`]: the closed registry of supported executables, each with its
//!   table geometry ([`OffsetTable`]) and end-of-table sentinel
//! - [`walker`]: the low-level table walk over raw bytes
//! - [`exporter`]: projection into a key-ordered mapping and JSON output
//! - [`error`]: the walk's failure taxonomy
//!
//! ## Listing format overview
//!
//! The executable's data section holds a root array of 4-byte pointer
//! slots, one per pak. Each pointer (after rebasing by a per-build delta)
//! leads to that pak's own array of pointers into the read-only data
//! section, where the file names live as NUL-terminated strings. A fixed
//! 4-byte sentinel ends both array levels; the root array additionally ends
//! at a pre-known terminal offset.
//!
//! ## Limitations
//!
//! - Only pre-configured builds are supported; there is no generic PE
//!   parsing and no heuristic table discovery
//! - File names are treated as single-byte text, never Unicode-decoded

mod builds;
mod error;
mod exporter;
mod walker;

pub use builds::{Build, OffsetTable};
pub use error::PakError;
pub use exporter::MappingExporter;
pub use walker::{ListingWalker, PakEntry};
