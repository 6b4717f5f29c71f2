//! # pakmap
//!
//! Extracts the embedded pak archive listing from supported game
//! executables and serializes it as a name → file-list JSON mapping.
//!
//! The supported builds carry a pointer table in their data sections: a
//! root array of per-pak slots, each leading to an array of pointers to
//! NUL-terminated file names. This library walks that structure from any
//! random-access byte source: a local file, or a remote image over HTTP
//! Range requests, which works well here because the walk only ever
//! touches the table and string regions, not the whole executable.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pakmap::{Build, HttpRangeReader, MappingExporter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let url = "https://example.com/DR1_us.exe".to_string();
//!     let build = Build::detect_from_path(&url).expect("unsupported image");
//!
//!     let reader = Arc::new(HttpRangeReader::new(url).await?);
//!     let exporter = MappingExporter::new(reader, build);
//!
//!     for entry in exporter.walk().await? {
//!         println!("{}: {} files", entry.name, entry.files.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod io;
pub mod pak;

pub use cli::Cli;
pub use io::{HttpRangeReader, LocalFileReader, ReadAt};
pub use pak::{Build, ListingWalker, MappingExporter, OffsetTable, PakEntry, PakError};
