use thiserror::Error;

/// Failures raised while walking an embedded pak listing.
///
/// Every variant aborts the walk: the listing either parses completely or
/// not at all, and no partial mapping is ever written.
#[derive(Error, Debug)]
pub enum PakError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("listing table runs past the end of the image at offset {offset:#x}")]
    TruncatedTable { offset: u64 },

    #[error("pointer {pointer:#x} rebases to offset {offset} outside the image")]
    PointerOutOfRange { pointer: i32, offset: i64 },

    #[error("file name at offset {offset:#x} has no terminator before end of image")]
    UnterminatedString { offset: u64 },
}
