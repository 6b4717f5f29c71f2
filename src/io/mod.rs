mod http;
mod local;

pub use http::HttpRangeReader;
pub use local::LocalFileReader;

use async_trait::async_trait;
use std::io::{Error, ErrorKind, Result};

/// Trait for random access reading from a data source
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Fill the buffer completely from the specified offset
    ///
    /// Loops over [`read_at`](Self::read_at) until the buffer is full,
    /// failing with [`ErrorKind::UnexpectedEof`] if the source runs out
    /// of data first.
    async fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self
                .read_at(offset + filled as u64, &mut buf[filled..])
                .await?;
            if n == 0 {
                return Err(Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("read past end of image at offset {}", offset + filled as u64),
                ));
            }
            filled += n;
        }
        Ok(())
    }
}
