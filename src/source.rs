//! Message sources consumed by digest computations
//!
//! A [`MessageSource`] is a single-pass pull reader. Digests read it in
//! fixed-size blocks until it reports end of input; callers that need to
//! restart a computation create a new source.

use crate::error::Result;
use std::io::Read;

/// A pull-style byte reader over a message
pub trait MessageSource {
    /// Read up to `buf.len()` bytes into `buf`, returning the number of
    /// bytes read. Returns 0 at end of input.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Total message length in bytes, when known up front
    fn len(&self) -> Option<u64>;

    /// Whether the source is known to be empty
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Read until `buf` is full or the source is exhausted, returning the
    /// number of bytes actually placed in `buf`
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }
}

/// Message source over a borrowed byte slice
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> SliceSource<'a> {
    /// Create a source reading from `bytes`
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }
}

impl MessageSource for SliceSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let remaining = &self.bytes[self.cursor..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.cursor += n;
        Ok(n)
    }

    fn len(&self) -> Option<u64> {
        Some(self.bytes.len() as u64)
    }
}

impl<'a> From<&'a [u8]> for SliceSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

/// Message source over an owned byte stream
pub struct ReaderSource<R: Read> {
    reader: R,
    length: Option<u64>,
}

impl<R: Read> ReaderSource<R> {
    /// Create a source over a stream of unknown length
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            length: None,
        }
    }

    /// Create a source over a stream whose length is known up front
    pub fn with_length(reader: R, length: u64) -> Self {
        Self {
            reader,
            length: Some(length),
        }
    }
}

impl<R: Read> MessageSource for ReaderSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.reader.read(buf)?)
    }

    fn len(&self) -> Option<u64> {
        self.length
    }
}
