//! Reader-backed byte source.
//!
//! _Requires Cargo feature `std`._

use std::io::{ErrorKind, Read};

use alloc::vec::Vec;

use crate::Error;

use super::ByteSource;

/// Size of the chunks pulled from the reader at once.
const CHUNK: usize = 512;

/// A [`ByteSource`] over a reader.
///
/// Bytes pulled from the reader are held until consumed, which keeps a read
/// that hits the end of the stream from consuming anything, and lets
/// [`ByteSource::is_exhausted`] look ahead without losing data.
///
/// Opening and closing the reader is left to the caller.
///
/// _Requires Cargo feature `std`._
#[derive(Debug)]
pub struct ReaderSource<R> {
    r: R,
    pending: Vec<u8>, // Bytes read ahead but not yet consumed.
    i: usize,         // Counter of bytes consumed.
}

impl<R: Read> ReaderSource<R> {
    pub fn new(r: R) -> Self {
        Self {
            r,
            pending: Vec::new(),
            i: 0,
        }
    }

    /// Recover the reader, discarding any bytes read ahead.
    pub fn into_inner(self) -> R {
        self.r
    }

    /// Pull chunks from the reader until `n` bytes are pending.
    ///
    /// Bytes pulled before the end of the stream stay pending on failure.
    fn fill_to(&mut self, n: usize) -> Result<(), Error> {
        while self.pending.len() < n {
            if self.fill()? == 0 {
                return Err(Error::InsufficientData {
                    needed: n,
                    available: self.pending.len(),
                });
            }
        }

        Ok(())
    }

    /// Pull one chunk from the reader into the pending buffer.
    ///
    /// Returns the number of bytes added, zero at the end of the stream.
    fn fill(&mut self) -> Result<usize, Error> {
        let mut chunk = [0; CHUNK];

        loop {
            match self.r.read(&mut chunk) {
                Ok(n) => {
                    self.pending.extend_from_slice(&chunk[..n]);
                    return Ok(n);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.fill_to(buf.len())?;

        buf.copy_from_slice(&self.pending[..buf.len()]);
        self.pending.drain(..buf.len());
        self.i += buf.len();

        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<Vec<u8>, Error> {
        self.fill_to(n)?;

        let rest = self.pending.split_off(n);
        self.i += n;

        Ok(core::mem::replace(&mut self.pending, rest))
    }

    fn position(&self) -> usize {
        self.i
    }

    fn is_exhausted(&mut self) -> Result<bool, Error> {
        Ok(self.pending.is_empty() && self.fill()? == 0)
    }
}
