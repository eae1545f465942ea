//! Sequential, position-tracked access to raw bytes.
//!
//! Every descriptor pulls its bytes through the [`ByteSource`] trait, so a
//! schema decodes identically from a slice held in memory ([`SliceSource`])
//! or from a stream ([`ReaderSource`]). Where the choice between the two is
//! made at runtime, an [`Either`] of two sources is a source in its own right.

use alloc::{vec, vec::Vec};

use either::{Either, for_both};

use crate::Error;

#[cfg(feature = "std")]
mod reader;
mod slice;

#[cfg(feature = "std")]
pub use reader::ReaderSource;
pub use slice::SliceSource;

/// A sequential source of bytes.
///
/// Implementations must never move backwards, and a failed read must leave
/// the position where it was.
pub trait ByteSource {
    /// Fill `buf` with the next `buf.len()` bytes, advancing the position.
    ///
    /// Fails with [`Error::InsufficientData`] without consuming anything if
    /// fewer bytes remain.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error>;

    /// The number of bytes consumed since the source was created.
    fn position(&self) -> usize;

    /// Whether no further bytes are available.
    ///
    /// Stream-backed sources may need to look ahead to answer, which never
    /// consumes bytes.
    fn is_exhausted(&mut self) -> Result<bool, Error>;

    /// Take the next `n` bytes into a new buffer.
    fn take(&mut self, n: usize) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0; n];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        (**self).read_exact(buf)
    }

    fn position(&self) -> usize {
        (**self).position()
    }

    fn is_exhausted(&mut self) -> Result<bool, Error> {
        (**self).is_exhausted()
    }

    fn take(&mut self, n: usize) -> Result<Vec<u8>, Error> {
        (**self).take(n)
    }
}

impl<L: ByteSource, R: ByteSource> ByteSource for Either<L, R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        for_both!(self, s => s.read_exact(buf))
    }

    fn position(&self) -> usize {
        for_both!(self, s => s.position())
    }

    fn is_exhausted(&mut self) -> Result<bool, Error> {
        for_both!(self, s => s.is_exhausted())
    }

    fn take(&mut self, n: usize) -> Result<Vec<u8>, Error> {
        for_both!(self, s => s.take(n))
    }
}
