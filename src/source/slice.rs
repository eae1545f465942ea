//! Slice-backed byte source.

use alloc::vec::Vec;

use crate::Error;

use super::ByteSource;

/// A [`ByteSource`] over a slice held in memory.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    i: usize, // Offset of the next unread byte.
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, i: 0 }
    }

    /// The bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.i..]
    }

    /// Take a number of bytes from the tip, advancing the offset.
    fn advance(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let s = self.i;

        let Some(bytes) = s.checked_add(n).and_then(|end| self.data.get(s..end)) else {
            return Err(Error::InsufficientData {
                needed: n,
                available: self.data.len() - s,
            });
        };

        self.i += n;
        Ok(bytes)
    }
}

impl<'a> From<&'a [u8]> for SliceSource<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for SliceSource<'a> {
    fn from(data: &'a [u8; N]) -> Self {
        Self::new(data)
    }
}

impl ByteSource for SliceSource<'_> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        buf.copy_from_slice(self.advance(buf.len())?);
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<Vec<u8>, Error> {
        self.advance(n).map(<[u8]>::to_vec)
    }

    fn position(&self) -> usize {
        self.i
    }

    fn is_exhausted(&mut self) -> Result<bool, Error> {
        Ok(self.i >= self.data.len())
    }
}
