use alloc::{string::String, vec::Vec};
use core::fmt;

use crate::{ByteSource, ConfigError, Decode, Error, Length, Scope, Value};

use super::{Strategies, Until};

/// A run of raw bytes.
///
/// A count or budget reads exactly that many bytes. A sentinel is matched by
/// reading windows of its length until one equals it; the matching window is
/// kept at the end of the result.
#[derive(Debug, Clone)]
pub struct Bytes {
    until: Until<Vec<u8>>,
}

impl Bytes {
    pub fn builder() -> BytesBuilder {
        BytesBuilder {
            strategies: Strategies::default(),
        }
    }

    pub fn count(count: impl Into<Length>) -> Self {
        Self {
            until: Until::Count(count.into()),
        }
    }

    pub fn budget(budget: impl Into<Length>) -> Self {
        Self {
            until: Until::Budget(budget.into()),
        }
    }

    /// Fails if `sentinel` is empty.
    pub fn until(sentinel: impl Into<Vec<u8>>) -> Result<Self, Error> {
        Self::builder().sentinel(sentinel).build()
    }

    pub fn termination(&self) -> &Until<Vec<u8>> {
        &self.until
    }

    fn decode_raw(
        &self,
        source: &mut dyn ByteSource,
        scope: &Scope<'_>,
    ) -> Result<Vec<u8>, Error> {
        match &self.until {
            Until::Count(n) | Until::Budget(n) => source.take(n.resolve(scope)?),
            Until::Sentinel(sentinel) => {
                let mut r = Vec::new();

                loop {
                    let window = source.take(sentinel.len())?;
                    r.extend_from_slice(&window);

                    if window == *sentinel {
                        return Ok(r);
                    }
                }
            }
        }
    }
}

impl Decode for Bytes {
    fn decode(&self, source: &mut dyn ByteSource, scope: &Scope<'_>) -> Result<Value, Error> {
        self.decode_raw(source, scope).map(Value::Bytes)
    }

    fn references(&self) -> Vec<String> {
        self.until.references()
    }
}

/// Builds [`Bytes`], checking exactly one strategy is chosen.
#[derive(Debug, Clone)]
pub struct BytesBuilder {
    strategies: Strategies<Vec<u8>>,
}

impl BytesBuilder {
    pub fn count(mut self, count: impl Into<Length>) -> Self {
        self.strategies.count = Some(count.into());
        self
    }

    pub fn budget(mut self, budget: impl Into<Length>) -> Self {
        self.strategies.budget = Some(budget.into());
        self
    }

    pub fn sentinel(mut self, sentinel: impl Into<Vec<u8>>) -> Self {
        self.strategies.sentinel = Some(sentinel.into());
        self
    }

    /// Fails unless exactly one strategy was chosen, or if the sentinel is
    /// empty.
    pub fn build(self) -> Result<Bytes, Error> {
        if self.strategies.sentinel.as_ref().is_some_and(Vec::is_empty) {
            Err(ConfigError::EmptySentinel)?;
        }

        Ok(Bytes {
            until: self.strategies.build()?,
        })
    }
}

/// Text encodings understood by [`Str`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    #[default]
    Utf8,
    /// Seven-bit ASCII; any byte above `0x7F` is rejected.
    Ascii,
    /// ISO 8859-1, mapping each byte to the code point of the same value.
    Latin1,
    Utf16Le,
    Utf16Be,
}

impl Encoding {
    /// Decode bytes into text.
    pub fn decode(self, r: Vec<u8>) -> Result<String, Error> {
        let invalid = || Error::InvalidEncoding(self);

        match self {
            Self::Utf8 => String::from_utf8(r).map_err(|_| invalid()),
            Self::Ascii if r.is_ascii() => Ok(r.into_iter().map(char::from).collect()),
            Self::Ascii => Err(invalid()),
            Self::Latin1 => Ok(r.into_iter().map(char::from).collect()),
            Self::Utf16Le | Self::Utf16Be => {
                if r.len() % 2 != 0 {
                    return Err(invalid());
                }

                let units = r.chunks_exact(2).map(|c| match self {
                    Self::Utf16Le => u16::from_le_bytes([c[0], c[1]]),
                    _ => u16::from_be_bytes([c[0], c[1]]),
                });

                char::decode_utf16(units)
                    .collect::<Result<String, _>>()
                    .map_err(|_| invalid())
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Utf8 => "UTF-8",
            Self::Ascii => "ASCII",
            Self::Latin1 => "Latin-1",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
        })
    }
}

/// Text decoded from [`Bytes`].
///
/// As with [`Bytes`], a sentinel is kept at the end of the text unless
/// [`Str::strip_sentinel`] is set.
#[derive(Debug, Clone)]
pub struct Str {
    bytes: Bytes,
    encoding: Encoding,
    strip_sentinel: bool,
}

impl Str {
    /// Text in UTF-8.
    pub fn new(bytes: Bytes) -> Self {
        Self {
            bytes,
            encoding: Encoding::default(),
            strip_sentinel: false,
        }
    }

    pub fn count(count: impl Into<Length>) -> Self {
        Self::new(Bytes::count(count))
    }

    pub fn budget(budget: impl Into<Length>) -> Self {
        Self::new(Bytes::budget(budget))
    }

    /// Fails if `sentinel` is empty.
    pub fn until(sentinel: impl Into<Vec<u8>>) -> Result<Self, Error> {
        Bytes::until(sentinel).map(Self::new)
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Drop the sentinel from the decoded text.
    pub fn strip_sentinel(mut self) -> Self {
        self.strip_sentinel = true;
        self
    }
}

impl Decode for Str {
    fn decode(&self, source: &mut dyn ByteSource, scope: &Scope<'_>) -> Result<Value, Error> {
        let mut r = self.bytes.decode_raw(source, scope)?;

        if let (true, Until::Sentinel(sentinel)) = (self.strip_sentinel, &self.bytes.until) {
            r.truncate(r.len() - sentinel.len());
        }

        self.encoding.decode(r).map(Value::Str)
    }

    fn references(&self) -> Vec<String> {
        self.bytes.references()
    }
}
