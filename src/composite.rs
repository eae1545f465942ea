//! Decoders for sequences of values.
//!
//! [`Array`] and [`Bytes`] (with its text counterpart [`Str`]) stop using one
//! of three strategies, described by [`Until`]:
//!
//! - a count of elements (or bytes),
//! - a budget of bytes to consume,
//! - a sentinel marking the end.
//!
//! Counts and budgets are [`Length`]s, so they may be fixed or taken from
//! fields decoded earlier. Exactly one strategy must be chosen; the builders
//! reject anything else when built.
//!
//! **Sentinels are handled differently by the two kinds of sequence.** An
//! array compares each decoded element to its sentinel and drops the match
//! from the result. A byte string compares whole windows the size of its
//! sentinel, and keeps the matching window at the end of the result.

use alloc::{string::String, vec::Vec};

use crate::{ConfigError, Error, Length};

mod array;
mod bytes;
mod tuple;

pub use array::{Array, ArrayBuilder};
pub use bytes::{Bytes, BytesBuilder, Encoding, Str};
pub use tuple::Tuple;

/// The strategy ending a sequence.
#[derive(Debug, Clone)]
pub enum Until<S> {
    /// A number of elements.
    Count(Length),
    /// A number of bytes to consume.
    Budget(Length),
    /// A value (or byte sequence) marking the end.
    Sentinel(S),
}

impl<S> Until<S> {
    pub(crate) fn references(&self) -> Vec<String> {
        match self {
            Self::Count(n) | Self::Budget(n) => {
                n.reference().map(String::from).into_iter().collect()
            }
            Self::Sentinel(_) => Vec::new(),
        }
    }
}

/// Strategies collected by a builder, checked when it is built.
#[derive(Debug, Clone)]
struct Strategies<S> {
    count: Option<Length>,
    budget: Option<Length>,
    sentinel: Option<S>,
}

impl<S> Default for Strategies<S> {
    fn default() -> Self {
        Self {
            count: None,
            budget: None,
            sentinel: None,
        }
    }
}

impl<S> Strategies<S> {
    fn build(self) -> Result<Until<S>, Error> {
        match (self.count, self.budget, self.sentinel) {
            (Some(n), None, None) => Ok(Until::Count(n)),
            (None, Some(n), None) => Ok(Until::Budget(n)),
            (None, None, Some(s)) => Ok(Until::Sentinel(s)),
            (None, None, None) => Err(ConfigError::MissingTermination.into()),
            _ => Err(ConfigError::ConflictingTermination.into()),
        }
    }
}
