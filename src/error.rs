//! Errors raised while building schemas and decoding data.

use alloc::{
    boxed::Box,
    string::{String, ToString},
};

use thiserror::Error;

use crate::composite::Encoding;

/// Errors occurring while decoding.
///
/// Failures inside a [`Format`](crate::Format) or an
/// [`Array`](crate::Array) are wrapped in [`Error::Field`] and
/// [`Error::Element`] on their way out, recording where decoding stopped. Use
/// [`Error::root`] to match on the underlying cause.
#[derive(Debug, Error)]
pub enum Error {
    /// The source ran out before a read could complete.
    #[error("Needed {needed} bytes, but only {available} remain.")]
    InsufficientData { needed: usize, available: usize },
    /// The schema is malformed.
    #[error("Invalid configuration: {0}.")]
    InvalidConfiguration(#[from] ConfigError),
    /// A dependent length named a field that has not been decoded.
    #[error("Reference to undecoded field `{0}`.")]
    UnresolvedReference(String),
    /// Decoding finished before the end of the source.
    #[error("Found trailing data after position {position}.")]
    TrailingData { position: usize },
    /// A byte sequence is not valid text in the configured encoding.
    #[error("Byte sequence is not valid {0}.")]
    InvalidEncoding(Encoding),
    /// A record expected a field that was not decoded.
    #[error("Missing field `{0}`.")]
    MissingField(String),
    /// A decoded value does not have the expected shape.
    #[error("Expected {expected}, found {found}.")]
    UnexpectedValue {
        expected: &'static str,
        found: String,
    },
    /// An error raised by a user transform or custom descriptor.
    #[error("{0}")]
    Custom(String),
    /// An error decoding a named field.
    #[error("In field `{name}`: {source}")]
    Field { name: String, source: Box<Error> },
    /// An error decoding an element of a sequence.
    #[error("In element {index}: {source}")]
    Element { index: usize, source: Box<Error> },
    /// An error from the underlying reader.
    #[cfg(feature = "std")]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Problems with a schema, detected before or while it is applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An integer must span at least one byte.
    #[error("integer width must be positive")]
    ZeroWidth,
    /// Floats are half, single or double precision.
    #[error("unsupported float width ({0})")]
    FloatWidth(usize),
    /// A sequence needs a count, a byte budget or a sentinel.
    #[error("no termination strategy configured")]
    MissingTermination,
    /// A sequence may only use one termination strategy.
    #[error("more than one termination strategy configured")]
    ConflictingTermination,
    /// A byte sentinel must contain at least one byte.
    #[error("sentinel is empty")]
    EmptySentinel,
    /// Field names within a format must be unique.
    #[error("duplicate field `{0}`")]
    DuplicateField(String),
    /// A dependent length names a field that is never decoded before it.
    #[error("reference to undefined field `{0}`")]
    UnresolvedReference(String),
    /// The last element decoded under a byte budget ran past it.
    #[error("byte budget of {budget} overrun ({consumed} consumed)")]
    BudgetOverrun { budget: usize, consumed: usize },
    /// An element of a budget or sentinel sequence consumed nothing.
    #[error("element consumed no bytes, so the sequence cannot end")]
    EmptyElement,
}

impl Error {
    /// Construct an error from a message, for use in transforms.
    pub fn custom(message: impl ToString) -> Self {
        Self::Custom(message.to_string())
    }

    /// Attach the name of the field being decoded.
    pub(crate) fn in_field(self, name: &str) -> Self {
        Self::Field {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Attach the index of the element being decoded.
    pub(crate) fn in_element(self, index: usize) -> Self {
        Self::Element {
            index,
            source: Box::new(self),
        }
    }

    /// The underlying cause, without field and element wrappers.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Self::Field { source, .. } | Self::Element { source, .. } = err {
            err = source.as_ref();
        }
        err
    }

    /// The location of the failure, such as `header.entries[2].name`.
    ///
    /// Empty if the failure did not occur within a field or element.
    pub fn path(&self) -> String {
        let mut path = String::new();
        let mut err = self;

        loop {
            match err {
                Self::Field { name, source } => {
                    if !path.is_empty() {
                        path.push('.');
                    }
                    path.push_str(name);
                    err = source.as_ref();
                }
                Self::Element { index, source } => {
                    path.push('[');
                    path.push_str(&index.to_string());
                    path.push(']');
                    err = source.as_ref();
                }
                _ => return path,
            }
        }
    }
}
