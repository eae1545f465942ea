use alloc::{string::String, sync::Arc};
use core::fmt;

use crate::Error;

use super::Scope;

type Compute = Arc<dyn Fn(&Scope<'_>) -> Result<usize, Error> + Send + Sync>;

/// A count or byte length, fixed or dependent on earlier fields.
///
/// Converts from a `usize` (a literal) or a string (the name of an earlier
/// field holding an integer).
///
/// ```
/// Bytes::count(16);
/// Bytes::count("length");
/// Bytes::count(Length::computed(|s| Ok(s.integer("rows")? * s.integer("cols")?)));
/// ```
#[derive(Clone)]
pub enum Length {
    Literal(usize),
    Reference(String),
    Computed(Compute),
}

impl Length {
    /// A length computed from the fields in scope.
    pub fn computed(
        f: impl Fn(&Scope<'_>) -> Result<usize, Error> + Send + Sync + 'static,
    ) -> Self {
        Self::Computed(Arc::new(f))
    }

    /// Evaluate the length against the fields in scope.
    pub fn resolve(&self, scope: &Scope<'_>) -> Result<usize, Error> {
        match self {
            Self::Literal(n) => Ok(*n),
            Self::Reference(name) => scope.integer(name),
            Self::Computed(f) => f(scope),
        }
    }

    /// The field named by a reference.
    pub(crate) fn reference(&self) -> Option<&str> {
        match self {
            Self::Reference(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(n) => f.debug_tuple("Literal").field(n).finish(),
            Self::Reference(name) => f.debug_tuple("Reference").field(name).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<usize> for Length {
    fn from(n: usize) -> Self {
        Self::Literal(n)
    }
}

impl From<&str> for Length {
    fn from(name: &str) -> Self {
        Self::Reference(name.into())
    }
}

impl From<String> for Length {
    fn from(name: String) -> Self {
        Self::Reference(name)
    }
}
