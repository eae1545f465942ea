use alloc::string::ToString;

use crate::{ByteOrder, Context, Error, Value};

/// The fields visible to a descriptor while it decodes, and the byte order it
/// decodes with.
///
/// Each format opens a scope over its own context, nested inside the scope of
/// its container. Lookups search outward from the innermost format.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    fields: &'a Context,
    parent: Option<&'a Scope<'a>>,
    order: ByteOrder,
}

impl<'a> Scope<'a> {
    /// An outermost scope over a set of fields.
    pub fn root(fields: &'a Context, order: ByteOrder) -> Self {
        Self {
            fields,
            parent: None,
            order,
        }
    }

    /// A scope for a nested format, resolving names through this one.
    pub(crate) fn nested<'b>(&'b self, fields: &'b Context) -> Scope<'b> {
        Scope {
            fields,
            parent: Some(self),
            order: self.order,
        }
    }

    pub(crate) fn with_byte_order(&self, order: ByteOrder) -> Self {
        Self { order, ..*self }
    }

    /// The resolved byte order.
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Look up a decoded field, innermost format first.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        match self.fields.get(name) {
            Some(value) => Some(value),
            None => self.parent.and_then(|p| p.get(name)),
        }
    }

    /// Look up a decoded field holding a non-negative integer.
    pub fn integer(&self, name: &str) -> Result<usize, Error> {
        let value = self
            .get(name)
            .ok_or_else(|| Error::UnresolvedReference(name.to_string()))?;

        value.as_usize().ok_or_else(|| Error::UnexpectedValue {
            expected: "a non-negative integer",
            found: value.kind(),
        })
    }
}
