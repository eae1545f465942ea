use alloc::{string::String, vec::Vec};

use crate::{ByteSource, Decode, Descriptor, Error, Scope, Value};

/// A fixed sequence of values, each with its own descriptor.
///
/// Elements are decoded in order against the scope of the tuple. Unlike the
/// fields of a format, elements are unnamed and invisible to one another.
///
/// ```
/// Tuple::new().element(U16).element(F32).element(Bool);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tuple {
    elements: Vec<Descriptor>,
}

impl Tuple {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element.
    pub fn element(mut self, element: impl Into<Descriptor>) -> Self {
        self.elements.push(element.into());
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl FromIterator<Descriptor> for Tuple {
    fn from_iter<I: IntoIterator<Item = Descriptor>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl Decode for Tuple {
    fn decode(&self, source: &mut dyn ByteSource, scope: &Scope<'_>) -> Result<Value, Error> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| e.decode_field(source, scope).map_err(|err| err.in_element(i)))
            .collect::<Result<_, _>>()
            .map(Value::Tuple)
    }

    fn references(&self) -> Vec<String> {
        self.elements.iter().flat_map(Descriptor::references).collect()
    }
}
