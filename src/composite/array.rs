use alloc::{string::String, vec::Vec};

use crate::{ByteSource, ConfigError, Decode, Descriptor, Error, Length, Scope, Value};

use super::{Strategies, Until};

/// A sequence of values decoded by the same descriptor.
///
/// Elements inherit the byte order of the array unless their descriptor sets
/// its own, and see the same fields in scope as the array itself.
///
/// ```
/// // Five little endian `u16`s.
/// Array::with_count(U16, 5).little();
/// // As many `u32`s as fit in `size` bytes.
/// Array::with_budget(U32, "size");
/// // `u16`s up to (and excluding) a zero.
/// Array::until(U16, 0u16);
/// ```
#[derive(Debug, Clone)]
pub struct Array {
    element: Descriptor,
    until: Until<Value>,
}

impl Array {
    /// Start building an array, choosing the strategy later.
    pub fn builder(element: impl Into<Descriptor>) -> ArrayBuilder {
        ArrayBuilder {
            element: element.into(),
            strategies: Strategies::default(),
        }
    }

    /// An array of a number of elements.
    pub fn with_count(element: impl Into<Descriptor>, count: impl Into<Length>) -> Self {
        Self {
            element: element.into(),
            until: Until::Count(count.into()),
        }
    }

    /// An array filling a number of bytes.
    ///
    /// Decoding fails if the last element runs past the budget.
    pub fn with_budget(element: impl Into<Descriptor>, budget: impl Into<Length>) -> Self {
        Self {
            element: element.into(),
            until: Until::Budget(budget.into()),
        }
    }

    /// An array ended by an element equal to `sentinel`, which is consumed
    /// but not included in the result.
    pub fn until(element: impl Into<Descriptor>, sentinel: impl Into<Value>) -> Self {
        Self {
            element: element.into(),
            until: Until::Sentinel(sentinel.into()),
        }
    }

    pub fn element(&self) -> &Descriptor {
        &self.element
    }

    pub fn termination(&self) -> &Until<Value> {
        &self.until
    }

    fn decode_element(
        &self,
        source: &mut dyn ByteSource,
        scope: &Scope<'_>,
        i: usize,
    ) -> Result<Value, Error> {
        self.element
            .decode_field(source, scope)
            .map_err(|err| err.in_element(i))
    }
}

impl Decode for Array {
    fn decode(&self, source: &mut dyn ByteSource, scope: &Scope<'_>) -> Result<Value, Error> {
        let mut values = Vec::new();

        match &self.until {
            Until::Count(count) => {
                let count = count.resolve(scope)?;

                for i in 0..count {
                    values.push(self.decode_element(source, scope, i)?);
                }
            }
            Until::Budget(budget) => {
                let budget = budget.resolve(scope)?;
                let start = source.position();
                let mut consumed = 0;

                while consumed < budget {
                    values.push(self.decode_element(source, scope, values.len())?);

                    let total = source.position() - start;
                    if total == consumed {
                        Err(ConfigError::EmptyElement)?;
                    }
                    consumed = total;
                }

                if consumed > budget {
                    Err(ConfigError::BudgetOverrun { budget, consumed })?;
                }
            }
            Until::Sentinel(sentinel) => loop {
                let start = source.position();
                let value = self.decode_element(source, scope, values.len())?;

                if value == *sentinel {
                    break;
                }

                // An element that consumes nothing would repeat forever.
                if source.position() == start {
                    Err(ConfigError::EmptyElement)?;
                }

                values.push(value);
            },
        }

        Ok(Value::Array(values))
    }

    fn references(&self) -> Vec<String> {
        let mut names = self.until.references();
        names.extend(self.element.references());
        names
    }
}

/// Builds an [`Array`], checking exactly one strategy is chosen.
#[derive(Debug, Clone)]
pub struct ArrayBuilder {
    element: Descriptor,
    strategies: Strategies<Value>,
}

impl ArrayBuilder {
    pub fn count(mut self, count: impl Into<Length>) -> Self {
        self.strategies.count = Some(count.into());
        self
    }

    pub fn budget(mut self, budget: impl Into<Length>) -> Self {
        self.strategies.budget = Some(budget.into());
        self
    }

    pub fn sentinel(mut self, sentinel: impl Into<Value>) -> Self {
        self.strategies.sentinel = Some(sentinel.into());
        self
    }

    /// Fails unless exactly one strategy was chosen.
    pub fn build(self) -> Result<Array, Error> {
        Ok(Array {
            element: self.element,
            until: self.strategies.build()?,
        })
    }
}
