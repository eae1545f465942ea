//! The field descriptor abstraction.
//!
//! Anything that can be decoded implements [`Decode`]. Schemas hold decoders
//! behind a [`Descriptor`], which adds the optional explicit byte order and
//! post-decode transform every field supports.
//!
//! Decoding state never lives in a descriptor: the bytes come from a
//! [`ByteSource`] and previously decoded fields from a [`Scope`], both passed
//! in by the caller. A schema can therefore be shared between threads and
//! reused for any number of decodes.

use alloc::{string::String, sync::Arc, vec::Vec};
use core::fmt;

use crate::{ByteOrder, ByteSource, Context, Error, Value};

mod length;
mod scope;

pub use length::Length;
pub use scope::Scope;

/// Decode a value from a byte source.
///
/// Implement this trait to provide a custom field type. Implementations read
/// the byte order to use from [`Scope::byte_order`], which has already been
/// resolved against any explicit order on the enclosing [`Descriptor`].
pub trait Decode: Send + Sync {
    /// Decode one value, consulting the scope for dependent sizes.
    fn decode(&self, source: &mut dyn ByteSource, scope: &Scope<'_>) -> Result<Value, Error>;

    /// Names of fields this decoder expects to find in its scope.
    ///
    /// Used to reject schemas with dangling references before any byte is
    /// read. The default reports none.
    fn references(&self) -> Vec<String> {
        Vec::new()
    }
}

type Transform = Arc<dyn Fn(Value) -> Result<Value, Error> + Send + Sync>;

/// A decoder, together with its byte order preference and transform.
///
/// Any [`Decode`] implementation converts into a descriptor that inherits its
/// byte order and applies no transform. The methods of [`DecodeExt`] build
/// descriptors with those set.
#[derive(Clone)]
pub struct Descriptor {
    decoder: Arc<dyn Decode>,
    order: Option<ByteOrder>,
    transform: Option<Transform>,
}

impl Descriptor {
    pub fn new(decoder: impl Decode + 'static) -> Self {
        Self {
            decoder: Arc::new(decoder),
            order: None,
            transform: None,
        }
    }

    /// Use an explicit byte order rather than inheriting one.
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn little(self) -> Self {
        self.byte_order(ByteOrder::Little)
    }

    pub fn big(self) -> Self {
        self.byte_order(ByteOrder::Big)
    }

    /// Replace the decoded value with the result of a function.
    pub fn map(self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.try_map(move |v| Ok(f(v)))
    }

    /// Replace the decoded value with the result of a fallible function.
    ///
    /// Errors returned by the function abort decoding unchanged.
    pub fn try_map(
        mut self,
        f: impl Fn(Value) -> Result<Value, Error> + Send + Sync + 'static,
    ) -> Self {
        self.transform = Some(Arc::new(f));
        self
    }

    /// The explicit byte order, if one is set.
    pub fn explicit_byte_order(&self) -> Option<ByteOrder> {
        self.order
    }

    /// The byte order this descriptor decodes with, given the order of its
    /// container.
    pub fn resolve_byte_order(&self, inherited: ByteOrder) -> ByteOrder {
        ByteOrder::resolve(self.order, inherited)
    }

    /// Decode a value without applying the transform.
    pub fn decode(&self, source: &mut dyn ByteSource, scope: &Scope<'_>) -> Result<Value, Error> {
        let order = self.resolve_byte_order(scope.byte_order());
        self.decoder.decode(source, &scope.with_byte_order(order))
    }

    /// Decode a value and apply the transform, if one is set.
    pub fn decode_field(
        &self,
        source: &mut dyn ByteSource,
        scope: &Scope<'_>,
    ) -> Result<Value, Error> {
        let value = self.decode(source, scope)?;

        match &self.transform {
            Some(f) => f(value),
            None => Ok(value),
        }
    }

    /// Decode a standalone value, returning it with the number of bytes
    /// consumed.
    ///
    /// Decoding starts from an empty scope in the native byte order, so any
    /// references must be to fields this descriptor decodes itself.
    pub fn read(&self, source: &mut impl ByteSource) -> Result<(Value, usize), Error> {
        let source: &mut dyn ByteSource = source;
        let start = source.position();

        let fields = Context::new();
        let value = self.decode_field(source, &Scope::root(&fields, ByteOrder::native()))?;

        Ok((value, source.position() - start))
    }

    pub(crate) fn references(&self) -> Vec<String> {
        self.decoder.references()
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("order", &self.order)
            .field("transform", &self.transform.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: Decode + 'static> From<T> for Descriptor {
    fn from(decoder: T) -> Self {
        Self::new(decoder)
    }
}

/// Shorthands building a [`Descriptor`] from any decoder.
///
/// ```
/// let be = U16.big();
/// let flag = U8.map(|v| Value::Bool(v != Value::UInt(0)));
/// ```
pub trait DecodeExt: Decode + Sized + 'static {
    /// See [`Descriptor::byte_order`].
    fn byte_order(self, order: ByteOrder) -> Descriptor {
        Descriptor::new(self).byte_order(order)
    }

    fn little(self) -> Descriptor {
        Descriptor::new(self).little()
    }

    fn big(self) -> Descriptor {
        Descriptor::new(self).big()
    }

    /// See [`Descriptor::map`].
    fn map(self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Descriptor {
        Descriptor::new(self).map(f)
    }

    /// See [`Descriptor::try_map`].
    fn try_map(
        self,
        f: impl Fn(Value) -> Result<Value, Error> + Send + Sync + 'static,
    ) -> Descriptor {
        Descriptor::new(self).try_map(f)
    }
}

impl<T: Decode + 'static> DecodeExt for T {}
