//! Ordered, named aggregates of descriptors.

use alloc::{string::String, vec::Vec};

use crate::{ByteOrder, ByteSource, ConfigError, Context, Decode, Descriptor, Error, Scope, Value};

/// An ordered set of named fields, decoded one after another.
///
/// Each decoded field joins a [`Context`] visible to the fields after it, so a
/// length decoded early can size a sequence decoded later. Fields decode in
/// the order they were added.
///
/// A format is itself a decoder, and nests inside other formats as a field
/// decoding to [`Value::Record`]. A nested format inherits the byte order of
/// its container unless it, or the descriptor holding it, sets one.
///
/// ```
/// let packet = Format::builder()
///     .byte_order(ByteOrder::Big)
///     .field("length", U8)
///     .field("payload", Bytes::count("length"))
///     .build()?;
///
/// let fields = packet.decode_slice(&[0x03, 0xAA, 0xBB, 0xCC])?;
/// ```
#[derive(Debug, Clone)]
pub struct Format {
    fields: Vec<(String, Descriptor)>,
    order: Option<ByteOrder>,
}

/// Options for a top-level decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Succeed even if bytes remain after the last field.
    pub allow_leftover: bool,
}

impl Options {
    pub fn allow_leftover() -> Self {
        Self {
            allow_leftover: true,
        }
    }
}

/// The result of a top-level decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub fields: Context,
    /// The number of bytes consumed.
    pub consumed: usize,
}

impl Format {
    pub fn builder() -> FormatBuilder {
        FormatBuilder::default()
    }

    /// Iterate over field names and descriptors in decoding order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.fields.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn explicit_byte_order(&self) -> Option<ByteOrder> {
        self.order
    }

    /// Decode all fields from a source, starting from the native byte order.
    ///
    /// References that no earlier field satisfies are rejected before any byte
    /// is read. Unless leftover bytes are allowed, the source must be
    /// exhausted afterward.
    pub fn decode_source(
        &self,
        source: &mut impl ByteSource,
        options: Options,
    ) -> Result<Decoded, Error> {
        if let Some(name) = self.references().into_iter().next() {
            Err(ConfigError::UnresolvedReference(name))?;
        }

        let source: &mut dyn ByteSource = source;
        let start = source.position();

        let root = Context::new();
        let fields = self.decode_fields(source, &Scope::root(&root, ByteOrder::native()))?;

        let position = source.position();
        if !options.allow_leftover && !source.is_exhausted()? {
            Err(Error::TrailingData { position })?;
        }

        Ok(Decoded {
            fields,
            consumed: position - start,
        })
    }

    /// Decode all fields from a slice, which must be consumed entirely.
    pub fn decode_slice(&self, data: &[u8]) -> Result<Context, Error> {
        let mut source = crate::SliceSource::new(data);
        Ok(self.decode_source(&mut source, Options::default())?.fields)
    }

    /// Decode all fields from a reader, which must be exhausted afterward.
    ///
    /// _Requires Cargo feature `std`._
    #[cfg(feature = "std")]
    pub fn decode_reader(&self, r: impl std::io::Read) -> Result<Context, Error> {
        let mut source = crate::ReaderSource::new(r);
        Ok(self.decode_source(&mut source, Options::default())?.fields)
    }

    /// Decode each field in turn, growing a context within the given scope.
    fn decode_fields(
        &self,
        source: &mut dyn ByteSource,
        parent: &Scope<'_>,
    ) -> Result<Context, Error> {
        let parent = parent.with_byte_order(ByteOrder::resolve(self.order, parent.byte_order()));
        let mut fields = Context::new();

        for (name, descriptor) in &self.fields {
            let value = descriptor
                .decode_field(source, &parent.nested(&fields))
                .map_err(|err| err.in_field(name))?;

            fields.push(name.clone(), value);
        }

        Ok(fields)
    }
}

impl Decode for Format {
    fn decode(&self, source: &mut dyn ByteSource, scope: &Scope<'_>) -> Result<Value, Error> {
        self.decode_fields(source, scope).map(Value::Record)
    }

    /// References not satisfied by an earlier field of this format.
    fn references(&self) -> Vec<String> {
        let mut unresolved = Vec::new();

        for (i, (_, descriptor)) in self.fields.iter().enumerate() {
            let defined = &self.fields[..i];

            unresolved.extend(
                descriptor
                    .references()
                    .into_iter()
                    .filter(|r| !defined.iter().any(|(n, _)| n == r)),
            );
        }

        unresolved
    }
}

/// Builds a [`Format`] from fields in decoding order.
#[derive(Debug, Clone, Default)]
pub struct FormatBuilder {
    fields: Vec<(String, Descriptor)>,
    order: Option<ByteOrder>,
}

impl FormatBuilder {
    /// Set the byte order fields inherit, rather than that of the container.
    ///
    /// This also takes precedence over an explicit order on a descriptor
    /// holding the format, as in `format.little()`.
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Append a field.
    pub fn field(mut self, name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        self.fields.push((name.into(), descriptor.into()));
        self
    }

    /// Fails if two fields share a name.
    pub fn build(self) -> Result<Format, Error> {
        for (i, (name, _)) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|(n, _)| n == name) {
                Err(ConfigError::DuplicateField(name.clone()))?;
            }
        }

        Ok(Format {
            fields: self.fields,
            order: self.order,
        })
    }
}
