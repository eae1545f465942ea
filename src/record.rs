//! Binding decoded fields to user types.
//!
//! A [`Record`] supplies the [`Format`] describing its layout and assembles
//! itself from the decoded fields. Field values convert through
//! [`FromValue`].
//!
//! In most cases both traits can be derived. See the
//! [`Record`](macro@Record) macro for details.

use alloc::{string::String, vec::Vec};

use num_bigint::BigInt;

use crate::{ByteSource, Context, Error, Format, Options, SliceSource, Value};

/// Derive [`Record`] and [`FromValue`] for a struct with named fields.
///
/// _Requires Cargo feature `derive`._
///
/// # Example
///
/// Add the `field` attribute to each struct field to decode, holding an
/// expression for its descriptor. Fields are decoded in declaration order,
/// and later descriptors may refer to earlier fields by name. Fields without
/// the attribute are set to their [`Default`].
///
/// ```
/// #[derive(Debug, Record)]
/// #[record(byte_order = "big")]
/// struct Packet {
///     #[field(U8)]
///     length: u8,
///     #[field(Bytes::count("length"))]
///     payload: Vec<u8>,
///     #[field(Header::format()?)]
///     header: Header,
/// }
///
/// let packet = Packet::read(&data)?;
/// ```
///
/// The optional `record` attribute sets the byte order the fields inherit
/// (`"little"` or `"big"`).
#[cfg(feature = "derive")]
pub use bindecl_derive::Record;

/// A type assembled from the fields of a [`Format`].
///
/// See the [`Record`](macro@Record) derive macro for an automatic
/// implementation of this trait.
pub trait Record: Sized {
    /// The layout of this record.
    fn format() -> Result<Format, Error>;

    /// Build this record from its decoded fields.
    fn assemble(fields: Context) -> Result<Self, Error>;

    /// Decode a record from a slice, which must be consumed entirely.
    fn read(data: &[u8]) -> Result<Self, Error> {
        let (record, _) = Self::read_from(&mut SliceSource::new(data), Options::default())?;
        Ok(record)
    }

    /// Decode a record from a source, returning it with the number of bytes
    /// consumed.
    fn read_from(source: &mut impl ByteSource, options: Options) -> Result<(Self, usize), Error> {
        let decoded = Self::format()?.decode_source(source, options)?;
        Ok((Self::assemble(decoded.fields)?, decoded.consumed))
    }

    /// Decode a record from a reader, which must be exhausted afterward.
    ///
    /// _Requires Cargo feature `std`._
    #[cfg(feature = "std")]
    fn read_reader(r: impl std::io::Read) -> Result<Self, Error> {
        let (record, _) = Self::read_from(&mut crate::ReaderSource::new(r), Options::default())?;
        Ok(record)
    }
}

/// Convert a decoded value into a Rust type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, Error>;
}

fn unexpected(expected: &'static str, found: &Value) -> Error {
    Error::UnexpectedValue {
        expected,
        found: found.kind(),
    }
}

macro_rules! from_value_int {
    ($($t:ident),*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Result<Self, Error> {
                    match &value {
                        Value::UInt(x) => $t::try_from(*x).ok(),
                        Value::Int(x) => $t::try_from(*x).ok(),
                        Value::BigInt(x) => $t::try_from(x).ok(),
                        _ => None,
                    }
                    .ok_or_else(|| unexpected(stringify!($t), &value))
                }
            }
        )*
    };
}

from_value_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, Error> {
        value.as_f64().ok_or_else(|| unexpected("f64", &value))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, Error> {
        f64::from_value(value).map(|x| x as f32)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Bool(x) => Ok(x),
            other => Err(unexpected("bool", &other)),
        }
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Char(x) => Ok(x),
            other => Err(unexpected("char", &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Str(x) => Ok(x),
            other => Err(unexpected("string", &other)),
        }
    }
}

impl FromValue for BigInt {
    fn from_value(value: Value) -> Result<Self, Error> {
        value.to_bigint().ok_or_else(|| unexpected("integer", &value))
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, Error> {
        Ok(value)
    }
}

impl FromValue for Context {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Record(x) => Ok(x),
            other => Err(unexpected("record", &other)),
        }
    }
}

/// Arrays and tuples convert element by element. Bytes convert byte by byte,
/// so `Vec<u8>` receives them unchanged.
impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Array(x) | Value::Tuple(x) => convert_all(x),
            Value::Bytes(x) => convert_all(x.into_iter().map(Value::from)),
            other => Err(unexpected("sequence", &other)),
        }
    }
}

fn convert_all<T: FromValue>(values: impl IntoIterator<Item = Value>) -> Result<Vec<T>, Error> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| T::from_value(v).map_err(|err| err.in_element(i)))
        .collect()
}

macro_rules! from_value_tuple {
    ($n:literal, $($t:ident),*) => {
        impl<$($t: FromValue),*> FromValue for ($($t,)*) {
            fn from_value(value: Value) -> Result<Self, Error> {
                let x = match value {
                    Value::Tuple(x) | Value::Array(x) => x,
                    other => return Err(unexpected("tuple", &other)),
                };

                if x.len() != $n {
                    return Err(unexpected(concat!("tuple of ", $n), &Value::Tuple(x)));
                }

                let mut x = x.into_iter().enumerate();

                Ok(($(
                    {
                        let (i, v) = x.next().ok_or_else(|| Error::custom("tuple ended early"))?;
                        $t::from_value(v).map_err(|err| err.in_element(i))?
                    },
                )*))
            }
        }
    };
}

from_value_tuple!(1, A);
from_value_tuple!(2, A, B);
from_value_tuple!(3, A, B, C);
from_value_tuple!(4, A, B, C, D);
from_value_tuple!(5, A, B, C, D, E);
from_value_tuple!(6, A, B, C, D, E, F);
