//! Decoded values and the context of decoded fields.

use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;

use num_bigint::BigInt;

/// A decoded value.
///
/// Integers up to 16 bytes wide decode to [`Value::UInt`] or [`Value::Int`],
/// wider ones to [`Value::BigInt`]. Integers compare by numeric value
/// regardless of representation, so `Value::UInt(3) == Value::Int(3)`.
#[derive(Debug, Clone)]
pub enum Value {
    UInt(u128),
    Int(i128),
    BigInt(BigInt),
    Float(f64),
    Bool(bool),
    Char(char),
    Bytes(Vec<u8>),
    Str(String),
    Array(Vec<Value>),
    Tuple(Vec<Value>),
    Record(Context),
}

impl Value {
    /// The value as an arbitrary-precision integer, if it is an integer.
    pub fn to_bigint(&self) -> Option<BigInt> {
        match self {
            Self::UInt(x) => Some(BigInt::from(*x)),
            Self::Int(x) => Some(BigInt::from(*x)),
            Self::BigInt(x) => Some(x.clone()),
            _ => None,
        }
    }

    /// The value as a `usize`, if it is an integer in range.
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Self::UInt(x) => usize::try_from(*x).ok(),
            Self::Int(x) => usize::try_from(*x).ok(),
            Self::BigInt(x) => usize::try_from(x).ok(),
            _ => None,
        }
    }

    /// The value as an `i128`, if it is an integer in range.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::UInt(x) => i128::try_from(*x).ok(),
            Self::Int(x) => Some(*x),
            Self::BigInt(x) => i128::try_from(x).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(x) => Some(x),
            _ => None,
        }
    }

    /// The elements of an array or a tuple.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Self::Array(x) | Self::Tuple(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Context> {
        match self {
            Self::Record(x) => Some(x),
            _ => None,
        }
    }

    /// A short description of the kind of value, used in error messages.
    pub(crate) fn kind(&self) -> String {
        match self {
            Self::UInt(x) => format!("unsigned integer {x}"),
            Self::Int(x) => format!("signed integer {x}"),
            Self::BigInt(x) => format!("integer {x}"),
            Self::Float(x) => format!("float {x}"),
            Self::Bool(x) => format!("boolean {x}"),
            Self::Char(x) => format!("character {x:?}"),
            Self::Bytes(x) => format!("{} bytes", x.len()),
            Self::Str(x) => format!("string {x:?}"),
            Self::Array(x) => format!("array of {}", x.len()),
            Self::Tuple(x) => format!("tuple of {}", x.len()),
            Self::Record(x) => format!("record of {} fields", x.len()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UInt(a), Self::UInt(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::UInt(a), Self::Int(b)) | (Self::Int(b), Self::UInt(a)) => {
                u128::try_from(*b).is_ok_and(|b| *a == b)
            }
            (Self::BigInt(a), b) | (b, Self::BigInt(a)) => b.to_bigint().is_some_and(|b| *a == b),
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Array(a), Self::Array(b)) | (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UInt(x) => write!(f, "{x}"),
            Self::Int(x) => write!(f, "{x}"),
            Self::BigInt(x) => write!(f, "{x}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(x) => write!(f, "{x}"),
            Self::Char(x) => write!(f, "{x}"),
            Self::Bytes(x) => {
                f.write_str("b\"")?;
                for b in x {
                    write!(f, "{}", core::ascii::escape_default(*b))?;
                }
                f.write_str("\"")
            }
            Self::Str(x) => write!(f, "{x:?}"),
            Self::Array(x) => write_list(f, "[", x, "]"),
            Self::Tuple(x) => write_list(f, "(", x, ")"),
            Self::Record(x) => write!(f, "{x}"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, open: &str, x: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, v) in x.iter().enumerate() {
        if i != 0 {
            f.write_str(", ")?;
        }
        write!(f, "{v}")?;
    }
    f.write_str(close)
}

macro_rules! value_from {
    ($variant:ident, $via:ty, $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(x: $t) -> Self {
                    Self::$variant(<$via>::from(x))
                }
            }
        )*
    };
}

value_from!(UInt, u128, u8, u16, u32, u64, u128);
value_from!(Int, i128, i8, i16, i32, i64, i128);
value_from!(Float, f64, f32, f64);
value_from!(Bool, bool, bool);
value_from!(Char, char, char);
value_from!(BigInt, BigInt, BigInt);
value_from!(Bytes, Vec<u8>, Vec<u8>, &[u8]);
value_from!(Str, String, String, &str);
value_from!(Record, Context, Context);

impl From<usize> for Value {
    fn from(x: usize) -> Self {
        Self::UInt(x as u128)
    }
}

impl From<Vec<Value>> for Value {
    fn from(x: Vec<Value>) -> Self {
        Self::Array(x)
    }
}

/// The fields decoded so far within a format, in decoding order.
///
/// Returned by a top-level decode, and visible to later fields while decoding
/// through a [`Scope`](crate::Scope).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    entries: Vec<(String, Value)>,
}

impl Context {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the value of a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterate over field names and values in decoding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Iterate over field names in decoding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Remove a field, returning its value.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let i = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(i).1)
    }

    /// Remove a field and convert its value.
    ///
    /// Fails if the field is absent. Conversion failures are attributed to
    /// the field.
    pub fn take_as<T: crate::FromValue>(&mut self, name: &str) -> Result<T, crate::Error> {
        let value = self
            .take(name)
            .ok_or_else(|| crate::Error::MissingField(name.to_string()))?;

        T::from_value(value).map_err(|err| err.in_field(name))
    }

    /// The values in decoding order, discarding names.
    pub fn into_values(self) -> Vec<Value> {
        self.entries.into_iter().map(|(_, v)| v).collect()
    }

    /// Append a field. Names are unique within a format, so no lookup is made.
    pub(crate) fn push(&mut self, name: String, value: Value) {
        self.entries.push((name, value));
    }
}

impl IntoIterator for Context {
    type Item = (String, Value);
    type IntoIter = alloc::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect(),
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (n, v)) in self.entries.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{n}: {v}")?;
        }
        f.write_str("}")
    }
}
