//! Numeric and single-byte decoders.

use num_bigint::{BigInt, BigUint};
use tartan_bitfield::bitfield;
use zerocopy::byteorder::{self, BigEndian, LittleEndian};

use crate::{ByteOrder, ByteSource, ConfigError, Decode, Error, Scope, Value};

/// An integer of any positive byte width.
///
/// Signed integers are read as two's complement. Widths up to 16 bytes decode
/// to [`Value::UInt`] or [`Value::Int`], wider ones to [`Value::BigInt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integer {
    width: usize,
    signed: bool,
}

impl Integer {
    pub fn new(width: usize, signed: bool) -> Result<Self, Error> {
        if width == 0 {
            Err(ConfigError::ZeroWidth)?;
        }

        Ok(Self { width, signed })
    }

    pub fn unsigned(width: usize) -> Result<Self, Error> {
        Self::new(width, false)
    }

    pub fn signed(width: usize) -> Result<Self, Error> {
        Self::new(width, true)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }
}

macro_rules! integer {
    ($name:ident, $width:literal, $signed:literal, $(#[$attr:meta])*) => {
        $(#[$attr])*
        pub const $name: Integer = Integer {
            width: $width,
            signed: $signed,
        };
    };
}

integer!(U8, 1, false, /** `uint8` */);
integer!(I8, 1, true, /** `int8` */);
integer!(U16, 2, false, /** `uint16` */);
integer!(I16, 2, true, /** `int16` */);
integer!(U32, 4, false, /** `uint32` */);
integer!(I32, 4, true, /** `int32` */);
integer!(U64, 8, false, /** `uint64` */);
integer!(I64, 8, true, /** `int64` */);

impl Decode for Integer {
    fn decode(&self, source: &mut dyn ByteSource, scope: &Scope<'_>) -> Result<Value, Error> {
        let mut bytes = source.take(self.width)?;

        // Work most significant byte first from here on.
        if scope.byte_order() == ByteOrder::Little {
            bytes.reverse();
        }

        Ok(if self.width <= 16 {
            let x = bytes.iter().fold(0u128, |acc, b| (acc << 8) | *b as u128);

            if self.signed {
                let shift = 128 - 8 * self.width as u32;
                Value::Int(((x << shift) as i128) >> shift)
            } else {
                Value::UInt(x)
            }
        } else if self.signed {
            Value::BigInt(BigInt::from_signed_bytes_be(&bytes))
        } else {
            Value::BigInt(BigInt::from(BigUint::from_bytes_be(&bytes)))
        })
    }
}

/// An IEEE 754 float of half, single or double precision.
///
/// All widths decode to [`Value::Float`]; half and single precision values
/// widen exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Float {
    width: usize,
}

impl Float {
    /// Fails unless `width` is 2, 4 or 8.
    pub fn new(width: usize) -> Result<Self, Error> {
        match width {
            2 | 4 | 8 => Ok(Self { width }),
            _ => Err(ConfigError::FloatWidth(width).into()),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// `float16`
pub const F16: Float = Float { width: 2 };
/// `float32`
pub const F32: Float = Float { width: 4 };
/// `float64`
pub const F64: Float = Float { width: 8 };

impl Decode for Float {
    fn decode(&self, source: &mut dyn ByteSource, scope: &Scope<'_>) -> Result<Value, Error> {
        let x = match scope.byte_order() {
            ByteOrder::Little => float_from::<LittleEndian>(source, self.width)?,
            ByteOrder::Big => float_from::<BigEndian>(source, self.width)?,
        };

        Ok(Value::Float(x))
    }
}

/// Read a float of a width accepted by [`Float::new`].
fn float_from<O: byteorder::ByteOrder>(
    source: &mut dyn ByteSource,
    width: usize,
) -> Result<f64, Error> {
    Ok(match width {
        2 => half_to_f64(byteorder::U16::<O>::from_bytes(read_array(source)?).get()),
        4 => byteorder::F32::<O>::from_bytes(read_array(source)?).get() as f64,
        _ => byteorder::F64::<O>::from_bytes(read_array(source)?).get(),
    })
}

fn read_array<const N: usize>(source: &mut dyn ByteSource) -> Result<[u8; N], Error> {
    let mut r = [0; N];
    source.read_exact(&mut r)?;
    Ok(r)
}

/// Widen the bits of a half precision float.
fn half_to_f64(r: u16) -> f64 {
    bitfield! {
        struct Half(u16) {
            [0..10] mantissa: u16,
            [10..15] exponent: u16,
            [15] is_negative,
        }
    }

    let half = Half(r);

    let sign = (half.is_negative() as u64) << 63;
    let mantissa = half.mantissa() as u64;

    let magnitude = match half.exponent() {
        // Subnormal: mantissa * 2^-24, exact in double precision.
        0 => mantissa as f64 * f64::from_bits((1023 - 24) << 52),
        0x1F if mantissa == 0 => f64::INFINITY,
        0x1F => f64::NAN,
        e => f64::from_bits(((e as u64 + 1023 - 15) << 52) | (mantissa << 42)),
    };

    f64::from_bits(magnitude.to_bits() | sign)
}

/// A single byte, true when non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bool;

impl Decode for Bool {
    fn decode(&self, source: &mut dyn ByteSource, _: &Scope<'_>) -> Result<Value, Error> {
        let mut r = [0; 1];
        source.read_exact(&mut r)?;
        Ok(Value::Bool(r[0] != 0))
    }
}

/// A single byte holding a Latin-1 code point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Char;

impl Decode for Char {
    fn decode(&self, source: &mut dyn ByteSource, _: &Scope<'_>) -> Result<Value, Error> {
        let mut r = [0; 1];
        source.read_exact(&mut r)?;
        Ok(Value::Char(char::from(r[0])))
    }
}
