#![no_std]

//! A declarative decoder for binary formats.
//!
//! Bindecl describes a binary layout as a tree of descriptors, then decodes
//! bytes against it. Leaves are primitives such as [`Integer`] and [`Float`]
//! of any width and byte order. Composites such as [`Array`], [`Tuple`],
//! [`Bytes`] and [`Str`] combine them, and a [`Format`] names a sequence of
//! fields so later ones can size themselves from earlier ones.
//!
//! ```
//! let format = Format::builder()
//!     .field("length", U8)
//!     .field("payload", Bytes::count("length"))
//!     .build()?;
//!
//! let fields = format.decode_slice(&[0x03, 0xAA, 0xBB, 0xCC])?;
//! assert_eq!(fields.get("payload"), Some(&Value::from(&[0xAA, 0xBB, 0xCC][..])));
//! ```
//!
//! Most users describing fixed record types should begin with the [`Record`]
//! trait and its derive macro. Decoders for layouts not covered here are
//! written by implementing [`Decode`].
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable reader-based sources (default).

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod composite;
mod descriptor;
mod error;
mod format;
mod order;
mod primitive;
mod record;
mod source;
mod value;

pub use composite::{Array, ArrayBuilder, Bytes, BytesBuilder, Encoding, Str, Tuple, Until};
pub use descriptor::{Decode, DecodeExt, Descriptor, Length, Scope};
pub use error::{ConfigError, Error};
pub use format::{Decoded, Format, FormatBuilder, Options};
pub use order::ByteOrder;
pub use primitive::{
    Bool, Char, F16, F32, F64, Float, I8, I16, I32, I64, Integer, U8, U16, U32, U64,
};
pub use record::{FromValue, Record};
#[cfg(feature = "std")]
pub use source::ReaderSource;
pub use source::{ByteSource, SliceSource};
pub use value::{Context, Value};
