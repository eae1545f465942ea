//! Byte order selection and inheritance.

/// The order in which the bytes of a multi-byte value are stored.
///
/// Descriptors may carry an explicit order. Those that don't inherit the
/// resolved order of their container, and the outermost container defaults to
/// [`ByteOrder::native`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl ByteOrder {
    /// The byte order of the target platform.
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// Resolve an optional explicit order against an inherited one.
    pub const fn resolve(explicit: Option<Self>, inherited: Self) -> Self {
        match explicit {
            Some(order) => order,
            None => inherited,
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}
