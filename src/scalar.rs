//! Typed access for buffers whose items are plain numbers.

use sealed::sealed;

/// Fixed-width number stored in native byte order.
///
/// Implemented for the integer and float primitives; the item size of the
/// buffer must equal `size_of::<Self>()`.
#[sealed]
pub trait Scalar: Copy {
    /// Byte representation, `[u8; size_of::<Self>()]`
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Native-endian bytes of `self`
    fn into_bytes(self) -> Self::Bytes;

    /// Rebuild a value from native-endian bytes
    fn from_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            #[sealed]
            impl Scalar for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                #[inline]
                fn into_bytes(self) -> Self::Bytes {
                    self.to_ne_bytes()
                }

                #[inline]
                fn from_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_ne_bytes(bytes)
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
