//! Utilities for emitting text into a [`BitWriter`].
use super::BitWriter;

mod sealed {
    pub trait Sealed: itoap::Integer {}
}

/// Primitive integer types that can be written as decimal text.
pub trait Integer: sealed::Sealed {}

macro_rules! integers {
    ($($int:ty),*) => {
        $(
            impl sealed::Sealed for $int {}
            impl Integer for $int {}
        )*
    };
}

integers!(i8, u8, i16, u16, i32, u32, i64, u64, i128, u128, isize, usize);

/// Write a decimal number using ASCII digits.
///
/// Like all writes to a [`BitWriter`], this starts at the current bit position.
#[inline]
pub fn ascii_digits<I>(writer: &mut BitWriter, value: I)
where
    I: Integer,
{
    // Writing to a `BitWriter` cannot fail.
    let _ = itoap::write(writer, value);
}
