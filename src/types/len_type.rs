use core::cmp;
use core::ops;

/// The integer type a `Vx` stores its count and capacity in, and is indexed by.
///
/// Picking something narrower than `usize` shrinks the vector's header and caps
/// how many units it can ever hold; growing past the type's maximum fails with
/// `ErrorReason::CapacityOverflow` instead of wrapping.
///
/// Unsafe because the vector trusts that the type orders and does arithmetic
/// like an unsigned integer, and that `as_usize` is lossless for every value
/// `from_usize` produced.
pub unsafe trait LengthType
where
    Self: Copy,
    Self: cmp::Eq,
    Self: cmp::Ord,
    Self: ops::SubAssign,
    Self: Sized,
    Self: From<u8>,
    usize: TryFrom<Self>,
{
    const ONE_VALUE: Self;
    const ZERO_VALUE: Self;

    fn as_usize(self) -> usize;
    fn from_usize(value: usize) -> Option<Self>;
    fn checked_add(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_length_type {
    ($typ:ty) => {
        unsafe impl LengthType for $typ {
            const ONE_VALUE: Self = 1;
            const ZERO_VALUE: Self = 0;

            #[inline(always)]
            fn as_usize(self) -> usize {
                return self as usize;
            }

            #[inline]
            fn from_usize(value: usize) -> Option<Self> {
                return Self::try_from(value).ok();
            }

            #[inline]
            fn checked_add(self, rhs: Self) -> Option<Self> {
                return self.checked_add(rhs);
            }
        }
    };
}

impl_length_type!(usize);
impl_length_type!(u8);
impl_length_type!(u16);
impl_length_type!(u32);
impl_length_type!(u64);
