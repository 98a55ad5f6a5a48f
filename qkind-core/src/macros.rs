//! Macros for forwarding operator traits to inherent methods.

/// Implements a binary operator trait for all four owned/borrowed combinations of `$ty`.
///
/// Every combination forwards to `$target(&self, &rhs)`.
macro_rules! forward_binary_op {
    (impl[$($gen:tt)*] $trait:ident, $method:ident => $target:ident for $ty:ty, output $out:ty) => {
        impl<$($gen)*> core::ops::$trait<$ty> for $ty {
            type Output = $out;
            #[inline]
            fn $method(self, rhs: $ty) -> $out {
                (&self).$target(&rhs)
            }
        }

        impl<'a, $($gen)*> core::ops::$trait<&'a $ty> for $ty {
            type Output = $out;
            #[inline]
            fn $method(self, rhs: &'a $ty) -> $out {
                (&self).$target(rhs)
            }
        }

        impl<'a, $($gen)*> core::ops::$trait<$ty> for &'a $ty {
            type Output = $out;
            #[inline]
            fn $method(self, rhs: $ty) -> $out {
                self.$target(&rhs)
            }
        }

        impl<'a, 'b, $($gen)*> core::ops::$trait<&'b $ty> for &'a $ty {
            type Output = $out;
            #[inline]
            fn $method(self, rhs: &'b $ty) -> $out {
                self.$target(rhs)
            }
        }
    };
}

/// Implements `^ i32` (as `BitXor<i32>`) for `$ty` and `&$ty`, forwarding to `$target(&self, exponent)`.
macro_rules! forward_pow_op {
    (impl[$($gen:tt)*] for $ty:ty => $target:ident, output $out:ty) => {
        impl<$($gen)*> core::ops::BitXor<i32> for $ty {
            type Output = $out;
            #[inline]
            fn bitxor(self, exponent: i32) -> $out {
                (&self).$target(exponent)
            }
        }

        impl<'a, $($gen)*> core::ops::BitXor<i32> for &'a $ty {
            type Output = $out;
            #[inline]
            fn bitxor(self, exponent: i32) -> $out {
                self.$target(exponent)
            }
        }
    };
}

pub(crate) use forward_binary_op;
pub(crate) use forward_pow_op;
