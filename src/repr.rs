//! Generic operator scaffolding shared by both representations.
//!
//! Everything in this module is written once against the [`Repr`] contract
//! and then stamped out for each concrete representation by
//! [`impl_bignum_ops`]. This mirrors the kernel/facade split of the
//! fixed-width bigint code this crate grew out of, where a single generic
//! trait backs a family of concrete types generated by a macro.

use alloc::string::String;
use core::cmp::Ordering;

use crate::error::Error;

/// The operations a concrete representation (binary or factorial) must
/// provide so that `+ - * / %`, comparisons, `abs`, `pow` and `isqrt` can be
/// implemented once, generically, for both.
///
/// Every method here operates signed-magnitude style: `*_magnitude` methods
/// ignore sign and operate purely on `|self|`/`|other|`; the free functions
/// below combine them with [`Repr::is_negative`] the way §4.6 of the
/// specification this crate implements describes.
pub trait Repr: Sized + Clone + Eq + core::fmt::Debug {
    /// The additive identity, with positive sign.
    fn zero() -> Self;

    /// Whether this value's sign bit is set. Always `false` for zero.
    fn is_negative(&self) -> bool;

    /// Whether this value is the additive identity.
    fn is_zero(&self) -> bool;

    /// Returns `self` with its sign set to `negative`. Implementations must
    /// clamp the sign of a zero magnitude back to positive.
    #[must_use]
    fn with_sign(self, negative: bool) -> Self;

    /// Compares `|self|` to `|other|`.
    fn cmp_magnitude(&self, other: &Self) -> Ordering;

    /// `|self| + |other|`.
    fn add_magnitude(&self, other: &Self) -> Self;

    /// `|self| - |other|`. Callers must guarantee `|self| >= |other|`.
    fn sub_magnitude(&self, other: &Self) -> Self;

    /// `|self| * |other|`.
    fn mul_magnitude(&self, other: &Self) -> Self;

    /// `(|self| / |other|, |self| % |other|)`. Fails with
    /// [`Error::DivisionByZero`] if `other` is zero.
    fn divmod_magnitude(&self, other: &Self) -> Result<(Self, Self), Error>;

    /// Parses a signed decimal string, per the grammar in
    /// [`crate::decimal::is_valid_integral`].
    fn from_decimal_str(s: &str) -> Result<Self, Error>;

    /// Formats as a signed decimal string; the canonical zero is `"0"`.
    fn to_decimal_string(&self) -> String;

    /// Builds a non-negative value from a native unsigned 64-bit integer.
    fn from_u64(value: u64) -> Self;

    /// Builds a value (of either sign) from a native signed 64-bit integer.
    fn from_i64(value: i64) -> Self;

    /// Explicit conversion to `u64`. Fails with [`Error::Overflow`] if the
    /// value is negative or does not fit.
    fn try_to_u64(&self) -> Result<u64, Error>;

    /// Explicit conversion to `i64`. Fails with [`Error::Overflow`] if the
    /// value does not fit.
    fn try_to_i64(&self) -> Result<i64, Error>;

    /// Total order over signed values: by sign first, then by magnitude,
    /// inverted when both operands are negative.
    fn total_cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
        }
    }
}

/// Converts a non-negative magnitude and a sign into an `i64`, the way both
/// representations' `try_to_i64` bottoms out. Handles `i64::MIN` correctly:
/// its magnitude, `2^63`, does not fit in `i64` on the positive side but
/// does on the negative side.
pub(crate) fn signed_magnitude_to_i64(magnitude: u64, negative: bool) -> Result<i64, Error> {
    if negative {
        if magnitude > i64::MIN.unsigned_abs() {
            return Err(Error::Overflow);
        }
        Ok((magnitude as i64).wrapping_neg())
    } else {
        i64::try_from(magnitude).map_err(|_| Error::Overflow)
    }
}

/// `a + b`, per §4.6: equal signs add magnitudes; otherwise subtract the
/// smaller magnitude from the larger and keep the larger operand's sign.
pub(crate) fn add<T: Repr>(a: &T, b: &T) -> T {
    if a.is_negative() == b.is_negative() {
        a.add_magnitude(b).with_sign(a.is_negative())
    } else {
        match a.cmp_magnitude(b) {
            Ordering::Equal => T::zero(),
            Ordering::Greater => a.sub_magnitude(b).with_sign(a.is_negative()),
            Ordering::Less => b.sub_magnitude(a).with_sign(b.is_negative()),
        }
    }
}

/// `a - b`, defined as `a + (-b)`.
pub(crate) fn sub<T: Repr>(a: &T, b: &T) -> T {
    add(a, &negate(b))
}

/// `a * b`: multiply magnitudes, sign is the XOR of the operand signs.
pub(crate) fn mul<T: Repr>(a: &T, b: &T) -> T {
    a.mul_magnitude(b).with_sign(a.is_negative() != b.is_negative())
}

/// `(a / b, a % b)`: division truncates toward zero; the remainder's sign
/// follows the dividend.
pub(crate) fn divmod<T: Repr>(a: &T, b: &T) -> Result<(T, T), Error> {
    let (q, r) = a.divmod_magnitude(b)?;
    let q = q.with_sign(a.is_negative() != b.is_negative());
    let r = r.with_sign(a.is_negative());
    Ok((q, r))
}

/// Unary `-`: a copy with the sign flipped.
pub(crate) fn negate<T: Repr>(a: &T) -> T {
    a.clone().with_sign(!a.is_negative())
}

/// `abs(x)`: `x` if non-negative, else `-x`.
pub fn abs<T: Repr>(x: &T) -> T {
    if x.is_negative() {
        negate(x)
    } else {
        x.clone()
    }
}

/// Exponentiation by squaring. `pow(x, 0) == 1` for every `x`, including
/// `pow(0, 0) == 1`.
pub fn pow<T: Repr>(base: &T, mut exp: u64) -> T {
    let mut result = T::from_u64(1);
    let mut base = base.clone();
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul(&result, &base);
        }
        base = mul(&base, &base);
        exp >>= 1;
    }
    result
}

/// Largest `m` with `m * m <= x`, found by binary search on `[0, x]`. Fails
/// with [`Error::Domain`] if `x` is negative.
pub fn isqrt<T: Repr>(x: &T) -> Result<T, Error> {
    if x.is_negative() {
        return Err(Error::Domain);
    }
    if x.is_zero() {
        return Ok(T::zero());
    }

    let one = T::from_u64(1);
    let two = T::from_u64(2);
    let mut lo = one.clone();
    let mut hi = x.clone();
    let mut best = T::zero();

    while matches!(lo.total_cmp(&hi), Ordering::Less | Ordering::Equal) {
        let (mid, _) = add(&lo, &hi).divmod_magnitude(&two).expect("divisor 2 is never zero");
        let squared = mul(&mid, &mid);
        if matches!(squared.total_cmp(x), Ordering::Less | Ordering::Equal) {
            best = mid.clone();
            lo = add(&mid, &one);
        } else {
            hi = sub(&mid, &one);
        }
    }

    Ok(best)
}

/// Converts the crate's free function `to_string` from the external
/// interface: `to_string(x) == x.to_decimal_string()`.
pub fn to_string<T: Repr>(x: &T) -> String {
    x.to_decimal_string()
}

/// Generates the public operator surface (`+ - * / %`, compound assigns,
/// unary `-`, comparisons, `Display`, `FromStr`, and native integer
/// bridging) for a concrete representation `$ty` that implements [`Repr`].
macro_rules! impl_bignum_ops {
    ($ty:ty) => {
        impl core::ops::Add for $ty {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                $crate::repr::add(&self, &rhs)
            }
        }

        impl core::ops::Sub for $ty {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                $crate::repr::sub(&self, &rhs)
            }
        }

        impl core::ops::Mul for $ty {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                $crate::repr::mul(&self, &rhs)
            }
        }

        impl core::ops::Div for $ty {
            type Output = Self;
            fn div(self, rhs: Self) -> Self {
                $crate::repr::divmod(&self, &rhs)
                    .unwrap_or_else(|e| panic!("{e}"))
                    .0
            }
        }

        impl core::ops::Rem for $ty {
            type Output = Self;
            fn rem(self, rhs: Self) -> Self {
                $crate::repr::divmod(&self, &rhs)
                    .unwrap_or_else(|e| panic!("{e}"))
                    .1
            }
        }

        impl core::ops::Neg for $ty {
            type Output = Self;
            fn neg(self) -> Self {
                $crate::repr::negate(&self)
            }
        }

        impl core::ops::AddAssign for $ty {
            fn add_assign(&mut self, rhs: Self) {
                *self = $crate::repr::add(self, &rhs);
            }
        }

        impl core::ops::SubAssign for $ty {
            fn sub_assign(&mut self, rhs: Self) {
                *self = $crate::repr::sub(self, &rhs);
            }
        }

        impl core::ops::MulAssign for $ty {
            fn mul_assign(&mut self, rhs: Self) {
                *self = $crate::repr::mul(self, &rhs);
            }
        }

        impl core::ops::DivAssign for $ty {
            fn div_assign(&mut self, rhs: Self) {
                *self = core::ops::Div::div(self.clone(), rhs);
            }
        }

        impl core::ops::RemAssign for $ty {
            fn rem_assign(&mut self, rhs: Self) {
                *self = core::ops::Rem::rem(self.clone(), rhs);
            }
        }

        impl $ty {
            /// Fallible `/`: fails with [`Error`](crate::error::Error::DivisionByZero)
            /// instead of panicking.
            pub fn checked_div(&self, rhs: &Self) -> Result<Self, $crate::error::Error> {
                $crate::repr::divmod(self, rhs).map(|(q, _)| q)
            }

            /// Fallible `%`: fails with [`Error`](crate::error::Error::DivisionByZero)
            /// instead of panicking.
            pub fn checked_rem(&self, rhs: &Self) -> Result<Self, $crate::error::Error> {
                $crate::repr::divmod(self, rhs).map(|(_, r)| r)
            }

            /// Increments `self` by one in place. Rust has no postfix/prefix
            /// `++`; this is the idiomatic stand-in, paired with
            /// [`Self::decrement`].
            pub fn increment(&mut self) {
                *self = $crate::repr::add(self, &<$ty as $crate::repr::Repr>::from_u64(1));
            }

            /// Decrements `self` by one in place.
            pub fn decrement(&mut self) {
                *self = $crate::repr::sub(self, &<$ty as $crate::repr::Repr>::from_u64(1));
            }

            /// Absolute value.
            #[must_use]
            pub fn abs(&self) -> Self {
                $crate::repr::abs(self)
            }

            /// `self` raised to the power of `exp`. `x.pow(0) == 1` for every `x`.
            #[must_use]
            pub fn pow(&self, exp: u64) -> Self {
                $crate::repr::pow(self, exp)
            }

            /// Integer square root: the largest `m` with `m * m <= self`.
            ///
            /// # Errors
            ///
            /// Returns [`Error::Domain`](crate::error::Error::Domain) if `self` is negative.
            pub fn isqrt(&self) -> Result<Self, $crate::error::Error> {
                $crate::repr::isqrt(self)
            }
        }

        impl PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $ty {
            fn cmp(&self, other: &Self) -> core::cmp::Ordering {
                $crate::repr::Repr::total_cmp(self, other)
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                $crate::repr::Repr::zero()
            }
        }

        impl core::fmt::Display for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", $crate::repr::Repr::to_decimal_string(self))
            }
        }

        impl core::str::FromStr for $ty {
            type Err = $crate::error::Error;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $crate::repr::Repr::from_decimal_str(s)
            }
        }

        $crate::repr::impl_signed_bridge!($ty, i8, i16, i32, i64);
        $crate::repr::impl_unsigned_bridge!($ty, u8, u16, u32, u64);
    };
}

/// Implements `From<$signed>` and `TryFrom<$ty> for $signed` for a list of
/// signed integer widths, bridging through [`Repr::from_i64`] and
/// [`Repr::try_to_i64`].
macro_rules! impl_signed_bridge {
    ($ty:ty, $($signed:ty),+ $(,)?) => {
        $(
            impl From<$signed> for $ty {
                fn from(value: $signed) -> Self {
                    $crate::repr::Repr::from_i64(i64::from(value))
                }
            }

            impl core::convert::TryFrom<$ty> for $signed {
                type Error = $crate::error::Error;
                fn try_from(value: $ty) -> Result<Self, Self::Error> {
                    let wide = $crate::repr::Repr::try_to_i64(&value)?;
                    <$signed>::try_from(wide).map_err(|_| $crate::error::Error::Overflow)
                }
            }
        )+
    };
}

/// Implements `From<$unsigned>` and `TryFrom<$ty> for $unsigned` for a list
/// of unsigned integer widths, bridging through [`Repr::from_u64`] and
/// [`Repr::try_to_u64`].
macro_rules! impl_unsigned_bridge {
    ($ty:ty, $($unsigned:ty),+ $(,)?) => {
        $(
            impl From<$unsigned> for $ty {
                fn from(value: $unsigned) -> Self {
                    $crate::repr::Repr::from_u64(u64::from(value))
                }
            }

            impl core::convert::TryFrom<$ty> for $unsigned {
                type Error = $crate::error::Error;
                fn try_from(value: $ty) -> Result<Self, Self::Error> {
                    let wide = $crate::repr::Repr::try_to_u64(&value)?;
                    <$unsigned>::try_from(wide).map_err(|_| $crate::error::Error::Overflow)
                }
            }
        )+
    };
}

pub(crate) use impl_bignum_ops;
pub(crate) use impl_signed_bridge;
pub(crate) use impl_unsigned_bridge;
