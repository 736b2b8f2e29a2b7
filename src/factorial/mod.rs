//! The factorial representation: the magnitude packed as a bit stream of
//! mixed-radix coefficients, per §4.5 of the specification this crate
//! implements.

mod codec;

use alloc::string::{String, ToString};
use core::cmp::Ordering;

use crate::{
    decimal,
    error::Error,
    repr::{self, Repr},
    storage::Storage,
};

pub(crate) use codec::MAX_INDEX;

/// An arbitrary-precision signed integer stored as a bit-packed sequence of
/// mixed-radix coefficients `c_1, c_2, ..., c_K` with `0 <= c_i <= i`, where
/// the value is `Σ c_i * i!`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Factorial(Storage);

repr::impl_bignum_ops!(Factorial);

impl Factorial {
    /// Builds a `Factorial` from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if `s` does not match the decimal grammar.
    pub fn from_decimal(s: &str) -> Result<Self, Error> {
        <Self as Repr>::from_decimal_str(s)
    }

    /// Reads coefficient `index` directly (`0` for an unpopulated slot).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `index` exceeds the codec's largest
    /// addressable index.
    pub fn coefficient(&self, index: u64) -> Result<u64, Error> {
        Ok(codec::extract(&self.0, index)?.unwrap_or(0))
    }
}

impl Repr for Factorial {
    fn zero() -> Self {
        Self(Storage::zero())
    }

    fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn with_sign(mut self, negative: bool) -> Self {
        self.0.set_negative(negative && !self.0.is_zero());
        self
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        compare_magnitude(&self.0, &other.0).expect("index bounded by aux never exceeds MAX_INDEX")
    }

    fn add_magnitude(&self, other: &Self) -> Self {
        Self(add_magnitude(&self.0, &other.0).expect("index bounded by aux never exceeds MAX_INDEX"))
    }

    fn sub_magnitude(&self, other: &Self) -> Self {
        Self(sub_magnitude(&self.0, &other.0).expect("index bounded by aux never exceeds MAX_INDEX"))
    }

    fn mul_magnitude(&self, other: &Self) -> Self {
        let product = decimal::mul(&format_magnitude(&self.0), &format_magnitude(&other.0));
        Self(parse_magnitude(&product))
    }

    fn divmod_magnitude(&self, other: &Self) -> Result<(Self, Self), Error> {
        let (q, r) = decimal::div(&format_magnitude(&self.0), &format_magnitude(&other.0))?;
        Ok((Self(parse_magnitude(&q)), Self(parse_magnitude(&r))))
    }

    fn from_decimal_str(s: &str) -> Result<Self, Error> {
        if !decimal::is_valid_integral(s) {
            return Err(Error::Parse);
        }
        let negative = s.starts_with('-');
        let digits = s.strip_prefix('-').unwrap_or(s);
        let storage = parse_magnitude(digits);
        Ok(Self(storage).with_sign(negative))
    }

    fn to_decimal_string(&self) -> String {
        let digits = format_magnitude(&self.0);
        if self.0.is_negative() && digits != "0" {
            alloc::format!("-{digits}")
        } else {
            digits
        }
    }

    fn from_u64(value: u64) -> Self {
        Self(parse_magnitude(&value.to_string()))
    }

    fn from_i64(value: i64) -> Self {
        Self::from_u64(value.unsigned_abs()).with_sign(value < 0)
    }

    fn try_to_u64(&self) -> Result<u64, Error> {
        if self.0.is_negative() {
            return Err(Error::Overflow);
        }
        magnitude_to_u64(&self.0)
    }

    fn try_to_i64(&self) -> Result<i64, Error> {
        let magnitude = magnitude_to_u64(&self.0)?;
        repr::signed_magnitude_to_i64(magnitude, self.0.is_negative())
    }
}

/// Compares two magnitudes by iterating coefficients from the higher `aux`
/// down to `1`; the first differing coefficient decides, since the sum of
/// every coefficient below any place is always strictly less than one unit
/// at that place.
fn compare_magnitude(a: &Storage, b: &Storage) -> Result<Ordering, Error> {
    let top = a.aux().max(b.aux());
    for index in (1..=top).rev() {
        let ai = codec::extract(a, index)?.unwrap_or(0);
        let bi = codec::extract(b, index)?.unwrap_or(0);
        match ai.cmp(&bi) {
            Ordering::Equal => continue,
            ord => return Ok(ord),
        }
    }
    Ok(Ordering::Equal)
}

/// Mixed-radix addition: place `index` has base `index + 1`.
fn add_magnitude(a: &Storage, b: &Storage) -> Result<Storage, Error> {
    let mut result = Storage::zero();
    let mut index = 1u64;
    let mut carry = 0u64;
    loop {
        let ai = codec::extract(a, index)?;
        let bi = codec::extract(b, index)?;
        if ai.is_none() && bi.is_none() && carry == 0 {
            break;
        }
        let base = index + 1;
        let mut sum = ai.unwrap_or(0) + bi.unwrap_or(0) + carry;
        if sum >= base {
            sum -= base;
            carry = 1;
        } else {
            carry = 0;
        }
        codec::put(&mut result, index, sum)?;
        index += 1;
    }
    trim(&mut result)?;
    Ok(result)
}

/// Mixed-radix subtraction. Caller guarantees `|a| >= |b|`; a nonzero
/// residual borrow past the last coefficient is an internal precondition
/// violation, never exposed publicly.
fn sub_magnitude(a: &Storage, b: &Storage) -> Result<Storage, Error> {
    let mut result = Storage::zero();
    let mut index = 1u64;
    let mut borrow = 0u64;
    loop {
        let ai = codec::extract(a, index)?;
        let bi = codec::extract(b, index)?;
        if ai.is_none() && bi.is_none() && borrow == 0 {
            break;
        }
        let base = index + 1;
        let rhs = bi.unwrap_or(0) + borrow;
        let diff = if ai.unwrap_or(0) >= rhs {
            borrow = 0;
            ai.unwrap_or(0) - rhs
        } else {
            borrow = 1;
            ai.unwrap_or(0) + base - rhs
        };
        codec::put(&mut result, index, diff)?;
        index += 1;
    }
    debug_assert_eq!(borrow, 0, "sub_magnitude requires |a| >= |b|");
    trim(&mut result)?;
    Ok(result)
}

/// Drops trailing (highest-index) zero coefficients, collapsing to the
/// canonical zero if every coefficient cancels.
fn trim(storage: &mut Storage) -> Result<(), Error> {
    let mut top = storage.aux();
    while top > 0 && codec::extract(storage, top)?.unwrap_or(0) == 0 {
        top -= 1;
    }
    if top == 0 {
        *storage = Storage::zero();
    } else {
        storage.set_aux(top);
    }
    Ok(())
}

/// Parses an unsigned decimal string by repeated division, per §4.5: at
/// place `index` (starting at `1`), divide by `index + 1`, keep the
/// remainder as `c_index`, and continue with the quotient.
fn parse_magnitude(decimal: &str) -> Storage {
    let mut storage = Storage::zero();
    let mut s = String::from(decimal);
    let mut index = 1u64;
    while s != "0" {
        let (q, r) = decimal::div_by_small(&s, index + 1).expect("divisor index+1 is never zero");
        codec::put(&mut storage, index, r).expect("r <= index by construction, index <= MAX_INDEX for realistic magnitudes");
        s = q;
        index += 1;
    }
    storage
}

/// Formats the magnitude as an unsigned decimal string by accumulating
/// `Σ c_i * i!` with decimal-string arithmetic.
fn format_magnitude(storage: &Storage) -> String {
    let mut factorial = String::from("1");
    let mut sum = String::from("0");
    let mut index = 1u64;
    loop {
        let Some(c) = codec::extract(storage, index).expect("index bounded by aux") else {
            break;
        };
        factorial = decimal::mul(&factorial, &index.to_string());
        if c != 0 {
            sum = decimal::add(&sum, &decimal::mul(&factorial, &c.to_string()));
        }
        index += 1;
    }
    sum
}

/// Horner-style reconstruction: `acc = c_K`, then for `index` from `K-1`
/// down to `1`, `acc = acc*(index+1) + c_index`. Fails with
/// [`Error::Overflow`] at the first multiply or add that does not fit
/// in `u64`.
fn magnitude_to_u64(storage: &Storage) -> Result<u64, Error> {
    let k = storage.aux();
    if k == 0 {
        return Ok(0);
    }
    let mut acc = codec::extract(storage, k)?.unwrap_or(0);
    for index in (1..k).rev() {
        let c = codec::extract(storage, index)?.unwrap_or(0);
        acc = acc.checked_mul(index + 1).ok_or(Error::Overflow)?;
        acc = acc.checked_add(c).ok_or(Error::Overflow)?;
    }
    Ok(acc)
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::repr::{abs, isqrt, pow};

    #[test]
    fn round_trips_ten() {
        let ten = Factorial::from_decimal("10").unwrap();
        assert_eq!(ten.to_string(), "10");
        assert_eq!(ten, Factorial::from(10i64));
        assert_eq!(ten.coefficient(1).unwrap(), 0);
        assert_eq!(ten.coefficient(2).unwrap(), 2);
        assert_eq!(ten.coefficient(3).unwrap(), 1);
    }

    #[test]
    fn scenario_large_addition() {
        let a = Factorial::from_decimal("123456789012345678901234567890").unwrap();
        let b = Factorial::from_decimal("98765432109876543210987654321").unwrap();
        assert_eq!((a + b).to_string(), "222222221122222222112222222211");
    }

    #[test]
    fn cancellation_trims_to_zero() {
        let a = Factorial::from_decimal("123456").unwrap();
        assert_eq!((a.clone() - a).to_string(), "0");
    }

    #[test]
    fn scenario_errors() {
        let forty_two = Factorial::from(42i64);
        let zero = Factorial::zero();
        assert_eq!(
            forty_two.checked_div(&zero).unwrap_err(),
            Error::DivisionByZero
        );
        assert_eq!(
            forty_two.checked_rem(&zero).unwrap_err(),
            Error::DivisionByZero
        );
        assert_eq!(
            isqrt(&Factorial::from_decimal("-1").unwrap()).unwrap_err(),
            Error::Domain
        );
        assert_eq!(Factorial::from_decimal("01").unwrap_err(), Error::Parse);
        assert_eq!(Factorial::from_decimal("-").unwrap_err(), Error::Parse);
        assert_eq!(Factorial::from_decimal("12a3").unwrap_err(), Error::Parse);
    }

    #[test]
    fn native_integer_bridging() {
        let x = Factorial::from(-123i32);
        assert_eq!(i32::try_from(x.clone()).unwrap(), -123);
        assert_eq!(u32::try_from(x).unwrap_err(), Error::Overflow);
        assert_eq!(i64::try_from(Factorial::from(i64::MIN)).unwrap(), i64::MIN);
    }

    proptest! {
        #[test]
        fn round_trips_decimal(n in 0u64..1_000_000_000) {
            let f = Factorial::from_decimal(&n.to_string()).unwrap();
            prop_assert_eq!(f.to_string(), n.to_string());
        }

        #[test]
        fn ring_axioms(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000, c in -1_000_000i64..1_000_000) {
            let (a, b, c) = (Factorial::from(a), Factorial::from(b), Factorial::from(c));
            prop_assert_eq!(a.clone() + b.clone(), b.clone() + a.clone());
            prop_assert_eq!((a.clone() + b.clone()) + c.clone(), a.clone() + (b.clone() + c.clone()));
            prop_assert_eq!(a.clone() + Factorial::zero(), a.clone());
            prop_assert_eq!(a.clone() - a.clone(), Factorial::zero());
            prop_assert_eq!((a.clone() * b.clone()) * c.clone(), a.clone() * (b.clone() * c.clone()));
            prop_assert_eq!(a.clone() * (b.clone() + c.clone()), a.clone() * b.clone() + a * c);
        }

        #[test]
        fn division_identity(a in -1_000_000i64..1_000_000, b in 1i64..1_000_000) {
            let (fa, fb) = (Factorial::from(a), Factorial::from(b));
            let q = fa.clone() / fb.clone();
            let r = fa.clone() % fb.clone();
            prop_assert_eq!(q * fb + r.clone(), fa);
            if a % b != 0 {
                prop_assert_eq!(r.is_negative(), a < 0);
            }
        }

        #[test]
        fn cross_form_agreement(a in -100_000i64..100_000, b in -100_000i64..100_000) {
            let (ba, bb) = (crate::binary::Binary::from(a), crate::binary::Binary::from(b));
            let (fa, fb) = (Factorial::from(a), Factorial::from(b));
            prop_assert_eq!((ba.clone() + bb.clone()).to_string(), (fa.clone() + fb.clone()).to_string());
            prop_assert_eq!((ba.clone() - bb.clone()).to_string(), (fa.clone() - fb.clone()).to_string());
            prop_assert_eq!((ba * bb).to_string(), (fa * fb).to_string());
            if b != 0 {
                let (ba, bb) = (crate::binary::Binary::from(a), crate::binary::Binary::from(b));
                let (fa, fb) = (Factorial::from(a), Factorial::from(b));
                prop_assert_eq!((ba.clone() / bb.clone()).to_string(), (fa.clone() / fb.clone()).to_string());
                prop_assert_eq!((ba % bb).to_string(), (fa % fb).to_string());
            }
        }

        #[test]
        fn pow_matches_definition(base in -100i64..100, exp in 0u64..8) {
            let f = Factorial::from(base);
            prop_assert_eq!(pow(&f, 0), Factorial::from(1i64));
            if exp >= 1 {
                prop_assert_eq!(pow(&f, exp), pow(&f, exp - 1) * f.clone());
            }
        }

        #[test]
        fn isqrt_bounds(x in 0i64..10_000_000) {
            let fx = Factorial::from(x);
            let root = isqrt(&fx).unwrap();
            let next = root.clone() + Factorial::from(1i64);
            prop_assert!(root.clone() * root <= fx);
            prop_assert!(fx < next.clone() * next);
        }

        #[test]
        fn abs_matches_native(x in i64::MIN + 1..i64::MAX) {
            prop_assert_eq!(abs(&Factorial::from(x)), Factorial::from(x.abs()));
        }
    }
}
