//! The binary representation: the magnitude as a little-endian vector of
//! `2^64` words, per §4.4 of the specification this crate implements.

use alloc::{
    format,
    string::{String, ToString},
    vec, vec::Vec,
};
use core::cmp::Ordering;

use crate::{
    decimal,
    error::Error,
    repr::{self, Repr},
    storage::Storage,
    word::{add_with_carry, sub_with_borrow, WORD_BITS},
};

/// An arbitrary-precision signed integer stored as a little-endian vector of
/// 64-bit words in base `2^64`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binary(Storage);

repr::impl_bignum_ops!(Binary);

impl Binary {
    /// Builds a `Binary` from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if `s` does not match the decimal grammar.
    pub fn from_decimal(s: &str) -> Result<Self, Error> {
        <Self as Repr>::from_decimal_str(s)
    }
}

impl Repr for Binary {
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
        compare_magnitude(&self.0, &other.0)
    }

    fn add_magnitude(&self, other: &Self) -> Self {
        Self(add_magnitude(&self.0, &other.0))
    }

    fn sub_magnitude(&self, other: &Self) -> Self {
        Self(sub_magnitude(&self.0, &other.0))
    }

    fn mul_magnitude(&self, other: &Self) -> Self {
        Self(mul_magnitude(&self.0, &other.0))
    }

    fn divmod_magnitude(&self, other: &Self) -> Result<(Self, Self), Error> {
        let (q, r) = divmod_magnitude(&self.0, &other.0)?;
        Ok((Self(q), Self(r)))
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
            format!("-{digits}")
        } else {
            digits
        }
    }

    fn from_u64(value: u64) -> Self {
        Self(Storage::from_words(vec![value]))
    }

    fn from_i64(value: i64) -> Self {
        Self::from_u64(value.unsigned_abs()).with_sign(value < 0)
    }

    fn try_to_u64(&self) -> Result<u64, Error> {
        if self.0.is_negative() || self.0.words().len() > 1 {
            return Err(Error::Overflow);
        }
        Ok(self.0.words()[0])
    }

    fn try_to_i64(&self) -> Result<i64, Error> {
        if self.0.words().len() > 1 {
            return Err(Error::Overflow);
        }
        repr::signed_magnitude_to_i64(self.0.words()[0], self.0.is_negative())
    }
}

/// Number of significant (non-zero-padded) words.
fn significant_len(s: &Storage) -> usize {
    s.words().iter().rposition(|&w| w != 0).map_or(1, |i| i + 1)
}

/// Compares magnitudes by significant length first, then highest-to-lowest
/// differing word.
fn compare_magnitude(a: &Storage, b: &Storage) -> Ordering {
    let (la, lb) = (significant_len(a), significant_len(b));
    match la.cmp(&lb) {
        Ordering::Equal => {
            for i in (0..la).rev() {
                match a.words()[i].cmp(&b.words()[i]) {
                    Ordering::Equal => continue,
                    ord => return ord,
                }
            }
            Ordering::Equal
        }
        ord => ord,
    }
}

/// Iterate over `max(|a|, |b|) positions with carry; push final carry as an
/// extra word; normalize.
fn add_magnitude(a: &Storage, b: &Storage) -> Storage {
    let n = a.words().len().max(b.words().len());
    let mut words = Vec::with_capacity(n + 1);
    let mut carry = 0;
    for i in 0..n {
        let x = a.words().get(i).copied().unwrap_or(0);
        let y = b.words().get(i).copied().unwrap_or(0);
        let (sum, c) = add_with_carry(x, y, carry);
        words.push(sum);
        carry = c;
    }
    if carry > 0 {
        words.push(carry);
    }
    let mut out = Storage::from_words(words);
    out.trim_trailing_zero_words();
    out
}

/// Same as [`add_magnitude`] with borrow; caller guarantees `|a| >= |b|`.
fn sub_magnitude(a: &Storage, b: &Storage) -> Storage {
    let mut words = Vec::with_capacity(a.words().len());
    let mut borrow = 0;
    for i in 0..a.words().len() {
        let x = a.words()[i];
        let y = b.words().get(i).copied().unwrap_or(0);
        let (diff, bo) = sub_with_borrow(x, y, borrow);
        words.push(diff);
        borrow = bo;
    }
    debug_assert_eq!(borrow, 0, "sub_magnitude requires |a| >= |b|");
    let mut out = Storage::from_words(words);
    out.trim_trailing_zero_words();
    out
}

/// Shifts the word vector left by `shift` bits, carrying across word
/// boundaries and emitting a final carry word.
fn shl(a: &Storage, shift: usize) -> Storage {
    if shift == 0 {
        return a.clone();
    }
    let word_shift = shift / WORD_BITS as usize;
    let bit_shift = shift % WORD_BITS as usize;
    let mut words = vec![0; a.words().len() + word_shift + 1];
    if bit_shift == 0 {
        words[word_shift..word_shift + a.words().len()].copy_from_slice(a.words());
    } else {
        let mut carry = 0;
        for (i, &w) in a.words().iter().enumerate() {
            words[i + word_shift] = (w << bit_shift) | carry;
            carry = w >> (WORD_BITS as usize - bit_shift);
        }
        words[a.words().len() + word_shift] = carry;
    }
    let mut out = Storage::from_words(words);
    out.trim_trailing_zero_words();
    out
}

/// For each set bit position `p` in `b`, add `a << p` into the accumulator.
fn mul_magnitude(a: &Storage, b: &Storage) -> Storage {
    let mut acc = Storage::zero();
    for p in 0..b.bit_length() {
        if b.get_bit(p) {
            acc = add_magnitude(&acc, &shl(a, p));
        }
    }
    acc
}

/// Restoring binary long division on magnitudes.
fn divmod_magnitude(a: &Storage, b: &Storage) -> Result<(Storage, Storage), Error> {
    if b.is_zero() {
        return Err(Error::DivisionByZero);
    }
    if compare_magnitude(a, b) == Ordering::Less {
        return Ok((Storage::zero(), a.clone()));
    }

    let mut remainder = Storage::zero();
    let mut quotient = Storage::from_words(vec![0; a.words().len()]);
    for i in (0..a.bit_length()).rev() {
        remainder = shl(&remainder, 1);
        if a.get_bit(i) {
            remainder.words_mut()[0] |= 1;
        }
        if compare_magnitude(&remainder, b) != Ordering::Less {
            remainder = sub_magnitude(&remainder, b);
            quotient.set_bit(i, true);
        }
    }
    quotient.trim_trailing_zero_words();
    remainder.trim_trailing_zero_words();
    Ok((quotient, remainder))
}

/// Repeatedly divides the decimal string by two, pushing each remainder as
/// the next low bit of the current word.
fn parse_magnitude(decimal: &str) -> Storage {
    let mut words = Vec::new();
    let mut current = 0;
    let mut bit_pos = 0u32;
    let mut s = String::from(decimal);
    while s != "0" {
        let (q, r) = decimal::div_by_small(&s, 2).expect("divisor 2 is never zero");
        if r == 1 {
            current |= 1 << bit_pos;
        }
        bit_pos += 1;
        if bit_pos == WORD_BITS {
            words.push(current);
            current = 0;
            bit_pos = 0;
        }
        s = q;
    }
    if bit_pos > 0 {
        words.push(current);
    }
    if words.is_empty() {
        words.push(0);
    }
    Storage::from_words(words)
}

/// If the magnitude fits in 64 bits, emits it directly. Otherwise maintains
/// a little-endian vector of base-`10^9` chunks, multiplying by two and
/// adding each bit from the most to least significant.
fn format_magnitude(s: &Storage) -> String {
    if s.is_zero() {
        return String::from("0");
    }
    if significant_len(s) == 1 {
        return s.words()[0].to_string();
    }

    const CHUNK_BASE: u64 = 1_000_000_000;
    let mut chunks: Vec<u64> = vec![0];
    for i in (0..s.bit_length()).rev() {
        let mut carry = 0;
        for c in &mut chunks {
            let v = *c * 2 + carry;
            *c = v % CHUNK_BASE;
            carry = v / CHUNK_BASE;
        }
        if carry > 0 {
            chunks.push(carry);
        }
        if s.get_bit(i) {
            let mut idx = 0;
            let mut carry = 1;
            while carry > 0 {
                if idx == chunks.len() {
                    chunks.push(0);
                }
                let v = chunks[idx] + carry;
                chunks[idx] = v % CHUNK_BASE;
                carry = v / CHUNK_BASE;
                idx += 1;
            }
        }
    }

    let mut out = String::new();
    for (i, c) in chunks.iter().enumerate().rev() {
        if i == chunks.len() - 1 {
            out.push_str(&c.to_string());
        } else {
            out.push_str(&format!("{c:09}"));
        }
    }
    out
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::repr::{abs, isqrt, pow};

    #[test]
    fn round_trips_large_decimal() {
        let s = "123456789012345678901234567890";
        assert_eq!(Binary::from_decimal(s).unwrap().to_string(), s);
    }

    #[test]
    fn scenario_large_addition() {
        let a = Binary::from_decimal("123456789012345678901234567890").unwrap();
        let b = Binary::from_decimal("98765432109876543210987654321").unwrap();
        assert_eq!(
            (a + b).to_string(),
            "222222221122222222112222222211"
        );
    }

    #[test]
    fn scenario_division() {
        let a = Binary::from_decimal("65550").unwrap();
        let b = Binary::from_decimal("3").unwrap();
        assert_eq!((a.clone() / b.clone()).to_string(), "21850");
        assert_eq!((a % b).to_string(), "0");

        let a = Binary::from_decimal("21850").unwrap();
        let b = Binary::from_decimal("4").unwrap();
        assert_eq!((a.clone() / b.clone()).to_string(), "5462");
        assert_eq!((a % b).to_string(), "2");
    }

    #[test]
    fn scenario_isqrt() {
        let x = Binary::from_decimal(
            "12345678901234567890123456789012345678900000000000000000000000000000000000000000000000000000000000000",
        )
        .unwrap();
        let expected =
            Binary::from_decimal("111111110611111109936111105818611081081542864454310").unwrap();
        assert_eq!(isqrt(&x).unwrap(), expected);
    }

    #[test]
    fn scenario_errors() {
        let forty_two = Binary::from(42i64);
        let zero = Binary::zero();
        assert_eq!(
            forty_two.checked_div(&zero).unwrap_err(),
            Error::DivisionByZero
        );
        assert_eq!(
            forty_two.checked_rem(&zero).unwrap_err(),
            Error::DivisionByZero
        );
        assert_eq!(
            isqrt(&Binary::from_decimal("-1").unwrap()).unwrap_err(),
            Error::Domain
        );
        assert_eq!(Binary::from_decimal("01").unwrap_err(), Error::Parse);
        assert_eq!(Binary::from_decimal("-").unwrap_err(), Error::Parse);
        assert_eq!(Binary::from_decimal("12a3").unwrap_err(), Error::Parse);
    }

    #[test]
    fn native_integer_bridging() {
        let x = Binary::from(-123i32);
        assert_eq!(i32::try_from(x.clone()).unwrap(), -123);
        assert_eq!(u32::try_from(x).unwrap_err(), Error::Overflow);

        let max = Binary::from(u64::MAX);
        assert_eq!(u64::try_from(max.clone()).unwrap(), u64::MAX);
        assert!(i64::try_from(max).is_err());

        assert_eq!(i64::try_from(Binary::from(i64::MIN)).unwrap(), i64::MIN);
    }

    proptest! {
        #[test]
        fn ring_axioms(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000, c in -1_000_000i64..1_000_000) {
            let (a, b, c) = (Binary::from(a), Binary::from(b), Binary::from(c));
            prop_assert_eq!(a.clone() + b.clone(), b.clone() + a.clone());
            prop_assert_eq!((a.clone() + b.clone()) + c.clone(), a.clone() + (b.clone() + c.clone()));
            prop_assert_eq!(a.clone() + Binary::zero(), a.clone());
            prop_assert_eq!(a.clone() - a.clone(), Binary::zero());
            prop_assert_eq!((a.clone() * b.clone()) * c.clone(), a.clone() * (b.clone() * c.clone()));
            prop_assert_eq!(a.clone() * (b.clone() + c.clone()), a.clone() * b.clone() + a * c);
        }

        #[test]
        fn division_identity(a in -1_000_000i64..1_000_000, b in 1i64..1_000_000) {
            let (ba, bb) = (Binary::from(a), Binary::from(b));
            let q = ba.clone() / bb.clone();
            let r = ba.clone() % bb.clone();
            prop_assert_eq!(q * bb + r.clone(), ba);
            if a % b != 0 {
                prop_assert_eq!(r.is_negative(), a < 0);
            }
        }

        #[test]
        fn pow_matches_definition(base in -100i64..100, exp in 0u64..8) {
            let b = Binary::from(base);
            prop_assert_eq!(pow(&b, 0), Binary::from(1i64));
            if exp >= 1 {
                prop_assert_eq!(pow(&b, exp), pow(&b, exp - 1) * b.clone());
            }
        }

        #[test]
        fn isqrt_bounds(x in 0i64..10_000_000) {
            let bx = Binary::from(x);
            let root = isqrt(&bx).unwrap();
            let next = root.clone() + Binary::from(1i64);
            prop_assert!(root.clone() * root <= bx);
            prop_assert!(bx < next.clone() * next);
        }

        #[test]
        fn abs_matches_native(x in i64::MIN + 1..i64::MAX) {
            prop_assert_eq!(abs(&Binary::from(x)), Binary::from(x.abs()));
        }
    }
}
