//! Decimal-string utilities.
//!
//! Every function here operates on *unsigned* decimal strings: a non-empty
//! run of ASCII digits `0`-`9` with no leading zero other than the literal
//! `"0"`. [`is_valid_integral`] is the one exception — it additionally
//! accepts an optional leading `-`, since it validates the public string
//! format described by the crate's [`error::Error::Parse`](crate::error::Error::Parse).
//!
//! These are the reference string-arithmetic routines: the binary kernel
//! uses [`div_by_small`] to parse decimal into base `2^64`, the factorial
//! kernel uses the same to peel off mixed-radix digits, and [`mul`]/[`div`]
//! back the factorial kernel's multiply and divide.

use alloc::{string::String, vec, vec::Vec};

use crate::error::{Error, Underflow};

/// Which end of a digit run [`trim_zeros`] strips.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trim {
    /// Strip from the most significant (first) digit.
    Leading,
    /// Strip from the least significant (last) digit.
    Trailing,
}

/// Remove zeros from one end of a big-endian ASCII digit string, restoring a
/// single `'0'` if the string would otherwise become empty.
pub(crate) fn trim_zeros(s: &str, mode: Trim) -> String {
    let bytes = s.as_bytes();
    let trimmed: &[u8] = match mode {
        Trim::Leading => {
            let start = bytes.iter().position(|&b| b != b'0').unwrap_or(bytes.len());
            &bytes[start..]
        }
        Trim::Trailing => {
            let end = bytes.iter().rposition(|&b| b != b'0').map_or(0, |i| i + 1);
            &bytes[..end]
        }
    };
    if trimmed.is_empty() {
        String::from("0")
    } else {
        // SAFETY: `trimmed` is a sub-slice of ASCII digit bytes.
        String::from_utf8(trimmed.to_vec()).expect("ASCII digit slice is valid UTF-8")
    }
}

/// Accepts an optional leading `-`, then one or more digits `0`-`9`. Rejects
/// the empty string, a lone `-`, a leading zero on a multi-digit run
/// (including one following `-`), and any non-digit character.
pub fn is_valid_integral(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    digits.len() == 1 || digits.as_bytes()[0] != b'0'
}

/// Compare two unsigned, leading-zero-free decimal strings: `a >= b`.
pub(crate) fn ge(a: &str, b: &str) -> bool {
    match a.len().cmp(&b.len()) {
        core::cmp::Ordering::Equal => a >= b,
        ord => ord == core::cmp::Ordering::Greater,
    }
}

/// Big-endian ASCII decimal digits converted to little-endian digit values.
fn to_digits_le(s: &str) -> Vec<u8> {
    s.bytes().rev().map(|b| b - b'0').collect()
}

/// Little-endian digit values converted back to a normalized decimal string.
fn from_digits_le(mut digits: Vec<u8>) -> String {
    while digits.len() > 1 && *digits.last().unwrap() == 0 {
        digits.pop();
    }
    digits
        .iter()
        .rev()
        .map(|&d| (d + b'0') as char)
        .collect()
}

/// Schoolbook ripple addition of two unsigned decimal strings.
pub(crate) fn add(a: &str, b: &str) -> String {
    let da = to_digits_le(a);
    let db = to_digits_le(b);
    let mut out = Vec::with_capacity(da.len().max(db.len()) + 1);
    let mut carry = 0u8;
    for i in 0..da.len().max(db.len()) {
        let x = da.get(i).copied().unwrap_or(0);
        let y = db.get(i).copied().unwrap_or(0);
        let s = x + y + carry;
        out.push(s % 10);
        carry = s / 10;
    }
    if carry > 0 {
        out.push(carry);
    }
    from_digits_le(out)
}

/// Schoolbook ripple subtraction of two unsigned decimal strings. Requires
/// `a >= b`; fails with [`Underflow`] otherwise.
pub(crate) fn sub(a: &str, b: &str) -> Result<String, Underflow> {
    if !ge(a, b) {
        return Err(Underflow);
    }
    let da = to_digits_le(a);
    let db = to_digits_le(b);
    let mut out = Vec::with_capacity(da.len());
    let mut borrow = 0i8;
    for i in 0..da.len() {
        let x = i8::try_from(da[i]).unwrap() - borrow;
        let y = i8::try_from(db.get(i).copied().unwrap_or(0)).unwrap();
        if x < y {
            out.push(u8::try_from(x + 10 - y).unwrap());
            borrow = 1;
        } else {
            out.push(u8::try_from(x - y).unwrap());
            borrow = 0;
        }
    }
    Ok(from_digits_le(out))
}

/// Schoolbook multiplication of two unsigned decimal strings.
pub(crate) fn mul(a: &str, b: &str) -> String {
    if a == "0" || b == "0" {
        return String::from("0");
    }
    let da = to_digits_le(a);
    let db = to_digits_le(b);
    let mut acc = vec![0u32; da.len() + db.len()];
    for (i, &x) in da.iter().enumerate() {
        if x == 0 {
            continue;
        }
        let mut carry = 0u32;
        for (j, &y) in db.iter().enumerate() {
            let idx = i + j;
            let s = acc[idx] + u32::from(x) * u32::from(y) + carry;
            acc[idx] = s % 10;
            carry = s / 10;
        }
        let mut k = i + db.len();
        while carry > 0 {
            let s = acc[k] + carry;
            acc[k] = s % 10;
            carry = s / 10;
            k += 1;
        }
    }
    from_digits_le(acc.into_iter().map(|d| u8::try_from(d).unwrap()).collect())
}

/// Divide an unsigned decimal string by a small positive integer, returning
/// the quotient string and the remainder. Fails with
/// [`Error::DivisionByZero`] if `k == 0`.
pub(crate) fn div_by_small(a: &str, k: u64) -> Result<(String, u64), Error> {
    if k == 0 {
        return Err(Error::DivisionByZero);
    }
    let mut quotient = Vec::with_capacity(a.len());
    let mut rem: u64 = 0;
    for b in a.bytes() {
        let cur = rem * 10 + u64::from(b - b'0');
        quotient.push(char::from(u8::try_from(cur / k).unwrap() + b'0'));
        rem = cur % k;
    }
    let quotient: String = quotient.into_iter().collect();
    Ok((trim_zeros(&quotient, Trim::Leading), rem))
}

/// Long division of two unsigned decimal strings. Fails with
/// [`Error::DivisionByZero`] if `b == "0"`. Returns `(quotient, remainder)`,
/// both normalized. If `a < b`, returns `("0", a)`.
pub(crate) fn div(a: &str, b: &str) -> Result<(String, String), Error> {
    if b == "0" {
        return Err(Error::DivisionByZero);
    }
    if !ge(a, b) {
        return Ok((String::from("0"), String::from(a)));
    }

    let mut remainder = String::from("0");
    let mut quotient = String::with_capacity(a.len());
    for digit in a.bytes() {
        remainder.push(char::from(digit));
        remainder = trim_zeros(&remainder, Trim::Leading);

        let mut q = 0u8;
        while ge(&remainder, b) {
            remainder = sub(&remainder, b).expect("remainder >= b checked by `ge`");
            q += 1;
        }
        quotient.push(char::from(q + b'0'));
    }

    Ok((trim_zeros(&quotient, Trim::Leading), remainder))
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn validates_grammar() {
        assert!(is_valid_integral("0"));
        assert!(is_valid_integral("123"));
        assert!(is_valid_integral("-123"));
        assert!(!is_valid_integral(""));
        assert!(!is_valid_integral("-"));
        assert!(!is_valid_integral("01"));
        assert!(!is_valid_integral("-01"));
        assert!(!is_valid_integral("12a3"));
    }

    #[test]
    fn add_matches_known_values() {
        assert_eq!(
            add(
                "123456789012345678901234567890",
                "98765432109876543210987654321"
            ),
            "222222221122222222112222222211"
        );
    }

    #[test]
    fn div_matches_known_values() {
        assert_eq!(div("65550", "3").unwrap(), ("21850".into(), "0".into()));
        let (q, r) = div_by_small("65550", 3).unwrap();
        assert_eq!((q.as_str(), r), ("21850", 0));
        let (q, r) = div_by_small("21850", 4).unwrap();
        assert_eq!((q.as_str(), r), ("5462", 2));
    }

    #[test]
    fn div_by_zero_fails() {
        assert_eq!(div("1", "0").unwrap_err(), Error::DivisionByZero);
        assert_eq!(div_by_small("1", 0).unwrap_err(), Error::DivisionByZero);
    }

    #[test]
    fn sub_underflow_is_rejected() {
        assert!(sub("1", "2").is_err());
    }

    proptest! {
        #[test]
        fn add_sub_roundtrip(a in 0u64..1_000_000_000, b in 0u64..1_000_000_000) {
            let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
            let sum = add(&lo.to_string(), &(hi - lo).to_string());
            prop_assert_eq!(sum, lo.to_string());
            let back = sub(&hi.to_string(), &lo.to_string()).unwrap();
            prop_assert_eq!(back, (hi - lo).to_string());
        }

        #[test]
        fn mul_matches_native(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            prop_assert_eq!(mul(&a.to_string(), &b.to_string()), (a * b).to_string());
        }

        #[test]
        fn div_matches_native(a in 0u64..1_000_000_000, b in 1u64..1_000_000) {
            let (q, r) = div(&a.to_string(), &b.to_string()).unwrap();
            prop_assert_eq!(q, (a / b).to_string());
            prop_assert_eq!(r, (a % b).to_string());
        }
    }
}
