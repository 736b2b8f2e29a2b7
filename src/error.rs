//! Error conditions raised by the public operations of this crate.

use core::fmt;

/// The error type shared by every fallible operation in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A decimal string did not match the accepted grammar: an optional
    /// leading `-`, then one or more digits `0`-`9`, with no leading zero
    /// other than the literal `"0"`.
    Parse,
    /// A division or modulo was attempted with a zero divisor.
    DivisionByZero,
    /// [`isqrt`](crate::isqrt) was called on a negative value.
    Domain,
    /// An explicit conversion to a native integer type did not fit.
    Overflow,
    /// A factorial coefficient index exceeded the codec's largest
    /// addressable index.
    OutOfRange,
    /// A factorial coefficient value exceeded its mixed-radix bound
    /// `0 <= c_index <= index`.
    InvalidCoefficient,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "invalid decimal integer literal"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::Domain => write!(f, "isqrt of a negative value"),
            Self::Overflow => write!(f, "value does not fit the target integer type"),
            Self::OutOfRange => write!(f, "factorial coefficient index out of range"),
            Self::InvalidCoefficient => {
                write!(f, "factorial coefficient exceeds its mixed-radix bound")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Internal-only error raised when decimal-string subtraction underflows.
///
/// The public API never exposes this: the operator scaffolding in
/// [`crate::repr`] always orders the operands of a magnitude subtraction so
/// that the minuend is the larger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Underflow;
