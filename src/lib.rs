#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod binary;
mod decimal;
mod error;
mod factorial;
mod repr;
mod storage;
mod word;

pub use binary::Binary;
pub use error::Error;
pub use factorial::Factorial;
pub use repr::{abs, isqrt, pow, to_string};
