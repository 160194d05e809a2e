//! # Fixed-Width Unsigned Overflow
//!
//! Descriptors for emulating `uint128`/`uint256` wraparound on top of
//! arbitrary-precision results.

use std::fmt;

use lazy_static::lazy_static;
use num_bigint::BigInt;
use num_traits::One;

lazy_static! {
    static ref TWO_POW_128: BigInt = BigInt::one() << 128u32;
    static ref TWO_POW_256: BigInt = BigInt::one() << 256u32;

    /// `2^128 - 1`
    pub static ref MAX_UINT128: BigInt = max_uint(128);
    /// `2^256 - 1`
    pub static ref MAX_UINT256: BigInt = max_uint(256);

    /// Unsigned 128-bit overflow
    pub static ref UINT128: BitLen = BitLen {
        bits: 128,
        wrap: wrap_uint128,
    };
    /// Unsigned 256-bit overflow
    pub static ref UINT256: BitLen = BitLen {
        bits: 256,
        wrap: wrap_uint256,
    };
}

/// A fixed unsigned bit width and its wrap function.
#[derive(Clone, Copy)]
pub struct BitLen {
    bits: u64,
    wrap: fn(&BigInt) -> BigInt,
}

impl BitLen {
    /// Configured width in bits
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Reduce a signed result into `[0, 2^bits)`.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::{UINT256, MAX_UINT256};
    /// use num_bigint::BigInt;
    ///
    /// assert_eq!(UINT256.wrap(&BigInt::from(-1)), *MAX_UINT256);
    /// assert_eq!(UINT256.wrap(&(&*MAX_UINT256 + 1)), BigInt::from(0));
    /// ```
    pub fn wrap(&self, value: &BigInt) -> BigInt {
        (self.wrap)(value)
    }

    /// Whether a pre-wrap result does not fit the width
    pub fn overflows(&self, value: &BigInt) -> bool {
        value.bits() > self.bits
    }

    /// Largest representable value, `2^bits - 1`
    pub fn max_value(&self) -> BigInt {
        max_uint(self.bits)
    }
}

impl fmt::Debug for BitLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitLen").field("bits", &self.bits).finish()
    }
}

fn max_uint(bits: u64) -> BigInt {
    (BigInt::one() << bits) - BigInt::one()
}

fn wrap_uint128(value: &BigInt) -> BigInt {
    truncate_add(value, &TWO_POW_128, &MAX_UINT128)
}

fn wrap_uint256(value: &BigInt) -> BigInt {
    truncate_add(value, &TWO_POW_256, &MAX_UINT256)
}

fn truncate_add(value: &BigInt, modulus: &BigInt, mask: &BigInt) -> BigInt {
    (value + modulus) & mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_values() {
        assert_eq!(MAX_UINT128.to_string(), "340282366920938463463374607431768211455");
        assert_eq!(
            MAX_UINT256.to_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
        assert_eq!(UINT128.max_value(), *MAX_UINT128);
    }

    #[test]
    fn test_wrap_128() {
        assert_eq!(UINT128.wrap(&BigInt::from(5)), BigInt::from(5));
        assert_eq!(UINT128.wrap(&BigInt::from(-1)), *MAX_UINT128);
        assert_eq!(UINT128.wrap(&(&*MAX_UINT128 + 2)), BigInt::from(1));
    }

    #[test]
    fn test_wrap_256() {
        assert_eq!(UINT256.wrap(&(&*MAX_UINT256 + 1)), BigInt::from(0));
        assert_eq!(UINT256.wrap(&BigInt::from(-5)), &*MAX_UINT256 - 4);
    }

    #[test]
    fn test_overflows() {
        assert!(!UINT128.overflows(&MAX_UINT128));
        assert!(UINT128.overflows(&(&*MAX_UINT128 + 1)));
        assert!(UINT256.overflows(&(BigInt::from(-1) * &*TWO_POW_256)));
        assert_eq!(UINT256.bits(), 256);
    }
}
