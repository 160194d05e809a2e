//! # Bit Scans
//!
//! Most/least significant bit of non-negative big integers, found by binary
//! search over halves of the bit length.

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

/// Index of the most significant set bit.
///
/// Satisfies `x >= 2^msb(x)` and `x < 2^(msb(x) + 1)`. Returns 0 for 0.
///
/// # Panics
/// Panics if `x` is negative.
///
/// # Examples
/// ```
/// use decimal_math::most_significant_bit;
/// use num_bigint::BigInt;
///
/// assert_eq!(most_significant_bit(&BigInt::from(1)), 0);
/// assert_eq!(most_significant_bit(&BigInt::from(3)), 1);
/// assert_eq!(most_significant_bit(&BigInt::from(256)), 8);
/// ```
pub fn most_significant_bit(x: &BigInt) -> u64 {
    if x.is_negative() {
        panic!("bit scan of negative number");
    }
    if x.is_zero() {
        return 0;
    }

    // The top set bit always sits below `width`.
    let mut x = x.clone();
    let mut width = x.bits();
    let mut msb = 0u64;
    while width > 1 {
        let half = width / 2;
        let high = &x >> half;
        if high.is_zero() {
            width = half;
        } else {
            x = high;
            msb += half;
            width -= half;
        }
    }
    msb
}

/// Index of the least significant set bit.
///
/// Satisfies `x & 2^lsb(x) != 0` and `x & (2^lsb(x) - 1) == 0`. Returns 0 for 0.
///
/// # Panics
/// Panics if `x` is negative.
///
/// # Examples
/// ```
/// use decimal_math::least_significant_bit;
/// use num_bigint::BigInt;
///
/// assert_eq!(least_significant_bit(&BigInt::from(3)), 0);
/// assert_eq!(least_significant_bit(&BigInt::from(12)), 2);
/// ```
pub fn least_significant_bit(x: &BigInt) -> u64 {
    if x.is_negative() {
        panic!("bit scan of negative number");
    }
    if x.is_zero() {
        return 0;
    }

    // The lowest set bit always sits below `width`.
    let mut x = x.clone();
    let mut width = x.bits();
    let mut lsb = 0u64;
    while width > 1 {
        let half = width / 2;
        let mask = (BigInt::one() << half) - BigInt::one();
        if (&x & &mask).is_zero() {
            x >>= half;
            lsb += half;
            width -= half;
        } else {
            width = half;
        }
    }
    lsb
}
