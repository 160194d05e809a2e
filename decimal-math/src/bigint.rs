//! # Big Integer
//!
//! Immutable wrapper around `num_bigint::BigInt`.
//!
//! A default-constructed `BigInt` is *nil*: it is distinct from zero when
//! formatted or serialized (`<nil>`, empty bytes, JSON `null`), and counts as
//! zero in arithmetic and comparisons.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;
use std::str::FromStr;

use lazy_static::lazy_static;
use num_bigint::BigInt as Int;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::{bit, MathError, MathResult, RoundingMode};

lazy_static! {
    static ref NIL_VALUE: Int = Int::zero();
}

/// Immutable arbitrary-precision signed integer.
#[derive(Clone, Default)]
pub struct BigInt {
    i: Option<Int>,
}

impl BigInt {
    /// Zero (non-nil)
    pub fn zero() -> Self {
        Self::from_int(Int::zero())
    }

    /// One
    pub fn one() -> Self {
        Self::from_int(Int::one())
    }

    /// Ten
    pub fn ten() -> Self {
        Self::from_int(Int::from(10))
    }

    /// The nil value
    pub const fn nil() -> Self {
        Self { i: None }
    }

    /// Wrap a `num_bigint::BigInt`
    pub fn from_int(i: Int) -> Self {
        Self { i: Some(i) }
    }

    /// Parse with an optional radix prefix.
    ///
    /// `0x`/`0X` selects hex, `0b`/`0B` selects binary; anything else is
    /// decimal. Returns `None` if the text is not a valid integer.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::BigInt;
    ///
    /// assert_eq!(BigInt::from_str_prefixed("0x10").unwrap(), BigInt::from(16));
    /// assert_eq!(BigInt::from_str_prefixed("0b11").unwrap(), BigInt::from(3));
    /// assert_eq!(BigInt::from_str_prefixed("-42").unwrap(), BigInt::from(-42));
    /// assert!(BigInt::from_str_prefixed("0xzz").is_none());
    /// ```
    pub fn from_str_prefixed(s: &str) -> Option<Self> {
        let (digits, radix) = if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            (rest, 16)
        } else if let Some(rest) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
            (rest, 2)
        } else {
            (s, 10)
        };
        Int::parse_bytes(digits.as_bytes(), radix).map(Self::from_int)
    }

    /// Parse, panicking on malformed input
    pub fn must_from_str(s: &str) -> Self {
        match Self::from_str_prefixed(s) {
            Some(b) => b,
            None => panic!("invalid string {}", s),
        }
    }

    /// The wrapped value; nil reads as zero.
    pub(crate) fn raw(&self) -> &Int {
        self.i.as_ref().unwrap_or(&NIL_VALUE)
    }

    pub(crate) fn inner(&self) -> Option<&Int> {
        self.i.as_ref()
    }

    /// A copy of the wrapped value, or `None` for nil
    pub fn to_big_int(&self) -> Option<Int> {
        self.i.clone()
    }

    /// Consume into the wrapped value; nil becomes zero
    pub fn into_inner(self) -> Int {
        self.i.unwrap_or_default()
    }

    pub fn add(&self, other: &BigInt) -> BigInt {
        Self::from_int(self.raw() + other.raw())
    }

    pub fn sub(&self, other: &BigInt) -> BigInt {
        Self::from_int(self.raw() - other.raw())
    }

    pub fn mul(&self, other: &BigInt) -> BigInt {
        Self::from_int(self.raw() * other.raw())
    }

    /// Euclidean modulus; the result is never negative.
    ///
    /// # Panics
    /// Panics if `modulus` is zero.
    pub fn rem_euclid(&self, modulus: &BigInt) -> BigInt {
        require_non_zero(modulus);
        let rem = self.raw() % modulus.raw();
        if rem.is_negative() {
            Self::from_int(rem + modulus.raw().abs())
        } else {
            Self::from_int(rem)
        }
    }

    /// Raise to a non-negative integer power
    pub fn power(&self, exp: u32) -> BigInt {
        Self::from_int(self.raw().pow(exp))
    }

    /// Integer square root, rounded down.
    ///
    /// # Panics
    /// Panics for negative values.
    pub fn sqrt(&self) -> BigInt {
        if self.is_negative() {
            panic!("square root of negative number");
        }
        Self::from_int(self.raw().sqrt())
    }

    pub fn shift_left(&self, n: u64) -> BigInt {
        Self::from_int(self.raw() << n)
    }

    pub fn shift_right(&self, n: u64) -> BigInt {
        Self::from_int(self.raw() >> n)
    }

    /// Truncating division
    pub fn quo_down(&self, other: &BigInt) -> BigInt {
        self.quo(other, RoundingMode::Down)
    }

    /// Division with rounding.
    ///
    /// Only `Down`, `Up`, `Ceiling` and `Unnecessary` are supported.
    ///
    /// # Panics
    /// Panics on division by zero, on any other rounding mode, and under
    /// `Unnecessary` when the remainder is non-zero.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::{BigInt, RoundingMode};
    ///
    /// let five = BigInt::from(5);
    /// assert_eq!(five.quo(&BigInt::from(2), RoundingMode::Down), BigInt::from(2));
    /// assert_eq!(five.quo(&BigInt::from(2), RoundingMode::Up), BigInt::from(3));
    /// assert_eq!(five.quo(&BigInt::from(-2), RoundingMode::Up), BigInt::from(-3));
    /// assert_eq!(five.quo(&BigInt::from(-2), RoundingMode::Ceiling), BigInt::from(-2));
    /// ```
    pub fn quo(&self, other: &BigInt, mode: RoundingMode) -> BigInt {
        require_non_zero(other);
        let (a, b) = (self.raw(), other.raw());
        let quo = a / b;
        let exact = (a % b).is_zero();

        let rounded = match mode {
            RoundingMode::Down => quo,
            RoundingMode::Up => {
                if exact {
                    quo
                } else {
                    away_from_zero(quo, a.sign() != b.sign())
                }
            }
            RoundingMode::Ceiling => {
                if exact || a.sign() != b.sign() {
                    quo
                } else {
                    quo + 1
                }
            }
            RoundingMode::Unnecessary => {
                if !exact {
                    panic!("expected 0 remainder");
                }
                quo
            }
            RoundingMode::HalfUp | RoundingMode::HalfDown | RoundingMode::HalfEven => {
                panic!("invalid rounding mode")
            }
        };
        Self::from_int(rounded)
    }

    pub fn equal(&self, other: &BigInt) -> bool {
        self.cmp(other) == Ordering::Equal
    }

    pub fn gt(&self, other: &BigInt) -> bool {
        self.cmp(other) == Ordering::Greater
    }

    pub fn gte(&self, other: &BigInt) -> bool {
        self.cmp(other) != Ordering::Less
    }

    pub fn lt(&self, other: &BigInt) -> bool {
        self.cmp(other) == Ordering::Less
    }

    pub fn lte(&self, other: &BigInt) -> bool {
        self.cmp(other) != Ordering::Greater
    }

    /// -1, 0 or +1
    pub fn sign(&self) -> i32 {
        if self.raw().is_negative() {
            -1
        } else if self.raw().is_zero() {
            0
        } else {
            1
        }
    }

    pub fn is_nil(&self) -> bool {
        self.i.is_none()
    }

    pub fn is_zero(&self) -> bool {
        self.raw().is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.raw().is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.raw().is_positive()
    }

    pub fn neg(&self) -> BigInt {
        Self::from_int(-self.raw())
    }

    pub fn abs(&self) -> BigInt {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// Number of bits in the magnitude
    pub fn bit_len(&self) -> u64 {
        self.raw().bits()
    }

    /// See [`bit::most_significant_bit`]
    pub fn most_significant_bit(&self) -> u64 {
        bit::most_significant_bit(self.raw())
    }

    /// See [`bit::least_significant_bit`]
    pub fn least_significant_bit(&self) -> u64 {
        bit::least_significant_bit(self.raw())
    }

    /// The value as `i64`, if it fits
    pub fn to_i64(&self) -> Option<i64> {
        self.raw().to_i64()
    }
}

fn away_from_zero(quo: Int, negative: bool) -> Int {
    if negative {
        quo - 1
    } else {
        quo + 1
    }
}

fn require_non_zero(divisor: &BigInt) {
    if divisor.is_zero() {
        panic!("division by zero");
    }
}

/// The larger of two values; `a` on a tie
pub fn max(a: BigInt, b: BigInt) -> BigInt {
    if a >= b {
        a
    } else {
        b
    }
}

/// The smaller of two values; `a` on a tie
pub fn min(a: BigInt, b: BigInt) -> BigInt {
    if a <= b {
        a
    } else {
        b
    }
}

impl PartialEq for BigInt {
    fn eq(&self, other: &Self) -> bool {
        self.raw() == other.raw()
    }
}

impl Eq for BigInt {}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw().cmp(other.raw())
    }
}

impl Hash for BigInt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw().hash(state);
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInt({})", self)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.i {
            Some(i) => write!(f, "{}", i),
            None => f.write_str("<nil>"),
        }
    }
}

impl FromStr for BigInt {
    type Err = MathError;

    fn from_str(s: &str) -> MathResult<Self> {
        Self::from_str_prefixed(s).ok_or_else(|| MathError::InvalidInteger(s.to_string()))
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BigInt {
                fn from(value: $t) -> Self {
                    Self::from_int(Int::from(value))
                }
            }
        )*
    };
}

impl_from_primitive!(i32, i64, i128, u32, u64, u128);

impl From<Int> for BigInt {
    fn from(value: Int) -> Self {
        Self::from_int(value)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident) => {
        impl ops::$trait<&BigInt> for &BigInt {
            type Output = BigInt;

            fn $method(self, rhs: &BigInt) -> BigInt {
                BigInt::$method(self, rhs)
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);

impl ops::Neg for BigInt {
    type Output = BigInt;

    fn neg(self) -> BigInt {
        BigInt::neg(&self)
    }
}

impl ops::Neg for &BigInt {
    type Output = BigInt;

    fn neg(self) -> BigInt {
        BigInt::neg(self)
    }
}
