//! # Fixed-Point Decimal
//!
//! `Decimal` is an immutable `unscaled × 10^-precision` value. Binary
//! operations first align both operands to the larger precision (always
//! exact), then operate on the unscaled integers. Multiplication and division
//! round exactly once, at the target precision.

use std::cmp::Ordering;
use std::fmt;
use std::ops;
use std::str::FromStr;

use num_bigint::BigInt as Int;
use num_traits::{Signed, Zero};

use crate::decimal_round::{pow10, round_int};
use crate::{BigInt, BitLen, MathError, MathResult, RoundingMode};

/// Largest supported number of fractional digits
pub const MAX_PRECISION: u32 = 128;

/// Iteration cap for `approx_root` and `log2`
pub const MAX_ITERATIONS: usize = 300;

/// Largest exponent magnitude accepted in scientific notation
pub const MAX_EXPONENT: u32 = 1024;

/// Immutable fixed-point decimal.
///
/// The default value is *nil*, mirroring [`BigInt`]'s nil state.
#[derive(Clone, Default)]
pub struct Decimal {
    i: BigInt,
    prec: u32,
}

impl Decimal {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Integer value with precision 0
    pub fn new(value: i64) -> Self {
        Self::from_parts(Int::from(value), 0)
    }

    /// Unscaled integer with an explicit precision.
    ///
    /// # Panics
    /// Panics if `precision` exceeds [`MAX_PRECISION`].
    ///
    /// # Examples
    /// ```
    /// use decimal_math::Decimal;
    ///
    /// assert_eq!(Decimal::new_with_prec(0, 18).to_string(), "0.000000000000000000");
    /// assert_eq!(Decimal::new_with_prec(-15, 1).to_string(), "-1.5");
    /// ```
    pub fn new_with_prec(value: i64, precision: u32) -> Self {
        Self::require_precision(precision);
        Self::from_parts(Int::from(value), precision)
    }

    /// Unsigned unscaled integer with an explicit precision
    pub fn from_u64(value: u64, precision: u32) -> Self {
        Self::require_precision(precision);
        Self::from_parts(Int::from(value), precision)
    }

    /// `value` followed by `precision` zero fractional digits.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::Decimal;
    ///
    /// assert_eq!(Decimal::with_append_prec(1, 2).to_string(), "1.00");
    /// ```
    pub fn with_append_prec(value: i64, precision: u32) -> Self {
        Self::require_precision(precision);
        Self::from_parts(Int::from(value) * &*pow10(precision), precision)
    }

    /// Unsigned variant of [`Decimal::with_append_prec`]
    pub fn from_u64_with_append_prec(value: u64, precision: u32) -> Self {
        Self::require_precision(precision);
        Self::from_parts(Int::from(value) * &*pow10(precision), precision)
    }

    /// Whole number from a big integer
    pub fn from_big_int(value: Int) -> Self {
        Self::from_parts(value, 0)
    }

    /// Big unscaled integer with an explicit precision
    pub fn from_big_int_with_prec(value: Int, precision: u32) -> Self {
        Self::require_precision(precision);
        Self::from_parts(value, precision)
    }

    /// Convert a float through its shortest round-trip decimal text.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::Decimal;
    ///
    /// let value = Decimal::from_f64(1.000000001).unwrap();
    /// assert_eq!(value.precision(), 9);
    /// assert!(Decimal::from_f64(f64::NAN).is_err());
    /// ```
    pub fn from_f64(value: f64) -> MathResult<Self> {
        if !value.is_finite() {
            return Err(MathError::NonFinite);
        }
        format!("{}", value).parse()
    }

    /// Parse decimal text, panicking on malformed input
    pub fn must_from_str(s: &str) -> Self {
        match s.parse() {
            Ok(d) => d,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn zero() -> Self {
        Self::new(0)
    }

    pub fn one() -> Self {
        Self::new(1)
    }

    pub fn ten() -> Self {
        Self::new(10)
    }

    pub(crate) fn from_parts(i: Int, prec: u32) -> Self {
        Self { i: BigInt::from_int(i), prec }
    }

    pub(crate) fn require_precision(precision: u32) {
        if precision > MAX_PRECISION {
            panic!("precision too high");
        }
    }

    /// Unscaled value; nil reads as zero
    pub(crate) fn int(&self) -> &Int {
        self.i.raw()
    }

    // ========================================================================
    // Addition & Subtraction
    // ========================================================================

    pub fn add(&self, other: &Decimal) -> Decimal {
        let (a, b, prec) = rescale_pair(self, other);
        Self::from_parts(a + b, prec)
    }

    /// Add, panicking if the result is negative.
    ///
    /// # Panics
    /// Panics with "negative value" if the sum is below zero.
    pub fn safe_add(&self, other: &Decimal) -> Decimal {
        self.add(other).must_non_negative()
    }

    /// Add a raw unscaled integer at the receiver's precision
    pub fn add_raw(&self, value: i64) -> Decimal {
        Self::from_parts(self.int() + Int::from(value), self.prec)
    }

    pub fn sub(&self, other: &Decimal) -> Decimal {
        let (a, b, prec) = rescale_pair(self, other);
        Self::from_parts(a - b, prec)
    }

    /// Subtract, panicking if the result is negative
    pub fn safe_sub(&self, other: &Decimal) -> Decimal {
        self.sub(other).must_non_negative()
    }

    /// Subtract a raw unscaled integer at the receiver's precision
    pub fn sub_raw(&self, value: i64) -> Decimal {
        Self::from_parts(self.int() - Int::from(value), self.prec)
    }

    // ========================================================================
    // Multiplication & Division
    // ========================================================================

    /// Multiply at the common precision, rounding the product once.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::{Decimal, RoundingMode};
    ///
    /// let x = Decimal::must_from_str("1.111");
    /// assert_eq!(x.mul(&x, RoundingMode::Down).to_string(), "1.234");
    /// assert_eq!(x.mul(&x, RoundingMode::Up).to_string(), "1.235");
    /// ```
    pub fn mul(&self, other: &Decimal, mode: RoundingMode) -> Decimal {
        let (a, b, prec) = rescale_pair(self, other);
        Self::from_parts(a * b, prec).round(mode)
    }

    /// [`Decimal::mul`] with [`RoundingMode::Down`]
    pub fn mul_down(&self, other: &Decimal) -> Decimal {
        self.mul(other, RoundingMode::Down)
    }

    /// Divide at the common precision, rounding the quotient once.
    ///
    /// The raw quotient is computed at twice the target precision, so the
    /// rounding decision sees the full-resolution digits.
    ///
    /// # Panics
    /// Panics on division by zero, and under [`RoundingMode::Unnecessary`]
    /// when the quotient is inexact.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::{Decimal, RoundingMode};
    ///
    /// let five = Decimal::new(5);
    /// assert_eq!(five.quo(&Decimal::new(2), RoundingMode::Down).to_string(), "2");
    /// assert_eq!(five.quo(&Decimal::new(-2), RoundingMode::Up).to_string(), "-3");
    /// assert_eq!(Decimal::new(55).quo(&Decimal::must_from_str("100.0"), RoundingMode::Up).to_string(), "0.6");
    /// ```
    pub fn quo(&self, other: &Decimal, mode: RoundingMode) -> Decimal {
        if other.is_zero() {
            panic!("division by zero");
        }
        self.quo_non_zero(other, mode)
    }

    /// [`Decimal::quo`] returning an error instead of panicking on a zero divisor
    pub fn checked_quo(&self, other: &Decimal, mode: RoundingMode) -> MathResult<Decimal> {
        if other.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        Ok(self.quo_non_zero(other, mode))
    }

    /// [`Decimal::quo`] with [`RoundingMode::Down`]
    pub fn quo_down(&self, other: &Decimal) -> Decimal {
        self.quo(other, RoundingMode::Down)
    }

    fn quo_non_zero(&self, other: &Decimal, mode: RoundingMode) -> Decimal {
        if self.prec == 0 && other.prec == 0 {
            // Promote both sides to precision 1 so a fractional digit survives,
            // then bring the precision-2 quotient back to 0.
            let a = self.int() * &*pow10(1);
            let b = other.int() * &*pow10(1);
            let doubled = a * &*pow10(1) * &*pow10(1);
            return Self::from_parts(truncating_quo(doubled, &b, mode), 2).rescale(0, mode);
        }

        let (a, b, prec) = rescale_pair(self, other);
        let doubled = a * &*pow10(prec) * &*pow10(prec);
        Self::from_parts(round_int(&truncating_quo(doubled, &b, mode), prec, mode), prec)
    }

    // ========================================================================
    // Unsigned Overflow
    // ========================================================================

    pub fn unsigned_add(&self, other: &Decimal, bit_len: &BitLen) -> Decimal {
        self.add(other).wrap(bit_len)
    }

    pub fn unsigned_add_overflow(&self, other: &Decimal, bit_len: &BitLen) -> (Decimal, bool) {
        self.add(other).wrap_overflow(bit_len)
    }

    pub fn unsigned_sub(&self, other: &Decimal, bit_len: &BitLen) -> Decimal {
        self.sub(other).wrap(bit_len)
    }

    pub fn unsigned_sub_overflow(&self, other: &Decimal, bit_len: &BitLen) -> (Decimal, bool) {
        self.sub(other).wrap_overflow(bit_len)
    }

    pub fn unsigned_mul(&self, other: &Decimal, mode: RoundingMode, bit_len: &BitLen) -> Decimal {
        self.mul(other, mode).wrap(bit_len)
    }

    pub fn unsigned_mul_down(&self, other: &Decimal, bit_len: &BitLen) -> Decimal {
        self.unsigned_mul(other, RoundingMode::Down, bit_len)
    }

    pub fn unsigned_mul_overflow(
        &self,
        other: &Decimal,
        mode: RoundingMode,
        bit_len: &BitLen,
    ) -> (Decimal, bool) {
        self.mul(other, mode).wrap_overflow(bit_len)
    }

    pub fn unsigned_quo(&self, other: &Decimal, mode: RoundingMode, bit_len: &BitLen) -> Decimal {
        self.quo(other, mode).wrap(bit_len)
    }

    pub fn unsigned_quo_down(&self, other: &Decimal, bit_len: &BitLen) -> Decimal {
        self.unsigned_quo(other, RoundingMode::Down, bit_len)
    }

    pub fn unsigned_quo_overflow(
        &self,
        other: &Decimal,
        mode: RoundingMode,
        bit_len: &BitLen,
    ) -> (Decimal, bool) {
        self.quo(other, mode).wrap_overflow(bit_len)
    }

    fn wrap(&self, bit_len: &BitLen) -> Decimal {
        Self::from_parts(bit_len.wrap(self.int()), self.prec)
    }

    fn wrap_overflow(&self, bit_len: &BitLen) -> (Decimal, bool) {
        (self.wrap(bit_len), bit_len.overflows(self.int()))
    }

    // ========================================================================
    // Powers, Roots & Logarithms
    // ========================================================================

    /// Raise to an integer power.
    ///
    /// Negative powers return `1 / x^-n` rounded up; every intermediate
    /// product of a positive power rounds half-even.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::Decimal;
    ///
    /// assert_eq!(Decimal::new(2).power(8).to_string(), "256");
    /// assert_eq!(Decimal::with_append_prec(2, 18).power(-2).to_string(), "0.250000000000000000");
    /// ```
    pub fn power(&self, power: i64) -> Decimal {
        match power.cmp(&0) {
            Ordering::Equal => Decimal::one().rescale(self.prec, RoundingMode::Unnecessary),
            Ordering::Less => Decimal::one().quo(&self.power_positive(power.unsigned_abs()), RoundingMode::Up),
            Ordering::Greater => self.power_positive(power.unsigned_abs()),
        }
    }

    fn power_positive(&self, power: u64) -> Decimal {
        let mut odd_factors = Decimal::with_append_prec(1, self.prec);
        let mut square = self.clone();
        let mut remaining = power;
        while remaining > 1 {
            if remaining % 2 != 0 {
                odd_factors = odd_factors.mul(&square, RoundingMode::HalfEven);
            }
            remaining /= 2;
            square = square.mul(&square, RoundingMode::HalfEven);
        }
        square.mul(&odd_factors, RoundingMode::HalfEven)
    }

    /// Square root at the receiver's precision; see [`Decimal::approx_root`]
    pub fn sqrt(&self) -> MathResult<Decimal> {
        self.approx_root(2)
    }

    /// `root`-th root by Newton's method, at the receiver's precision.
    ///
    /// Negative inputs return the negated root of the absolute value. A
    /// `root` below 1 yields 1; a `root` of 1 returns the value unchanged.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::Decimal;
    ///
    /// let root = Decimal::must_from_str("3125.0000").approx_root(5).unwrap();
    /// assert_eq!(root.to_string(), "5.0000");
    ///
    /// let root = Decimal::with_append_prec(2, 18).sqrt().unwrap();
    /// assert_eq!(root.to_string(), "1.414213562373095049");
    /// ```
    pub fn approx_root(&self, root: i64) -> MathResult<Decimal> {
        if self.is_negative() {
            return self.neg().approx_root(root).map(|r| r.neg());
        }
        if root == 1 || self.is_zero() || self.equal(&Decimal::one()) {
            return Ok(self.clone());
        }
        if root < 1 {
            return Ok(Decimal::one().rescale(self.prec, RoundingMode::Unnecessary));
        }

        let root_int = Int::from(root);
        let mut guess = Decimal::with_append_prec(1, self.prec);
        let mut iterations = 0;
        loop {
            let mut prev = guess.power(root - 1);
            if prev.is_zero() {
                prev = Decimal::one();
            }
            let quotient = self
                .checked_quo(&prev, RoundingMode::HalfEven)
                .map_err(|e| MathError::RootIteration(e.to_string()))?;
            let delta = Self::from_parts(quotient.sub(&guess).int() / &root_int, self.prec);
            guess = guess.add(&delta);
            iterations += 1;

            if delta.int().abs() <= Int::from(1) {
                break;
            }
            if iterations >= MAX_ITERATIONS {
                tracing::debug!(root, iterations, value = %self, "approx_root stopped at iteration cap");
                break;
            }
        }
        Ok(guess)
    }

    /// Base-2 logarithm at the receiver's precision.
    ///
    /// # Errors
    /// Returns [`MathError::NonPositiveLogarithm`] for zero or negative values.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::Decimal;
    ///
    /// let log = Decimal::with_append_prec(4, 18).log2().unwrap();
    /// assert_eq!(log, Decimal::new(2));
    /// assert!(Decimal::zero().log2().is_err());
    /// ```
    pub fn log2(&self) -> MathResult<Decimal> {
        if self.sign() <= 0 {
            return Err(MathError::NonPositiveLogarithm);
        }

        let one = Decimal::with_append_prec(1, self.prec);
        let two = Decimal::with_append_prec(2, self.prec);

        // Lift values below 1 above it, and take the shift back off at the end.
        let less_one = self.lt(&one);
        let shift = 4 * i64::from(self.prec);
        let value = if less_one {
            self.mul(&Decimal::new(2).power(shift), RoundingMode::HalfEven)
        } else {
            self.clone()
        };

        let n = value.int_part().most_significant_bit();
        let mut result = Decimal::from_u64_with_append_prec(n, value.prec);

        let mut rem = value.quo(&Decimal::new(2).power(n as i64), RoundingMode::HalfEven);
        let mut i = 0;
        while i < MAX_ITERATIONS && rem.sign() > 0 {
            if rem.gte(&two) {
                let bit = one.quo(&two.power(i as i64), RoundingMode::HalfEven);
                result = result.add(&bit);
                rem = rem.quo(&two, RoundingMode::HalfEven);
            }
            rem = rem.power(2);
            i += 1;
        }

        if less_one {
            result = result.sub(&Decimal::new(shift));
        }
        Ok(result)
    }

    // ========================================================================
    // Integer & Fractional Parts
    // ========================================================================

    /// Integer part, truncated toward zero
    pub fn int_part(&self) -> BigInt {
        self.remainder().0
    }

    /// Integer part and fractional remainder (as an unscaled integer)
    pub fn remainder(&self) -> (BigInt, BigInt) {
        let divisor = pow10(self.prec);
        let int_part = self.int() / &*divisor;
        let frac_part = self.int() % &*divisor;
        (BigInt::from_int(int_part), BigInt::from_int(frac_part))
    }

    // ========================================================================
    // Comparison & Accessors
    // ========================================================================

    /// Panic with "negative value" if below zero; otherwise return a copy
    pub fn must_non_negative(self) -> Decimal {
        if self.is_negative() {
            panic!("negative value");
        }
        self
    }

    pub fn equal(&self, other: &Decimal) -> bool {
        self.cmp(other) == Ordering::Equal
    }

    pub fn gt(&self, other: &Decimal) -> bool {
        self.cmp(other) == Ordering::Greater
    }

    pub fn gte(&self, other: &Decimal) -> bool {
        self.cmp(other) != Ordering::Less
    }

    pub fn lt(&self, other: &Decimal) -> bool {
        self.cmp(other) == Ordering::Less
    }

    pub fn lte(&self, other: &Decimal) -> bool {
        self.cmp(other) != Ordering::Greater
    }

    /// -1, 0 or +1
    pub fn sign(&self) -> i32 {
        self.i.sign()
    }

    pub fn is_nil(&self) -> bool {
        self.i.is_nil()
    }

    pub fn is_zero(&self) -> bool {
        self.i.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.i.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.i.is_positive()
    }

    pub fn neg(&self) -> Decimal {
        Self::from_parts(-self.int(), self.prec)
    }

    pub fn abs(&self) -> Decimal {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// Bit length of the unscaled value
    pub fn bit_len(&self) -> u64 {
        self.i.bit_len()
    }

    pub fn precision(&self) -> u32 {
        self.prec
    }

    /// The unscaled integer
    pub fn unscaled(&self) -> &BigInt {
        &self.i
    }

    /// A copy of the unscaled integer, or `None` for nil
    pub fn to_big_int(&self) -> Option<Int> {
        self.i.to_big_int()
    }
}

/// Integer step of `quo`; under `Unnecessary` the division itself must be exact
fn truncating_quo(dividend: Int, divisor: &Int, mode: RoundingMode) -> Int {
    if mode == RoundingMode::Unnecessary && !(&dividend % divisor).is_zero() {
        panic!("expected 0 remainder");
    }
    dividend / divisor
}

/// Align both unscaled values to the larger precision
fn rescale_pair(a: &Decimal, b: &Decimal) -> (Int, Int, u32) {
    let prec = a.prec.max(b.prec);
    (align(a, prec), align(b, prec), prec)
}

fn align(d: &Decimal, prec: u32) -> Int {
    if d.prec == prec {
        d.int().clone()
    } else {
        d.int() * &*pow10(prec - d.prec)
    }
}

/// The larger of two values; `a` on a tie
pub fn max(a: Decimal, b: Decimal) -> Decimal {
    if a.gte(&b) {
        a
    } else {
        b
    }
}

/// The smaller of two values; `a` on a tie
pub fn min(a: Decimal, b: Decimal) -> Decimal {
    if a.lte(&b) {
        a
    } else {
        b
    }
}

// ============================================================================
// Text Parsing
// ============================================================================

/// Parse `[-]digits[.digits][(e|E)[+-]digits]`.
///
/// # Examples
/// ```
/// use decimal_math::Decimal;
///
/// let value: Decimal = "3.7154500000000011e-15".parse().unwrap();
/// assert_eq!(value.precision(), 31);
/// assert_eq!(value.to_string(), "0.0000000000000037154500000000011");
///
/// assert_eq!("-3.7154e5".parse::<Decimal>().unwrap().to_string(), "-371540");
/// assert!("1.".parse::<Decimal>().is_err());
/// ```
impl FromStr for Decimal {
    type Err = MathError;

    fn from_str(s: &str) -> MathResult<Self> {
        parse_decimal(s).map_err(|e| {
            tracing::trace!(input = s, error = %e, "rejected decimal text");
            e
        })
    }
}

fn parse_decimal(input: &str) -> MathResult<Decimal> {
    let text = input.trim();
    if text.is_empty() {
        return Err(MathError::EmptyString);
    }
    let invalid = || MathError::InvalidDecimal(text.to_string());

    let mut precision: i64 = 0;
    let mantissa = match text.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => {
            let exponent: i32 = text[idx + 1..]
                .parse()
                .map_err(|_| MathError::InvalidExponent(text.to_string()))?;
            if exponent.unsigned_abs() > MAX_EXPONENT {
                return Err(MathError::InvalidExponent(text.to_string()));
            }
            precision -= i64::from(exponent);
            &text[..idx]
        }
        None => text,
    };

    let (negative, body) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    if body.is_empty() {
        return Err(if negative { MathError::EmptyString } else { invalid() });
    }

    let mut parts = body.split('.');
    let int_digits = parts.next().unwrap_or_default();
    let frac_digits = parts.next();
    if parts.next().is_some() || int_digits.is_empty() {
        return Err(invalid());
    }

    let mut digits = int_digits.to_string();
    if let Some(frac) = frac_digits {
        if frac.is_empty() {
            return Err(invalid());
        }
        precision += frac.len() as i64;
        digits.push_str(frac);
    }

    if precision > i64::from(MAX_PRECISION) {
        return Err(MathError::PrecisionOverflow { max: MAX_PRECISION, got: precision });
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let mut unscaled = Int::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
    if negative {
        unscaled = -unscaled;
    }
    if precision < 0 {
        unscaled *= &*pow10(precision.unsigned_abs() as u32);
        precision = 0;
    }
    Ok(Decimal::from_parts(unscaled, precision as u32))
}

impl TryFrom<f64> for Decimal {
    type Error = MathError;

    fn try_from(value: f64) -> MathResult<Self> {
        Decimal::from_f64(value)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::new(value)
    }
}

impl From<Int> for Decimal {
    fn from(value: Int) -> Self {
        Decimal::from_big_int(value)
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = rescale_pair(self, other);
        a.cmp(&b)
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({})", self)
    }
}

impl ops::Add<&Decimal> for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        Decimal::add(self, rhs)
    }
}

impl ops::Sub<&Decimal> for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        Decimal::sub(self, rhs)
    }
}

impl ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal::neg(&self)
    }
}

impl ops::Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal::neg(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_UINT128, MAX_UINT256, UINT256};

    fn dec(s: &str) -> Decimal {
        Decimal::must_from_str(s)
    }

    #[test]
    fn test_parse_valid() {
        let max128 = MAX_UINT128.to_string();
        let zeros = "0".repeat(128);
        let cases: Vec<(String, u32, bool, String)> = vec![
            ("1".into(), 0, false, "1".into()),
            ("0".into(), 0, false, "0".into()),
            ("-1".into(), 0, true, "-1".into()),
            ("1.0001".into(), 4, false, "1.0001".into()),
            ("-1.0001".into(), 4, true, "-1.0001".into()),
            ("3.7154500000000011e-15".into(), 31, false, "0.0000000000000037154500000000011".into()),
            ("-3.7154500000000011e-15".into(), 31, true, "-0.0000000000000037154500000000011".into()),
            ("3.7154e3".into(), 1, false, "3715.4".into()),
            ("-3.7154e3".into(), 1, true, "-3715.4".into()),
            ("3.7154e5".into(), 0, false, "371540".into()),
            ("-3.7154e5".into(), 0, true, "-371540".into()),
            ("1.5E1".into(), 0, false, "15".into()),
            ("  42  ".into(), 0, false, "42".into()),
            (format!("{}.{}", max128, zeros), 128, false, format!("{}.{}", max128, zeros)),
            (format!("-{}.{}", max128, zeros), 128, true, format!("-{}.{}", max128, zeros)),
            (format!("-{}", *MAX_UINT256), 0, true, format!("-{}", *MAX_UINT256)),
        ];
        for (input, precision, negative, want) in cases {
            let value = dec(&input);
            assert_eq!(value.precision(), precision, "input {}", input);
            assert_eq!(value.is_negative(), negative, "input {}", input);
            assert_eq!(value.to_string(), want, "input {}", input);
        }
    }

    #[test]
    fn test_parse_invalid() {
        let too_precise = format!("0.{}", "0".repeat(129));
        let cases = ["", "1.", ".1", "-", "-1.", "-.1", "1.2.3", "1e", "e5", "1ex", "12a", "+1", "--1", too_precise.as_str()];
        for input in cases {
            assert!(input.parse::<Decimal>().is_err(), "input {:?} should fail", input);
        }
        assert_eq!("".parse::<Decimal>().unwrap_err(), MathError::EmptyString);
        assert_eq!(
            too_precise.parse::<Decimal>().unwrap_err(),
            MathError::PrecisionOverflow { max: 128, got: 129 }
        );
    }

    #[test]
    fn test_parse_exponent_bound() {
        assert_eq!(
            "1e2000000000".parse::<Decimal>().unwrap_err(),
            MathError::InvalidExponent("1e2000000000".to_string())
        );
        assert!("1e-1025".parse::<Decimal>().is_err());
        let widest = format!("1e{}", MAX_EXPONENT);
        assert_eq!(dec(&widest).to_string().len(), MAX_EXPONENT as usize + 1);
    }

    #[test]
    #[should_panic]
    fn test_must_from_str_panics() {
        Decimal::must_from_str("abc");
    }

    #[test]
    #[should_panic(expected = "precision too high")]
    fn test_precision_cap_panics() {
        Decimal::new_with_prec(1, MAX_PRECISION + 1);
    }

    #[test]
    fn test_from_f64() {
        let cases = [
            (0.0, Decimal::new(0)),
            (1.0, Decimal::new(1)),
            (1.1, Decimal::new_with_prec(11, 1)),
            (1.01, Decimal::new_with_prec(101, 2)),
            (1.001, Decimal::new_with_prec(1001, 3)),
            (1.000000001, Decimal::new_with_prec(1000000001, 9)),
            (-2.5, Decimal::new_with_prec(-25, 1)),
        ];
        for (value, want) in cases {
            assert_eq!(Decimal::from_f64(value).unwrap(), want, "float {}", value);
        }
        assert_eq!(Decimal::from_f64(f64::INFINITY).unwrap_err(), MathError::NonFinite);
    }

    #[test]
    fn test_add_aligns_precision() {
        let sum = Decimal::from_u64(1, 0).add(&Decimal::from_u64(50, 1));
        assert_eq!(sum, Decimal::from_u64(60, 1));
        assert_eq!(sum.precision(), 1);
        assert_eq!(Decimal::from_u64(10, 1).add(&Decimal::from_u64(5, 1)), Decimal::from_u64(15, 1));
    }

    #[test]
    fn test_safe_add_and_sub() {
        assert_eq!(Decimal::new(1).safe_add(&Decimal::new_with_prec(-10, 1)), Decimal::zero());
        assert_eq!(Decimal::new(1).safe_sub(&Decimal::new_with_prec(50, 2)), Decimal::new_with_prec(5, 1));
        assert_eq!(Decimal::new(1).safe_sub(&Decimal::new_with_prec(-10, 1)), Decimal::new(2));
    }

    #[test]
    #[should_panic(expected = "negative value")]
    fn test_safe_add_negative_panics() {
        Decimal::new(1).safe_add(&Decimal::new_with_prec(-20, 1));
    }

    #[test]
    #[should_panic(expected = "negative value")]
    fn test_safe_sub_negative_panics() {
        Decimal::new(1).safe_sub(&Decimal::new_with_prec(20, 1));
    }

    #[test]
    fn test_add_raw_keeps_precision() {
        let value = Decimal::from_big_int(MAX_UINT256.clone()).add_raw(1);
        assert!(value.is_positive());
        assert_eq!(Decimal::new_with_prec(15, 1).sub_raw(5).to_string(), "1.0");
    }

    #[test]
    fn test_mul_down() {
        let third = format!("1.{}", "3".repeat(128));
        let cases = [
            ("1", "0", 0, "0"),
            ("1.000", "0", 3, "0"),
            ("1.000", "1.000", 3, "1"),
            ("1.111", "1.111", 3, "1.234"),
            ("1.333", "1.333", 3, "1.776"),
            ("-1.111", "1.111", 3, "-1.234"),
            ("-1.333", "1.333", 3, "-1.776"),
            ("-1.333", "-1.333", 3, "1.776"),
        ];
        for (a, b, precision, want) in cases {
            let got = dec(a).mul_down(&dec(b));
            assert_eq!(got, dec(want), "{} x {}", a, b);
            assert_eq!(got.precision(), precision);
        }
        let got = dec(&third).mul_down(&dec(&third));
        assert_eq!(got, dec(&format!("1.{}6", "7".repeat(127))));
        assert_eq!(got.precision(), 128);
    }

    #[test]
    fn test_mul_round_up() {
        let third = format!("1.{}", "3".repeat(128));
        let cases = [
            ("1.111", "1.111", "1.235"),
            ("1.333", "1.333", "1.777"),
            ("-1.111", "1.111", "-1.235"),
            ("-1.333", "-1.333", "1.777"),
        ];
        for (a, b, want) in cases {
            assert_eq!(dec(a).mul(&dec(b), RoundingMode::Up), dec(want), "{} x {}", a, b);
        }
        let got = dec(&third).mul(&dec(&third), RoundingMode::Up);
        assert_eq!(got, dec(&format!("1.{}", "7".repeat(128))));
    }

    #[test]
    fn test_quo_sign_table() {
        let cases = [
            (5, 2, RoundingMode::Down, 2),
            (5, 2, RoundingMode::Up, 3),
            (-5, -2, RoundingMode::Down, 2),
            (-5, -2, RoundingMode::Up, 3),
            (5, -2, RoundingMode::Down, -2),
            (5, -2, RoundingMode::Up, -3),
            (-5, 2, RoundingMode::Up, -3),
            (5, 2, RoundingMode::HalfEven, 2),
            (7, 2, RoundingMode::HalfEven, 4),
        ];
        for (a, b, mode, want) in cases {
            let got = Decimal::new(a).quo(&Decimal::new(b), mode);
            assert_eq!(got, Decimal::new(want), "{} / {} under {}", a, b, mode);
            assert_eq!(got.precision(), 0);
        }
        assert_eq!(Decimal::new(5).quo_down(&Decimal::new(-2)), Decimal::new(-2));
    }

    #[test]
    fn test_quo_round_up_mixed_precision() {
        let cases = [
            ("55", "0.6"), ("25", "0.3"), ("16", "0.2"), ("11", "0.2"), ("10", "0.1"),
            ("-55", "-0.6"), ("-25", "-0.3"), ("-16", "-0.2"), ("-11", "-0.2"), ("-10", "-0.1"),
        ];
        for (a, want) in cases {
            let got = dec(a).quo(&dec("100.0"), RoundingMode::Up);
            assert_eq!(got, dec(want), "{} / 100.0", a);
            assert_eq!(got.precision(), 1);
        }
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn test_quo_by_zero_panics() {
        Decimal::new(1).quo_down(&Decimal::zero());
    }

    #[test]
    #[should_panic(expected = "expected 0 remainder")]
    fn test_quo_unnecessary_inexact_panics() {
        Decimal::with_append_prec(1, 2).quo(&Decimal::with_append_prec(3, 2), RoundingMode::Unnecessary);
    }

    #[test]
    #[should_panic(expected = "expected 0 remainder")]
    fn test_quo_unnecessary_remainder_below_precision_panics() {
        // 0.1 / 10.1 leaves a remainder past the doubled precision
        Decimal::new_with_prec(1, 1).quo(&Decimal::new_with_prec(101, 1), RoundingMode::Unnecessary);
    }

    #[test]
    #[should_panic(expected = "expected 0 remainder")]
    fn test_quo_unnecessary_integer_remainder_panics() {
        Decimal::new(1).quo(&Decimal::new(101), RoundingMode::Unnecessary);
    }

    #[test]
    fn test_quo_unnecessary_exact() {
        let got = Decimal::new_with_prec(15, 1).quo(&Decimal::new_with_prec(5, 1), RoundingMode::Unnecessary);
        assert_eq!(got.to_string(), "3.0");
        assert_eq!(Decimal::new(-9).quo(&Decimal::new(3), RoundingMode::Unnecessary), Decimal::new(-3));
    }

    #[test]
    fn test_checked_quo() {
        assert_eq!(Decimal::new(1).checked_quo(&Decimal::zero(), RoundingMode::Down), Err(MathError::DivisionByZero));
        assert_eq!(
            Decimal::new(8).checked_quo(&Decimal::new(4), RoundingMode::Unnecessary),
            Ok(Decimal::new(2)),
        );
    }

    #[test]
    fn test_power() {
        let cases = [(2, 0, 1), (2, 1, 2), (2, 2, 4), (2, 3, 8), (2, 7, 128), (2, 8, 256), (-2, 1, -2), (-2, 2, 4), (-2, 3, -8)];
        for (base, exp, want) in cases {
            let got = Decimal::new(base).power(exp);
            assert_eq!(got, Decimal::new(want), "{}^{}", base, exp);
            assert_eq!(got.precision(), 0);
        }

        let root2 = Decimal::new_with_prec(1414213562373095049, 18);
        assert_eq!(root2.power(2), dec("2.000000000000000001"));

        let half = Decimal::with_append_prec(2, 18).power(-1);
        assert_eq!(half, dec("0.5"));
        assert_eq!(half.precision(), 18);

        let quarter = Decimal::with_append_prec(2, 18).power(-2);
        assert_eq!(quarter.to_string(), "0.250000000000000000");
        assert_eq!(Decimal::with_append_prec(2, 1).power(-2), dec("0.3"));
        assert_eq!(dec("1.50").power(0).to_string(), "1.00");
    }

    #[test]
    fn test_sqrt() {
        let cases = [
            (dec("4"), dec("2"), 0),
            (dec("4.0000"), dec("2"), 4),
            (Decimal::new_with_prec(25, 2), Decimal::new_with_prec(5, 1), 2),
            (Decimal::with_append_prec(2, 18), Decimal::new_with_prec(1414213562373095049, 18), 18),
            (Decimal::new_with_prec(1, 18), Decimal::new_with_prec(1, 9), 18),
        ];
        for (value, want, precision) in cases {
            let got = value.sqrt().unwrap();
            assert_eq!(got, want, "sqrt({})", value);
            assert_eq!(got.precision(), precision);
        }
    }

    #[test]
    fn test_approx_root() {
        assert_eq!(dec("3125.0000").approx_root(5).unwrap(), dec("5.0000"));
        assert_eq!(dec("100000.0000").approx_root(5).unwrap(), dec("10.0000"));
        assert_eq!(dec("-27.000").approx_root(3).unwrap(), dec("-3"));
        assert_eq!(dec("7.25").approx_root(1).unwrap(), dec("7.25"));
        assert_eq!(dec("7.25").approx_root(0).unwrap().to_string(), "1.00");
        assert_eq!(dec("7.25").approx_root(-3).unwrap().to_string(), "1.00");
        assert_eq!(dec("1.000").sqrt().unwrap().to_string(), "1.000");
        assert!(Decimal::zero().sqrt().unwrap().is_zero());
    }

    #[test]
    fn test_log2() {
        let cases = [
            (Decimal::with_append_prec(1, 18), dec("0")),
            (Decimal::with_append_prec(2, 18), dec("1")),
            (Decimal::with_append_prec(4, 18), dec("2")),
            (Decimal::with_append_prec(8, 18), dec("3")),
            (Decimal::with_append_prec(16, 18), dec("4")),
            (Decimal::with_append_prec(33, 18), dec("5.044394119358453436")),
            (Decimal::with_append_prec(63, 18), dec("5.977279923499916469")),
            (dec("2.12345678"), dec("1.08641474")),
            (dec("1.12345678"), dec("0.16794462")),
            (Decimal::new_with_prec(200000000000000000, 18), dec("-2.321928094887362348")),
            (Decimal::new_with_prec(2, 18), dec("-58.794705707972522263")),
        ];
        for (value, want) in cases {
            let got = value.log2().unwrap();
            assert_eq!(got, want, "log2({})", value);
            assert_eq!(got.precision(), value.precision());
        }
    }

    #[test]
    fn test_log2_non_positive() {
        assert_eq!(Decimal::zero().log2(), Err(MathError::NonPositiveLogarithm));
        assert_eq!(Decimal::new(-4).log2(), Err(MathError::NonPositiveLogarithm));
    }

    #[test]
    fn test_unsigned_add() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let cases = [
            ((1, 0), (-1, 0), "0".to_string()),
            ((1, 0), (0, 0), "1".to_string()),
            ((0, 0), (-5, 1), "11579208923731619542357098500868790785326998466564056403945758400791312963993.1".to_string()),
            ((1, 0), (-2, 0), max.to_string()),
        ];
        for ((a, pa), (b, pb), want) in cases {
            let got = Decimal::new_with_prec(a, pa).unsigned_add(&Decimal::new_with_prec(b, pb), &UINT256);
            assert_eq!(got, dec(&want));
        }

        let wrapped = Decimal::from_big_int(MAX_UINT256.clone()).unsigned_add(&Decimal::new(1), &UINT256);
        assert_eq!(wrapped, Decimal::zero());
        let wrapped = Decimal::zero().unsigned_add(&Decimal::new(-1), &UINT256);
        assert_eq!(wrapped.to_string(), max);
    }

    #[test]
    fn test_unsigned_sub() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(Decimal::new(1).unsigned_sub(&Decimal::new(1), &UINT256), Decimal::zero());
        assert_eq!(Decimal::new(1).unsigned_sub(&Decimal::new(2), &UINT256).to_string(), max);
        assert_eq!(
            Decimal::new(0).unsigned_sub(&Decimal::new_with_prec(5, 1), &UINT256).to_string(),
            "11579208923731619542357098500868790785326998466564056403945758400791312963993.1"
        );
    }

    #[test]
    fn test_unsigned_overflow_flags() {
        let max = Decimal::from_big_int(MAX_UINT256.clone());
        let (sum, overflow) = max.unsigned_add_overflow(&Decimal::new(1), &UINT256);
        assert!(overflow);
        assert!(sum.is_zero());

        let (diff, overflow) = Decimal::new(5).unsigned_sub_overflow(&Decimal::new(2), &UINT256);
        assert!(!overflow);
        assert_eq!(diff, Decimal::new(3));

        let (product, overflow) = max.unsigned_mul_overflow(&Decimal::new(2), RoundingMode::Down, &UINT256);
        assert!(overflow);
        assert_eq!(product, max.sub(&Decimal::new(1)));

        let (quotient, overflow) = max.unsigned_quo_overflow(&Decimal::new(2), RoundingMode::Down, &UINT256);
        assert!(!overflow);
        assert_eq!(quotient, max.unsigned_quo_down(&Decimal::new(2), &UINT256));
        assert_eq!(Decimal::new(3).unsigned_mul_down(&Decimal::new(-1), &UINT256), max.sub(&Decimal::new(2)));
    }

    #[test]
    fn test_int_part_and_remainder() {
        let (int_part, frac) = dec("-12.345").remainder();
        assert_eq!(int_part, BigInt::from(-12));
        assert_eq!(frac, BigInt::from(-345));
        assert_eq!(dec("7.9").int_part(), BigInt::from(7));
    }

    #[test]
    fn test_comparisons_across_precisions() {
        assert_eq!(dec("1.0"), dec("1"));
        assert!(dec("1.01").gt(&dec("1")));
        assert!(dec("-1.01").lt(&dec("-1")));
        assert!(dec("2").gte(&dec("2.000")));
        assert_eq!(max(dec("1.0"), dec("1")).precision(), 1);
        assert_eq!(min(dec("1"), dec("1.00")).precision(), 0);
        assert_eq!(dec("-3.5").abs(), dec("3.5"));
        assert_eq!(-dec("3.5"), dec("-3.5"));
        assert_eq!(&dec("1.5") + &dec("2"), dec("3.5"));
        assert_eq!(&dec("1.5") - &dec("2"), dec("-0.5"));
    }

    #[test]
    fn test_nil_state() {
        let nil = Decimal::default();
        assert!(nil.is_nil());
        assert!(!Decimal::zero().is_nil());
        assert_eq!(nil.to_string(), "<nil>");
        assert!(nil.to_big_int().is_none());
        assert_eq!(nil.add(&Decimal::new(2)), Decimal::new(2));
    }
}
