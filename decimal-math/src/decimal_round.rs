//! # Decimal Rounding
//!
//! Rescaling between precisions, the per-mode rounding routines, and the
//! digit-trimming helpers built on them.

use std::borrow::Cow;

use lazy_static::lazy_static;
use num_bigint::BigInt as Int;
use num_traits::{Signed, Zero};

use crate::decimal::{Decimal, MAX_PRECISION};
use crate::RoundingMode;

/// Highest power of ten kept in the table; `quo` needs up to `10^(2p)`.
const TABLE_LIMIT: u32 = 2 * MAX_PRECISION;

lazy_static! {
    static ref PRECISION_MULTIPLIERS: Vec<Int> = {
        let ten = Int::from(10);
        let mut table = Vec::with_capacity(TABLE_LIMIT as usize + 1);
        let mut current = Int::from(1);
        for _ in 0..=TABLE_LIMIT {
            table.push(current.clone());
            current *= &ten;
        }
        table
    };
}

/// `10^exp`, from the table when in range
pub(crate) fn pow10(exp: u32) -> Cow<'static, Int> {
    match PRECISION_MULTIPLIERS.get(exp as usize) {
        Some(value) => Cow::Borrowed(value),
        None => Cow::Owned(Int::from(10).pow(exp)),
    }
}

/// Drop `digits` decimal digits from `value`, rounding with `mode`.
pub(crate) fn round_int(value: &Int, digits: u32, mode: RoundingMode) -> Int {
    if digits == 0 {
        return value.clone();
    }
    match mode {
        RoundingMode::Down => round_down(value, digits),
        RoundingMode::Up => round_up(value, digits),
        RoundingMode::Ceiling => round_ceiling(value, digits),
        RoundingMode::HalfUp => round_half_up(value, digits),
        RoundingMode::HalfDown => round_half_down(value, digits),
        RoundingMode::HalfEven => round_half_even(value, digits),
        RoundingMode::Unnecessary => round_unnecessary(value, digits),
    }
}

fn quo_rem(value: &Int, digits: u32) -> (Int, Int) {
    let divisor = pow10(digits);
    (value / &*divisor, value % &*divisor)
}

/// Compare the remainder with `5 * 10^(digits - 1)`
fn half_cmp(rem: &Int, digits: u32) -> std::cmp::Ordering {
    let half = &*pow10(digits - 1) * 5u32;
    rem.cmp(&half)
}

/// Apply a magnitude rounding rule symmetrically around zero
fn on_magnitude(value: &Int, digits: u32, rule: fn(&Int, u32) -> Int) -> Int {
    if value.is_negative() {
        -rule(&-value, digits)
    } else {
        rule(value, digits)
    }
}

fn round_down(value: &Int, digits: u32) -> Int {
    value / &*pow10(digits)
}

fn round_up(value: &Int, digits: u32) -> Int {
    on_magnitude(value, digits, |abs, digits| {
        let (quo, rem) = quo_rem(abs, digits);
        if rem.is_zero() {
            quo
        } else {
            quo + 1u32
        }
    })
}

fn round_ceiling(value: &Int, digits: u32) -> Int {
    if value.is_negative() {
        round_down(value, digits)
    } else {
        round_up(value, digits)
    }
}

fn round_half_up(value: &Int, digits: u32) -> Int {
    on_magnitude(value, digits, |abs, digits| {
        let (quo, rem) = quo_rem(abs, digits);
        if half_cmp(&rem, digits).is_lt() {
            quo
        } else {
            quo + 1u32
        }
    })
}

fn round_half_down(value: &Int, digits: u32) -> Int {
    on_magnitude(value, digits, |abs, digits| {
        let (quo, rem) = quo_rem(abs, digits);
        if half_cmp(&rem, digits).is_le() {
            quo
        } else {
            quo + 1u32
        }
    })
}

fn round_half_even(value: &Int, digits: u32) -> Int {
    on_magnitude(value, digits, |abs, digits| {
        let (quo, rem) = quo_rem(abs, digits);
        match half_cmp(&rem, digits) {
            std::cmp::Ordering::Less => quo,
            std::cmp::Ordering::Greater => quo + 1u32,
            // tie: keep an even last digit
            std::cmp::Ordering::Equal => {
                if (&quo % 2u32).is_zero() {
                    quo
                } else {
                    quo + 1u32
                }
            }
        }
    })
}

fn round_unnecessary(value: &Int, digits: u32) -> Int {
    let (quo, rem) = quo_rem(value, digits);
    if !rem.is_zero() {
        panic!("expected 0 remainder");
    }
    quo
}

impl Decimal {
    /// Round away the precision's worth of trailing digits of the unscaled
    /// value, keeping the precision label.
    pub(crate) fn round(&self, mode: RoundingMode) -> Decimal {
        Decimal::from_parts(round_int(self.int(), self.precision(), mode), self.precision())
    }

    /// Convert to `precision` digits.
    ///
    /// Scaling up is exact; scaling down rounds with `mode`.
    ///
    /// # Panics
    /// Panics if `precision` exceeds [`MAX_PRECISION`], or under
    /// [`RoundingMode::Unnecessary`] when a non-zero digit would be dropped.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::{Decimal, RoundingMode};
    ///
    /// let value = Decimal::new_with_prec(25, 1); // 2.5
    /// assert_eq!(value.rescale(0, RoundingMode::HalfEven).to_string(), "2");
    /// assert_eq!(value.rescale(0, RoundingMode::HalfUp).to_string(), "3");
    /// assert_eq!(value.rescale(3, RoundingMode::Down).to_string(), "2.500");
    /// ```
    pub fn rescale(&self, precision: u32, mode: RoundingMode) -> Decimal {
        let current = self.precision();
        if current == precision {
            return self.clone();
        }
        Decimal::require_precision(precision);

        if precision > current {
            let scaled = self.int() * &*pow10(precision - current);
            Decimal::from_parts(scaled, precision)
        } else {
            let rounded = round_int(self.int(), current - precision, mode);
            Decimal::from_parts(rounded, precision)
        }
    }

    /// [`Decimal::rescale`] with [`RoundingMode::Down`]
    pub fn rescale_down(&self, precision: u32) -> Decimal {
        self.rescale(precision, RoundingMode::Down)
    }

    /// Numerically equal value without trailing fractional zeros.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::Decimal;
    ///
    /// assert_eq!(Decimal::must_from_str("-0.110000").strip_trailing_zeros().to_string(), "-0.11");
    /// assert_eq!(Decimal::must_from_str("0.00").strip_trailing_zeros().to_string(), "0");
    /// ```
    pub fn strip_trailing_zeros(&self) -> Decimal {
        if self.precision() == 0 || self.is_nil() {
            return self.clone();
        }
        let ten = Int::from(10);
        let mut value = self.int().clone();
        let mut precision = self.precision();
        while precision > 0 && (&value % &ten).is_zero() {
            value /= &ten;
            precision -= 1;
        }
        Decimal::from_parts(value, precision)
    }

    /// Keep `figures` significant digits, counted from the first non-zero digit.
    ///
    /// Values with precision 0, or with no more fractional digits than
    /// `figures`, are returned unchanged. Integer digits are never dropped.
    ///
    /// # Panics
    /// Panics if `figures` is 0.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::{Decimal, RoundingMode};
    ///
    /// let value = Decimal::must_from_str("0.001001");
    /// assert_eq!(value.significant_figures(2, RoundingMode::Up).to_string(), "0.0011");
    ///
    /// let value = Decimal::must_from_str("1111.001001");
    /// assert_eq!(value.significant_figures(5, RoundingMode::Up).to_string(), "1111.1");
    /// ```
    pub fn significant_figures(&self, figures: u32, mode: RoundingMode) -> Decimal {
        if figures == 0 {
            panic!("figures must be greater than 0");
        }
        let precision = self.precision();
        if precision == 0 || precision <= figures {
            return self.clone();
        }

        let digit_count = self.int().magnitude().to_string().len() as u32;
        let target = if digit_count > precision {
            // integer digits use up the budget first
            figures.saturating_sub(digit_count - precision)
        } else {
            // leading fractional zeros are free
            figures + (precision - digit_count)
        };
        self.rescale(target.min(precision), mode)
    }
}
