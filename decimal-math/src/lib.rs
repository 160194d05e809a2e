//! # Decimal Math Library
//!
//! Arbitrary-precision fixed-point decimal arithmetic for amounts that must
//! match on-chain integer math bit for bit.
//!
//! ## Key Features
//!
//! - **Immutable values**: every operation returns a new `BigInt`/`Decimal`
//! - **Seven rounding modes** shared by integer and decimal division
//! - **Single rounding step** for `mul`/`quo`, computed from full-resolution digits
//! - **uint128/uint256 wraparound** via [`BitLen`]
//! - **Canonical codecs**: text, binary, JSON and database values
//!
//! ## Fixed-Point Representation
//!
//! A decimal is an unscaled integer plus a precision (number of fractional
//! digits), capped at [`MAX_PRECISION`]:
//!
//! ```rust
//! use decimal_math::{Decimal, RoundingMode};
//!
//! // 123.45678900 is stored as 12345678900 with precision 8
//! let price = Decimal::new_with_prec(12_345_678_900, 8);
//! assert_eq!(price.to_string(), "123.45678900");
//!
//! let half = price.quo(&Decimal::new(2), RoundingMode::HalfEven);
//! assert_eq!(half.to_string(), "61.72839450");
//! ```
//!
//! ## Parsing
//!
//! Text input accepts an optional sign, a fractional part and a scientific
//! exponent. Parse failures are ordinary errors:
//!
//! ```rust
//! use decimal_math::{Decimal, RoundingMode};
//!
//! fn main() -> anyhow::Result<()> {
//!     let fee: Decimal = "3e-3".parse()?;
//!     let notional: Decimal = "2500.00".parse()?;
//!     let charged = notional.mul(&fee, RoundingMode::Up);
//!     assert_eq!(charged.to_string(), "7.500");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Classes
//!
//! Malformed input and domain errors come back as [`MathError`]. Contract
//! violations (precision above 128, division by zero, inexact results under
//! [`RoundingMode::Unnecessary`], negative results from `safe_add`/`safe_sub`)
//! panic.

pub mod bigint;
pub mod bit;
pub mod bit_len;
pub mod decimal;
pub mod decimal_round;
pub mod marshal;
pub mod rounding;

pub use bigint::BigInt;
pub use bit::{least_significant_bit, most_significant_bit};
pub use bit_len::{BitLen, MAX_UINT128, MAX_UINT256, UINT128, UINT256};
pub use decimal::{Decimal, MAX_EXPONENT, MAX_ITERATIONS, MAX_PRECISION};
pub use marshal::{DbValue, PRECISION_FIXED_SIZE};
pub use rounding::RoundingMode;

/// Core error type for decimal operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    /// Input text was empty (or only a sign)
    #[error("decimal string cannot be empty")]
    EmptyString,
    /// Input text is not a well-formed decimal
    #[error("invalid decimal string: {0}")]
    InvalidDecimal(String),
    /// Scientific-notation exponent is not a valid 32-bit integer
    #[error("can't convert {0} to decimal: exponent is not numeric")]
    InvalidExponent(String),
    /// More fractional digits than the precision cap allows
    #[error("invalid precision; max: {max}, got: {got}")]
    PrecisionOverflow { max: u32, got: i64 },
    /// Input text is not a well-formed integer
    #[error("invalid integer string: {0}")]
    InvalidInteger(String),
    /// Unknown rounding mode name
    #[error("unknown rounding mode: {0}")]
    InvalidRoundingMode(String),
    /// NaN or infinite float
    #[error("float value is not finite")]
    NonFinite,
    /// Logarithm of zero or a negative value
    #[error("value must be greater than 0")]
    NonPositiveLogarithm,
    /// Division by zero in a checked operation
    #[error("division by zero")]
    DivisionByZero,
    /// Newton iteration failed
    #[error("root iteration failed: {0}")]
    RootIteration(String),
    /// Malformed binary encoding
    #[error("error decoding binary: {0}")]
    InvalidBinary(String),
    /// Database column value of a kind that cannot hold a number
    #[error("unsupported database value: {0}")]
    UnsupportedDbValue(&'static str),
    /// Malformed JSON token
    #[error("invalid json: {0}")]
    Json(String),
}

/// Result type alias for decimal operations
pub type MathResult<T> = Result<T, MathError>;
