//! # Codecs
//!
//! Canonical text, the compact binary form, JSON (behind the `serde`
//! feature) and a driver-neutral database value for [`BigInt`] and
//! [`Decimal`]. Every codec keeps nil distinct from zero on the way out.
//!
//! ## Binary layout
//! - `BigInt`: one header byte `(1 << 1) | negative`, then the big-endian
//!   magnitude. Zero carries no magnitude bytes. Nil encodes to nothing.
//! - `Decimal`: the precision as a big-endian `u32`, then the `BigInt` form.

use std::fmt;

use num_bigint::{BigInt as Int, BigUint};
use num_traits::{Signed, Zero};

use crate::decimal::MAX_PRECISION;
use crate::{BigInt, Decimal, MathError, MathResult};

/// Width of the precision prefix in the binary form
pub const PRECISION_FIXED_SIZE: usize = 4;

const BINARY_VERSION: u8 = 1;

// ============================================================================
// Text
// ============================================================================

/// Canonical text: exactly `precision` fractional digits.
///
/// # Examples
/// ```
/// use decimal_math::Decimal;
///
/// assert_eq!(Decimal::default().to_string(), "<nil>");
/// assert_eq!(Decimal::new_with_prec(1000, 18).to_string(), "0.000000000000001000");
/// assert_eq!(Decimal::new_with_prec(-12345, 2).to_string(), "-123.45");
/// ```
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self.unscaled().inner() {
            Some(value) => value,
            None => return f.write_str("<nil>"),
        };
        let precision = self.precision() as usize;
        if precision == 0 {
            return write!(f, "{}", value);
        }

        let digits = value.magnitude().to_string();
        let mut out = String::with_capacity(digits.len() + precision + 3);
        if value.is_negative() {
            out.push('-');
        }
        if digits.len() <= precision {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take(precision - digits.len()));
            out.push_str(&digits);
        } else {
            let (int_digits, frac_digits) = digits.split_at(digits.len() - precision);
            out.push_str(int_digits);
            out.push('.');
            out.push_str(frac_digits);
        }
        f.write_str(&out)
    }
}

// ============================================================================
// Binary
// ============================================================================

fn encode_int(value: &Int) -> Vec<u8> {
    let header = (BINARY_VERSION << 1) | u8::from(value.is_negative());
    let mut out = vec![header];
    if !value.is_zero() {
        out.extend(value.magnitude().to_bytes_be());
    }
    out
}

fn decode_int(data: &[u8]) -> MathResult<Int> {
    let (header, magnitude) = match data.split_first() {
        Some((&header, magnitude)) => (header, magnitude),
        None => return Ok(Int::zero()),
    };
    if header >> 1 != BINARY_VERSION {
        return Err(MathError::InvalidBinary(format!("unsupported version {}", header >> 1)));
    }
    let value = Int::from(BigUint::from_bytes_be(magnitude));
    Ok(if header & 1 == 1 { -value } else { value })
}

impl BigInt {
    /// Binary form; empty for nil.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::BigInt;
    ///
    /// assert_eq!(BigInt::from(-258).to_binary(), vec![0x03, 0x01, 0x02]);
    /// assert_eq!(BigInt::from_binary(&[0x03, 0x01, 0x02]).unwrap(), BigInt::from(-258));
    /// assert!(BigInt::nil().to_binary().is_empty());
    /// ```
    pub fn to_binary(&self) -> Vec<u8> {
        self.inner().map(encode_int).unwrap_or_default()
    }

    /// Decode the binary form. Empty input yields a non-nil zero.
    pub fn from_binary(data: &[u8]) -> MathResult<Self> {
        decode_int(data).map(BigInt::from_int)
    }

    /// Length of [`BigInt::to_binary`] without encoding
    pub fn binary_len(&self) -> usize {
        match self.inner() {
            None => 0,
            Some(value) if value.is_zero() => 1,
            Some(value) => 1 + ((value.bits() + 7) / 8) as usize,
        }
    }
}

impl Decimal {
    /// Binary form; empty for nil.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::Decimal;
    ///
    /// let value = Decimal::new_with_prec(15, 1);
    /// let bytes = value.to_binary();
    /// assert_eq!(bytes, vec![0, 0, 0, 1, 0x02, 0x0f]);
    /// assert_eq!(Decimal::from_binary(&bytes).unwrap().to_string(), "1.5");
    /// ```
    pub fn to_binary(&self) -> Vec<u8> {
        if self.is_nil() {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(self.binary_len());
        out.extend_from_slice(&self.precision().to_be_bytes());
        out.extend(self.unscaled().to_binary());
        out
    }

    /// Decode the binary form. Empty input yields a non-nil zero.
    pub fn from_binary(data: &[u8]) -> MathResult<Self> {
        if data.is_empty() {
            return Ok(Decimal::zero());
        }
        if data.len() < PRECISION_FIXED_SIZE {
            return Err(MathError::InvalidBinary(format!(
                "expected at least {} bytes, got {}",
                PRECISION_FIXED_SIZE,
                data.len()
            )));
        }

        let (prefix, payload) = data.split_at(PRECISION_FIXED_SIZE);
        let mut precision_bytes = [0u8; PRECISION_FIXED_SIZE];
        precision_bytes.copy_from_slice(prefix);
        let precision = u32::from_be_bytes(precision_bytes);
        if precision > MAX_PRECISION {
            return Err(MathError::InvalidBinary(format!("precision {} too high", precision)));
        }

        Ok(Decimal::from_parts(decode_int(payload)?, precision))
    }

    /// Length of [`Decimal::to_binary`] without encoding
    pub fn binary_len(&self) -> usize {
        if self.is_nil() {
            0
        } else {
            PRECISION_FIXED_SIZE + self.unscaled().binary_len()
        }
    }
}

// ============================================================================
// JSON
// ============================================================================

#[cfg(feature = "serde")]
mod json {
    use std::fmt;

    use num_bigint::BigInt as Int;
    use serde::de::{self, Deserializer, MapAccess, Visitor};
    use serde::ser::Serializer;
    use serde::{Deserialize, Serialize};

    use crate::{BigInt, Decimal, MathError, MathResult};

    impl Serialize for BigInt {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if self.is_nil() {
                serializer.serialize_none()
            } else {
                serializer.serialize_str(&self.to_string())
            }
        }
    }

    impl Serialize for Decimal {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if self.is_nil() {
                serializer.serialize_none()
            } else {
                serializer.serialize_str(&self.to_string())
            }
        }
    }

    impl<'de> Deserialize<'de> for BigInt {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(BigIntVisitor)
        }
    }

    impl<'de> Deserialize<'de> for Decimal {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(DecimalVisitor)
        }
    }

    /// Map key `serde_json` uses to hand over a number's exact token text
    /// when built with `arbitrary_precision`.
    const NUMBER_TOKEN: &str = "$serde_json::private::Number";

    fn number_text<'de, A: MapAccess<'de>>(mut map: A) -> Result<String, A::Error> {
        match map.next_key::<String>()? {
            Some(key) if key == NUMBER_TOKEN => map.next_value::<String>(),
            _ => Err(de::Error::invalid_type(de::Unexpected::Map, &"a JSON number")),
        }
    }

    struct BigIntVisitor;

    impl<'de> Visitor<'de> for BigIntVisitor {
        type Value = BigInt;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string-encoded integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(BigInt::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(BigInt::from(v))
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
            Ok(BigInt::from(v))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
            Ok(BigInt::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if !v.is_finite() || v.fract() != 0.0 {
                return Err(E::invalid_value(de::Unexpected::Float(v), &self));
            }
            format!("{}", v).parse().map_err(E::custom)
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
            number_text(map)?.parse().map_err(de::Error::custom)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(BigInt::nil())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(BigInt::nil())
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Decimal;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a string-encoded decimal")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Decimal::new(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Decimal::from_u64(v, 0))
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
            Ok(Decimal::from_big_int(Int::from(v)))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
            Ok(Decimal::from_big_int(Int::from(v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Decimal::from_f64(v).map_err(E::custom)
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
            number_text(map)?.parse().map_err(de::Error::custom)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Decimal::default())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Decimal::default())
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }
    }

    /// Split a raw JSON token into `null`, a string body, or number text.
    /// Numbers are validated as JSON but returned verbatim so no digits are
    /// lost to `f64`.
    fn read_token(raw: &str) -> MathResult<Option<String>> {
        let token = raw.trim();
        if token == "null" {
            return Ok(None);
        }
        if token.starts_with('"') {
            let text: String = serde_json::from_str(token).map_err(|e| MathError::Json(e.to_string()))?;
            return Ok(Some(text));
        }
        serde_json::from_str::<serde_json::Number>(token).map_err(|e| MathError::Json(e.to_string()))?;
        Ok(Some(token.to_string()))
    }

    impl BigInt {
        /// Read a raw JSON token exactly, including integers beyond 64 bits.
        ///
        /// # Examples
        /// ```
        /// use decimal_math::BigInt;
        ///
        /// let value = BigInt::from_json("123456789012345678901234567890").unwrap();
        /// assert_eq!(value.to_string(), "123456789012345678901234567890");
        /// assert!(BigInt::from_json("null").unwrap().is_nil());
        /// ```
        pub fn from_json(raw: &str) -> MathResult<Self> {
            match read_token(raw)? {
                None => Ok(BigInt::nil()),
                Some(text) => text.parse(),
            }
        }

        /// JSON text: a quoted string, or `null` for nil
        pub fn to_json(&self) -> MathResult<String> {
            serde_json::to_string(self).map_err(|e| MathError::Json(e.to_string()))
        }
    }

    impl Decimal {
        /// Read a raw JSON token exactly, including numbers beyond `f64`.
        ///
        /// # Examples
        /// ```
        /// use decimal_math::Decimal;
        ///
        /// assert_eq!(Decimal::from_json("-0.123456789").unwrap().to_string(), "-0.123456789");
        /// assert_eq!(Decimal::from_json("\"1.50\"").unwrap().to_string(), "1.50");
        /// assert!(Decimal::from_json("nul").is_err());
        /// ```
        pub fn from_json(raw: &str) -> MathResult<Self> {
            match read_token(raw)? {
                None => Ok(Decimal::default()),
                Some(text) => text.parse(),
            }
        }

        /// JSON text: a quoted string, or `null` for nil
        pub fn to_json(&self) -> MathResult<String> {
            serde_json::to_string(self).map_err(|e| MathError::Json(e.to_string()))
        }
    }
}

// ============================================================================
// Database Values
// ============================================================================

/// Driver-neutral column value.
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

/// Strip one pair of surrounding double quotes
fn unquote_if_quoted(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Text carried by a `Text` or `Bytes` column, unquoted
fn db_text(value: &DbValue) -> MathResult<Option<&str>> {
    match value {
        DbValue::Text(text) => Ok(Some(unquote_if_quoted(text))),
        DbValue::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Some(unquote_if_quoted(text))),
            Err(_) => {
                tracing::debug!(len = bytes.len(), "rejected non-utf8 database bytes");
                Err(MathError::UnsupportedDbValue("non-utf8 bytes"))
            }
        },
        _ => Ok(None),
    }
}

impl BigInt {
    /// Canonical text, or `Null` for nil
    pub fn to_db_value(&self) -> DbValue {
        if self.is_nil() {
            DbValue::Null
        } else {
            DbValue::Text(self.to_string())
        }
    }

    /// Read a column value. Floats are rejected.
    pub fn from_db_value(value: &DbValue) -> MathResult<Self> {
        match value {
            DbValue::Null => Ok(BigInt::nil()),
            DbValue::Int(v) => Ok(BigInt::from(*v)),
            DbValue::UInt(v) => Ok(BigInt::from(*v)),
            DbValue::Float(_) => {
                tracing::debug!("rejected float database value for integer");
                Err(MathError::UnsupportedDbValue("float"))
            }
            DbValue::Text(_) | DbValue::Bytes(_) => match db_text(value)? {
                Some(text) => text.parse(),
                None => Ok(BigInt::nil()),
            },
        }
    }
}

impl Decimal {
    /// Canonical text, or `Null` for nil
    pub fn to_db_value(&self) -> DbValue {
        if self.is_nil() {
            DbValue::Null
        } else {
            DbValue::Text(self.to_string())
        }
    }

    /// Read a column value.
    ///
    /// # Examples
    /// ```
    /// use decimal_math::{DbValue, Decimal};
    ///
    /// let value = Decimal::from_db_value(&DbValue::Text("\"12.50\"".into())).unwrap();
    /// assert_eq!(value.to_string(), "12.50");
    /// assert!(Decimal::from_db_value(&DbValue::Null).unwrap().is_nil());
    /// ```
    pub fn from_db_value(value: &DbValue) -> MathResult<Self> {
        match value {
            DbValue::Null => Ok(Decimal::default()),
            DbValue::Int(v) => Ok(Decimal::new(*v)),
            DbValue::UInt(v) => Ok(Decimal::from_u64(*v, 0)),
            DbValue::Float(v) => Decimal::from_f64(*v),
            DbValue::Text(_) | DbValue::Bytes(_) => match db_text(value)? {
                Some(text) => text.parse(),
                None => Ok(Decimal::default()),
            },
        }
    }
}
