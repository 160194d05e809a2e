//! # Rounding Modes
//!
//! The rounding policies shared by integer quotients and decimal rescaling.

use std::fmt;
use std::str::FromStr;

use crate::MathError;

/// Rounding policy applied when digits are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Round towards zero.
    Down,
    /// Round away from zero.
    Up,
    /// Round towards positive infinity.
    Ceiling,
    /// Round to the nearest neighbor; ties round away from zero.
    HalfUp,
    /// Round to the nearest neighbor; ties round towards zero.
    HalfDown,
    /// Round to the nearest neighbor; ties round to the even neighbor (banker's rounding).
    HalfEven,
    /// Assert the result is exact; a discarded non-zero digit panics.
    Unnecessary,
}

impl RoundingMode {
    /// Every mode, in declaration order
    pub const ALL: [RoundingMode; 7] = [
        RoundingMode::Down,
        RoundingMode::Up,
        RoundingMode::Ceiling,
        RoundingMode::HalfUp,
        RoundingMode::HalfDown,
        RoundingMode::HalfEven,
        RoundingMode::Unnecessary,
    ];

    /// Canonical snake_case name
    pub const fn name(self) -> &'static str {
        match self {
            RoundingMode::Down => "down",
            RoundingMode::Up => "up",
            RoundingMode::Ceiling => "ceiling",
            RoundingMode::HalfUp => "half_up",
            RoundingMode::HalfDown => "half_down",
            RoundingMode::HalfEven => "half_even",
            RoundingMode::Unnecessary => "unnecessary",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a mode name, e.g. from configuration text
///
/// # Examples
/// ```
/// use decimal_math::RoundingMode;
///
/// assert_eq!("half_even".parse::<RoundingMode>().unwrap(), RoundingMode::HalfEven);
/// assert_eq!("HalfUp".parse::<RoundingMode>().unwrap(), RoundingMode::HalfUp);
/// assert!("nearest".parse::<RoundingMode>().is_err());
/// ```
impl FromStr for RoundingMode {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "down" => Ok(RoundingMode::Down),
            "up" => Ok(RoundingMode::Up),
            "ceiling" => Ok(RoundingMode::Ceiling),
            "halfup" => Ok(RoundingMode::HalfUp),
            "halfdown" => Ok(RoundingMode::HalfDown),
            "halfeven" => Ok(RoundingMode::HalfEven),
            "unnecessary" => Ok(RoundingMode::Unnecessary),
            _ => Err(MathError::InvalidRoundingMode(s.to_string())),
        }
    }
}
