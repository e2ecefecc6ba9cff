//! Rate value object (percentage scale).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A tax rate on the 0-100 percentage scale, e.g. `1.2` for 1.2%.
///
/// Rates keep their declared decimal precision ("3.29" stays 3.29, not a
/// binary approximation), which is what makes the withholding arithmetic
/// reproducible.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Rate(Decimal);

impl Rate {
    /// Zero percent.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new Rate, clamping negative values to zero.
    pub fn new(value: Decimal) -> Self {
        Self(value.max(Decimal::ZERO))
    }

    /// Creates a Rate, returning an error for negative values.
    pub fn try_new(value: Decimal) -> Result<Self, ValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::negative_amount(
                "aliquota",
                value.to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the percentage value (e.g. `4.65`).
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a fraction (e.g. `0.0465`).
    pub fn as_fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// True when the rate is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rate_new_accepts_valid_values() {
        assert_eq!(Rate::new(dec!(0)).value(), dec!(0));
        assert_eq!(Rate::new(dec!(1.2)).value(), dec!(1.2));
        assert_eq!(Rate::new(dec!(100)).value(), dec!(100));
    }

    #[test]
    fn rate_new_clamps_negative_to_zero() {
        assert_eq!(Rate::new(dec!(-3.5)).value(), dec!(0));
    }

    #[test]
    fn rate_try_new_rejects_negative() {
        assert!(Rate::try_new(dec!(-0.01)).is_err());
        assert!(Rate::try_new(dec!(0)).is_ok());
        assert!(Rate::try_new(dec!(4.65)).is_ok());
    }

    #[test]
    fn rate_as_fraction_converts_correctly() {
        assert_eq!(Rate::new(dec!(4.65)).as_fraction(), dec!(0.0465));
        assert_eq!(Rate::new(dec!(100)).as_fraction(), dec!(1));
        assert_eq!(Rate::ZERO.as_fraction(), dec!(0));
    }

    #[test]
    fn rate_displays_with_percent_sign() {
        assert_eq!(format!("{}", Rate::new(dec!(3.29))), "3.29%");
    }

    #[test]
    fn rate_default_is_zero() {
        assert!(Rate::default().is_zero());
    }

    #[test]
    fn rate_serializes_as_bare_number() {
        let json = serde_json::to_string(&Rate::new(dec!(1.2))).unwrap();
        assert_eq!(json, "\"1.2\"");
        let back: Rate = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), dec!(1.2));
    }
}
