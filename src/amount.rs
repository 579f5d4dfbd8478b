//! Entry amounts in minor currency units.
//!
//! Amounts are parsed once at the boundary with `rust_decimal` and then
//! carried as whole cents, which is what every record and control total
//! encodes.

use crate::validate::valid_decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Reasons an amount can be refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Not a decimal number
    Malformed,
    /// A nonzero digit past the second decimal place
    Precision,
    Negative,
    /// More cents than the 10-digit amount field holds
    TooLarge,
}

/// A non-negative amount, stored as whole cents.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use nacha_file::Amount;
///
/// let amount = Amount::from_str("12.34").unwrap();
/// assert_eq!(amount.minor_units(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(u64);

impl Amount {
    /// Largest value the 10-digit amount field can carry.
    pub const MAX_MINOR_UNITS: u64 = 9_999_999_999;

    /// Zero cents.
    pub const ZERO: Self = Amount(0);

    /// Wraps a cent count, refusing anything wider than the amount field.
    pub fn from_minor_units(cents: u64) -> Result<Self, AmountError> {
        if cents > Self::MAX_MINOR_UNITS {
            return Err(AmountError::TooLarge);
        }
        Ok(Amount(cents))
    }

    /// Converts a decimal by multiplying by 100 and truncating.
    ///
    /// Trailing zeros beyond the cents are tolerated, any other extra
    /// precision is not.
    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative);
        }
        if value.normalize().scale() > 2 {
            return Err(AmountError::Precision);
        }
        if value > Decimal::new(Self::MAX_MINOR_UNITS as i64, 2) {
            return Err(AmountError::TooLarge);
        }
        let cents = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(AmountError::TooLarge)?
            .trunc()
            .to_u64()
            .ok_or(AmountError::TooLarge)?;
        Self::from_minor_units(cents)
    }

    /// The amount in cents, as written to the 10-digit amount field.
    pub fn minor_units(&self) -> u64 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !valid_decimal(trimmed) {
            return Err(AmountError::Precision);
        }
        let decimal = Decimal::from_str(trimmed).map_err(|_| AmountError::Malformed)?;
        Amount::from_decimal(decimal)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(s: &str) -> u64 {
        Amount::from_str(s).unwrap().minor_units()
    }

    #[test]
    fn test_from_str_converts_to_cents() {
        assert_eq!(cents("12.34"), 1234);
        assert_eq!(cents("100"), 10000);
        assert_eq!(cents("100.00"), 10000);
        assert_eq!(cents("0.1"), 10);
        assert_eq!(cents("  2.5  "), 250);
        assert_eq!(cents("1.2300"), 123);
        assert_eq!(cents("0"), 0);
    }

    #[test]
    fn test_from_str_rejects_extra_precision() {
        assert_eq!(Amount::from_str("1.235"), Err(AmountError::Precision));
        assert_eq!(Amount::from_str("1.2301"), Err(AmountError::Precision));
    }

    #[test]
    fn test_from_str_rejects_bad_input() {
        assert_eq!(Amount::from_str("abc"), Err(AmountError::Malformed));
        assert_eq!(Amount::from_str(""), Err(AmountError::Malformed));
        assert_eq!(Amount::from_str("-5.00"), Err(AmountError::Negative));
    }

    #[test]
    fn test_field_width_limit() {
        assert_eq!(cents("99999999.99"), Amount::MAX_MINOR_UNITS);
        assert_eq!(Amount::from_str("100000000.00"), Err(AmountError::TooLarge));
        assert_eq!(
            Amount::from_minor_units(10_000_000_000),
            Err(AmountError::TooLarge)
        );
    }

    #[test]
    fn test_huge_amounts_are_refused_not_overflowed() {
        assert_eq!(
            Amount::from_str("79228162514264337593543950335"),
            Err(AmountError::TooLarge)
        );
        assert_eq!(
            Amount::from_str("1000000000000000000000000000"),
            Err(AmountError::TooLarge)
        );
        assert_eq!(Amount::from_decimal(Decimal::MAX), Err(AmountError::TooLarge));
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from_minor_units(1234).unwrap().to_string(), "12.34");
        assert_eq!(Amount::from_minor_units(5).unwrap().to_string(), "0.05");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }
}
