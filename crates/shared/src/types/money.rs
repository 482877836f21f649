//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The decimal amount.
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "KES", "UGX").
    pub currency: Currency,
}

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Kenyan Shilling
    Kes,
    /// Tanzanian Shilling
    Tzs,
    /// Ugandan Shilling
    Ugx,
    /// Rwandan Franc
    Rwf,
    /// US Dollar
    Usd,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative()
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kes => write!(f, "KES"),
            Self::Tzs => write!(f, "TZS"),
            Self::Ugx => write!(f, "UGX"),
            Self::Rwf => write!(f, "RWF"),
            Self::Usd => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "KES" => Ok(Self::Kes),
            "TZS" => Ok(Self::Tzs),
            "UGX" => Ok(Self::Ugx),
            "RWF" => Ok(Self::Rwf),
            "USD" => Ok(Self::Usd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_new() {
        let amount = dec!(100.00);
        let money = Money::new(amount, Currency::Kes);
        assert_eq!(money.amount, amount);
        assert_eq!(money.currency, Currency::Kes);
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(Currency::Ugx);
        assert!(money.is_zero());
        assert_eq!(money.amount, Decimal::ZERO);
        assert_eq!(money.currency, Currency::Ugx);
    }

    #[test]
    fn test_money_is_negative() {
        let positive = Money::new(dec!(10), Currency::Kes);
        assert!(!positive.is_negative());

        let negative = Money::new(dec!(-10), Currency::Kes);
        assert!(negative.is_negative());

        let zero = Money::new(dec!(0), Currency::Kes);
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Kes.to_string(), "KES");
        assert_eq!(Currency::Tzs.to_string(), "TZS");
        assert_eq!(Currency::Ugx.to_string(), "UGX");
        assert_eq!(Currency::Rwf.to_string(), "RWF");
        assert_eq!(Currency::Usd.to_string(), "USD");
    }

    #[rstest]
    #[case("KES", Currency::Kes)]
    #[case("kes", Currency::Kes)]
    #[case("TZS", Currency::Tzs)]
    #[case("UGX", Currency::Ugx)]
    #[case("RWF", Currency::Rwf)]
    #[case("usd", Currency::Usd)]
    fn test_currency_from_str(#[case] input: &str, #[case] expected: Currency) {
        assert_eq!(Currency::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_currency_from_str_rejects_unknown() {
        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }
}
