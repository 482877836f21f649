//! Interest calculation for scheduled payouts.
//!
//! CRITICAL: Rounding strategy for derived amounts:
//! - Round to 2 decimal places at the point of scheduling
//! - Use banker's rounding (round half to even)
//! - Store both the inputs and the computed amount

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Days in the interest year (actual/365 convention).
const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

/// Direction of a scheduled payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutDirection {
    /// Interest paid out to the member (savings interest).
    Payment,
    /// Interest collected from the member (loan interest).
    Collection,
}

impl PayoutDirection {
    /// Returns the string representation of the direction.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Collection => "collection",
        }
    }

    /// Parses a direction from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "payment" => Some(Self::Payment),
            "collection" => Some(Self::Collection),
            _ => None,
        }
    }
}

impl std::fmt::Display for PayoutDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors for interest calculation inputs.
#[derive(Debug, Error)]
pub enum InterestError {
    /// Principal must be positive.
    #[error("Principal must be positive")]
    NonPositivePrincipal,

    /// Annual rate cannot be negative.
    #[error("Annual rate cannot be negative")]
    NegativeRate,

    /// Period must be at least one day.
    #[error("Period must be at least one day")]
    ZeroPeriod,
}

/// Computes simple interest for a period.
///
/// `amount = principal × annual_rate × period_days / 365`, rounded to
/// 2 decimal places with banker's rounding to minimize cumulative error
/// over repeated payout cycles.
///
/// # Errors
///
/// Returns `InterestError` when the inputs are out of range.
pub fn interest_for_period(
    principal: Decimal,
    annual_rate: Decimal,
    period_days: u32,
) -> Result<Decimal, InterestError> {
    if principal <= Decimal::ZERO {
        return Err(InterestError::NonPositivePrincipal);
    }
    if annual_rate < Decimal::ZERO {
        return Err(InterestError::NegativeRate);
    }
    if period_days == 0 {
        return Err(InterestError::ZeroPeriod);
    }

    let raw = principal * annual_rate * Decimal::from(period_days) / DAYS_PER_YEAR;
    Ok(raw.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_full_year_interest() {
        // 10,000 at 12% for a full year = 1,200.00
        let amount = interest_for_period(dec!(10000), dec!(0.12), 365).unwrap();
        assert_eq!(amount, dec!(1200.00));
    }

    #[test]
    fn test_partial_period_interest() {
        // 10,000 at 12% for 30 days = 98.6301... -> 98.63
        let amount = interest_for_period(dec!(10000), dec!(0.12), 30).unwrap();
        assert_eq!(amount, dec!(98.63));
    }

    #[test]
    fn test_bankers_rounding() {
        // 456.25 * 0.1 / 365 = 0.125 exactly -> rounds to even: 0.12
        let low = interest_for_period(dec!(456.25), dec!(0.1), 1).unwrap();
        assert_eq!(low, dec!(0.12));

        // 1368.75 * 0.1 / 365 = 0.375 exactly -> rounds to even: 0.38
        let high = interest_for_period(dec!(1368.75), dec!(0.1), 1).unwrap();
        assert_eq!(high, dec!(0.38));
    }

    #[test]
    fn test_zero_rate_yields_zero() {
        let amount = interest_for_period(dec!(5000), dec!(0), 90).unwrap();
        assert_eq!(amount, dec!(0));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            interest_for_period(dec!(0), dec!(0.1), 30),
            Err(InterestError::NonPositivePrincipal)
        ));
        assert!(matches!(
            interest_for_period(dec!(-100), dec!(0.1), 30),
            Err(InterestError::NonPositivePrincipal)
        ));
        assert!(matches!(
            interest_for_period(dec!(100), dec!(-0.1), 30),
            Err(InterestError::NegativeRate)
        ));
        assert!(matches!(
            interest_for_period(dec!(100), dec!(0.1), 0),
            Err(InterestError::ZeroPeriod)
        ));
    }

    #[test]
    fn test_direction_parse_and_display() {
        assert_eq!(
            PayoutDirection::parse("payment"),
            Some(PayoutDirection::Payment)
        );
        assert_eq!(
            PayoutDirection::parse("COLLECTION"),
            Some(PayoutDirection::Collection)
        );
        assert_eq!(PayoutDirection::parse("transfer"), None);
        assert_eq!(PayoutDirection::Payment.to_string(), "payment");
        assert_eq!(PayoutDirection::Collection.to_string(), "collection");
    }
}

#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    fn principal_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn rate_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..5000i64).prop_map(|n| Decimal::new(n, 4))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Computed interest is never negative and never carries more than
        /// two decimal places.
        #[test]
        fn prop_interest_non_negative_two_dp(
            principal in principal_strategy(),
            rate in rate_strategy(),
            days in 1u32..=1825,
        ) {
            let amount = interest_for_period(principal, rate, days).unwrap();
            prop_assert!(amount >= Decimal::ZERO);
            prop_assert!(amount.scale() <= 2);
        }

        /// Interest grows (weakly) with the period length.
        #[test]
        fn prop_interest_monotone_in_days(
            principal in principal_strategy(),
            rate in rate_strategy(),
            days in 1u32..=364,
        ) {
            let shorter = interest_for_period(principal, rate, days).unwrap();
            let longer = interest_for_period(principal, rate, days + 1).unwrap();
            prop_assert!(longer >= shorter);
        }

        /// A zero rate yields zero interest for any principal and period.
        #[test]
        fn prop_zero_rate_zero_interest(
            principal in principal_strategy(),
            days in 1u32..=1825,
        ) {
            let amount = interest_for_period(principal, Decimal::ZERO, days).unwrap();
            prop_assert_eq!(amount, Decimal::ZERO);
        }
    }
}
