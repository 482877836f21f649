//! Entry leg domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of entry leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit leg (reduces the account's available balance).
    Debit,
    /// Credit leg (increases the account's available balance).
    Credit,
}

impl EntryType {
    /// Returns the string representation of the entry type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Parses an entry type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            _ => None,
        }
    }

    /// Returns the signed balance effect of an amount posted with this type.
    ///
    /// Credits add to the available balance, debits subtract from it. The
    /// convention is uniform across account kinds.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Debit => -amount,
            Self::Credit => amount,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One proposed leg of a posting, before persistence.
///
/// All legs submitted together share one reference number and must balance
/// (sum of debits == sum of credits).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedEntry {
    /// The account affected by this leg.
    pub account_id: Uuid,
    /// Whether this is a debit or credit.
    pub entry_type: EntryType,
    /// Amount (must be positive).
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_type_as_str() {
        assert_eq!(EntryType::Debit.as_str(), "debit");
        assert_eq!(EntryType::Credit.as_str(), "credit");
    }

    #[test]
    fn test_entry_type_parse() {
        assert_eq!(EntryType::parse("debit"), Some(EntryType::Debit));
        assert_eq!(EntryType::parse("CREDIT"), Some(EntryType::Credit));
        assert_eq!(EntryType::parse("Debit"), Some(EntryType::Debit));
        assert_eq!(EntryType::parse("transfer"), None);
    }

    #[test]
    fn test_signed_effect() {
        assert_eq!(EntryType::Credit.signed(dec!(100)), dec!(100));
        assert_eq!(EntryType::Debit.signed(dec!(100)), dec!(-100));
        assert_eq!(EntryType::Debit.signed(dec!(0)), dec!(0));
    }
}
