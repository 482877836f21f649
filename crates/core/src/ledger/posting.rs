//! Posting validation service.
//!
//! This module provides the core business logic for validating a set of
//! proposed entry legs before they are persisted. It is pure: account
//! lookups are injected by the caller, so the rules stay database-free.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::entry::{EntryType, ProposedEntry};
use super::error::LedgerError;

/// Information about an account needed for validation.
#[derive(Debug, Clone)]
pub struct AccountInfo {
    /// The account ID.
    pub id: Uuid,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Debit/credit totals for a set of entry legs.
#[derive(Debug, Clone, Copy)]
pub struct PostingTotals {
    /// Sum of debit amounts.
    pub debit_total: Decimal,
    /// Sum of credit amounts.
    pub credit_total: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

impl PostingTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit_total: Decimal, credit_total: Decimal) -> Self {
        Self {
            debit_total,
            credit_total,
            is_balanced: debit_total == credit_total,
        }
    }
}

/// Generates a fresh reference number for a posting.
///
/// Reference numbers are time-ordered (UUID v7) so entries list in
/// submission order when sorted lexicographically.
#[must_use]
pub fn generate_reference_number() -> String {
    format!("TXN-{}", Uuid::now_v7().simple())
}

/// Posting validation service.
///
/// Contains pure business logic with no database dependencies.
pub struct PostingService;

impl PostingService {
    /// Validate a set of proposed legs for one posting.
    ///
    /// Performs all validation steps in order:
    /// 1. Minimum entries (at least 2)
    /// 2. Every amount positive
    /// 3. At least one debit and one credit leg, debits == credits
    /// 4. Every referenced account exists and is active
    ///
    /// # Arguments
    ///
    /// * `entries` - The proposed legs, all sharing one reference number
    /// * `account_lookup` - Function resolving an account ID to its info
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` on the first rule violated; nothing may be
    /// persisted when validation fails.
    pub fn validate<A>(
        entries: &[ProposedEntry],
        account_lookup: A,
    ) -> Result<PostingTotals, LedgerError>
    where
        A: Fn(Uuid) -> Result<AccountInfo, LedgerError>,
    {
        if entries.len() < 2 {
            return Err(LedgerError::InsufficientEntries);
        }

        for entry in entries {
            if entry.amount <= Decimal::ZERO {
                return Err(LedgerError::NonPositiveAmount);
            }
        }

        let totals = Self::calculate_totals(entries);
        if totals.debit_total == Decimal::ZERO || totals.credit_total == Decimal::ZERO {
            return Err(LedgerError::MissingDebitOrCredit);
        }
        if !totals.is_balanced {
            return Err(LedgerError::UnbalancedPosting {
                debit: totals.debit_total,
                credit: totals.credit_total,
            });
        }

        for entry in entries {
            let account = account_lookup(entry.account_id)?;
            if !account.is_active {
                return Err(LedgerError::AccountInactive(entry.account_id));
            }
        }

        Ok(totals)
    }

    /// Calculate debit/credit totals for a set of legs.
    #[must_use]
    pub fn calculate_totals(entries: &[ProposedEntry]) -> PostingTotals {
        let debit_total: Decimal = entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Debit)
            .map(|e| e.amount)
            .sum();
        let credit_total: Decimal = entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Credit)
            .map(|e| e.amount)
            .sum();

        PostingTotals::new(debit_total, credit_total)
    }

    /// Net signed effect of a set of legs on one account.
    ///
    /// Sums `+amount` for credits and `-amount` for debits over the legs
    /// touching `account_id`.
    #[must_use]
    pub fn net_effect(entries: &[ProposedEntry], account_id: Uuid) -> Decimal {
        entries
            .iter()
            .filter(|e| e.account_id == account_id)
            .map(|e| e.entry_type.signed(e.amount))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_entry(entry_type: EntryType, amount: Decimal) -> ProposedEntry {
        ProposedEntry {
            account_id: Uuid::new_v4(),
            entry_type,
            amount,
        }
    }

    fn ok_account_lookup(id: Uuid) -> Result<AccountInfo, LedgerError> {
        Ok(AccountInfo { id, is_active: true })
    }

    #[test]
    fn test_validate_balanced_posting() {
        let entries = vec![
            make_entry(EntryType::Debit, dec!(100)),
            make_entry(EntryType::Credit, dec!(100)),
        ];

        let result = PostingService::validate(&entries, ok_account_lookup);

        assert!(result.is_ok());
        let totals = result.unwrap();
        assert!(totals.is_balanced);
        assert_eq!(totals.debit_total, dec!(100));
        assert_eq!(totals.credit_total, dec!(100));
    }

    #[test]
    fn test_validate_unbalanced_posting() {
        let entries = vec![
            make_entry(EntryType::Debit, dec!(100)),
            make_entry(EntryType::Credit, dec!(90)),
        ];

        let result = PostingService::validate(&entries, ok_account_lookup);

        match result {
            Err(LedgerError::UnbalancedPosting { debit, credit }) => {
                assert_eq!(debit, dec!(100));
                assert_eq!(credit, dec!(90));
            }
            other => panic!("Expected UnbalancedPosting, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_insufficient_entries() {
        let entries = vec![make_entry(EntryType::Debit, dec!(100))];

        let result = PostingService::validate(&entries, ok_account_lookup);

        assert!(matches!(result, Err(LedgerError::InsufficientEntries)));
    }

    #[test]
    fn test_validate_zero_amount() {
        let entries = vec![
            make_entry(EntryType::Debit, dec!(0)),
            make_entry(EntryType::Credit, dec!(100)),
        ];

        let result = PostingService::validate(&entries, ok_account_lookup);

        assert!(matches!(result, Err(LedgerError::NonPositiveAmount)));
    }

    #[test]
    fn test_validate_negative_amount() {
        let entries = vec![
            make_entry(EntryType::Debit, dec!(-100)),
            make_entry(EntryType::Credit, dec!(100)),
        ];

        let result = PostingService::validate(&entries, ok_account_lookup);

        assert!(matches!(result, Err(LedgerError::NonPositiveAmount)));
    }

    #[test]
    fn test_validate_all_debits_fails() {
        // Two debit legs sum equal to zero credits: missing a credit leg.
        let entries = vec![
            make_entry(EntryType::Debit, dec!(50)),
            make_entry(EntryType::Debit, dec!(50)),
        ];

        let result = PostingService::validate(&entries, ok_account_lookup);

        assert!(matches!(result, Err(LedgerError::MissingDebitOrCredit)));
    }

    #[test]
    fn test_validate_unknown_account() {
        let entries = vec![
            make_entry(EntryType::Debit, dec!(100)),
            make_entry(EntryType::Credit, dec!(100)),
        ];

        let not_found = |id: Uuid| -> Result<AccountInfo, LedgerError> {
            Err(LedgerError::AccountNotFound(id))
        };

        let result = PostingService::validate(&entries, not_found);

        assert!(matches!(result, Err(LedgerError::AccountNotFound(_))));
    }

    #[test]
    fn test_validate_inactive_account() {
        let entries = vec![
            make_entry(EntryType::Debit, dec!(100)),
            make_entry(EntryType::Credit, dec!(100)),
        ];

        let inactive = |id: Uuid| -> Result<AccountInfo, LedgerError> {
            Ok(AccountInfo {
                id,
                is_active: false,
            })
        };

        let result = PostingService::validate(&entries, inactive);

        assert!(matches!(result, Err(LedgerError::AccountInactive(_))));
    }

    #[test]
    fn test_validate_multi_leg_posting() {
        // One debit split across two credits still balances.
        let entries = vec![
            make_entry(EntryType::Debit, dec!(150)),
            make_entry(EntryType::Credit, dec!(100)),
            make_entry(EntryType::Credit, dec!(50)),
        ];

        let result = PostingService::validate(&entries, ok_account_lookup);

        assert!(result.is_ok());
        let totals = result.unwrap();
        assert_eq!(totals.debit_total, dec!(150));
        assert_eq!(totals.credit_total, dec!(150));
    }

    #[test]
    fn test_net_effect_per_account() {
        let account = Uuid::new_v4();
        let other = Uuid::new_v4();
        let entries = vec![
            ProposedEntry {
                account_id: account,
                entry_type: EntryType::Credit,
                amount: dec!(100),
            },
            ProposedEntry {
                account_id: account,
                entry_type: EntryType::Debit,
                amount: dec!(30),
            },
            ProposedEntry {
                account_id: other,
                entry_type: EntryType::Debit,
                amount: dec!(70),
            },
        ];

        assert_eq!(PostingService::net_effect(&entries, account), dec!(70));
        assert_eq!(PostingService::net_effect(&entries, other), dec!(-70));
        assert_eq!(
            PostingService::net_effect(&entries, Uuid::new_v4()),
            dec!(0)
        );
    }

    #[test]
    fn test_generate_reference_number_format() {
        let reference = generate_reference_number();
        assert!(reference.starts_with("TXN-"));
        assert_eq!(reference.len(), 4 + 32);
        assert_ne!(reference, generate_reference_number());
    }
}
