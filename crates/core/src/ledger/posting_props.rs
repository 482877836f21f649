//! Property tests for posting validation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::entry::{EntryType, ProposedEntry};
use super::error::LedgerError;
use super::posting::{AccountInfo, PostingService};

/// Strategy for generating positive decimal amounts.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a list of positive amounts.
fn amounts_strategy(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(amount_strategy(), 1..=max_len)
}

fn ok_account_lookup(id: Uuid) -> Result<AccountInfo, LedgerError> {
    Ok(AccountInfo { id, is_active: true })
}

/// Builds a posting that mirrors each debit amount with a matching credit.
fn mirrored_posting(amounts: &[Decimal]) -> Vec<ProposedEntry> {
    let mut entries = Vec::with_capacity(amounts.len() * 2);
    for &amount in amounts {
        entries.push(ProposedEntry {
            account_id: Uuid::new_v4(),
            entry_type: EntryType::Debit,
            amount,
        });
        entries.push(ProposedEntry {
            account_id: Uuid::new_v4(),
            entry_type: EntryType::Credit,
            amount,
        });
    }
    entries
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any posting whose debit legs mirror its credit legs validates, and
    /// the reported totals match the sum of the generated amounts.
    #[test]
    fn prop_mirrored_postings_validate(amounts in amounts_strategy(10)) {
        let entries = mirrored_posting(&amounts);
        let expected: Decimal = amounts.iter().copied().sum();

        let totals = PostingService::validate(&entries, ok_account_lookup)
            .expect("mirrored posting must validate");

        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.debit_total, expected);
        prop_assert_eq!(totals.credit_total, expected);
    }

    /// Skewing any single leg of a balanced posting breaks validation
    /// with `UnbalancedPosting`.
    #[test]
    fn prop_skewed_postings_never_validate(
        amounts in amounts_strategy(10),
        skew in amount_strategy(),
    ) {
        let mut entries = mirrored_posting(&amounts);
        entries[0].amount += skew;

        let result = PostingService::validate(&entries, ok_account_lookup);

        let unbalanced = matches!(result, Err(LedgerError::UnbalancedPosting { .. }));
        prop_assert!(unbalanced);
    }

    /// The net signed effect over ALL accounts of a balanced posting is zero:
    /// credits add exactly what debits remove.
    #[test]
    fn prop_balanced_posting_nets_to_zero(amounts in amounts_strategy(10)) {
        let entries = mirrored_posting(&amounts);

        let net: Decimal = entries
            .iter()
            .map(|e| e.entry_type.signed(e.amount))
            .sum();

        prop_assert_eq!(net, Decimal::ZERO);
    }

    /// A single-leg posting never validates regardless of amount.
    #[test]
    fn prop_single_leg_never_validates(amount in amount_strategy()) {
        let entries = vec![ProposedEntry {
            account_id: Uuid::new_v4(),
            entry_type: EntryType::Debit,
            amount,
        }];

        let result = PostingService::validate(&entries, ok_account_lookup);

        prop_assert!(matches!(result, Err(LedgerError::InsufficientEntries)));
    }

    /// Zero or negative amounts are rejected before balance is considered,
    /// even when the posting would otherwise balance.
    #[test]
    fn prop_non_positive_amounts_rejected(amount in amount_strategy()) {
        for bad in [Decimal::ZERO, -amount] {
            let entries = vec![
                ProposedEntry {
                    account_id: Uuid::new_v4(),
                    entry_type: EntryType::Debit,
                    amount: bad,
                },
                ProposedEntry {
                    account_id: Uuid::new_v4(),
                    entry_type: EntryType::Credit,
                    amount: bad,
                },
            ];

            let result = PostingService::validate(&entries, ok_account_lookup);

            prop_assert!(matches!(result, Err(LedgerError::NonPositiveAmount)));
        }
    }

    /// An inactive account anywhere in the posting fails validation.
    #[test]
    fn prop_inactive_account_rejected(amounts in amounts_strategy(5)) {
        let entries = mirrored_posting(&amounts);
        let inactive_id = entries[0].account_id;

        let lookup = |id: Uuid| -> Result<AccountInfo, LedgerError> {
            Ok(AccountInfo {
                id,
                is_active: id != inactive_id,
            })
        };

        let result = PostingService::validate(&entries, lookup);

        prop_assert!(matches!(result, Err(LedgerError::AccountInactive(id)) if id == inactive_id));
    }
}
