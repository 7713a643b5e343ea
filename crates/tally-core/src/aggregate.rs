//! # Seller Aggregation
//!
//! Two distinct ways of summing records:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  total_for_seller(records)            group_by_seller_and_type(records) │
//! │  ─────────────────────────            ───────────────────────────────── │
//! │  one seller's records                 every record                      │
//! │  sign convention applied              plain sums, no sign convention    │
//! │  → one signed Money total             → one SellerAggregate per         │
//! │                                         (seller, type) pair             │
//! │                                                                         │
//! │  GET /transactions/{seller}           GET /transactions/all             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both skip malformed values. Grouping sorts its output by (seller, type
//! code), so the result does not depend on input order.

use std::collections::BTreeMap;

use crate::money::Money;
use crate::types::{SellerAggregate, TransactionRecord, TransactionType};

/// Signed total of a seller's records.
///
/// Types 1, 2 and 4 add, type 3 subtracts, every other type and every
/// malformed value is skipped. An empty slice totals zero.
///
/// ## Example
/// ```rust
/// use tally_core::aggregate::total_for_seller;
/// use tally_core::{Money, TransactionRecord, TransactionType};
///
/// let record = |kind, cents| TransactionRecord {
///     transaction_type: kind,
///     date: String::new(),
///     product: String::new(),
///     value: Some(Money::from_cents(cents)),
///     seller: "JOSE CARLOS".to_string(),
/// };
///
/// let total = total_for_seller(&[
///     record(TransactionType::PrimarySale, 1275),
///     record(TransactionType::CommissionPaid, 1500),
/// ]);
/// assert_eq!(total.cents(), -225);
/// ```
pub fn total_for_seller(records: &[TransactionRecord]) -> Money {
    records
        .iter()
        .filter_map(TransactionRecord::signed_value)
        .sum()
}

/// Sums values per (seller, type) pair without applying the sign convention.
///
/// A pair whose values are all malformed still appears, with a zero total.
pub fn group_by_seller_and_type(records: &[TransactionRecord]) -> Vec<SellerAggregate> {
    let mut groups: BTreeMap<(&str, Option<i64>), Money> = BTreeMap::new();

    for record in records {
        let total = groups
            .entry((record.seller.as_str(), record.transaction_type.code()))
            .or_default();
        if let Some(value) = record.value {
            *total += value;
        }
    }

    groups
        .into_iter()
        .map(|((seller, code), total_value)| SellerAggregate {
            seller: seller.to_string(),
            transaction_type: TransactionType::from(code),
            total_value,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seller: &str, code: Option<i64>, cents: Option<i64>) -> TransactionRecord {
        TransactionRecord {
            transaction_type: TransactionType::from(code),
            date: "2022-01-15T19:20:30-03:00".to_string(),
            product: "CURSO".to_string(),
            value: cents.map(Money::from_cents),
            seller: seller.to_string(),
        }
    }

    #[test]
    fn test_sale_minus_commission() {
        let records = [
            record("JOSE CARLOS", Some(1), Some(1275)),
            record("JOSE CARLOS", Some(3), Some(1500)),
        ];
        assert_eq!(total_for_seller(&records), Money::from_cents(-225));
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert!(total_for_seller(&[]).is_zero());
    }

    #[test]
    fn test_all_income_types_add() {
        let records = [
            record("A", Some(1), Some(100)),
            record("A", Some(2), Some(200)),
            record("A", Some(4), Some(400)),
        ];
        assert_eq!(total_for_seller(&records).cents(), 700);
    }

    #[test]
    fn test_skips_malformed_values_and_unknown_types() {
        let records = [
            record("A", Some(1), Some(1000)),
            record("A", Some(1), None),
            record("A", Some(3), None),
            record("A", Some(7), Some(999)),
            record("A", None, Some(555)),
        ];
        assert_eq!(total_for_seller(&records).cents(), 1000);
    }

    #[test]
    fn test_group_sums_same_pair() {
        let records = [record("A", Some(1), Some(1000)), record("A", Some(1), Some(500))];
        assert_eq!(
            group_by_seller_and_type(&records),
            vec![SellerAggregate {
                seller: "A".to_string(),
                transaction_type: TransactionType::PrimarySale,
                total_value: Money::from_cents(1500),
            }]
        );
    }

    #[test]
    fn test_group_does_not_apply_sign_convention() {
        let records = [record("A", Some(3), Some(1500)), record("A", Some(3), Some(500))];
        let groups = group_by_seller_and_type(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].transaction_type, TransactionType::CommissionPaid);
        assert_eq!(groups[0].total_value.cents(), 2000);
    }

    #[test]
    fn test_group_is_order_independent() {
        let mut records = vec![
            record("B", Some(2), Some(10)),
            record("A", Some(1), Some(20)),
            record("A", Some(3), Some(30)),
            record("B", Some(2), Some(40)),
            record("A", Some(1), Some(50)),
            record("C", None, Some(60)),
        ];
        let forward = group_by_seller_and_type(&records);
        records.reverse();
        let backward = group_by_seller_and_type(&records);
        records.rotate_left(2);
        let rotated = group_by_seller_and_type(&records);

        assert_eq!(forward, backward);
        assert_eq!(forward, rotated);

        let summary: Vec<_> = forward
            .iter()
            .map(|g| (g.seller.as_str(), g.transaction_type.code(), g.total_value.cents()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("A", Some(1), 70),
                ("A", Some(3), 30),
                ("B", Some(2), 50),
                ("C", None, 60),
            ]
        );
    }

    #[test]
    fn test_group_with_only_malformed_values_totals_zero() {
        let records = [record("A", Some(1), None), record("A", Some(1), None)];
        let groups = group_by_seller_and_type(&records);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].total_value.is_zero());
    }

    #[test]
    fn test_group_empty() {
        assert!(group_by_seller_and_type(&[]).is_empty());
    }
}
