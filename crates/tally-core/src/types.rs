//! # Domain Types
//!
//! Types shared by the parser, the aggregator, storage and the HTTP layer.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐         ┌──────────────────────┐             │
//! │  │  TransactionRecord   │         │   SellerAggregate    │             │
//! │  │  ──────────────────  │ group   │  ──────────────────  │             │
//! │  │  transaction_type    │───────► │  seller              │             │
//! │  │  date (verbatim)     │         │  transaction_type    │             │
//! │  │  product             │         │  total_value         │             │
//! │  │  value (cents?)      │         └──────────────────────┘             │
//! │  │  seller              │                                               │
//! │  └──────────────────────┘                                               │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────┐          │
//! │  │  TransactionType                                          │          │
//! │  │  1 PrimarySale  2 AffiliateSale  3 CommissionPaid         │          │
//! │  │  4 CommissionReceived  Other(code)  Malformed             │          │
//! │  └──────────────────────────────────────────────────────────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Transaction Type
// =============================================================================

/// The transaction type code from column 0 of a record.
///
/// Unknown codes are kept as `Other` and unreadable codes as `Malformed`;
/// neither is ever rejected. Serializes as the integer code, or `null` for
/// `Malformed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum TransactionType {
    /// Type 1: sale by the product's producer.
    PrimarySale,
    /// Type 2: sale by an affiliate.
    AffiliateSale,
    /// Type 3: commission paid out by the seller.
    CommissionPaid,
    /// Type 4: commission received by the seller.
    CommissionReceived,
    /// Any other integer code.
    Other(i64),
    /// The type column held no number.
    Malformed,
}

impl TransactionType {
    /// Maps an integer code to its type.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => TransactionType::PrimarySale,
            2 => TransactionType::AffiliateSale,
            3 => TransactionType::CommissionPaid,
            4 => TransactionType::CommissionReceived,
            other => TransactionType::Other(other),
        }
    }

    /// Returns the integer code, `None` for `Malformed`.
    pub fn code(&self) -> Option<i64> {
        match self {
            TransactionType::PrimarySale => Some(1),
            TransactionType::AffiliateSale => Some(2),
            TransactionType::CommissionPaid => Some(3),
            TransactionType::CommissionReceived => Some(4),
            TransactionType::Other(code) => Some(*code),
            TransactionType::Malformed => None,
        }
    }

    /// Applies the sign convention to a value.
    ///
    /// ```text
    /// 1 primary sale         + value
    /// 2 affiliate sale       + value
    /// 3 commission paid      - value
    /// 4 commission received  + value
    /// anything else          ignored (None)
    /// ```
    ///
    /// This is the one place the convention is written down; every total in
    /// the system goes through it.
    pub fn signed(&self, value: Money) -> Option<Money> {
        match self {
            TransactionType::PrimarySale
            | TransactionType::AffiliateSale
            | TransactionType::CommissionReceived => Some(value),
            TransactionType::CommissionPaid => Some(-value),
            TransactionType::Other(_) | TransactionType::Malformed => None,
        }
    }
}

impl From<Option<i64>> for TransactionType {
    fn from(code: Option<i64>) -> Self {
        code.map_or(TransactionType::Malformed, TransactionType::from_code)
    }
}

impl From<TransactionType> for Option<i64> {
    fn from(kind: TransactionType) -> Self {
        kind.code()
    }
}

// =============================================================================
// Transaction Record
// =============================================================================

/// One parsed line of an upload.
///
/// Immutable once parsed; storage persists it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Characters 1..26 of the line, untouched.
    pub date: String,

    pub product: String,

    /// `None` when the value column was not numeric.
    pub value: Option<Money>,

    pub seller: String,
}

impl TransactionRecord {
    /// Contribution of this record to its seller's total, if any.
    pub fn signed_value(&self) -> Option<Money> {
        self.value
            .and_then(|value| self.transaction_type.signed(value))
    }
}

// =============================================================================
// Seller Aggregate
// =============================================================================

/// Sum of values for one (seller, type) pair, without the sign convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerAggregate {
    pub seller: String,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub total_value: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
