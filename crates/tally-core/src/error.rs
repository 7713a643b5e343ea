//! # Error Types
//!
//! Field-level parse errors for tally-core.
//!
//! ## Where These Go
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Malformed Fields                                │
//! │                                                                         │
//! │  parse_type_code("X")  ──► Err(FieldError::NotNumeric)                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  parser folds the error into the record in-band:                       │
//! │    TransactionType::Malformed / value: None                            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  aggregation skips the malformed field                                 │
//! │                                                                         │
//! │  A whole-file parse never fails. FieldError only surfaces to callers   │
//! │  that use the field parsers directly.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// A single fixed-width field could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field slice was empty (line too short, or blank line).
    #[error("{field} is empty")]
    Empty { field: &'static str },

    /// The field holds no leading number.
    #[error("{field} is not numeric: '{raw}'")]
    NotNumeric { field: &'static str, raw: String },

    /// The number does not fit in an i64.
    #[error("{field} is out of range: '{raw}'")]
    OutOfRange { field: &'static str, raw: String },
}

/// Convenience type alias for field parse results.
pub type FieldResult<T> = Result<T, FieldError>;
