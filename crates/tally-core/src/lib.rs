//! # tally-core: Pure Ledger Logic
//!
//! The domain rules of Tally, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  tally-server (axum)                            │   │
//! │  │   POST /upload   GET /transactions/all   GET /transactions/{s}  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  parser   │  │ aggregate │  │   types   │  │   money   │  │   │
//! │  │   │ fixed-    │  │ signed    │  │  Record   │  │  cents    │  │   │
//! │  │   │ width     │  │ totals    │  │  Type     │  │  (i64)    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-db (SQLite via sqlx)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`parser`] - Fixed-width line parser
//! - [`aggregate`] - Signed seller totals and grouped sums
//! - [`types`] - TransactionRecord, TransactionType, SellerAggregate
//! - [`money`] - Integer-cent Money type
//! - [`error`] - Field parse errors
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{parse, total_for_seller};
//!
//! let upload = format!(
//!     "1{date}{:<30}0000012750{:<20}\n3{date}{:<30}0000004500{:<20}",
//!     "CURSO", "JOSE CARLOS", "CURSO", "JOSE CARLOS",
//!     date = "2022-01-15T19:20:30-03:00",
//! );
//!
//! let records = parse(&upload);
//! assert_eq!(total_for_seller(&records).to_string(), "82.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod error;
pub mod money;
pub mod parser;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{group_by_seller_and_type, total_for_seller};
pub use error::{FieldError, FieldResult};
pub use money::Money;
pub use parser::parse;
pub use types::*;
