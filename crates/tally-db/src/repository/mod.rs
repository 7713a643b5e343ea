//! # Repository Module
//!
//! Database repository implementations for Tally.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  db.transactions().find_by_seller("JOSE CARLOS")               │
//! │       ▼                                                                 │
//! │  TransactionRepository                                                 │
//! │  ├── save_all(&self, records)                                          │
//! │  ├── find_by_seller(&self, seller)                                     │
//! │  ├── group_by_seller_and_type(&self)                                   │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`TransactionRepository`](transaction::TransactionRepository) - Parsed upload records

pub mod transaction;
