//! # tally-db: Storage Layer for Tally
//!
//! Database access for parsed transaction records, using SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Data Flow                                  │
//! │                                                                         │
//! │  POST /upload ──► tally_core::parse ──► records                        │
//! │                                            │                            │
//! │                                            ▼                            │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │    Repository      │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│  (transaction.rs)  │  │ (embedded) │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                                   transactions.db (WAL)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("transactions.db")).await?;
//!
//! let records = tally_core::parse(&upload);
//! db.transactions().save_all(&records).await?;
//!
//! let mine = db.transactions().find_by_seller("JOSE CARLOS").await?;
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::transaction::{ImportBatch, TransactionRepository};
