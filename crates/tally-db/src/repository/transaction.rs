//! # Transaction Repository
//!
//! Storage for parsed fixed-width records.
//!
//! ## Row Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  transactions                                                           │
//! │  ───────────────────────────────────────────────────────────────────    │
//! │  id           INTEGER  autoincrement, gives insertion order             │
//! │  batch_id     TEXT     one UUID per upload                              │
//! │  type         INTEGER  NULL ⇔ TransactionType::Malformed                │
//! │  date         TEXT     verbatim 25-char column                          │
//! │  product      TEXT                                                      │
//! │  value_cents  INTEGER  NULL ⇔ value: None                               │
//! │  seller       TEXT                                                      │
//! │  imported_at  TEXT     UTC timestamp of the upload                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The grouped query relies on SQL `SUM` skipping NULLs, which is the same
//! rule `tally_core::group_by_seller_and_type` applies in memory.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::{Money, SellerAggregate, TransactionRecord, TransactionType};

/// Summary of one `save_all` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatch {
    /// UUID v4 shared by every row of this upload.
    pub id: String,
    /// Rows written.
    pub rows: u64,
    pub imported_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct TransactionRow {
    type_code: Option<i64>,
    date: String,
    product: String,
    value_cents: Option<i64>,
    seller: String,
}

impl From<TransactionRow> for TransactionRecord {
    fn from(row: TransactionRow) -> Self {
        TransactionRecord {
            transaction_type: TransactionType::from(row.type_code),
            date: row.date,
            product: row.product,
            value: row.value_cents.map(Money::from_cents),
            seller: row.seller,
        }
    }
}

#[derive(Debug, FromRow)]
struct AggregateRow {
    seller: String,
    type_code: Option<i64>,
    total_cents: Option<i64>,
}

impl From<AggregateRow> for SellerAggregate {
    fn from(row: AggregateRow) -> Self {
        SellerAggregate {
            seller: row.seller,
            transaction_type: TransactionType::from(row.type_code),
            // SUM over only NULLs is NULL
            total_value: Money::from_cents(row.total_cents.unwrap_or(0)),
        }
    }
}

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Saves every record of one upload, in order, inside one SQL transaction.
    ///
    /// Either all rows are written or none are.
    pub async fn save_all(&self, records: &[TransactionRecord]) -> DbResult<ImportBatch> {
        let batch = ImportBatch {
            id: Uuid::new_v4().to_string(),
            rows: 0,
            imported_at: Utc::now(),
        };

        debug!(batch_id = %batch.id, records = records.len(), "Saving transactions");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut rows = 0;
        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO transactions (
                    batch_id, type, date, product, value_cents, seller, imported_at
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7
                )
                "#,
            )
            .bind(&batch.id)
            .bind(record.transaction_type.code())
            .bind(&record.date)
            .bind(&record.product)
            .bind(record.value.map(|value| value.cents()))
            .bind(&record.seller)
            .bind(batch.imported_at)
            .execute(&mut *tx)
            .await?;

            rows += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(ImportBatch { rows, ..batch })
    }

    /// Gets every record for a seller, in insertion order.
    ///
    /// An unknown seller yields an empty vector.
    pub async fn find_by_seller(&self, seller: &str) -> DbResult<Vec<TransactionRecord>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT
                type AS type_code,
                date,
                product,
                value_cents,
                seller
            FROM transactions
            WHERE seller = ?1
            ORDER BY id
            "#,
        )
        .bind(seller)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TransactionRecord::from).collect())
    }

    /// Sums values per (seller, type), without the sign convention.
    ///
    /// Ordered by seller then type code, NULL type first.
    pub async fn group_by_seller_and_type(&self) -> DbResult<Vec<SellerAggregate>> {
        let rows: Vec<AggregateRow> = sqlx::query_as(
            r#"
            SELECT
                seller,
                type AS type_code,
                SUM(value_cents) AS total_cents
            FROM transactions
            GROUP BY seller, type
            ORDER BY seller, type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SellerAggregate::from).collect())
    }

    /// Counts stored records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
