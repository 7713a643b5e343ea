//! # HTTP Handlers
//!
//! ```text
//! POST /upload                 multipart field "file" → parse → save_all
//! GET  /transactions/all       unsigned sums per (seller, type)
//! GET  /transactions/{seller}  seller's records + signed total
//! GET  /health                 "OK" while the database answers
//! ```
//!
//! Money leaves this module in major units (`12.75`); a malformed type or
//! value is rendered as `null`.

use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::{debug, info, warn};

use tally_core::{parse, total_for_seller, SellerAggregate, TransactionRecord};

use crate::error::ApiError;
use crate::AppState;

/// Multipart field carrying the fixed-width file.
pub const FILE_FIELD: &str = "file";

const NO_FILE: &str = "No file uploaded";
const PROCESSING_FAILED: &str = "Error processing file";
const FETCH_FAILED: &str = "Error fetching transactions";
const SELLER_NOT_FOUND: &str = "Seller not found";

// =============================================================================
// Response Bodies
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: &'static str,
    pub batch_id: String,
    pub records: u64,
}

#[derive(Debug, Serialize)]
pub struct TransactionJson {
    #[serde(rename = "type")]
    pub transaction_type: Option<i64>,
    pub date: String,
    pub product: String,
    pub value: Option<f64>,
    pub seller: String,
}

impl From<TransactionRecord> for TransactionJson {
    fn from(record: TransactionRecord) -> Self {
        TransactionJson {
            transaction_type: record.transaction_type.code(),
            date: record.date,
            product: record.product,
            value: record.value.map(|value| value.to_major_units()),
            seller: record.seller,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateJson {
    pub seller: String,
    #[serde(rename = "type")]
    pub transaction_type: Option<i64>,
    pub total_value: f64,
}

impl From<SellerAggregate> for AggregateJson {
    fn from(group: SellerAggregate) -> Self {
        AggregateJson {
            seller: group.seller,
            transaction_type: group.transaction_type.code(),
            total_value: group.total_value.to_major_units(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AllTransactionsResponse {
    pub transactions: Vec<AggregateJson>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerTransactionsResponse {
    pub transactions: Vec<TransactionJson>,
    pub total_sales: f64,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /upload`
///
/// Only a file part named `file` counts: a plain form field of that name, or
/// a request that isn't multipart at all, is treated as having no file.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "Upload without multipart body");
            return Err(ApiError::bad_request(NO_FILE));
        }
    };

    let mut contents = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(FILE_FIELD) && field.file_name().is_some() {
            contents = Some(field.bytes().await.map_err(multipart_error)?);
            break;
        }
    }

    let Some(contents) = contents else {
        return Err(ApiError::bad_request(NO_FILE));
    };

    let records = parse(&String::from_utf8_lossy(&contents));
    let batch = state
        .db
        .transactions()
        .save_all(&records)
        .await
        .map_err(|e| ApiError::database(e, PROCESSING_FAILED))?;

    info!(
        batch_id = %batch.id,
        records = batch.rows,
        bytes = contents.len(),
        "File uploaded"
    );

    Ok(Json(UploadResponse {
        message: "File uploaded successfully",
        batch_id: batch.id,
        records: batch.rows,
    }))
}

/// `GET /transactions/all`
pub async fn all_transactions(
    State(state): State<AppState>,
) -> Result<Json<AllTransactionsResponse>, ApiError> {
    let groups = state
        .db
        .transactions()
        .group_by_seller_and_type()
        .await
        .map_err(|e| ApiError::database(e, FETCH_FAILED))?;

    Ok(Json(AllTransactionsResponse {
        transactions: groups.into_iter().map(AggregateJson::from).collect(),
    }))
}

/// `GET /transactions/{seller}`
///
/// The path segment is percent-decoded and matched exactly against the
/// stored seller column.
pub async fn seller_transactions(
    State(state): State<AppState>,
    Path(seller): Path<String>,
) -> Result<Json<SellerTransactionsResponse>, ApiError> {
    let records = state
        .db
        .transactions()
        .find_by_seller(&seller)
        .await
        .map_err(|e| ApiError::database(e, FETCH_FAILED))?;

    if records.is_empty() {
        return Err(ApiError::not_found(SELLER_NOT_FOUND));
    }

    let total = total_for_seller(&records);

    Ok(Json(SellerTransactionsResponse {
        transactions: records.into_iter().map(TransactionJson::from).collect(),
        total_sales: total.to_major_units(),
    }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large(err.body_text());
    }
    warn!(error = %err.body_text(), "Malformed multipart body");
    ApiError::internal(PROCESSING_FAILED)
}

// =============================================================================
// Unit Tests
// =============================================================================
