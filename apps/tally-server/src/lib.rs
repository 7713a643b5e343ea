//! # Tally Server
//!
//! HTTP front end for fixed-width sales files.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          tally-server                                   │
//! │                                                                         │
//! │  client ──► axum Router ──► routes::* ──► tally-core (parse, totals)   │
//! │                   │               │                                     │
//! │                   │               └─────► tally-db (SQLite)             │
//! │                   │                                                     │
//! │             DefaultBodyLimit on /upload                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::config::ServerConfig;
use tally_db::Database;

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

/// Builds the application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route(
            "/upload",
            post(routes::upload).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .route("/transactions/all", get(routes::all_transactions))
        .route("/transactions/{seller}", get(routes::seller_transactions))
        .route("/health", get(routes::health))
        .with_state(state)
}
