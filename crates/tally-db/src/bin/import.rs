//! # Fixed-Width File Importer
//!
//! Loads a fixed-width sales file from disk into the database, the same way
//! `POST /upload` does, then prints per-seller totals.
//!
//! ## Usage
//! ```bash
//! # Import into ./transactions.db (default)
//! cargo run -p tally-db --bin tally-import -- sales.txt
//!
//! # Specify database path
//! cargo run -p tally-db --bin tally-import -- sales.txt --db ./data/tally.db
//! ```
//!
//! ## Output
//! ```text
//! JOSE CARLOS
//!   type 1            127.50
//!   type 4             45.00
//!   balance           172.50
//! ```
//! The per-type lines are the unsigned grouped sums of this file; the
//! balance is the seller's signed total across everything stored so far.

use std::env;

use anyhow::{bail, Context};
use tally_core::{group_by_seller_and_type, parse, total_for_seller, SellerAggregate};
use tally_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_DB_PATH: &str = "./transactions.db";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut file_path: Option<String> = None;
    let mut db_path = String::from(DEFAULT_DB_PATH);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => file_path = Some(other.to_string()),
        }
        i += 1;
    }

    let Some(file_path) = file_path else {
        print_usage();
        bail!("no input file given");
    };

    let bytes = tokio::fs::read(&file_path)
        .await
        .with_context(|| format!("failed to read {}", file_path))?;
    let records = parse(&String::from_utf8_lossy(&bytes));

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("failed to open {}", db_path))?;

    let batch = db.transactions().save_all(&records).await?;
    println!("Imported {} records from {} (batch {})", batch.rows, file_path, batch.id);
    println!();

    let groups = group_by_seller_and_type(&records);
    for (seller, seller_groups) in by_seller(&groups) {
        println!("{}", if seller.is_empty() { "(no seller)" } else { seller });
        for group in seller_groups {
            let kind = group
                .transaction_type
                .code()
                .map_or_else(|| "?".to_string(), |code| code.to_string());
            println!("  type {:<3} {:>15}", kind, group.total_value.to_string());
        }

        let stored = db.transactions().find_by_seller(seller).await?;
        println!("  balance  {:>15}", total_for_seller(&stored).to_string());
    }

    db.close().await;
    Ok(())
}

/// Splits sorted aggregates into runs of the same seller.
fn by_seller(groups: &[SellerAggregate]) -> Vec<(&str, &[SellerAggregate])> {
    groups
        .chunk_by(|a, b| a.seller == b.seller)
        .map(|run| (run[0].seller.as_str(), run))
        .collect()
}

fn print_usage() {
    println!("Tally fixed-width importer");
    println!();
    println!("Usage: tally-import <FILE> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>    Database file path (default: {})", DEFAULT_DB_PATH);
    println!("  -h, --help         Show this help message");
}
