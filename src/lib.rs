//! # pricebot - spreadsheet-backed price bot for an in-game economy
//!
//! Members look up item prices, propose price changes, report missing items and
//! read crafting recipes. A spreadsheet is the price database; pricebot keeps an
//! in-memory snapshot of it and answers commands from that snapshot.
//!
//! ## Features
//!
//! - **Loose number parsing**: German-formatted cells (`1.234,50 €`, `15%`) parse
//!   best-effort, malformed cells count as zero.
//! - **Margin recalculation**: prices can be shown with any margin instead of the
//!   item's standard margin.
//! - **Recipes**: three recipe tiers laid out side by side in one calculations sheet.
//! - **Suggestions**: price changes and missing items are appended to the sheet.
//! - **Stale-but-available cache**: a failed refresh keeps the last good snapshot.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pricebot::bot::{Command, CommandProcessor};
//! use pricebot::catalog::{Catalog, WorksheetNames};
//! use pricebot::sheets::MemorySheets;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let workbook = MemorySheets::from_json(&std::fs::read_to_string("workbook.json")?)?;
//!     let catalog = Arc::new(Catalog::new(workbook, WorksheetNames::default()));
//!     let processor = CommandProcessor::new(catalog, "Taler");
//!     let outcome = processor
//!         .handle(Command::SearchPrice { name: "Holz".into(), quantity: 2, margin: None }, "alice")
//!         .await;
//!     println!("{}", outcome.into_reply().render_plain());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`catalog`] - snapshot cache, number parsing, pricing, recipes
//! - [`sheets`] - spreadsheet collaborator trait and backends
//! - [`bot`] - command parsing, handling and replies
//! - [`config`] - configuration loading and environment overrides
//! - [`errors`] - error types
//! - [`logutil`] - log sanitizing helpers

pub mod bot;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod logutil;
pub mod sheets;
