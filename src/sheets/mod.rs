//! Spreadsheet collaborator.
//!
//! The catalog only needs two operations from a spreadsheet: read every row of a
//! worksheet as strings, and append one row. [`SheetSource`] captures exactly that.
//!
//! - [`MemorySheets`] - in-process workbook (tests, offline mode)
//! - [`GoogleSheetsClient`] - Google Sheets v4 REST client (`google-sheets` feature)
//! - [`ServiceAccountAuth`] - service account token minting for the REST client

use std::future::Future;

use crate::errors::SheetError;

pub mod memory;
#[cfg(feature = "google-sheets")]
pub mod auth;
#[cfg(feature = "google-sheets")]
pub mod google;

pub use memory::MemorySheets;
#[cfg(feature = "google-sheets")]
pub use auth::{ServiceAccountAuth, ServiceAccountKey};
#[cfg(feature = "google-sheets")]
pub use google::GoogleSheetsClient;

/// Rows of a worksheet, each row a list of cell display strings.
pub type Rows = Vec<Vec<String>>;

/// Remote tabular store addressed by worksheet name.
pub trait SheetSource: Send + Sync {
    /// Read every row of `worksheet`, header included.
    fn read_rows(&self, worksheet: &str) -> impl Future<Output = Result<Rows, SheetError>> + Send;

    /// Append `row` after the last filled row of `worksheet`.
    fn append_row(
        &self,
        worksheet: &str,
        row: Vec<String>,
    ) -> impl Future<Output = Result<(), SheetError>> + Send;
}
