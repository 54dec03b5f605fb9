//! In-memory workbook implementing [`SheetSource`].
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use log::debug;

use super::{Rows, SheetSource};
use crate::errors::SheetError;

/// Worksheets kept in process memory.
///
/// Used as the offline backend and as a test double. [`MemorySheets::set_unreachable`]
/// makes every call fail the way an unreachable service would.
#[derive(Debug, Default)]
pub struct MemorySheets {
    worksheets: Mutex<HashMap<String, Rows>>,
    unreachable: AtomicBool,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a workbook from JSON: `{ "<worksheet>": [["cell", ...], ...], ... }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let worksheets: HashMap<String, Rows> =
            serde_json::from_str(json).map_err(|e| anyhow!("Invalid workbook JSON: {}", e))?;
        Ok(Self {
            worksheets: Mutex::new(worksheets),
            unreachable: AtomicBool::new(false),
        })
    }

    /// Builder-style worksheet insert.
    pub fn with_worksheet(self, name: &str, rows: Rows) -> Self {
        self.set_worksheet(name, rows);
        self
    }

    /// Replace a worksheet's rows.
    pub fn set_worksheet(&self, name: &str, rows: Rows) {
        if let Ok(mut guard) = self.worksheets.lock() {
            guard.insert(name.to_string(), rows);
        }
    }

    /// Current rows of a worksheet, if it exists.
    pub fn worksheet(&self, name: &str) -> Option<Rows> {
        self.worksheets.lock().ok()?.get(name).cloned()
    }

    /// Simulate an outage: every read and append fails while set.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> Result<(), SheetError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(SheetError::Http("spreadsheet unreachable".to_string()));
        }
        Ok(())
    }
}

impl SheetSource for MemorySheets {
    async fn read_rows(&self, worksheet: &str) -> Result<Rows, SheetError> {
        self.check_reachable()?;
        let guard = self
            .worksheets
            .lock()
            .map_err(|_| SheetError::Http("workbook lock poisoned".to_string()))?;
        guard
            .get(worksheet)
            .cloned()
            .ok_or_else(|| SheetError::NotFound(worksheet.to_string()))
    }

    async fn append_row(&self, worksheet: &str, row: Vec<String>) -> Result<(), SheetError> {
        self.check_reachable()?;
        let mut guard = self
            .worksheets
            .lock()
            .map_err(|_| SheetError::Http("workbook lock poisoned".to_string()))?;
        debug!("Appending row to in-memory worksheet '{}'", worksheet);
        guard.entry(worksheet.to_string()).or_default().push(row);
        Ok(())
    }
}
