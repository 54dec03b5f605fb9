use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::numeric::parse_number;

/// Timestamp layout used for suggestion rows written to the sheet.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|s| s.trim()).unwrap_or("")
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_default()
}

/// One row of the item price table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRow {
    pub name: String,
    /// Stored price, already including the standard margin. Never negative.
    pub base_price: f64,
    pub standard_margin_percent: f64,
}

impl ItemRow {
    /// Build from a raw sheet row (A name, B price, C margin). Blank names yield `None`.
    ///
    /// Negative prices read as 0. The margin keeps its sign.
    pub fn from_row(row: &[String]) -> Option<Self> {
        let name = cell(row, 0);
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            base_price: parse_number(cell(row, 1)).max(0.0),
            standard_margin_percent: parse_number(cell(row, 2)),
        })
    }
}

/// Proposed price change for an existing item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceSuggestion {
    pub timestamp: DateTime<Utc>,
    pub item_name: String,
    pub old_price: f64,
    pub proposed_price: f64,
    pub author: String,
}

impl PriceSuggestion {
    pub fn new(item_name: &str, old_price: f64, proposed_price: f64, author: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            item_name: item_name.to_string(),
            old_price,
            proposed_price,
            author: author.to_string(),
        }
    }

    pub fn from_row(row: &[String]) -> Option<Self> {
        let item_name = cell(row, 1);
        if item_name.is_empty() {
            return None;
        }
        Some(Self {
            timestamp: parse_timestamp(cell(row, 0)),
            item_name: item_name.to_string(),
            old_price: parse_number(cell(row, 2)),
            proposed_price: parse_number(cell(row, 3)),
            author: cell(row, 4).to_string(),
        })
    }

    /// Cells in sheet column order. Numbers keep the sheet's decimal comma.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.item_name.clone(),
            sheet_number(self.old_price),
            sheet_number(self.proposed_price),
            self.author.clone(),
        ]
    }
}

/// Report of an item missing from the price table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSuggestion {
    pub timestamp: DateTime<Utc>,
    pub item_name: String,
    pub author: String,
}

impl ItemSuggestion {
    pub fn new(item_name: &str, author: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            item_name: item_name.to_string(),
            author: author.to_string(),
        }
    }

    pub fn from_row(row: &[String]) -> Option<Self> {
        let item_name = cell(row, 1);
        if item_name.is_empty() {
            return None;
        }
        Some(Self {
            timestamp: parse_timestamp(cell(row, 0)),
            item_name: item_name.to_string(),
            author: cell(row, 2).to_string(),
        })
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.item_name.clone(),
            self.author.clone(),
        ]
    }

    /// Same item, ignoring case and surrounding whitespace.
    pub fn matches(&self, item_name: &str) -> bool {
        self.item_name.trim().to_lowercase() == item_name.trim().to_lowercase()
    }
}

/// Recipe complexity class; each has its own column block in the calculations sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecipeTier {
    Simple,
    Medium,
    Complex,
}

impl RecipeTier {
    pub fn label(self) -> &'static str {
        match self {
            RecipeTier::Simple => "einfach",
            RecipeTier::Medium => "mittel",
            RecipeTier::Complex => "komplex",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub item_name: String,
    pub tier: RecipeTier,
    pub ingredients: Vec<Ingredient>,
    /// Only simple recipes carry a production time.
    pub production_time_minutes: Option<f64>,
}

/// Format a number the way the sheet expects user-entered values (`12,5`).
fn sheet_number(value: f64) -> String {
    format!("{}", value).replace('.', ",")
}
