//! # Catalog
//!
//! In-memory snapshot of the pricing spreadsheet and the operations the bot
//! commands run against it.
//!
//! ## Components
//!
//! - [`numeric`] - best-effort parsing of German-formatted number cells
//! - [`pricing`] - margin-adjusted display price and number formatting
//! - [`recipe`] - tier-based recipe lookup in the calculations sheet
//! - [`types`] - row types for items, suggestions and recipes
//!
//! ## Snapshot model
//!
//! A [`Snapshot`] is immutable. [`Catalog::refresh`] reads every worksheet first and
//! only then swaps the new `Arc<Snapshot>` in, so readers see either the old or
//! the new tables and never a mix. A failed refresh leaves the previous snapshot
//! in place. The first read on an empty catalog triggers a refresh.
//!
//! ```rust,no_run
//! use pricebot::catalog::{Catalog, WorksheetNames};
//! use pricebot::sheets::MemorySheets;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let catalog = Catalog::new(MemorySheets::new(), WorksheetNames::default());
//! catalog.refresh().await?;
//! let hits = catalog.search_names("eisen", 25).await?;
//! # Ok(())
//! # }
//! ```

pub mod numeric;
pub mod pricing;
pub mod recipe;
pub mod types;

use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::RwLock;

use crate::config::SheetsConfig;
use crate::errors::{CatalogError, SheetError};
use crate::logutil::escape_log;
use crate::sheets::{Rows, SheetSource};

pub use numeric::parse_number;
pub use pricing::{compute_display_price, format_margin, format_number};
pub use recipe::{resolve_recipe, TierLayout, RECIPE_TIERS};
pub use types::{Ingredient, ItemRow, ItemSuggestion, PriceSuggestion, Recipe, RecipeTier};

/// Maximum number of autocomplete choices a chat platform accepts.
pub const AUTOCOMPLETE_LIMIT: usize = 25;
/// Autocomplete choice names must be 1..=100 characters long.
pub const MAX_CHOICE_NAME_CHARS: usize = 100;
/// Every worksheet starts with one header row.
const HEADER_ROWS: usize = 1;

/// Worksheet names inside the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetNames {
    pub items: String,
    pub price_suggestions: String,
    pub item_suggestions: String,
    pub recipes: String,
}

impl Default for WorksheetNames {
    fn default() -> Self {
        Self::from(&SheetsConfig::default())
    }
}

impl From<&SheetsConfig> for WorksheetNames {
    fn from(config: &SheetsConfig) -> Self {
        Self {
            items: config.items_worksheet.clone(),
            price_suggestions: config.price_suggestions_worksheet.clone(),
            item_suggestions: config.item_suggestions_worksheet.clone(),
            recipes: config.recipes_worksheet.clone(),
        }
    }
}

/// Point-in-time copy of all cached tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub items: Vec<ItemRow>,
    pub price_suggestions: Vec<PriceSuggestion>,
    pub item_suggestions: Vec<ItemSuggestion>,
    /// Raw calculations sheet rows (header removed); recipes are resolved on lookup.
    pub recipe_rows: Rows,
}

impl Snapshot {
    /// Build a snapshot from raw worksheet rows, each still carrying its header row.
    pub fn from_rows(items: Rows, price_suggestions: Rows, item_suggestions: Rows, recipes: Rows) -> Self {
        Self {
            items: items
                .iter()
                .skip(HEADER_ROWS)
                .filter_map(|row| ItemRow::from_row(row))
                .collect(),
            price_suggestions: price_suggestions
                .iter()
                .skip(HEADER_ROWS)
                .filter_map(|row| PriceSuggestion::from_row(row))
                .collect(),
            item_suggestions: item_suggestions
                .iter()
                .skip(HEADER_ROWS)
                .filter_map(|row| ItemSuggestion::from_row(row))
                .collect(),
            recipe_rows: recipes.into_iter().skip(HEADER_ROWS).collect(),
        }
    }

    /// Exact, case-sensitive lookup. The first row wins if a name repeats.
    pub fn find_item(&self, name: &str) -> Option<&ItemRow> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Case-insensitive substring match over item names, in table order.
    pub fn search_names(&self, query: &str, limit: usize) -> Vec<String> {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .map(|item| item.name.as_str())
            .filter(|name| {
                let chars = name.chars().count();
                (1..=MAX_CHOICE_NAME_CHARS).contains(&chars)
            })
            .filter(|name| name.to_lowercase().contains(&needle))
            .take(limit)
            .map(str::to_string)
            .collect()
    }

    pub fn find_recipe(&self, item_name: &str) -> Option<Recipe> {
        resolve_recipe(item_name, &self.recipe_rows)
    }

    pub fn has_item_suggestion(&self, item_name: &str) -> bool {
        self.item_suggestions.iter().any(|s| s.matches(item_name))
    }
}

/// Shared catalog backed by a [`SheetSource`].
pub struct Catalog<S: SheetSource> {
    source: S,
    worksheets: WorksheetNames,
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl<S: SheetSource> Catalog<S> {
    pub fn new(source: S, worksheets: WorksheetNames) -> Self {
        Self {
            source,
            worksheets,
            current: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn worksheets(&self) -> &WorksheetNames {
        &self.worksheets
    }

    /// Re-read all worksheets and swap in a new snapshot.
    ///
    /// On failure the previous snapshot stays in place and the error is returned.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CatalogError> {
        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                info!(
                    "Catalog refreshed: {} items, {} price suggestions, {} item suggestions, {} recipe rows",
                    snapshot.items.len(),
                    snapshot.price_suggestions.len(),
                    snapshot.item_suggestions.len(),
                    snapshot.recipe_rows.len()
                );
                *self.current.write().await = Some(snapshot.clone());
                Ok(snapshot)
            }
            Err(e) => {
                let kept = self.current.read().await.is_some();
                error!(
                    "Catalog refresh failed: {} ({})",
                    e,
                    if kept { "keeping previous snapshot" } else { "no snapshot available" }
                );
                Err(CatalogError::Upstream(e))
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, SheetError> {
        let items = self.source.read_rows(&self.worksheets.items).await?;
        let price_suggestions = self.read_optional(&self.worksheets.price_suggestions).await?;
        let item_suggestions = self.read_optional(&self.worksheets.item_suggestions).await?;
        let recipes = self.read_optional(&self.worksheets.recipes).await?;
        Ok(Snapshot::from_rows(items, price_suggestions, item_suggestions, recipes))
    }

    /// Suggestion and recipe sheets may not exist yet; treat them as empty.
    async fn read_optional(&self, worksheet: &str) -> Result<Rows, SheetError> {
        match self.source.read_rows(worksheet).await {
            Err(SheetError::NotFound(name)) => {
                warn!("Worksheet '{}' not found, treating as empty", name);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Snapshot currently held, without triggering a load.
    pub async fn cached(&self) -> Option<Arc<Snapshot>> {
        self.current.read().await.clone()
    }

    /// Current snapshot, loading it first if the catalog is still empty.
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>, CatalogError> {
        if let Some(snapshot) = self.cached().await {
            return Ok(snapshot);
        }
        debug!("Catalog empty, loading on demand");
        self.refresh().await
    }

    pub async fn find_item(&self, name: &str) -> Result<Option<ItemRow>, CatalogError> {
        Ok(self.snapshot().await?.find_item(name).cloned())
    }

    pub async fn search_names(&self, query: &str, limit: usize) -> Result<Vec<String>, CatalogError> {
        Ok(self.snapshot().await?.search_names(query, limit))
    }

    pub async fn find_recipe(&self, item_name: &str) -> Result<Option<Recipe>, CatalogError> {
        Ok(self.snapshot().await?.find_recipe(item_name))
    }

    pub async fn has_item_suggestion(&self, item_name: &str) -> Result<bool, CatalogError> {
        Ok(self.snapshot().await?.has_item_suggestion(item_name))
    }

    /// Write a price suggestion to the sheet and mirror it locally.
    pub async fn record_price_suggestion(&self, suggestion: PriceSuggestion) -> Result<(), CatalogError> {
        self.source
            .append_row(&self.worksheets.price_suggestions, suggestion.to_row())
            .await?;
        info!(
            "Price suggestion for '{}' by {}: {} -> {}",
            escape_log(&suggestion.item_name),
            escape_log(&suggestion.author),
            suggestion.old_price,
            suggestion.proposed_price
        );
        self.mirror(|snapshot| snapshot.price_suggestions.push(suggestion)).await;
        Ok(())
    }

    /// Write a new-item suggestion to the sheet and mirror it locally.
    pub async fn record_item_suggestion(&self, suggestion: ItemSuggestion) -> Result<(), CatalogError> {
        self.source
            .append_row(&self.worksheets.item_suggestions, suggestion.to_row())
            .await?;
        info!(
            "Item suggestion '{}' by {}",
            escape_log(&suggestion.item_name),
            escape_log(&suggestion.author)
        );
        self.mirror(|snapshot| snapshot.item_suggestions.push(suggestion)).await;
        Ok(())
    }

    /// Copy-on-write update of the current snapshot. No-op while the catalog is empty.
    async fn mirror<F>(&self, update: F)
    where
        F: FnOnce(&mut Snapshot),
    {
        let mut guard = self.current.write().await;
        if let Some(current) = guard.as_ref() {
            let mut next = Snapshot::clone(current);
            update(&mut next);
            *guard = Some(Arc::new(next));
        }
    }
}
