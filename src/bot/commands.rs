//! Command handlers: turn a parsed [`Command`] into a [`CommandOutcome`].
//!
//! Handlers never return `Err`. Upstream and internal failures are logged here
//! with context and come back as [`CommandOutcome::UpstreamError`] or
//! [`CommandOutcome::InternalError`]; the front end decides how to word them.
use std::sync::Arc;

use log::{error, info, warn};

use super::parser::Command;
use super::reply::{Choice, CommandOutcome, Embed, Reply};
use crate::catalog::{
    compute_display_price, format_margin, format_number, Catalog, ItemSuggestion,
    PriceSuggestion, Recipe, AUTOCOMPLETE_LIMIT,
};
use crate::errors::CatalogError;
use crate::logutil::escape_log;
use crate::sheets::SheetSource;

pub const HELP_TEXT: &str = "Befehle:\n\
/update - Preisliste neu laden\n\
/suche <name> [menge] [marge] - Listenpreis anzeigen\n\
/preis-vorschlagen <name> <preis> - Preisänderung vorschlagen\n\
/item-vorschlagen <name> - fehlendes Item melden\n\
/rezept <name> - Zutaten anzeigen\n\
Namen mit Zahlen in Anführungszeichen setzen, z.B. /suche \"Trank 2\" 3";

/// Lookup miss guidance for items not in the price list.
pub fn missing_item_message(name: &str) -> String {
    format!(
        "Item {} ist nicht in der Liste. Mit dem Command \"/item-vorschlagen\" kannst du fehlende Items melden",
        name
    )
}

/// Executes commands against a shared [`Catalog`].
pub struct CommandProcessor<S: SheetSource> {
    catalog: Arc<Catalog<S>>,
    currency_icon: String,
}

impl<S: SheetSource> CommandProcessor<S> {
    pub fn new(catalog: Arc<Catalog<S>>, currency_icon: impl Into<String>) -> Self {
        Self {
            catalog,
            currency_icon: currency_icon.into(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog<S>> {
        &self.catalog
    }

    pub async fn handle(&self, command: Command, author: &str) -> CommandOutcome {
        match command {
            Command::Refresh => self.refresh().await,
            Command::SearchPrice { name, quantity, margin } => {
                self.search_price(&name, quantity, margin).await
            }
            Command::ProposePrice { name, new_price } => {
                self.propose_price(&name, new_price, author).await
            }
            Command::ProposeItem { name } => self.propose_item(&name, author).await,
            Command::ShowRecipe { name } => self.show_recipe(&name).await,
            Command::Help => CommandOutcome::Success(Reply::text(HELP_TEXT)),
        }
    }

    /// Up to [`AUTOCOMPLETE_LIMIT`] item names containing `partial`. Failures yield no choices.
    pub async fn autocomplete(&self, partial: &str) -> Vec<Choice> {
        match self.catalog.search_names(partial, AUTOCOMPLETE_LIMIT).await {
            Ok(names) => names.iter().map(|name| Choice::new(name)).collect(),
            Err(e) => {
                error!("Error during auto-complete: {}", e);
                Vec::new()
            }
        }
    }

    async fn refresh(&self) -> CommandOutcome {
        match self.catalog.refresh().await {
            Ok(_) => CommandOutcome::Success(Reply::text("Die Liste wurde aktualisiert")),
            Err(e) => {
                if self.catalog.cached().await.is_some() {
                    CommandOutcome::Success(Reply::text(
                        "Die Liste konnte nicht aktualisiert werden, die zuletzt geladene Liste bleibt aktiv",
                    ))
                } else {
                    upstream("refresh", e)
                }
            }
        }
    }

    async fn search_price(&self, name: &str, quantity: u32, margin: Option<f64>) -> CommandOutcome {
        let item = match self.catalog.find_item(name).await {
            Ok(Some(item)) => item,
            Ok(None) => return CommandOutcome::LookupMiss(Reply::text(missing_item_message(name))),
            Err(e) => return upstream("search", e),
        };

        let price = match compute_display_price(
            item.base_price,
            item.standard_margin_percent,
            margin,
            quantity,
        ) {
            Ok(price) => price,
            Err(e) => {
                error!("Error processing search command for '{}': {}", escape_log(name), e);
                return CommandOutcome::InternalError(e.to_string());
            }
        };
        let shown = format_number(price);

        let verb = if quantity > 1 { "kosten" } else { "kostet" };
        let suffix = match margin {
            None if item.standard_margin_percent == 0.0 => String::new(),
            None => format!(
                " bei einer Standardmarge von {}%",
                format_margin(item.standard_margin_percent)
            ),
            Some(m) if m == 0.0 => " bei 0% Marge".to_string(),
            Some(m) => format!(" bei einer Marge von {}%", format_margin(m)),
        };

        info!(
            "Found item {} with amount {} for the price of {}",
            escape_log(name),
            quantity,
            shown
        );
        CommandOutcome::Success(Reply::text(format!(
            "{} {} {} **{} {}**{}",
            quantity, item.name, verb, shown, self.currency_icon, suffix
        )))
    }

    async fn propose_price(&self, name: &str, new_price: f64, author: &str) -> CommandOutcome {
        let item = match self.catalog.find_item(name).await {
            Ok(Some(item)) => item,
            Ok(None) => return CommandOutcome::LookupMiss(Reply::text(missing_item_message(name))),
            Err(e) => return upstream("price suggestion", e),
        };

        let suggestion = PriceSuggestion::new(&item.name, item.base_price, new_price, author);
        match self.catalog.record_price_suggestion(suggestion).await {
            Ok(()) => CommandOutcome::Success(Reply::text(format!(
                "Danke! Dein Vorschlag für {} wurde gespeichert: {} → {} {}",
                item.name,
                format_number(item.base_price),
                format_number(new_price),
                self.currency_icon
            ))),
            Err(e) => upstream("price suggestion", e),
        }
    }

    async fn propose_item(&self, name: &str, author: &str) -> CommandOutcome {
        let snapshot = match self.catalog.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => return upstream("item suggestion", e),
        };

        if let Some(existing) = snapshot
            .items
            .iter()
            .find(|item| item.name.to_lowercase() == name.to_lowercase())
        {
            return CommandOutcome::Success(Reply::text(format!(
                "{} ist bereits in der Liste. Mit \"/suche\" findest du den Preis",
                existing.name
            )));
        }
        if snapshot.has_item_suggestion(name) {
            warn!("Duplicate item suggestion '{}' by {}", escape_log(name), escape_log(author));
            return CommandOutcome::Success(Reply::text(format!(
                "{} wurde bereits vorgeschlagen",
                name
            )));
        }

        match self
            .catalog
            .record_item_suggestion(ItemSuggestion::new(name, author))
            .await
        {
            Ok(()) => CommandOutcome::Success(Reply::text(format!(
                "Danke! {} wurde als neues Item vorgeschlagen",
                name
            ))),
            Err(e) => upstream("item suggestion", e),
        }
    }

    async fn show_recipe(&self, name: &str) -> CommandOutcome {
        match self.catalog.find_recipe(name).await {
            Ok(Some(recipe)) => CommandOutcome::Success(Reply::Embed(recipe_embed(&recipe))),
            Ok(None) => CommandOutcome::LookupMiss(Reply::text(format!(
                "Für {} ist kein Rezept hinterlegt",
                name
            ))),
            Err(e) => upstream("recipe", e),
        }
    }
}

fn upstream(context: &str, e: CatalogError) -> CommandOutcome {
    error!("Error processing {} command: {}", context, e);
    match e {
        CatalogError::Upstream(inner) => CommandOutcome::UpstreamError(inner.to_string()),
        other => CommandOutcome::InternalError(other.to_string()),
    }
}

/// Embed listing ingredients and, for simple recipes, the production time.
pub fn recipe_embed(recipe: &Recipe) -> Embed {
    let mut embed = Embed::new(format!("Rezept: {}", recipe.item_name))
        .description(format!("Stufe: {}", recipe.tier.label()));
    if recipe.ingredients.is_empty() {
        embed = embed.field("Zutaten", "keine hinterlegt", false);
    }
    for ingredient in &recipe.ingredients {
        embed = embed.field(
            ingredient.name.clone(),
            format!("{}x", format_number(ingredient.quantity)),
            true,
        );
    }
    if let Some(minutes) = recipe.production_time_minutes {
        embed = embed.footer(format!("Herstellungszeit: {} Minuten", format_number(minutes)));
    }
    embed
}
