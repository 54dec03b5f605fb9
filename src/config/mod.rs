//! # Configuration Management Module
//!
//! Typed configuration for pricebot, loaded from TOML and overridden from the
//! process environment.
//!
//! ## Configuration Structure
//!
//! - [`BotConfig`] - bot identity, target guilds, chat token, currency icon
//! - [`SheetsConfig`] - spreadsheet identifier, worksheet names, credentials
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pricebot::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_with_env("config.toml").await?;
//!     println!("Spreadsheet: {}", config.sheets.spreadsheet_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [bot]
//! name = "Preisbot"
//! guild_ids = [123456789012345678]
//! currency_icon = "Taler"
//!
//! [sheets]
//! spreadsheet_id = "1AbC..."
//! credentials_file = "config/credentials.json"
//! items_worksheet = "Alle Items"
//! timeout_seconds = 10
//!
//! [logging]
//! level = "info"
//! file = "pricebot.log"
//! ```
//!
//! ## Environment Integration
//!
//! `config/.env` and `.env` are loaded first when present. Precedence order:
//! Environment > Config file > Defaults. Recognized variables are
//! `SPREADSHEET_ID`, `GUILD_IDS`, `DISCORD_TOKEN`, `GOOGLE_APPLICATION_CREDENTIALS`,
//! `GOOGLE_ACCESS_TOKEN`, `GOOGLE_API_KEY` and `ICON_TALER_NAME`. Without a
//! configured key file, `config/credentials.json` is picked up if it exists.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::logutil::mask_secret;

/// Service account key location used when none is configured.
pub const DEFAULT_CREDENTIALS_FILE: &str = "config/credentials.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    pub sheets: SheetsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub name: String,
    /// Communities the commands are registered in.
    #[serde(default)]
    pub guild_ids: Vec<u64>,
    /// Chat platform token. Usually supplied through `DISCORD_TOKEN` instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Text or custom emoji rendered after prices.
    #[serde(default = "default_currency_icon")]
    pub currency_icon: String,
}

fn default_currency_icon() -> String {
    "Taler".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    #[serde(default = "default_items_worksheet")]
    pub items_worksheet: String,
    #[serde(default = "default_price_suggestions_worksheet")]
    pub price_suggestions_worksheet: String,
    #[serde(default = "default_item_suggestions_worksheet")]
    pub item_suggestions_worksheet: String,
    #[serde(default = "default_recipes_worksheet")]
    pub recipes_worksheet: String,
    /// Service account key file. Preferred over the token and key below.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<String>,
    /// Pre-issued OAuth bearer token with spreadsheet scope. Not refreshed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// API key for read-only access to a shared spreadsheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u32,
}

fn default_items_worksheet() -> String {
    "Alle Items".to_string()
}

fn default_price_suggestions_worksheet() -> String {
    "Preisvorschläge".to_string()
}

fn default_item_suggestions_worksheet() -> String {
    "Itemvorschläge".to_string()
}

fn default_recipes_worksheet() -> String {
    "Berechnungen".to_string()
}

fn default_timeout_seconds() -> u32 {
    10
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            items_worksheet: default_items_worksheet(),
            price_suggestions_worksheet: default_price_suggestions_worksheet(),
            item_suggestions_worksheet: default_item_suggestions_worksheet(),
            recipes_worksheet: default_recipes_worksheet(),
            credentials_file: None,
            access_token: None,
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Load `.env` files, then the config file (defaults if it does not exist),
    /// then apply environment overrides.
    pub async fn load_with_env(path: &str) -> Result<Self> {
        for env_file in ["config/.env", ".env"] {
            if Path::new(env_file).exists() {
                dotenvy::from_filename(env_file)
                    .map_err(|e| anyhow!("Failed to load {}: {}", env_file, e))?;
            }
        }

        let mut config = if Path::new(path).exists() {
            Self::load(path).await?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        if config.sheets.credentials_file.is_none() && Path::new(DEFAULT_CREDENTIALS_FILE).exists() {
            config.sheets.credentials_file = Some(DEFAULT_CREDENTIALS_FILE.to_string());
        }
        Ok(config)
    }

    /// Override values from an environment lookup. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(id) = get("SPREADSHEET_ID") {
            self.sheets.spreadsheet_id = id.trim().to_string();
        }
        if let Some(raw) = get("GUILD_IDS") {
            self.bot.guild_ids = parse_guild_ids(&raw)?;
        }
        if let Some(token) = get("DISCORD_TOKEN") {
            self.bot.token = Some(token);
        }
        if let Some(path) = get("GOOGLE_APPLICATION_CREDENTIALS") {
            self.sheets.credentials_file = Some(path.trim().to_string());
        }
        if let Some(token) = get("GOOGLE_ACCESS_TOKEN") {
            self.sheets.access_token = Some(token);
        }
        if let Some(key) = get("GOOGLE_API_KEY") {
            self.sheets.api_key = Some(key);
        }
        if let Some(icon) = get("ICON_TALER_NAME") {
            self.bot.currency_icon = icon;
        }
        Ok(())
    }

    /// Check the settings needed to talk to the remote spreadsheet.
    pub fn validate_remote(&self) -> Result<()> {
        if self.sheets.spreadsheet_id.trim().is_empty() {
            return Err(anyhow!(
                "No spreadsheet configured (set sheets.spreadsheet_id or SPREADSHEET_ID)"
            ));
        }
        if self.sheets.timeout_seconds == 0 {
            return Err(anyhow!("sheets.timeout_seconds must be greater than 0"));
        }
        let sheets = &self.sheets;
        if sheets.credentials_file.is_none() && sheets.access_token.is_none() && sheets.api_key.is_none() {
            return Err(anyhow!(
                "No Google credentials configured (set sheets.credentials_file, \
                 GOOGLE_APPLICATION_CREDENTIALS, GOOGLE_ACCESS_TOKEN or GOOGLE_API_KEY)"
            ));
        }
        Ok(())
    }

    /// Human-readable settings for `pricebot status`. Secrets are masked.
    pub fn status_lines(&self) -> Vec<String> {
        let token = match &self.bot.token {
            Some(token) => mask_secret(token),
            None => "not set".to_string(),
        };
        let auth = match (&self.sheets.credentials_file, &self.sheets.access_token, &self.sheets.api_key) {
            (Some(path), _, _) => format!("service account key {}", path),
            (None, Some(token), _) => format!("access token {} (not refreshed)", mask_secret(token)),
            (None, None, Some(key)) => format!("API key {} (read-only)", mask_secret(key)),
            (None, None, None) => "none".to_string(),
        };
        vec![
            format!("Bot: {}", self.bot.name),
            format!("Guilds: {:?}", self.bot.guild_ids),
            format!("Bot token: {}", token),
            format!("Spreadsheet: {}", self.sheets.spreadsheet_id),
            format!("Google auth: {}", auth),
        ]
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

/// Parse a comma-separated list of guild ids.
pub fn parse_guild_ids(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .map_err(|_| anyhow!("GUILD_IDS must be a comma-separated list of integers."))
        })
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bot: BotConfig {
                name: "Preisbot".to_string(),
                guild_ids: Vec::new(),
                token: None,
                currency_icon: default_currency_icon(),
            },
            sheets: SheetsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("pricebot.log".to_string()),
            },
        }
    }
}
