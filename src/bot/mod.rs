//! # Bot command layer
//!
//! Everything between a chat platform and the [`crate::catalog`]:
//!
//! - [`parser`] - slash command parsing with quoted and named arguments
//! - [`commands`] - [`CommandProcessor`] running commands against the catalog
//! - [`reply`] - text/embed replies, command outcomes, autocomplete choices
//! - [`console`] - stdin/stdout front end used by `pricebot start`
//!
//! ```text
//! ┌─────────────────┐
//! │  Front end      │ ← chat platform or console
//! └─────────────────┘
//!          │ Command / partial name
//! ┌─────────────────┐
//! │ CommandProcessor│ → CommandOutcome / Vec<Choice>
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │  Catalog        │ ← snapshot of the spreadsheet
//! └─────────────────┘
//! ```

pub mod commands;
pub mod console;
pub mod parser;
pub mod reply;

pub use commands::CommandProcessor;
pub use console::ConsoleFrontend;
pub use parser::{Command, CommandParser, ParsedCommand};
pub use reply::{Choice, CommandOutcome, Embed, Reply, GENERIC_FAILURE};
