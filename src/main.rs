//! Binary entrypoint for the pricebot CLI.
//!
//! Commands:
//! - `start [--offline <workbook.json>] [--author <name>]` - load the catalog and serve commands on stdin
//! - `init` - create a starter `config.toml`
//! - `refresh` - fetch the spreadsheet once and print a summary
//! - `status` - print configuration and catalog summary
//!
//! See the library crate docs for module-level details: `pricebot::`.
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use pricebot::bot::{CommandProcessor, ConsoleFrontend};
use pricebot::catalog::{Catalog, WorksheetNames};
use pricebot::config::Config;
use pricebot::sheets::{MemorySheets, SheetSource};

#[derive(Parser)]
#[command(name = "pricebot")]
#[command(about = "Spreadsheet-backed price bot for an in-game economy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Serve a local JSON workbook instead of the remote spreadsheet
    #[arg(long, global = true)]
    offline: Option<String>,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog and answer commands read from stdin
    Start {
        /// Name recorded as author of suggestions
        #[arg(short, long)]
        author: Option<String>,
    },
    /// Write a starter configuration file
    Init,
    /// Fetch the spreadsheet once and print a summary
    Refresh,
    /// Show configuration and catalog status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        if std::path::Path::new(&cli.config).exists() {
            warn!("{} already exists, leaving it untouched", cli.config);
            return Ok(());
        }
        Config::create_default(&cli.config).await?;
        info!("Configuration file created at {}", cli.config);
        return Ok(());
    }

    let config = Config::load_with_env(&cli.config).await?;
    init_logging(&Some(config.clone()), cli.verbose);
    info!("Starting pricebot v{}", env!("CARGO_PKG_VERSION"));

    match cli.offline.as_deref() {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| anyhow!("Failed to read workbook {}: {}", path, e))?;
            info!("Offline mode: serving workbook {}", path);
            run(cli.command, MemorySheets::from_json(&json)?, &config).await
        }
        None => run_remote(cli.command, &config).await,
    }
}

#[cfg(feature = "google-sheets")]
async fn run_remote(command: Commands, config: &Config) -> Result<()> {
    use pricebot::sheets::GoogleSheetsClient;
    config.validate_remote()?;
    let client = GoogleSheetsClient::new(&config.sheets)?;
    run(command, client, config).await
}

#[cfg(not(feature = "google-sheets"))]
async fn run_remote(_command: Commands, _config: &Config) -> Result<()> {
    Err(anyhow!(
        "Remote spreadsheets require the 'google-sheets' feature; use --offline <workbook.json>"
    ))
}

async fn run<S: SheetSource>(command: Commands, source: S, config: &Config) -> Result<()> {
    let catalog = Arc::new(Catalog::new(source, WorksheetNames::from(&config.sheets)));

    match command {
        Commands::Start { author } => {
            if let Err(e) = catalog.refresh().await {
                warn!("Initial catalog load failed: {} (will retry on first command)", e);
            }
            let author = author
                .or_else(|| std::env::var("USER").ok())
                .unwrap_or_else(|| "console".to_string());
            let processor = CommandProcessor::new(catalog, config.bot.currency_icon.clone());
            let frontend = ConsoleFrontend::new(processor, author);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            frontend.run(stdin, tokio::io::stdout()).await?;
        }
        Commands::Refresh => {
            let snapshot = catalog.refresh().await?;
            println!(
                "{} items, {} price suggestions, {} item suggestions, {} recipe rows",
                snapshot.items.len(),
                snapshot.price_suggestions.len(),
                snapshot.item_suggestions.len(),
                snapshot.recipe_rows.len()
            );
        }
        Commands::Status => {
            for line in config.status_lines() {
                println!("{}", line);
            }
            let worksheets = catalog.worksheets();
            println!(
                "Worksheets: items='{}' price_suggestions='{}' item_suggestions='{}' recipes='{}'",
                worksheets.items,
                worksheets.price_suggestions,
                worksheets.item_suggestions,
                worksheets.recipes
            );
            match catalog.refresh().await {
                Ok(snapshot) => println!(
                    "Catalog: {} items, {} recipe rows",
                    snapshot.items.len(),
                    snapshot.recipe_rows.len()
                ),
                Err(e) => println!("Catalog: unavailable ({})", e),
            }
        }
        // Written before any catalog exists, see main()
        Commands::Init => {}
    }
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Interactive runs also echo to the console; redirected runs only write the file
        let is_tty = atty::is(atty::Stream::Stderr);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
