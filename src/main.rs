//! Ledger Exporter CLI
//!
//! Replays recorded cleared-order / cleared-market event streams into CSV
//! ledgers, and inspects market catalogue files.
//!
//! Usage:
//!   ledger-exporter --config exporter.toml replay --events cleared.jsonl
//!   ledger-exporter replay --events cleared.jsonl --orders-file out/orders.csv --markets-file out/markets.csv
//!   ledger-exporter catalogue --catalogue-path data/catalogues --market-id 1.23
//!
//! Environment:
//!   LEDGER_CONFIG       - Config file path
//!   LEDGER_ORDERS_FILE  - Orders ledger path
//!   LEDGER_MARKETS_FILE - Markets ledger path
//!   LEDGER_APPEND       - Keep existing ledgers (true/false, 1/0, yes/no)
//!   RUST_LOG            - Overrides the configured log level

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use tracing::info;

use ledger_exporter::logging::init_logging;
use ledger_exporter::middleware::{
    CatalogueConfig, Market, MarketCatalogueMiddleware, Middleware,
};
use ledger_exporter::replay::replay_events;
use ledger_exporter::{ExporterConfig, RecordStore};

#[derive(Parser, Debug)]
#[command(name = "ledger-exporter")]
#[command(about = "Write cleared orders and markets to append-only CSV ledgers")]
struct Cli {
    /// TOML config file
    #[arg(short, long, env = "LEDGER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Also write logs to stderr
    #[arg(long)]
    stream_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a newline-delimited JSON event stream into the ledgers
    Replay {
        /// Event stream file
        #[arg(short, long)]
        events: PathBuf,

        /// Orders ledger path
        #[arg(long, env = "LEDGER_ORDERS_FILE")]
        orders_file: Option<PathBuf>,

        /// Markets ledger path (market summaries are only logged without it)
        #[arg(long, env = "LEDGER_MARKETS_FILE")]
        markets_file: Option<PathBuf>,

        /// Append to existing ledgers instead of recreating them
        /// (`--append`, `--append false`; unset keeps the config value)
        #[arg(
            long,
            env = "LEDGER_APPEND",
            num_args = 0..=1,
            default_missing_value = "true",
            value_parser = BoolishValueParser::new()
        )]
        append: Option<bool>,
    },

    /// Load the catalogue for one market and print a summary
    Catalogue {
        /// Market identifier
        #[arg(short, long)]
        market_id: String,

        /// Directory holding catalogue files
        #[arg(long)]
        catalogue_path: Option<PathBuf>,

        /// Catalogue file extension
        #[arg(long)]
        extension: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ExporterConfig::load_or_default(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.stream_logs {
        config.logging.stream = true;
    }
    let _log_guard = init_logging(&config.logging)?;

    match cli.command {
        Commands::Replay {
            events,
            orders_file,
            markets_file,
            append,
        } => {
            config.apply_overrides(orders_file, markets_file, append);
            run_replay(&config, events)
        }
        Commands::Catalogue {
            market_id,
            catalogue_path,
            extension,
        } => run_catalogue(&config, market_id, catalogue_path, extension),
    }
}

fn run_replay(config: &ExporterConfig, events: PathBuf) -> Result<()> {
    let store_config = config.record_store_config()?;
    info!(
        orders_file = %store_config.orders_file.display(),
        markets_file = ?store_config.markets_file,
        append = store_config.append_to_logs,
        "Starting replay"
    );

    let mut store = RecordStore::new(store_config).context("Failed to initialise ledgers")?;

    let file = File::open(&events)
        .with_context(|| format!("Failed to open event stream: {:?}", events))?;
    let summary = replay_events(BufReader::new(file), &mut store)?;

    println!("{}", summary);
    Ok(())
}

fn run_catalogue(
    config: &ExporterConfig,
    market_id: String,
    catalogue_path: Option<PathBuf>,
    extension: Option<String>,
) -> Result<()> {
    let mut catalogue_config = match (catalogue_path, config.catalogue.clone()) {
        (Some(path), Some(existing)) => CatalogueConfig { path, ..existing },
        (Some(path), None) => CatalogueConfig {
            path,
            extension: "gz".to_string(),
        },
        (None, Some(existing)) => existing,
        (None, None) => anyhow::bail!(
            "No catalogue path configured (set [catalogue] path or --catalogue-path)"
        ),
    };
    if let Some(extension) = extension {
        catalogue_config.extension = extension;
    }

    let middleware = MarketCatalogueMiddleware::from_config(&catalogue_config);
    let mut market = Market::new(market_id);
    middleware.add_market(&mut market)?;

    match &market.market_catalogue {
        Some(catalogue) => {
            println!("Market:       {}", catalogue.market_id);
            println!(
                "Name:         {}",
                catalogue.market_name.as_deref().unwrap_or("-")
            );
            if let Some(start) = catalogue.market_start_time {
                println!("Start:        {}", start.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            println!("Runners:      {}", catalogue.runners.len());
            for runner in &catalogue.runners {
                println!(
                    "  {:>10}  {}",
                    runner.selection_id,
                    runner.runner_name.as_deref().unwrap_or("-")
                );
            }
        }
        None => println!(
            "No catalogue for market {} at {}",
            market.market_id,
            middleware.file_path(&market.market_id).display()
        ),
    }
    Ok(())
}
