//! adwatch CLI
//!
//! Single-pass batch entry point: scan the configured feed once, mail a
//! digest of new listings, and exit. Intended to run from cron or a timer.

use std::path::PathBuf;
use std::sync::Arc;

use adwatch::{
    config::Config,
    error::Result,
    notify::Notifier,
    pipeline,
    services::ListingScraper,
    storage::SeenStore,
};
use clap::{Parser, Subcommand};

/// adwatch - Classifieds Listing Watcher
#[derive(Parser, Debug)]
#[command(name = "adwatch", version, about = "Classifieds listing watcher")]
struct Cli {
    /// Path to the settings file
    #[arg(short, long, default_value = "settings.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one scan: fetch the feed, notify new listings, update the seen-set
    Scan,

    /// Validate the settings file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point. Any error exits with a non-zero status.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Missing settings are fatal: there is nothing useful to do without
    // a feed URL and mail credentials.
    let config = Config::load(&cli.config)?;
    config.validate()?;

    match cli.command {
        Command::Scan => {
            let config = Arc::new(config);
            let scraper = ListingScraper::new(Arc::clone(&config))?;
            let store = SeenStore::new(&config.watch.seen_file);
            let notifier = Notifier::new(config.mail.clone())?;

            pipeline::run_scan(&config, &scraper, &store, &notifier).await?;
        }
        Command::Validate => {
            log::info!("Settings at {} are valid", cli.config.display());
        }
    }

    Ok(())
}
