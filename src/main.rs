//! Thread-Sieve main entry point
//!
//! This is the command-line interface for the Thread-Sieve harvester.

use clap::Parser;
use std::path::PathBuf;
use thread_sieve::config::{load_config_with_hash, validate, Config};
use thread_sieve::crawler::{run_harvest, work_items};
use thread_sieve::output::print_summary;
use tracing_subscriber::EnvFilter;

/// Thread-Sieve: a polite forum thread harvester
///
/// Thread-Sieve reads community listings and keyword searches, collects the
/// top-level comments of every post, and writes the results as CSV tables.
/// Without a config file the built-in worklist is used.
#[derive(Parser, Debug)]
#[command(name = "thread-sieve")]
#[command(version = "1.0.0")]
#[command(about = "A polite forum thread harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Directory for the CSV files, overriding the config
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Validate config and show the worklist without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration given, using the built-in worklist");
            Config::default()
        }
    };

    if let Some(dir) = cli.output_dir {
        config.output.directory = dir.display().to_string();
        validate(&config)?;
    }

    if cli.dry_run {
        handle_dry_run(config)?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("thread_sieve=info,warn"),
            1 => EnvFilter::new("thread_sieve=debug,info"),
            2 => EnvFilter::new("thread_sieve=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Thread-Sieve Dry Run ===\n");

    println!("Source: {}", config.client.base_url);
    println!("User agent: {}", config.client.user_agent);

    println!("\nPacing:");
    println!("  Listing page delay: {}ms", config.pacing.listing_delay);
    println!("  Search page delay: {}ms", config.pacing.search_delay);
    println!(
        "  Rate limit cool-down: {}ms",
        config.pacing.rate_limit_cooldown
    );
    println!(
        "  Pause of {}ms every {} posts",
        config.pacing.batch_pause, config.pacing.batch_size
    );
    println!("  Pause between items: {}ms", config.pacing.item_pause);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Combined file: {}", config.output.combined_file);

    let items = work_items(&config);

    println!("\nWork items ({}):", items.len());
    for item in &items {
        println!(
            "  - r/{} [{}] target {} -> {}",
            item.community,
            item.category,
            item.target,
            item.file_name()
        );
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Listings: {}, Searches: {}",
        config.listings.len(),
        config.searches.len()
    );

    match run_harvest(config).await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
