//! Morsel main entry point
//!
//! Command-line interface for the Morsel review harvester.

use anyhow::Context;
use clap::Parser;
use morsel::config::load_config;
use morsel::input::load_targets;
use morsel::output::{load_stats, print_stats};
use morsel::Controller;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Morsel: a resumable review harvester
///
/// Morsel collects user reviews from a fixed list of restaurant pages,
/// checkpointing progress so an interrupted run picks up where it left
/// off instead of starting over.
#[derive(Parser, Debug)]
#[command(name = "morsel")]
#[command(version)]
#[command(about = "A resumable review harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Discard checkpoint and collected output, start from scratch
    #[arg(long)]
    fresh: bool,

    /// Re-queue targets a previous run marked as failed
    #[arg(long, conflicts_with = "fresh")]
    retry_failed: bool,

    /// Validate config and show what would be scraped without fetching
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the collected output and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_run(config, cli.fresh, cli.retry_failed).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("morsel=info,warn"),
            1 => EnvFilter::new("morsel=debug,info"),
            2 => EnvFilter::new("morsel=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &morsel::Config) -> anyhow::Result<()> {
    println!("=== Morsel Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Max pages per target: {}", config.scraper.max_pages);
    println!(
        "  Request delay: {}-{}ms",
        config.scraper.delay_min_ms, config.scraper.delay_max_ms
    );
    println!("  Max retries: {}", config.scraper.max_retries);
    println!("  Timeout: {}s", config.scraper.timeout_secs);
    println!("  Chunk size: {}", config.scraper.chunk_size);
    println!(
        "  Minimum review length: {}",
        config.scraper.min_review_length
    );

    println!("\nOutput:");
    println!("  Reviews: {}", config.output.reviews_path);
    println!("  Checkpoint: {}", config.output.checkpoint_path);

    println!("\nExtraction Strategies ({}):", config.selectors.len());
    for entry in &config.selectors {
        match &entry.rule {
            morsel::config::SelectorRule::Css { query } => {
                println!("  - {} (css: {})", entry.name, query);
            }
            morsel::config::SelectorRule::ScriptState { field } => {
                println!("  - {} (script-state: {})", entry.name, field);
            }
        }
    }

    let targets = load_targets(Path::new(&config.input.targets_path))?;
    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape {} target(s)", targets.len());

    Ok(())
}

/// Handles the --stats mode: shows statistics from the collected output
fn handle_stats(config: &morsel::Config) -> anyhow::Result<()> {
    println!("Output: {}\n", config.output.reviews_path);

    let stats = load_stats(Path::new(&config.output.reviews_path))?;
    print_stats(&stats);

    Ok(())
}

/// Handles the main scraping run
async fn handle_run(config: morsel::Config, fresh: bool, retry_failed: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh run (discarding previous state)");
    } else {
        tracing::info!("Starting run (resuming from checkpoint if present)");
    }

    let targets = load_targets(Path::new(&config.input.targets_path))?;

    let mut controller = Controller::new(config, fresh, retry_failed)?;
    let report = controller.run(targets).await?;

    tracing::info!(
        "Done: {} processed, {} skipped, {} new review(s)",
        report.processed,
        report.skipped,
        report.reviews_written
    );

    Ok(())
}
