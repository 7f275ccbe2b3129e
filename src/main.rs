//! Catalog-Harvest main entry point
//!
//! This is the command-line interface for the Catalog-Harvest bulk harvester.

use anyhow::Context;
use catalog_harvest::config::{load_config_or_default, Config};
use catalog_harvest::crawler::harvest;
use catalog_harvest::output::print_summary;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: a bulk product-catalog harvester
///
/// Catalog-Harvest reads a provider listing, follows every provider to its
/// products, and writes one front-matter markdown file plus image per
/// product. Records that cannot be harvested are listed in the failure log.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A bulk product-catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using built-in defaults"),
    }
    let config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvest=info,warn"),
            1 => EnvFilter::new("catalog_harvest=debug,info"),
            2 => EnvFilter::new("catalog_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Catalog-Harvest Dry Run ===\n");

    println!("Source:");
    println!("  Listing URL: {}", config.source.listing_url);

    println!("\nCrawler:");
    println!("  Workers: {}", config.crawler.workers);

    println!("\nOutput:");
    println!("  Markdown directory: {}", config.output.markdown_dir);
    println!("  Image directory: {}", config.output.image_dir);
    println!("  Failure log: {}", config.output.failure_log);

    println!("\nExtraction:");
    println!("  Listing item: {}", config.extract.listing_item);
    println!("  Masthead: {}", config.extract.masthead);
    println!("  Product image: {}", config.extract.product_image);
    println!("  Tab panel: {}", config.extract.tab_panel);
    println!(
        "  Discontinued pattern: {} (case-insensitive)",
        config.extract.discontinued_pattern
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, quiet: bool) -> anyhow::Result<()> {
    let failure_log = config.output.failure_log.clone();

    let summary = harvest(config).await.context("Harvest failed")?;

    if !quiet {
        print_summary(&summary);
        if summary.failures > 0 {
            println!("\nFailures recorded in: {}", failure_log);
        }
    }

    Ok(())
}
