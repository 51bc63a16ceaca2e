//! Sumi-Scroll main entry point
//!
//! This is the command-line interface for the Sumi-Scroll documentation mirror.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use sumi_scroll::config::{load_config_with_hash, Config, LinkStrategyKind};
use sumi_scroll::crawler::crawl;
use sumi_scroll::output::print_summary;
use tracing_subscriber::EnvFilter;

/// Sumi-Scroll: an offline mirror for rendered documentation sites
///
/// Sumi-Scroll walks a documentation site from a seed page, follows its
/// internal links within a step budget, and saves the main content of every
/// page together with a markdown index.
#[derive(Parser, Debug)]
#[command(name = "sumi-scroll")]
#[command(version = "1.0.0")]
#[command(about = "An offline mirror for rendered documentation sites", long_about = None)]
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

    /// Resume an interrupted crawl (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a fresh crawl, ignoring previous state
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> Result<(), std::io::Error> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scroll=info,warn"),
            1 => EnvFilter::new("sumi_scroll=debug,info"),
            2 => EnvFilter::new("sumi_scroll=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.init(),
    }

    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Scroll Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Site URL: {}", config.site.site_url);
    println!("  Seed path: {}", config.site.seed_path);

    println!("\nCrawler Configuration:");
    println!("  Max steps: {}", config.crawler.max_steps);
    println!("  Visit delay: {}ms", config.crawler.visit_delay_ms);
    println!(
        "  Page load timeout: {}ms",
        config.crawler.page_load_timeout_ms
    );
    println!("  Content timeout: {}ms", config.crawler.content_timeout_ms);
    match config.crawler.link_strategy {
        LinkStrategyKind::AllAnchors => println!("  Link strategy: all anchors"),
        LinkStrategyKind::Sidebar => println!(
            "  Link strategy: sidebar ({})",
            config.crawler.sidebar_selector
        ),
    }
    println!("  Content selector: {}", config.crawler.content_selector);
    if !config.crawler.await_selectors.is_empty() {
        println!(
            "  Await selectors: {}",
            config.crawler.await_selectors.join(", ")
        );
    }
    println!("  Checkpoint every: {} steps", config.crawler.checkpoint_every);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Pages: {}", config.output.pages_dir);
    println!("  Database: {}", config.output.database_path);
    println!("  Index: {}", config.output.index_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling at {}{} with a budget of {} steps",
        config.site.site_url, config.site.seed_path, config.crawler.max_steps
    );
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use sumi_scroll::output::{load_statistics, print_statistics};
    use sumi_scroll::storage::SqliteStorage;

    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    config_hash: &str,
    fresh: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous state)");
    } else {
        tracing::info!("Starting crawl (will resume if interrupted run exists)");
    }

    tracing::info!(
        "Mirroring {}{} into {}",
        config.site.site_url,
        config.site.seed_path,
        config.output.pages_dir
    );

    match crawl(config, config_hash, fresh).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            print_summary(&report.counters, &report.frontier);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
