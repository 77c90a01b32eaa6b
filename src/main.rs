//! Stealth-Harvest main entry point
//!
//! This is the command-line interface for the Stealth-Harvest scraper.

use anyhow::Context;
use clap::Parser;
use stealth_harvest::config::{load_config_with_hash, load_url_list, validate_target_url, Config};
use stealth_harvest::crawler::{Orchestrator, ScrapeSession};
use stealth_harvest::output::{build_handlers, print_report};
use stealth_harvest::HarvestError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Stealth-Harvest: an adaptive, self-pacing content harvester
///
/// Stealth-Harvest fetches a list of pages through a pool of proxies,
/// adapts its pacing to how the targets respond, scores the extracted
/// content and reports alerts when things degrade.
#[derive(Parser, Debug)]
#[command(name = "stealth-harvest")]
#[command(version = "1.0.0")]
#[command(about = "An adaptive, self-pacing content harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Additional URL to scrape (repeatable)
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// File with one URL per line ('#' starts a comment)
    #[arg(long, value_name = "FILE")]
    urls_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without scraping
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let urls = collect_urls(&cli, &config)?;
    if urls.is_empty() {
        return Err(HarvestError::NoUrls.into());
    }

    if cli.dry_run {
        handle_dry_run(&config, &urls);
        return Ok(());
    }

    handle_scrape(&config, &urls).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("stealth_harvest=info,warn"),
            1 => EnvFilter::new("stealth_harvest=debug,info"),
            2 => EnvFilter::new("stealth_harvest=trace,debug"),
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

/// Config URLs first, then `--url` values, then the URL file
fn collect_urls(cli: &Cli, config: &Config) -> anyhow::Result<Vec<String>> {
    let mut urls = config.session.urls.clone();

    for url in &cli.urls {
        validate_target_url(url).with_context(|| format!("Invalid --url value {}", url))?;
        urls.push(url.clone());
    }

    if let Some(path) = &cli.urls_file {
        let listed = load_url_list(path)
            .with_context(|| format!("Failed to read URL list {}", path.display()))?;
        tracing::info!("Loaded {} URLs from {}", listed.len(), path.display());
        urls.extend(listed);
    }

    Ok(urls)
}

/// Handles the --dry-run mode: shows the resolved session and exits
fn handle_dry_run(config: &Config, urls: &[String]) {
    println!("=== Stealth-Harvest Dry Run ===\n");

    println!("Session:");
    println!("  Transport: {:?}", config.session.transport);
    if let Some(endpoint) = &config.session.render_endpoint {
        println!("  Render endpoint: {}", endpoint);
    }
    println!("  Request timeout: {}s", config.session.request_timeout);
    println!("  Respect robots.txt: {}", config.session.respect_robots);

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!("  Base delay: {}s", config.retry.base_delay);

    println!("\nRate Limit:");
    println!(
        "  Delay: {}s (min {}s, max {}s)",
        config.rate_limit.base_delay, config.rate_limit.min_delay, config.rate_limit.max_delay
    );

    println!("\nProxies ({}):", config.proxies.addresses.len());
    if config.proxies.addresses.is_empty() {
        println!("  (direct connection)");
    }
    for proxy in &config.proxies.addresses {
        println!("  - {}", proxy);
    }

    println!("\nUser Agents: {}", config.user_agent.agents.len());

    println!("\nOutput:");
    println!("  JSON: {}", config.output.json_path);
    if let Some(database_path) = &config.output.database_path {
        println!("  Database: {}", database_path);
    }

    println!("\nURLs ({}):", urls.len());
    for url in urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape {} URLs", urls.len());
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config, urls: &[String]) -> anyhow::Result<()> {
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, finishing the current URL");
                stop.store(true, Ordering::SeqCst);
            }
        });
    }

    let handlers = build_handlers(&config.output).context("Failed to open outputs")?;
    let orchestrator = Orchestrator::from_config(config)
        .context("Failed to set up the scraper")?
        .with_stop_flag(stop);
    let mut session = ScrapeSession::from_config(config);

    tracing::info!(
        "Scraping {} URLs through {} proxies",
        urls.len(),
        session.proxies.len()
    );
    let report = orchestrator.run(&mut session, urls).await;

    for handler in &handlers {
        handler
            .write_report(&report)
            .with_context(|| format!("Failed to write {} output", handler.name()))?;
    }

    if config.output.print_report {
        print_report(&report);
    }

    Ok(())
}
