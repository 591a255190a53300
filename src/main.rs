//! Sitemap-Ripple main entry point
//!
//! This is the command-line interface for the Sitemap-Ripple generator. The
//! sitemap is written to stdout; all logging goes to stderr.

use anyhow::Context;
use clap::Parser;
use sitemap_ripple::config::{load_config_with_hash, Config};
use sitemap_ripple::crawler::Coordinator;
use sitemap_ripple::output::{build_entries, log_summary, write_sitemap};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sitemap-Ripple: a link-popularity sitemap generator
///
/// Sitemap-Ripple crawls every same-host page reachable from the base URL,
/// counts how often each page is linked to, and prints a sitemap whose
/// priorities reflect those counts.
#[derive(Parser, Debug)]
#[command(name = "sitemap-ripple")]
#[command(version)]
#[command(about = "A link-popularity sitemap generator", long_about = None)]
struct Cli {
    /// The base URL of the site to map
    #[arg(short, long, default_value = "https://www.calhoun.io/")]
    url: String,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    let coordinator = Coordinator::new(&config).context("Failed to build HTTP client")?;

    // Ctrl-C stops the crawl; whatever was counted so far is still emitted
    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            cancel.cancel();
        }
    });

    tracing::info!("Mapping {}", cli.url);
    let report = match coordinator.run(&cli.url).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    log_summary(&report);

    let Some(entries) = build_entries(&report.visit_counts) else {
        tracing::warn!(
            "No links found on {}; no sitemap generated",
            report.base_url
        );
        return Ok(());
    };

    let written = write_sitemap(io::stdout().lock(), &entries)
        .context("Failed to write sitemap to stdout")?;
    tracing::info!("Sitemap written with {} URLs", written);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_ripple=info,warn"),
            1 => EnvFilter::new("sitemap_ripple=debug,info"),
            2 => EnvFilter::new("sitemap_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file when one is given, otherwise the built-in defaults
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}
