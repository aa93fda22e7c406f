//! sitefeed CLI
//!
//! Crawls a website and generates sitemap.xml / rss.xml under the data
//! directory. Registered domains can be refreshed in bulk, e.g. from cron:
//!
//! ```text
//! 0 3 * * * sitefeed --data-dir /var/lib/sitefeed refresh
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sitefeed::{
    error::Result,
    models::{Config, RefreshInterval},
    pipeline,
    storage::LocalStorage,
};

/// sitefeed - Sitemap/RSS Generator
#[derive(Parser, Debug)]
#[command(name = "sitefeed", version, about = "Sitemap/RSS feed generator")]
struct Cli {
    /// Path to the data directory (config, registry, output)
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site and write its sitemap.xml / rss.xml
    Crawl {
        /// Seed URL to crawl from
        url: String,

        /// Page budget (default from config)
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Register a domain for scheduled refreshes
    Register {
        /// Seed URL to crawl from
        url: String,

        /// Refresh cadence: daily or weekly
        #[arg(long, default_value = "daily")]
        interval: String,

        /// Page budget for this domain
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Remove a registered domain and its generated feeds
    Remove {
        /// Domain to remove (e.g. example.com)
        domain: String,
    },

    /// List registered domains
    List,

    /// Re-crawl registered domains whose interval has elapsed
    Refresh,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.data_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);
    let storage = LocalStorage::new(&cli.data_dir);

    match cli.command {
        Command::Crawl { url, max_pages } => {
            let summary = pipeline::run_crawl(&config, &storage, &url, max_pages).await?;
            log::info!(
                "Done: {} pages from {} -> {}",
                summary.page_count,
                summary.domain,
                storage.domain_dir(&summary.domain).display()
            );
        }

        Command::Register {
            url,
            interval,
            max_pages,
        } => {
            let interval: RefreshInterval = interval.parse()?;
            let max_pages = max_pages.unwrap_or(config.crawler.max_pages);
            let record = pipeline::run_register(&storage, &url, interval, max_pages).await?;
            log::info!(
                "Registered {} ({}, budget {} pages)",
                record.domain,
                record.interval.as_str(),
                record.max_pages
            );
        }

        Command::Remove { domain } => {
            pipeline::run_remove(&storage, &domain).await?;
        }

        Command::List => {
            let records = pipeline::run_list(&storage).await?;
            if records.is_empty() {
                log::info!("No registered domains.");
            }
            for record in records {
                let last = record
                    .last_crawled
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string());
                log::info!(
                    "{} [{}] pages: {}, last crawled: {}",
                    record.domain,
                    record.interval.as_str(),
                    record.page_count,
                    last
                );
            }
        }

        Command::Refresh => {
            let outcome = pipeline::run_refresh(&config, &storage).await?;
            log::info!(
                "Refresh complete: {} refreshed, {} skipped, {} failed",
                outcome.refreshed,
                outcome.skipped,
                outcome.failed
            );
        }

        Command::Validate => {
            config.validate()?;
            log::info!("Configuration OK");
            log::info!("  user_agent: {}", config.crawler.user_agent);
            log::info!("  timeout_secs: {}", config.crawler.timeout_secs);
            log::info!("  max_pages: {}", config.crawler.max_pages);
        }
    }

    Ok(())
}
