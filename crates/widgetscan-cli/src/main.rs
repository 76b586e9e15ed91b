mod report;
mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use widgetscan_core::{AppConfig, ConfigError};

use crate::scan::{load_registry, run_scan, Pacing, ScanOptions};

#[derive(Debug, Parser)]
#[command(name = "widgetscan")]
#[command(about = "Detect third-party widgets on medical practice websites")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan every URL in a list file and write the CSV reports
    Scan {
        /// File with one practice URL per line (`#` starts a comment)
        #[arg(short, long)]
        input: PathBuf,
        /// Directory for the reports [default: WIDGETSCAN_OUTPUT_DIR]
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// YAML vendor catalog replacing the built-in registry
        #[arg(long)]
        vendors: Option<PathBuf>,
        /// Pause between requests in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Number of pages fetched in parallel
        #[arg(long)]
        concurrency: Option<usize>,
        /// Print the normalized URLs without fetching anything
        #[arg(long)]
        dry_run: bool,
    },
    /// List the vendors the scanner recognizes
    Vendors {
        #[arg(long)]
        vendors: Option<PathBuf>,
    },
}

/// Log directive used when `RUST_LOG` is unset.
fn default_log_level(config: &Result<AppConfig, ConfigError>) -> &str {
    config.as_ref().map_or("info", |c| c.log_level.as_str())
}

/// Catalog listed by `widgetscan vendors`. An explicit `--vendors` wins and
/// needs no valid configuration.
fn listing_catalog(
    flag: Option<PathBuf>,
    config: Result<AppConfig, ConfigError>,
) -> anyhow::Result<Option<PathBuf>> {
    match flag {
        Some(path) => Ok(Some(path)),
        None => Ok(config?.vendors_path),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = widgetscan_core::load_app_config();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_log_level(&config)))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Scan {
            input,
            output_dir,
            vendors,
            delay_ms,
            concurrency,
            dry_run,
        }) => {
            let config = config?;
            let opts = ScanOptions {
                input,
                output_dir: output_dir.unwrap_or_else(|| config.output_dir.clone()),
                vendors_path: vendors.or_else(|| config.vendors_path.clone()),
                pacing: Pacing::new(
                    delay_ms.unwrap_or(config.inter_request_delay_ms),
                    concurrency.unwrap_or(config.max_concurrent_fetches),
                ),
                dry_run,
            };
            run_scan(&config, &opts).await?;
        }
        Some(Commands::Vendors { vendors }) => {
            let registry = load_registry(listing_catalog(vendors, config)?.as_deref())?;
            for rule in registry.rules() {
                println!(
                    "{:<20} {:<32} {}",
                    rule.key,
                    registry.display(Some(rule.key.as_str())),
                    rule.pattern
                );
            }
        }
        None => println!("widgetscan ready; run `widgetscan scan --input <file>`"),
    }

    Ok(())
}
