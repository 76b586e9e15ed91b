//! Batch driver for `widgetscan scan`.
//!
//! Fetches every listed URL through a bounded pool, builds one record per
//! URL in input order, then aggregates and writes the reports. A failed page
//! is recorded and the batch continues.

use std::path::{Path, PathBuf};
use std::pin::pin;
use std::time::Duration;

use anyhow::Context;
use futures::stream::{self, StreamExt};
use widgetscan_core::{
    load_url_list, load_vendor_catalog, normalize_target_url, summarize, AppConfig,
    PracticeRecord, VendorRegistry, VendorSummary,
};
use widgetscan_scraper::{FetchSettings, PageFetcher, RecordBuilder};

use crate::report::{widgets_cell, write_reports, ReportPaths};

const TOP_VENDORS_SHOWN: usize = 5;

/// Resolved options for one scan run (CLI flags over config defaults).
#[derive(Debug, Clone)]
pub(crate) struct ScanOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub vendors_path: Option<PathBuf>,
    pub pacing: Pacing,
    pub dry_run: bool,
}

/// Request pacing for the fetch pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pacing {
    pub delay: Duration,
    pub concurrency: usize,
}

impl Pacing {
    pub(crate) fn new(delay_ms: u64, concurrency: usize) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            concurrency: concurrency.max(1),
        }
    }

    /// The first request of each pool slot goes out immediately; every later
    /// one waits the pacing delay.
    pub(crate) fn delay_before(self, index: usize) -> Duration {
        if index < self.concurrency {
            Duration::ZERO
        } else {
            self.delay
        }
    }
}

/// Built-in registry, or the YAML catalog at `path` when given.
pub(crate) fn load_registry(path: Option<&Path>) -> anyhow::Result<VendorRegistry> {
    let registry = match path {
        Some(path) => load_vendor_catalog(path)
            .with_context(|| format!("failed to load vendor catalog {}", path.display()))?,
        None => VendorRegistry::builtin(),
    };
    tracing::info!(
        vendors = registry.len(),
        source = %path.map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
        "vendor registry loaded"
    );
    Ok(registry)
}

/// Fetch and scan `urls` in input order, calling `on_record` as each record
/// completes.
pub(crate) async fn scan_urls<F>(
    fetcher: &PageFetcher,
    registry: &VendorRegistry,
    urls: &[String],
    pacing: Pacing,
    mut on_record: F,
) -> Vec<PracticeRecord>
where
    F: FnMut(usize, &PracticeRecord),
{
    let builder = RecordBuilder::new(registry);
    let mut pages = pin!(stream::iter(urls.iter().enumerate())
        .map(|(index, raw)| {
            let target = normalize_target_url(raw);
            let wait = pacing.delay_before(index);
            async move {
                if !wait.is_zero() {
                    tokio::time::sleep(wait).await;
                }
                let outcome = fetcher.fetch(&target).await;
                (raw, outcome)
            }
        })
        .buffered(pacing.concurrency));

    let mut records = Vec::with_capacity(urls.len());
    while let Some((raw, outcome)) = pages.next().await {
        let record = builder.build(raw, &outcome);
        on_record(records.len(), &record);
        records.push(record);
    }
    records
}

/// Run a full scan: load inputs, fetch, aggregate, and write reports.
///
/// # Errors
///
/// Returns an error if the URL list or vendor catalog cannot be read, the
/// HTTP client cannot be built, or the reports cannot be written. Individual
/// page failures are recorded, not returned.
pub(crate) async fn run_scan(config: &AppConfig, opts: &ScanOptions) -> anyhow::Result<()> {
    let urls = load_url_list(&opts.input)
        .with_context(|| format!("failed to read URL list {}", opts.input.display()))?;
    if urls.is_empty() {
        anyhow::bail!("no URLs found in {}", opts.input.display());
    }
    let registry = load_registry(opts.vendors_path.as_deref())?;

    if opts.dry_run {
        println!("[dry-run] would scan {} URLs:", urls.len());
        for url in &urls {
            println!("  {}", normalize_target_url(url));
        }
        return Ok(());
    }

    let fetcher = PageFetcher::new(&FetchSettings::from_config(config))
        .context("failed to build HTTP client")?;

    let total = urls.len();
    tracing::info!(
        urls = total,
        concurrency = opts.pacing.concurrency,
        delay_ms = u64::try_from(opts.pacing.delay.as_millis()).unwrap_or(u64::MAX),
        "starting scan"
    );

    let records = scan_urls(&fetcher, &registry, &urls, opts.pacing, |index, record| {
        println!(
            "[{}/{total}] {} -> {}",
            index + 1,
            record.requested_url,
            widgets_cell(record, &registry)
        );
    })
    .await;

    let summaries = summarize(&records, &registry);
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let paths = write_reports(&opts.output_dir, &stamp, &records, &summaries, &registry)?;

    print_run_summary(&records, &summaries, &paths);
    Ok(())
}

fn print_run_summary(records: &[PracticeRecord], summaries: &[VendorSummary], paths: &ReportPaths) {
    let failed = records.iter().filter(|r| r.is_error()).count();
    tracing::info!(
        scanned = records.len(),
        failed,
        vendors = summaries.len(),
        "scan complete"
    );

    println!();
    println!(
        "Scanned {} pages ({} failed), {} vendors detected",
        records.len(),
        failed,
        summaries.len()
    );
    for row in summaries.iter().take(TOP_VENDORS_SHOWN) {
        println!(
            "  {:<24} {}",
            row.display_name.as_deref().unwrap_or(&row.vendor_key),
            row.count
        );
    }
    println!("Leads:   {}", paths.leads.display());
    println!("Details: {}", paths.details.display());
    println!("Summary: {}", paths.summary.display());
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod tests;
