//! CSV report writer.
//!
//! One run produces three tables in the output directory, all sharing a
//! timestamp: the leads table, per-page details, and the vendor summary.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use csv::Writer;
use widgetscan_core::{PracticeRecord, VendorRegistry, VendorSummary};

const LIST_SEPARATOR: &str = "; ";
const NONE_DETECTED: &str = "None detected";

/// Paths of the files written by [`write_reports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReportPaths {
    pub leads: PathBuf,
    pub details: PathBuf,
    pub summary: PathBuf,
}

/// `Widgets` cell of the leads table.
///
/// `Error: <reason>` for failed pages, otherwise the display strings of all
/// detected vendors in first-seen order, or `None detected`.
pub(crate) fn widgets_cell(record: &PracticeRecord, registry: &VendorRegistry) -> String {
    if let Some(err) = record.error() {
        return format!("Error: {err}");
    }
    let keys = record.widget_keys();
    if keys.is_empty() {
        return NONE_DETECTED.to_string();
    }
    keys.iter()
        .map(|key| registry.display(Some(key.as_str())))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

pub(crate) fn write_leads<W: Write>(
    out: W,
    records: &[PracticeRecord],
    registry: &VendorRegistry,
) -> anyhow::Result<()> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["Name", "Website", "Widgets"])?;
    for record in records {
        wtr.write_record([
            record.practice_name.as_str(),
            record.requested_url.as_str(),
            widgets_cell(record, registry).as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub(crate) fn write_details<W: Write>(out: W, records: &[PracticeRecord]) -> anyhow::Result<()> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record([
        "url",
        "practice_name",
        "final_url",
        "http_status",
        "error",
        "widgets_found",
        "widget_details",
    ])?;
    for record in records {
        let details = serde_json::to_string(record.evidence())
            .with_context(|| format!("failed to serialize evidence for {}", record.requested_url))?;
        wtr.write_record([
            record.requested_url.clone(),
            record.practice_name.clone(),
            record.final_url.clone().unwrap_or_default(),
            record.http_status.to_string(),
            record.error().map(ToString::to_string).unwrap_or_default(),
            record.widget_keys().join(LIST_SEPARATOR),
            details,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub(crate) fn write_summary<W: Write>(out: W, summaries: &[VendorSummary]) -> anyhow::Result<()> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["Widget", "Count", "Vendor Name", "Category", "Practices Using"])?;
    for row in summaries {
        wtr.write_record([
            row.vendor_key.clone(),
            row.count.to_string(),
            row.display_name
                .clone()
                .unwrap_or_else(|| row.vendor_key.clone()),
            row.category.clone().unwrap_or_default(),
            row.practice_names.join(LIST_SEPARATOR),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write all three tables into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be created or
/// written.
pub(crate) fn write_reports(
    dir: &Path,
    stamp: &str,
    records: &[PracticeRecord],
    summaries: &[VendorSummary],
    registry: &VendorRegistry,
) -> anyhow::Result<ReportPaths> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let paths = ReportPaths {
        leads: dir.join(format!("leads_{stamp}.csv")),
        details: dir.join(format!("details_{stamp}.csv")),
        summary: dir.join(format!("summary_{stamp}.csv")),
    };

    write_leads(create(&paths.leads)?, records, registry)
        .with_context(|| format!("failed to write {}", paths.leads.display()))?;
    write_details(create(&paths.details)?, records)
        .with_context(|| format!("failed to write {}", paths.details.display()))?;
    write_summary(create(&paths.summary)?, summaries)
        .with_context(|| format!("failed to write {}", paths.summary.display()))?;

    for path in [&paths.leads, &paths.details, &paths.summary] {
        tracing::info!(path = %path.display(), "report written");
    }
    Ok(paths)
}

fn create(path: &Path) -> anyhow::Result<File> {
    File::create(path).with_context(|| format!("failed to create {}", path.display()))
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
