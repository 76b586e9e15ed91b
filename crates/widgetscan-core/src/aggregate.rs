//! Cross-corpus vendor usage.

use crate::model::{PracticeRecord, VendorSummary};
use crate::vendors::VendorRegistry;

/// Count how many practices use each vendor.
///
/// Failed records are skipped. Every widget key of a record adds one to the
/// vendor's count and appends the record's practice name (repeated names are
/// kept). The result is sorted by count descending; vendors with equal counts
/// stay in the order they were first encountered.
#[must_use]
pub fn summarize(records: &[PracticeRecord], registry: &VendorRegistry) -> Vec<VendorSummary> {
    let mut summaries: Vec<VendorSummary> = Vec::new();

    for record in records.iter().filter(|r| !r.is_error()) {
        for key in record.widget_keys() {
            let index = match summaries.iter().position(|s| s.vendor_key == *key) {
                Some(index) => index,
                None => {
                    let meta = registry.meta(key);
                    summaries.push(VendorSummary {
                        vendor_key: key.clone(),
                        count: 0,
                        display_name: meta.map(|m| m.display_name.clone()),
                        category: meta.map(|m| m.category.clone()),
                        practice_names: Vec::new(),
                    });
                    summaries.len() - 1
                }
            };
            let summary = &mut summaries[index];
            summary.count += 1;
            summary.practice_names.push(record.practice_name.clone());
        }
    }

    // sort_by is stable, so ties keep first-encountered order.
    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}
