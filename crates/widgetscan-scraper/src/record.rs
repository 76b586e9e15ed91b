//! Turns a fetch outcome into a [`PracticeRecord`].

use widgetscan_core::{FetchError, HttpStatus, PracticeRecord, VendorRegistry};

use crate::document::{HtmlPage, PageDocument};
use crate::fetch::{FetchOutcome, FetchedPage};
use crate::practice_name::extract_practice_name;
use crate::scan::EvidenceScanner;

/// Builds one record per requested URL. Failed fetches short-circuit before
/// any parsing, scanning, or name extraction.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder<'a> {
    registry: &'a VendorRegistry,
}

impl<'a> RecordBuilder<'a> {
    #[must_use]
    pub fn new(registry: &'a VendorRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn build(&self, requested_url: &str, outcome: &FetchOutcome) -> PracticeRecord {
        match outcome {
            Ok(page) => {
                let document = HtmlPage::parse(&page.body);
                self.build_from_document(requested_url, page, &document)
            }
            Err(err) => failed_record(requested_url, err),
        }
    }

    /// Scan an already-parsed page. `page.final_url` is the base for
    /// resolving relative references and the source for the name fallback.
    #[must_use]
    pub fn build_from_document<D: PageDocument + ?Sized>(
        &self,
        requested_url: &str,
        page: &FetchedPage,
        document: &D,
    ) -> PracticeRecord {
        let practice_name = extract_practice_name(document, &page.final_url);
        let scan = EvidenceScanner::new(self.registry).scan(document, &page.final_url);
        tracing::debug!(
            url = requested_url,
            practice = %practice_name,
            widgets = scan.widget_keys.len(),
            evidence = scan.evidence.len(),
            "built practice record"
        );
        PracticeRecord {
            requested_url: requested_url.to_string(),
            final_url: Some(page.final_url.clone()),
            http_status: HttpStatus::Code(page.status),
            practice_name,
            outcome: Ok(scan),
        }
    }
}

fn failed_record(requested_url: &str, err: &FetchError) -> PracticeRecord {
    let (final_url, http_status) = match err {
        FetchError::Status { status, final_url } => {
            (Some(final_url.clone()), HttpStatus::Code(*status))
        }
        _ => (None, HttpStatus::Error),
    };
    PracticeRecord {
        requested_url: requested_url.to_string(),
        final_url,
        http_status,
        practice_name: String::new(),
        outcome: Err(err.clone()),
    }
}
