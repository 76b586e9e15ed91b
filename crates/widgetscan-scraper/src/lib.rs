pub mod document;
pub mod error;
pub mod fetch;
pub mod practice_name;
pub(crate) mod rate_limit;
pub mod record;
pub mod scan;

pub use document::{ElementKind, HtmlPage, PageDocument, PageElement};
pub use error::ScraperError;
pub use fetch::{FetchOutcome, FetchSettings, FetchedPage, PageFetcher};
pub use practice_name::{extract_practice_name, UNKNOWN_PRACTICE};
pub use record::RecordBuilder;
pub use scan::EvidenceScanner;
