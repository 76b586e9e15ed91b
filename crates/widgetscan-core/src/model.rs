//! Evidence, per-page records, and cross-corpus vendor summaries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural location on a page where a vendor fingerprint was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceSource {
    MetaRefresh,
    Iframe,
    Link,
    Script,
    InlineScript,
}

impl EvidenceSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EvidenceSource::MetaRefresh => "meta-refresh",
            EvidenceSource::Iframe => "iframe",
            EvidenceSource::Link => "link",
            EvidenceSource::Script => "script",
            EvidenceSource::InlineScript => "inline-script",
        }
    }
}

impl std::fmt::Display for EvidenceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One matched vendor fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub source_type: EvidenceSource,
    pub vendor_key: String,
    /// Absolute URL when resolvable, otherwise the raw attribute or text.
    pub value: String,
    /// Visible anchor text; only set for [`EvidenceSource::Link`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Outcome of scanning a successfully fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageScan {
    /// Distinct vendor keys in first-seen order.
    pub widget_keys: Vec<String>,
    /// Every evidence item in discovery order.
    pub evidence: Vec<Evidence>,
}

impl PageScan {
    /// Build a scan from an ordered evidence list, deriving the key set.
    #[must_use]
    pub fn from_evidence(evidence: Vec<Evidence>) -> Self {
        let mut widget_keys: Vec<String> = Vec::new();
        for item in &evidence {
            if !widget_keys.iter().any(|k| *k == item.vendor_key) {
                widget_keys.push(item.vendor_key.clone());
            }
        }
        Self {
            widget_keys,
            evidence,
        }
    }
}

/// Why a page could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {status}")]
    Status { status: u16, final_url: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

/// Last HTTP status seen for a page, or a marker for requests that never
/// produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    Code(u16),
    Error,
}

impl std::fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpStatus::Code(code) => write!(f, "{code}"),
            HttpStatus::Error => f.write_str("error"),
        }
    }
}

/// Per-URL aggregate of practice name, widgets, and evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeRecord {
    pub requested_url: String,
    pub final_url: Option<String>,
    pub http_status: HttpStatus,
    pub practice_name: String,
    pub outcome: Result<PageScan, FetchError>,
}

impl PracticeRecord {
    #[must_use]
    pub fn widget_keys(&self) -> &[String] {
        match &self.outcome {
            Ok(scan) => &scan.widget_keys,
            Err(_) => &[],
        }
    }

    #[must_use]
    pub fn evidence(&self) -> &[Evidence] {
        match &self.outcome {
            Ok(scan) => &scan.evidence,
            Err(_) => &[],
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        self.outcome.as_ref().err()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Cross-corpus usage of one vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSummary {
    pub vendor_key: String,
    pub count: usize,
    pub display_name: Option<String>,
    pub category: Option<String>,
    /// Practice names in record order; repeats are kept.
    pub practice_names: Vec<String>,
}
