//! Evidence scanner.
//!
//! Walks a fixed sequence of structural locations on a parsed page and asks
//! the vendor registry about every candidate string found there:
//!
//! 1. meta-refresh target
//! 2. iframe `src`, `data-src`, `data-url`
//! 3. anchor `href`, `data-href` (falling back to the visible link text)
//! 4. script `src`, or inline script text filtered through [`INLINE_HINTS`],
//!    then bare vendor names when no hint produced evidence
//!
//! Evidence is emitted in exactly that order, each location in document
//! order. Scanning never fails: missing elements are skipped and URLs that
//! cannot be resolved are matched in their raw form.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;
use widgetscan_core::{Evidence, EvidenceSource, PageScan, VendorRegistry};

use crate::document::{ElementKind, PageDocument, PageElement};

const IFRAME_ATTRS: &[&str] = &["src", "data-src", "data-url"];
const LINK_ATTRS: &[&str] = &["href", "data-href"];

/// Characters of inline script text used as the evidence value when a hint
/// pattern has no capture group.
const INLINE_PREVIEW_CHARS: usize = 80;

static META_REFRESH_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)url\s*=\s*([^;]*)").expect("valid regex"));

/// Hint patterns applied to inline script bodies, in order.
///
/// Group 1, when present, is the candidate handed to the registry.
static INLINE_HINTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // quoted absolute URL
        r#"["'](https?://[^"'\s]+)["']"#,
        // loader call on a vendor global, e.g. `Doctolib.init(`
        r"\b([A-Za-z_$][\w$]*)\.(?:init|load|widget|embed|render|create)\s*\(",
        // analytics queue functions
        r"\b(gtag|fbq|_paq|hj)\s*(?:\(|\.push\b)",
        // generic widget wording
        r"(?i)widget|booking|termin|chat",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Identifier-like tokens in inline scripts, dotted or slashed runs kept
/// whole so `embed.tawk.to` is one token.
static SCRIPT_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_$][\w$]*(?:[./-][\w$]+)*").expect("valid regex")
});

/// Scans parsed pages for vendor fingerprints using a shared registry.
#[derive(Debug, Clone, Copy)]
pub struct EvidenceScanner<'a> {
    registry: &'a VendorRegistry,
}

impl<'a> EvidenceScanner<'a> {
    #[must_use]
    pub fn new(registry: &'a VendorRegistry) -> Self {
        Self { registry }
    }

    /// Collect every vendor hit on `page`, resolving relative references
    /// against `base_url`.
    #[must_use]
    pub fn scan<D: PageDocument + ?Sized>(&self, page: &D, base_url: &str) -> PageScan {
        let mut evidence = Vec::new();
        self.scan_meta_refresh(page, base_url, &mut evidence);
        self.scan_iframes(page, base_url, &mut evidence);
        self.scan_links(page, base_url, &mut evidence);
        self.scan_scripts(page, base_url, &mut evidence);

        for item in &evidence {
            tracing::debug!(
                source = %item.source_type,
                vendor = %item.vendor_key,
                value = %item.value,
                "vendor evidence"
            );
        }
        PageScan::from_evidence(evidence)
    }

    fn scan_meta_refresh<D: PageDocument + ?Sized>(
        &self,
        page: &D,
        base_url: &str,
        out: &mut Vec<Evidence>,
    ) {
        let Some(content) = page.meta_content("http-equiv", "refresh") else {
            return;
        };
        let Some(target) = meta_refresh_target(&content) else {
            return;
        };
        let resolved = resolve_url(base_url, &target);
        if let Some(key) = self.registry.match_vendor(&resolved) {
            out.push(make_evidence(EvidenceSource::MetaRefresh, key, resolved, None));
        }
    }

    fn scan_iframes<D: PageDocument + ?Sized>(
        &self,
        page: &D,
        base_url: &str,
        out: &mut Vec<Evidence>,
    ) {
        for iframe in page.elements(ElementKind::Iframe) {
            for raw in candidate_strings(&iframe, IFRAME_ATTRS) {
                let resolved = resolve_url(base_url, raw);
                if let Some(key) = self.registry.match_vendor(&resolved) {
                    out.push(make_evidence(EvidenceSource::Iframe, key, resolved, None));
                }
            }
        }
    }

    fn scan_links<D: PageDocument + ?Sized>(
        &self,
        page: &D,
        base_url: &str,
        out: &mut Vec<Evidence>,
    ) {
        for anchor in page.elements(ElementKind::Anchor) {
            let text = normalize_whitespace(anchor.text());
            for raw in candidate_strings(&anchor, LINK_ATTRS) {
                let resolved = resolve_url(base_url, raw);
                let key = self
                    .registry
                    .match_vendor(&resolved)
                    .or_else(|| self.registry.match_vendor(&text));
                if let Some(key) = key {
                    out.push(make_evidence(
                        EvidenceSource::Link,
                        key,
                        resolved,
                        Some(text.clone()),
                    ));
                }
            }
        }
    }

    fn scan_scripts<D: PageDocument + ?Sized>(
        &self,
        page: &D,
        base_url: &str,
        out: &mut Vec<Evidence>,
    ) {
        for script in page.elements(ElementKind::Script) {
            if let Some(src) = script.attr("src").map(str::trim).filter(|s| !s.is_empty()) {
                let resolved = resolve_url(base_url, src);
                if let Some(key) = self.registry.match_vendor(&resolved) {
                    out.push(make_evidence(EvidenceSource::Script, key, resolved, None));
                }
            } else {
                self.scan_inline_script(script.text(), out);
            }
        }
    }

    /// One evidence item per hint match span; repeats are not collapsed here.
    /// Scripts no hint accounts for fall back to [`Self::scan_vendor_tokens`].
    fn scan_inline_script(&self, raw_text: &str, out: &mut Vec<Evidence>) {
        let text = raw_text.trim();
        if text.is_empty() {
            return;
        }
        let before = out.len();
        for hint in INLINE_HINTS.iter() {
            for caps in hint.captures_iter(text) {
                let candidate = caps.get(1).map_or_else(
                    || text.chars().take(INLINE_PREVIEW_CHARS).collect(),
                    |m| m.as_str().to_string(),
                );
                let key = self
                    .registry
                    .match_vendor(&candidate)
                    .or_else(|| self.registry.match_vendor(text));
                if let Some(key) = key {
                    out.push(make_evidence(EvidenceSource::InlineScript, key, candidate, None));
                }
            }
        }
        if out.len() == before {
            self.scan_vendor_tokens(text, out);
        }
    }

    /// Bare vendor mentions such as `var provider = "Doctolib";`. The first
    /// token per vendor becomes the evidence value.
    fn scan_vendor_tokens(&self, text: &str, out: &mut Vec<Evidence>) {
        let mut seen: Vec<&str> = Vec::new();
        for token in SCRIPT_TOKEN_RE.find_iter(text) {
            let Some(key) = self.registry.match_vendor(token.as_str()) else {
                continue;
            };
            if !seen.contains(&key) {
                seen.push(key);
                out.push(make_evidence(
                    EvidenceSource::InlineScript,
                    key,
                    token.as_str().to_string(),
                    None,
                ));
            }
        }
    }
}

fn make_evidence(
    source_type: EvidenceSource,
    vendor_key: &str,
    value: String,
    text: Option<String>,
) -> Evidence {
    Evidence {
        source_type,
        vendor_key: vendor_key.to_string(),
        value,
        text,
    }
}

/// Non-empty values of `attrs` on `element`, in attribute-list order.
fn candidate_strings<'e>(
    element: &'e PageElement,
    attrs: &'static [&'static str],
) -> impl Iterator<Item = &'e str> {
    attrs
        .iter()
        .filter_map(move |name| element.attr(name))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Extract the redirect target from a meta-refresh `content` value
/// (`"5; url=https://..."`).
#[must_use]
pub fn meta_refresh_target(content: &str) -> Option<String> {
    let caps = META_REFRESH_URL_RE.captures(content)?;
    let target = caps
        .get(1)?
        .as_str()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    (!target.is_empty()).then(|| target.to_string())
}

/// Resolve `raw` against `base_url`.
///
/// Falls back to `raw` parsed on its own, then to `raw` unchanged, so the
/// result is always usable as a detection candidate.
#[must_use]
pub fn resolve_url(base_url: &str, raw: &str) -> String {
    let raw = raw.trim();
    Url::parse(base_url)
        .ok()
        .and_then(|base| base.join(raw).ok())
        .or_else(|| Url::parse(raw).ok())
        .map_or_else(|| raw.to_string(), String::from)
}

/// Collapse whitespace runs to single spaces and trim the ends.
#[must_use]
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod tests;
