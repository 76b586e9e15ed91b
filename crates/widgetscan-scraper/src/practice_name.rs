//! Practice name heuristics.
//!
//! Rules run in order and the first acceptable result wins: page title,
//! first reasonable `<h1>`, meta description, then a label derived from the
//! URL's host. The host fallback always yields a non-empty string.

use url::Url;

use crate::document::PageDocument;
use crate::scan::normalize_whitespace;

/// Returned when no host can be derived from the source URL.
pub const UNKNOWN_PRACTICE: &str = "Unknown Practice";

const TITLE_SEPARATORS: &[char] = &['-', '|', '–', '—', '·', '•', ':'];
const DESCRIPTION_MAX_CHARS: usize = 50;

/// Best human-readable practice label for `page`, fetched from `source_url`.
#[must_use]
pub fn extract_practice_name<D: PageDocument + ?Sized>(page: &D, source_url: &str) -> String {
    title_name(page)
        .or_else(|| heading_name(page))
        .or_else(|| description_name(page))
        .unwrap_or_else(|| domain_name(source_url))
}

fn title_name<D: PageDocument + ?Sized>(page: &D) -> Option<String> {
    let title = normalize_whitespace(&page.title()?);
    let head = title
        .split(TITLE_SEPARATORS)
        .next()
        .unwrap_or_default()
        .trim();
    (head.chars().count() > 3).then(|| head.to_string())
}

fn heading_name<D: PageDocument + ?Sized>(page: &D) -> Option<String> {
    page.headings()
        .iter()
        .map(|h| normalize_whitespace(h))
        .find(|h| {
            let len = h.chars().count();
            len > 3 && len < 100
        })
}

fn description_name<D: PageDocument + ?Sized>(page: &D) -> Option<String> {
    let content = page.meta_content("name", "description")?;
    let truncated: String = content
        .trim()
        .chars()
        .take(DESCRIPTION_MAX_CHARS)
        .collect();
    (!truncated.is_empty()).then_some(truncated)
}

/// Title-cased label built from the host of `source_url`, without `www.`
/// and without the top-level domain.
///
/// `http://zahnarzt-meier.de` becomes `Zahnarzt Meier`.
#[must_use]
pub fn domain_name(source_url: &str) -> String {
    let Some(host) = host_of(source_url) else {
        return UNKNOWN_PRACTICE.to_string();
    };
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let stem = match host.rsplit_once('.') {
        Some((stem, _tld)) if !stem.is_empty() => stem,
        _ => host,
    };
    let label = stem
        .split(['-', '.', '_'])
        .filter(|w| !w.is_empty())
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ");
    if label.is_empty() {
        UNKNOWN_PRACTICE.to_string()
    } else {
        label
    }
}

fn host_of(source_url: &str) -> Option<String> {
    let trimmed = source_url.trim();
    if trimmed.is_empty() {
        return None;
    }
    Url::parse(trimmed)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .or_else(|| {
            Url::parse(&format!("https://{trimmed}"))
                .ok()
                .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        })
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
