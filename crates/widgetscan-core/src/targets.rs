//! Input URL list handling.

use std::path::Path;

use crate::ConfigError;

/// Read a URL list file.
///
/// # Errors
///
/// Returns [`ConfigError::FileIo`] if the file cannot be read.
pub fn load_url_list(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(parse_url_list(&content))
}

/// Parse one URL per line, skipping blank lines and `#` comments.
///
/// Input order is preserved and duplicates are kept.
#[must_use]
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(normalize_target_url)
        .collect()
}

/// Prefix `https://` when the entry carries no scheme.
#[must_use]
pub fn normalize_target_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed.trim_start_matches('/'))
    }
}
