use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("WIDGETSCAN_LOG_LEVEL", "info");
    let output_dir = PathBuf::from(or_default("WIDGETSCAN_OUTPUT_DIR", "./output"));
    let vendors_path = lookup("WIDGETSCAN_VENDORS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let request_timeout_secs = parse_u64("WIDGETSCAN_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("WIDGETSCAN_USER_AGENT", DEFAULT_USER_AGENT);
    let max_redirects = parse_usize("WIDGETSCAN_MAX_REDIRECTS", "10")?;
    let inter_request_delay_ms = parse_u64("WIDGETSCAN_INTER_REQUEST_DELAY_MS", "1000")?;
    let max_concurrent_fetches = parse_usize("WIDGETSCAN_MAX_CONCURRENT_FETCHES", "1")?;
    let max_retries = parse_u32("WIDGETSCAN_MAX_RETRIES", "1")?;
    let retry_backoff_base_secs = parse_u64("WIDGETSCAN_RETRY_BACKOFF_BASE_SECS", "2")?;

    if max_concurrent_fetches == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "WIDGETSCAN_MAX_CONCURRENT_FETCHES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        log_level,
        output_dir,
        vendors_path,
        request_timeout_secs,
        user_agent,
        max_redirects,
        inter_request_delay_ms,
        max_concurrent_fetches,
        max_retries,
        retry_backoff_base_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
