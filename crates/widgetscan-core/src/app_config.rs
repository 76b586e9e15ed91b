use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub output_dir: PathBuf,
    /// YAML vendor catalog replacing the built-in registry when set.
    pub vendors_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_redirects: usize,
    pub inter_request_delay_ms: u64,
    pub max_concurrent_fetches: usize,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
