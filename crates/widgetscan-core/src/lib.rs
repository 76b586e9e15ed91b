pub mod aggregate;
pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod targets;
pub mod vendors;

pub use aggregate::summarize;
pub use app_config::AppConfig;
pub use catalog::{load_vendor_catalog, parse_vendor_catalog};
pub use config::load_app_config;
pub use error::{ConfigError, RegistryError};
pub use model::{
    Evidence, EvidenceSource, FetchError, HttpStatus, PageScan, PracticeRecord, VendorSummary,
};
pub use targets::{load_url_list, normalize_target_url, parse_url_list};
pub use vendors::{VendorMeta, VendorRegistry, VendorRule};
