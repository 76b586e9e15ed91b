//! YAML vendor catalog: an alternative to the built-in registry table.

use std::path::Path;

use serde::Deserialize;

use crate::vendors::{VendorMeta, VendorRegistry, VendorRule};
use crate::{ConfigError, RegistryError};

#[derive(Debug, Clone, Deserialize)]
pub struct VendorEntry {
    pub key: String,
    pub pattern: String,
    pub display_name: Option<String>,
    pub manufacturer: Option<String>,
    pub category: Option<String>,
}

impl VendorEntry {
    fn into_rule(self) -> Result<VendorRule, RegistryError> {
        let meta = match (self.display_name, self.category) {
            (Some(display_name), Some(category)) => Some(VendorMeta {
                display_name,
                manufacturer: self.manufacturer,
                category,
            }),
            (None, None) => None,
            _ => return Err(RegistryError::PartialMetadata(self.key)),
        };
        Ok(VendorRule {
            key: self.key,
            pattern: self.pattern,
            meta,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct VendorCatalogFile {
    pub vendors: Vec<VendorEntry>,
}

/// Load a vendor catalog from a YAML file and compile it into a registry.
///
/// Entries keep their file order, which is also their match priority.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_vendor_catalog(path: &Path) -> Result<VendorRegistry, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_vendor_catalog(&content)
}

/// Parse YAML catalog text into a registry.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or any entry is invalid.
pub fn parse_vendor_catalog(content: &str) -> Result<VendorRegistry, ConfigError> {
    let file: VendorCatalogFile = serde_yaml::from_str(content)?;
    let rules = file
        .vendors
        .into_iter()
        .map(VendorEntry::into_rule)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(VendorRegistry::new(rules)?)
}
