use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse vendor catalog: {0}")]
    CatalogParse(#[from] serde_yaml::Error),

    #[error("invalid vendor catalog: {0}")]
    Registry(#[from] RegistryError),
}

/// Reasons a set of vendor rules cannot become a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("vendor key must be non-empty")]
    EmptyKey,

    #[error("duplicate vendor key: '{0}'")]
    DuplicateKey(String),

    #[error("vendor '{0}' has an empty pattern")]
    EmptyPattern(String),

    #[error("vendor '{key}' has an invalid pattern: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("vendor '{0}' must set both display_name and category, or neither")]
    PartialMetadata(String),

    #[error("failed to compile vendor pattern set: {0}")]
    PatternSet(#[source] regex::Error),
}
