//! Error types for the wind timeseries viewer core.

use thiserror::Error;

/// Failure to retrieve a source table from an object store.
///
/// Every variant is fatal at startup: the viewer has no degraded mode
/// without both of its tables.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The object key does not exist in the bucket
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Credentials were rejected or missing
    #[error("access denied for {bucket}/{key}: {reason}")]
    Auth {
        bucket: String,
        key: String,
        reason: String,
    },

    /// Local filesystem failure other than not-found / permission
    #[error("I/O error reading {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP transport failure or unexpected status
    #[error("HTTP request for {key} failed: {reason}")]
    Http { key: String, reason: String },

    /// A gzip object could not be decompressed
    #[error("failed to decompress {key}: {reason}")]
    Decompression { key: String, reason: String },

    /// The object is not valid UTF-8 text
    #[error("object {key} is not valid UTF-8")]
    Encoding { key: String },
}

impl FetchError {
    /// True for the two failure kinds the store contract names explicitly.
    pub fn is_access_failure(&self) -> bool {
        matches!(self, FetchError::NotFound { .. } | FetchError::Auth { .. })
    }
}

/// Invalid configuration or case window registry.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the JSON configuration
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse the case window CSV
    #[error("failed to parse case windows: {0}")]
    Csv(#[from] csv::Error),

    /// Date parsing failed
    #[error("invalid date '{value}' for case window '{label}'")]
    DateParse { label: String, value: String },

    /// A case window ends before it starts
    #[error("case window '{label}' ends before it starts")]
    InvertedWindow { label: String },

    /// Two case windows share a label
    #[error("duplicate case window label '{0}'")]
    DuplicateLabel(String),

    /// The registry must hold at least one window
    #[error("case window registry is empty")]
    EmptyRegistry,

    /// A configuration value is out of range
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Type alias for configuration results
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
