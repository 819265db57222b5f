//! Custom error types for archivist

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for archivist operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing metadata field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {value}")]
    InvalidEnumValue { field: &'static str, value: String },

    #[error("Invalid timestamp for {field}: {value}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("Filesystem reports no creation time for {}", .0.display())]
    UnsupportedFilesystem(PathBuf),

    #[error("Probe of {url} failed with HTTP {status}")]
    ProbeStatus { url: String, status: u16 },

    #[error("Row committed but sidecar move failed: {} -> {}: {source}", .from.display(), .to.display())]
    PartialArchive {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for archivist
pub type Result<T> = std::result::Result<T, Error>;
