//! Error types for loading rule books.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for rule book operations.
pub type RuleBookResult<T> = Result<T, RuleBookError>;

/// Failures while reading or decoding a rule book.
#[derive(Debug, Error)]
pub enum RuleBookError {
    /// The rule file could not be read.
    #[error("failed to read rule book {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML document is malformed or does not match the schema.
    #[error("invalid TOML rule book: {0}")]
    Toml(#[from] toml::de::Error),

    /// The JSON document is malformed or does not match the schema.
    #[error("invalid JSON rule book: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported rule book format: {0}")]
    UnsupportedFormat(PathBuf),
}
