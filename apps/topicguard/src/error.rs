//! Fatal configuration errors. Unit parse failures are not errors at this
//! level; they become [`crate::models::ParseDiagnostic`]s.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run before or while reading its inputs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An input path given on the command line does not exist.
    #[error("input path not found: {}", .path.display())]
    PathNotFound { path: PathBuf },

    /// A file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML/YAML for this schema.
    #[error("invalid configuration in {}: {message}", .path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("invalid glob pattern `{pattern}`: {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid filter signature: {0}")]
    InvalidSignature(String),
}

/// Anything that stops a command from producing its report.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}
