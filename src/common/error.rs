//! Error types shared by the gameplay plugins.
//!
//! Nothing here is fatal at runtime: systems log these and carry on.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RunError {
    /// Asset, catalog or currency not available yet. Poll again later.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Request does not apply to the current lifecycle state (no-op).
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Required data is not configured at all.
    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}
