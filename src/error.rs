//! Crate-level error types for configuration loading and folder persistence.
//!
//! Dispatching actions never fails: unknown ids and malformed urls degrade
//! to no-ops. The types here only cover the edges the store owns directly.

use std::path::PathBuf;

/// Error returned when reading or writing the persisted folder tree fails.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Disk I/O failure.
    ///
    /// Directory creation, the temp-file write, or the final rename failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The folder tree could not be encoded as JSON.
    #[error("failed to encode folder tree: {0}")]
    Encode(#[from] serde_json::Error),

    /// The host collaborator rejected the write.
    ///
    /// Used by [`BrowserHost`](crate::BrowserHost) implementations that
    /// persist somewhere other than the local filesystem.
    #[error("host rejected folder write: {0}")]
    Rejected(String),
}

/// Error returned when loading a [`StoreConfig`](crate::StoreConfig) fails.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for [`StoreConfig`](crate::StoreConfig).
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field parsed but holds a value the store cannot use.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}
