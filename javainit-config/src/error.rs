//! Error types for javainit-config.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading and merging launch descriptors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The static descriptor could not be opened.
    #[error("failed to open static launcher config {path}: {source}")]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A descriptor file exists but does not match the descriptor schema.
    #[error("failed to parse launcher config {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The merged descriptor is unusable (empty `mainClass`, bad `configType`, …).
    #[error("invalid launcher config: {0}")]
    Invalid(String),

    /// Any other read failure on an existing descriptor file.
    #[error("failed to read launcher config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
