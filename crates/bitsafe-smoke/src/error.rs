//! Error types for harness configuration.

use std::path::PathBuf;

/// Errors raised while reading the env-style configuration file.
///
/// None of these are fatal: the harness logs them and falls back to the
/// built-in base URL.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not define the key.
    #[error("{key} not found in {path}")]
    MissingKey {
        /// Key that was looked up.
        key: String,
        /// Path that was read.
        path: PathBuf,
    },

    /// The key is defined with an empty value.
    #[error("{key} in {path} has an empty value")]
    EmptyValue {
        /// Key that was looked up.
        key: String,
        /// Path that was read.
        path: PathBuf,
    },

    /// None of the candidate files exist.
    #[error("no env file found (tried {0})")]
    NotFound(String),
}
