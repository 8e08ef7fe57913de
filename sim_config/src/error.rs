//! Configuration errors

use sim_random::RandomError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a configuration
///
/// All of them are fatal: a required value is never silently defaulted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: unknown directive '{directive}'")]
    UnknownDirective { line: usize, directive: String },

    #[error("Line {line}: directive '{directive}' needs a value")]
    MissingValue { line: usize, directive: String },

    #[error("Line {line}: invalid value '{value}' for '{directive}'")]
    ParseValue {
        line: usize,
        directive: String,
        value: String,
    },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Failed to serialize configuration: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize configuration: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported configuration version: {0}")]
    UnsupportedVersion(u32),

    #[error("Failed to draw a CPU burst: {0}")]
    Random(#[from] RandomError),
}
