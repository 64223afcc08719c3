//! Error types for Lifetrace

use std::path::PathBuf;

/// Result type for recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;

#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    /// The output artifact could not be created. Nothing can be recorded.
    #[error("Cannot open output {}: {source}", path.display())]
    ResourceAcquisition {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to an already acquired output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The recorder was already torn down
    #[error("Recorder already finished")]
    Finished,
}
