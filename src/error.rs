use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while requesting the image catalog
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request did not resolve in time
    #[error("Catalog request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    /// The project root does not exist or is not a directory
    #[error("Project root not found: {0}")]
    MissingRoot(String),

    /// The project root could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking scan task panicked or was cancelled
    #[error("Catalog task failed: {0}")]
    Join(String),
}

/// Errors that can occur while loading the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the host transport
#[derive(Debug, Error)]
pub enum HostError {
    /// The system file browser could not be launched
    #[error("Failed to open {path}: {source}")]
    OpenFolder {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An inbound message was not valid JSON or had an unknown shape
    #[error("Malformed host message: {0}")]
    Malformed(#[from] serde_json::Error),
}
