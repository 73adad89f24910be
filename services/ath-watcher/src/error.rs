//! Error types for the ATH watcher

/// Errors that can occur while watching pools and announcing records
#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    #[error("Configuration unavailable: {0}")]
    ConfigurationUnavailable(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Notify error: {0}")]
    Notify(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for watcher operations
pub type Result<T> = std::result::Result<T, WatcherError>;
