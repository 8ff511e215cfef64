use thiserror::Error;

/// Result type for candidate snapshot and configuration operations
pub type Result<T> = std::result::Result<T, CandidateError>;

/// Errors raised at the edges of the candidate model (loading snapshots and config)
#[derive(Error, Debug)]
pub enum CandidateError {
    /// Snapshot JSON could not be decoded
    #[error("Snapshot decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config TOML could not be decoded
    #[error("Config decode error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CandidateError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
