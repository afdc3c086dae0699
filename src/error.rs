//! Error types for askr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in askr
#[derive(Debug, Error)]
pub enum AskrError {
    /// Missing secret or unusable configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Model or tool network/availability failure
    #[error("Remote call failed: {0}")]
    Remote(String),

    /// The model asked for a tool that is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A tool request did not carry a usable query
    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    /// The dispatcher was handed a history it cannot run
    #[error("Invalid history: {0}")]
    InvalidHistory(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML config parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AskrError {
    /// Only configuration problems stop the process; everything else aborts a single turn.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AskrError::Configuration(_))
    }
}

impl From<reqwest::Error> for AskrError {
    fn from(err: reqwest::Error) -> Self {
        AskrError::Remote(err.to_string())
    }
}

/// Result type alias for askr operations
pub type Result<T> = std::result::Result<T, AskrError>;
