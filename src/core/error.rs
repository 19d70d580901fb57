//! Custom error types for Switchboard
//!
//! Provides a unified error handling system across all modules.
//!
//! Routing and tool-dispatch failures are deliberately NOT variants here:
//! they are absorbed inside the orchestration loop and converted into
//! best-effort replies. Only gateway-level failures cross the turn boundary.

use thiserror::Error;

/// Main error type for Switchboard operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Model gateway connection or API errors
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Model not available
    #[error("Model '{0}' not available in Ollama. Run: ollama pull {0}")]
    ModelNotFound(String),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for Switchboard operations
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Create a gateway error
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
