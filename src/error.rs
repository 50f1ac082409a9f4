//! Error types for TalentScout.

use std::time::Duration;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Presentation channel errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Failed to read input on channel {name}: {reason}")]
    ReadFailed { name: String, reason: String },
}

/// LLM provider errors.
///
/// Every variant is recoverable: the text generator turns them into
/// fallback text and the conversation carries on.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} returned status {status}: {body}")]
    BadStatus {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Field validation failures.
///
/// The `Display` output is the human-readable reason shown to the
/// candidate in the re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty field")]
    EmptyInput,

    #[error("{0}")]
    FormatInvalid(String),

    #[error("{0}")]
    RangeInvalid(String),

    #[error("{0}")]
    LengthInvalid(String),

    #[error("{0}")]
    LookupFailed(String),
}

impl ValidationError {
    /// Short machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::FormatInvalid(_) => "format_invalid",
            Self::RangeInvalid(_) => "range_invalid",
            Self::LengthInvalid(_) => "length_invalid",
            Self::LookupFailed(_) => "lookup_failed",
        }
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
