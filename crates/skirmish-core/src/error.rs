//! Error types for the agent core.
//!
//! Tracking loss and an empty arena are normal operating conditions and never
//! show up here. Errors are reserved for failing capabilities and bad
//! configuration.

use thiserror::Error;

/// Agent core errors
#[derive(Debug, Error)]
pub enum SkirmishError {
    /// Frame acquisition failed
    #[error("Frame source failed: {0}")]
    FrameSource(String),

    /// Detection failed
    #[error("Detector failed: {0}")]
    Detector(String),

    /// Input injection failed
    #[error("Actuator failed: {0}")]
    Actuator(String),

    /// Configuration values out of range
    #[error("Invalid agent configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file is not valid JSON for [`AgentConfig`](crate::config::AgentConfig)
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Filesystem error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkirmishError {
    /// Shorthand for [`SkirmishError::InvalidConfig`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Whether the error came from an external capability rather than the core.
    #[must_use]
    pub const fn is_capability_failure(&self) -> bool {
        matches!(
            self,
            Self::FrameSource(_) | Self::Detector(_) | Self::Actuator(_)
        )
    }
}

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, SkirmishError>;
