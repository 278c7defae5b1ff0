use thiserror::Error;

use crate::types::VoiceId;

/// Top-level error type for the Voicebox system.
///
/// Subsystem failures are carried as human-readable messages; callers at the
/// dialogue level log them and turn them into a user-facing reply.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VoiceboxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Record not found: {0}")]
    NotFound(VoiceId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for VoiceboxError {
    fn from(err: toml::de::Error) -> Self {
        VoiceboxError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VoiceboxError {
    fn from(err: toml::ser::Error) -> Self {
        VoiceboxError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VoiceboxError {
    fn from(err: serde_json::Error) -> Self {
        VoiceboxError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Voicebox operations.
pub type Result<T> = std::result::Result<T, VoiceboxError>;
