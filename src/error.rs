//! Error types for the Domovoy client

use thiserror::Error;

/// Result type alias for Domovoy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Domovoy client
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Network or HTTP failure on a gateway call; carries no partial result
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Media device permission or acquisition failure
    #[error("media device error: {0}")]
    Media(String),

    /// Audio encoding or playback error
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
