// Rust guideline compliant 2026-10-18

//! Error types for the speechauth core library.

use thiserror::Error;

/// Result type alias for speechauth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for speechauth operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input is neither a Cognitive Services ARM resource ID nor a resource name.
    #[error("Invalid Azure Speech resource ID format: {0}")]
    InvalidResourceIdentifier(String),

    /// The identity provider returned no usable token.
    #[error("Failed to retrieve valid access token: {0}")]
    TokenAcquisitionFailure(String),

    /// The identity provider failed.
    #[error("Credential error: {0}")]
    Credential(String),

    /// Configuration is missing a required value or contains an invalid one.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A podcast script references a speaker with no configured voice.
    #[error("Unknown speaker: {0}")]
    UnknownSpeaker(String),

    /// A client principal header could not be decoded.
    #[error("Invalid client principal: {0}")]
    InvalidClientPrincipal(String),
}
