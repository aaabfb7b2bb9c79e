// Rust guideline compliant 2026-10-18

//! Error handling for speechauth application services.

use serde::Serialize;
use speechauth_core::Error as CoreError;
use thiserror::Error;

/// Result type alias for application-level operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Stable error codes for command and service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The resource identifier failed validation.
    InvalidResourceId,
    /// The identity provider returned no usable token.
    TokenAcquisitionFailed,
    /// The identity provider failed.
    CredentialError,
    /// A required setting is missing or invalid.
    ConfigurationError,
    /// Speech synthesis was canceled by the service.
    SynthesisCanceled,
    /// A cloud collaborator reported a failure.
    ServiceError,
    /// A podcast script references an unknown speaker.
    UnknownSpeaker,
    /// A client principal could not be decoded.
    InvalidClientPrincipal,
    /// The request included invalid inputs.
    InvalidInput,
    /// IO failure.
    IoError,
    /// JSON serialization or parsing failed.
    JsonError,
}

/// Application-level errors with stable mapping to error codes.
#[derive(Debug, Error)]
pub enum AppError {
    /// A setting required by the selected authentication mode is missing.
    #[error("Configuration error: missing setting {setting}")]
    MissingSetting {
        /// Dotted configuration key, e.g. `speech.region`.
        setting: &'static str,
    },

    /// The speech resource configuration is invalid.
    #[error("Speech service configuration error: {0}")]
    SpeechConfiguration(#[source] CoreError),

    /// Authenticating with the speech service failed.
    #[error("Speech service authentication failed: {0}")]
    SpeechAuthentication(#[source] CoreError),

    /// The speech service canceled synthesis.
    #[error("Speech synthesis canceled ({reason}): {}", .details.as_deref().unwrap_or("no details"))]
    SynthesisCanceled {
        /// Cancellation reason reported by the service.
        reason: String,
        /// Error details reported by the service.
        details: Option<String>,
    },

    /// A cloud collaborator failed.
    #[error("{service} failed: {message}")]
    Service {
        /// Collaborator name.
        service: &'static str,
        /// Failure description.
        message: String,
    },

    /// Invalid input was provided by the caller.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from core library operations.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AppError {
    /// Returns a stable error code for the error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::MissingSetting { .. } => ErrorCode::ConfigurationError,
            AppError::SynthesisCanceled { .. } => ErrorCode::SynthesisCanceled,
            AppError::Service { .. } => ErrorCode::ServiceError,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::SpeechConfiguration(core)
            | AppError::SpeechAuthentication(core)
            | AppError::Core(core) => core_code(core),
        }
    }

    /// Returns structured details for errors that benefit from extra context.
    #[must_use]
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::MissingSetting { setting } => Some(serde_json::json!({
                "setting": setting,
            })),
            AppError::SynthesisCanceled { reason, details } => Some(serde_json::json!({
                "reason": reason,
                "error_details": details,
            })),
            AppError::Service { service, .. } => Some(serde_json::json!({
                "service": service,
            })),
            AppError::InvalidInput(_) => None,
            AppError::SpeechConfiguration(core)
            | AppError::SpeechAuthentication(core)
            | AppError::Core(core) => match core {
                CoreError::InvalidResourceIdentifier(resource_id) => Some(serde_json::json!({
                    "resource_id": resource_id,
                })),
                CoreError::UnknownSpeaker(speaker) => Some(serde_json::json!({
                    "speaker": speaker,
                })),
                _ => None,
            },
        }
    }
}

fn core_code(core: &CoreError) -> ErrorCode {
    match core {
        CoreError::InvalidResourceIdentifier(_) => ErrorCode::InvalidResourceId,
        CoreError::TokenAcquisitionFailure(_) => ErrorCode::TokenAcquisitionFailed,
        CoreError::Credential(_) => ErrorCode::CredentialError,
        CoreError::InvalidConfig(_) => ErrorCode::ConfigurationError,
        CoreError::UnknownSpeaker(_) => ErrorCode::UnknownSpeaker,
        CoreError::InvalidClientPrincipal(_) => ErrorCode::InvalidClientPrincipal,
        CoreError::Io(_) => ErrorCode::IoError,
        CoreError::Json(_) => ErrorCode::JsonError,
    }
}
