// Rust guideline compliant 2026-10-18

//! Speech service credential resolution and synthesis.
//!
//! The speech SDK itself is an opaque collaborator behind
//! [`SpeechSynthesizer`]. This module decides which credential it receives and
//! interprets the outcome.

use crate::error::{AppError, Result};
use speechauth_core::{
    get_speech_token, podcast_script_to_ssml, AuthMode, AuthorizationToken, Error as CoreError,
    PodcastScript, SpeechConfig, TokenCredential,
};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{error, info, warn};

/// HTTP header carrying a subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// HTTP header carrying a bearer token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Credential handed to the speech service.
#[derive(Clone, PartialEq, Eq)]
pub enum SpeechCredential {
    /// Subscription key authentication.
    SubscriptionKey {
        /// Subscription key.
        key: String,
        /// Azure region.
        region: String,
    },
    /// Entra ID authentication with an `aad#` authorization token.
    AuthorizationToken {
        /// Authorization token.
        token: AuthorizationToken,
        /// Azure region.
        region: String,
    },
}

impl SpeechCredential {
    /// Returns the Azure region.
    #[must_use]
    pub fn region(&self) -> &str {
        match self {
            Self::SubscriptionKey { region, .. } | Self::AuthorizationToken { region, .. } => region,
        }
    }

    /// Returns the HTTP header name and value authenticating a REST request.
    #[must_use]
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Self::SubscriptionKey { key, .. } => (SUBSCRIPTION_KEY_HEADER, key.clone()),
            Self::AuthorizationToken { token, .. } => {
                (AUTHORIZATION_HEADER, format!("Bearer {}", token.as_str()))
            }
        }
    }
}

impl fmt::Debug for SpeechCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubscriptionKey { region, .. } => f
                .debug_struct("SubscriptionKey")
                .field("key", &"[redacted]")
                .field("region", region)
                .finish(),
            Self::AuthorizationToken { token, region } => f
                .debug_struct("AuthorizationToken")
                .field("token", token)
                .field("region", region)
                .finish(),
        }
    }
}

/// Resolves the speech credential for the configured authentication mode.
///
/// # Arguments
///
/// * `config` - Speech settings
/// * `credential` - Identity provider, used only in managed identity mode
///
/// # Errors
///
/// Returns an error if:
/// - `speech.region` is missing
/// - key mode has no key
/// - managed identity mode has no `speech.resource_id`
/// - the resource ID is invalid (`SpeechConfiguration`)
/// - the token cannot be obtained (`SpeechAuthentication`)
pub fn resolve_speech_credential(
    config: &SpeechConfig,
    credential: &dyn TokenCredential,
) -> Result<SpeechCredential> {
    let region = non_empty(config.region.as_deref()).ok_or(AppError::MissingSetting {
        setting: "speech.region",
    })?;

    match config.auth_mode {
        AuthMode::Key => {
            info!(%region, "using Azure Speech key authentication");
            let key = non_empty(config.key.as_deref()).ok_or(AppError::MissingSetting {
                setting: "speech.key",
            })?;
            Ok(SpeechCredential::SubscriptionKey {
                key: key.to_string(),
                region: region.to_string(),
            })
        }
        AuthMode::ManagedIdentity => {
            info!(%region, "using Azure Speech resource ID authentication");
            let resource_id =
                non_empty(config.resource_id.as_deref()).ok_or(AppError::MissingSetting {
                    setting: "speech.resource_id",
                })?;
            let custom_endpoint = non_empty(config.custom_endpoint.as_deref());
            if custom_endpoint.is_none() {
                info!("no custom endpoint specified");
            }

            let token = get_speech_token(resource_id, custom_endpoint, credential).map_err(|err| {
                match err {
                    CoreError::InvalidResourceIdentifier(_) => {
                        error!(error = %err, "invalid speech resource configuration");
                        AppError::SpeechConfiguration(err)
                    }
                    other => {
                        error!(error = %other, "failed to authenticate with speech service");
                        AppError::SpeechAuthentication(other)
                    }
                }
            })?;

            Ok(SpeechCredential::AuthorizationToken {
                token,
                region: region.to_string(),
            })
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Audio output format requested from the speech service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 48 kHz 16-bit mono PCM in a RIFF container.
    #[default]
    Riff48Khz16BitMonoPcm,
    /// 24 kHz 16-bit mono PCM in a RIFF container.
    Riff24Khz16BitMonoPcm,
    /// 24 kHz 48 kbit/s mono MP3.
    Audio24Khz48KBitRateMonoMp3,
}

impl OutputFormat {
    /// Returns the `X-Microsoft-OutputFormat` value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Riff48Khz16BitMonoPcm => "riff-48khz-16bit-mono-pcm",
            Self::Riff24Khz16BitMonoPcm => "riff-24khz-16bit-mono-pcm",
            Self::Audio24Khz48KBitRateMonoMp3 => "audio-24khz-48kbitrate-mono-mp3",
        }
    }
}

/// Request handed to the speech collaborator.
#[derive(Debug, Clone)]
pub struct SynthesisRequest<'a> {
    /// Credential to authenticate with.
    pub credential: &'a SpeechCredential,
    /// SSML document to synthesize.
    pub ssml: &'a str,
    /// Requested audio format.
    pub output_format: OutputFormat,
}

/// Why the service canceled synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationReason {
    /// The service reported an error.
    Error,
    /// The input stream ended early.
    EndOfStream,
    /// The caller canceled.
    CancelledByUser,
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Error => "Error",
            Self::EndOfStream => "EndOfStream",
            Self::CancelledByUser => "CancelledByUser",
        };
        f.write_str(s)
    }
}

/// Outcome reported by the speech collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisResult {
    /// Audio was produced.
    Completed {
        /// Encoded audio.
        audio: Vec<u8>,
    },
    /// The service canceled synthesis.
    Canceled {
        /// Cancellation reason.
        reason: CancellationReason,
        /// Service-provided details.
        error_details: Option<String>,
    },
}

/// Speech synthesis collaborator.
pub trait SpeechSynthesizer {
    /// Synthesizes SSML to audio.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached.
    fn synthesize(&self, request: &SynthesisRequest<'_>) -> Result<SynthesisResult>;
}

/// Converts SSML to audio bytes.
///
/// # Errors
///
/// Returns an error if the collaborator fails or cancels synthesis.
pub fn text_to_speech(
    synthesizer: &dyn SpeechSynthesizer,
    credential: &SpeechCredential,
    ssml: &str,
) -> Result<Vec<u8>> {
    let request = SynthesisRequest {
        credential,
        ssml,
        output_format: OutputFormat::default(),
    };

    match synthesizer.synthesize(&request)? {
        SynthesisResult::Completed { audio } => Ok(audio),
        SynthesisResult::Canceled {
            reason,
            error_details,
        } => {
            warn!(%reason, "speech synthesis canceled");
            if let (CancellationReason::Error, Some(details)) = (reason, error_details.as_deref()) {
                error!(%details, "speech synthesis error details");
            }
            Err(AppError::SynthesisCanceled {
                reason: reason.to_string(),
                details: error_details,
            })
        }
    }
}

/// Converts a podcast script to audio.
///
/// # Errors
///
/// Returns an error if a speaker has no voice or synthesis fails.
pub fn synthesize_podcast(
    synthesizer: &dyn SpeechSynthesizer,
    credential: &SpeechCredential,
    podcast: &PodcastScript,
    voices: &BTreeMap<String, String>,
) -> Result<Vec<u8>> {
    let ssml = podcast_script_to_ssml(podcast, voices)?;
    text_to_speech(synthesizer, credential, &ssml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use speechauth_core::{ScriptLine, StaticTokenCredential};
    use std::cell::RefCell;

    fn managed_identity_config(resource_id: &str) -> SpeechConfig {
        SpeechConfig {
            auth_mode: AuthMode::ManagedIdentity,
            key: None,
            region: Some("westeurope".to_string()),
            resource_id: Some(resource_id.to_string()),
            custom_endpoint: None,
        }
    }

    struct RecordingSynthesizer {
        result: SynthesisResult,
        seen: RefCell<Vec<(String, &'static str)>>,
    }

    impl SpeechSynthesizer for RecordingSynthesizer {
        fn synthesize(&self, request: &SynthesisRequest<'_>) -> Result<SynthesisResult> {
            self.seen
                .borrow_mut()
                .push((request.ssml.to_string(), request.output_format.as_str()));
            Ok(self.result.clone())
        }
    }

    fn key_credential() -> SpeechCredential {
        SpeechCredential::SubscriptionKey {
            key: "k".to_string(),
            region: "eastus".to_string(),
        }
    }

    #[test]
    fn test_key_mode() {
        let config = SpeechConfig {
            auth_mode: AuthMode::Key,
            key: Some("speech-key".to_string()),
            region: Some("eastus".to_string()),
            ..SpeechConfig::default()
        };
        let credential = StaticTokenCredential::new("unused");
        let resolved = resolve_speech_credential(&config, &credential).unwrap();
        assert_eq!(resolved.region(), "eastus");
        assert_eq!(
            resolved.header(),
            (SUBSCRIPTION_KEY_HEADER, "speech-key".to_string())
        );
        assert!(!format!("{resolved:?}").contains("speech-key"));
    }

    #[test]
    fn test_managed_identity_mode() {
        let config = managed_identity_config("speech-resource");
        let credential = StaticTokenCredential::new("TOKEN123");
        let resolved = resolve_speech_credential(&config, &credential).unwrap();
        assert_eq!(resolved.region(), "westeurope");
        assert_eq!(
            resolved.header(),
            (
                AUTHORIZATION_HEADER,
                "Bearer aad#speech-resource#TOKEN123".to_string()
            )
        );
    }

    #[test]
    fn test_managed_identity_uses_custom_endpoint() {
        let mut config = managed_identity_config("speech-resource");
        config.custom_endpoint = Some("https://wkswecenspeech.cognitiveservices.azure.com/".into());
        let credential = StaticTokenCredential::new("TOKEN123");
        match resolve_speech_credential(&config, &credential).unwrap() {
            SpeechCredential::AuthorizationToken { token, .. } => {
                assert_eq!(token.as_str(), "aad#wkswecenspeech#TOKEN123");
            }
            other => panic!("unexpected credential: {other:?}"),
        }
    }

    #[test]
    fn test_missing_region() {
        let mut config = managed_identity_config("speech-resource");
        config.region = Some("  ".to_string());
        let err = resolve_speech_credential(&config, &StaticTokenCredential::new("t")).unwrap_err();
        assert!(matches!(err, AppError::MissingSetting { setting: "speech.region" }));
    }

    #[test]
    fn test_missing_resource_id() {
        let mut config = managed_identity_config("x");
        config.resource_id = None;
        let err = resolve_speech_credential(&config, &StaticTokenCredential::new("t")).unwrap_err();
        assert!(matches!(err, AppError::MissingSetting { setting: "speech.resource_id" }));
    }

    #[test]
    fn test_invalid_resource_id_is_configuration_error() {
        let config = managed_identity_config("not a valid id!!");
        let err = resolve_speech_credential(&config, &StaticTokenCredential::new("t")).unwrap_err();
        assert!(matches!(err, AppError::SpeechConfiguration(_)));
        assert_eq!(err.code(), ErrorCode::InvalidResourceId);
        assert!(err.to_string().starts_with("Speech service configuration error"));
    }

    #[test]
    fn test_empty_token_is_authentication_error() {
        let config = managed_identity_config("speech-resource");
        let err = resolve_speech_credential(&config, &StaticTokenCredential::new("")).unwrap_err();
        assert!(matches!(err, AppError::SpeechAuthentication(_)));
        assert_eq!(err.code(), ErrorCode::TokenAcquisitionFailed);
    }

    #[test]
    fn test_text_to_speech_completed() {
        let synthesizer = RecordingSynthesizer {
            result: SynthesisResult::Completed {
                audio: vec![1, 2, 3],
            },
            seen: RefCell::new(Vec::new()),
        };
        let audio = text_to_speech(&synthesizer, &key_credential(), "<speak/>").unwrap();
        assert_eq!(audio, vec![1, 2, 3]);
        assert_eq!(
            synthesizer.seen.borrow().as_slice(),
            &[("<speak/>".to_string(), "riff-48khz-16bit-mono-pcm")]
        );
    }

    #[test]
    fn test_text_to_speech_canceled() {
        let synthesizer = RecordingSynthesizer {
            result: SynthesisResult::Canceled {
                reason: CancellationReason::Error,
                error_details: Some("quota exceeded".to_string()),
            },
            seen: RefCell::new(Vec::new()),
        };
        let err = text_to_speech(&synthesizer, &key_credential(), "<speak/>").unwrap_err();
        assert_eq!(err.code(), ErrorCode::SynthesisCanceled);
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_synthesize_podcast_builds_ssml() {
        let synthesizer = RecordingSynthesizer {
            result: SynthesisResult::Completed { audio: vec![9] },
            seen: RefCell::new(Vec::new()),
        };
        let podcast = PodcastScript {
            script: vec![ScriptLine {
                name: "Emma".to_string(),
                message: "Hi & welcome".to_string(),
            }],
        };
        let voices = BTreeMap::from([("Emma".to_string(), "en-US-Emma".to_string())]);

        let audio = synthesize_podcast(&synthesizer, &key_credential(), &podcast, &voices).unwrap();
        assert_eq!(audio, vec![9]);
        let seen = synthesizer.seen.borrow();
        assert!(seen[0].0.contains("<voice name='en-US-Emma'>Hi &amp; welcome</voice>"));
    }

    #[test]
    fn test_synthesize_podcast_unknown_speaker() {
        let synthesizer = RecordingSynthesizer {
            result: SynthesisResult::Completed { audio: vec![] },
            seen: RefCell::new(Vec::new()),
        };
        let podcast = PodcastScript {
            script: vec![ScriptLine {
                name: "Nobody".to_string(),
                message: "x".to_string(),
            }],
        };
        let err = synthesize_podcast(&synthesizer, &key_credential(), &podcast, &BTreeMap::new())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownSpeaker);
        assert!(synthesizer.seen.borrow().is_empty());
    }
}
