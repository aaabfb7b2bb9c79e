// Rust guideline compliant 2026-10-18

//! Configuration management for speechauth.
//!
//! Configuration is resolved once at startup and passed down explicitly.
//! Library code never reads the process environment on its own.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "speechauth.toml";

/// How a service client authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Subscription / API key.
    Key,
    /// Entra ID token from the identity provider.
    #[default]
    ManagedIdentity,
}

/// Speech service settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Authentication mode.
    #[serde(default)]
    pub auth_mode: AuthMode,

    /// Subscription key, required in key mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Azure region, e.g. `westeurope`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// ARM resource ID or resource name, required for Entra ID authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    /// Custom endpoint, e.g. `https://my-speech.cognitiveservices.azure.com/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_endpoint: Option<String>,
}

impl fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("auth_mode", &self.auth_mode)
            .field("key", &self.key.as_ref().map(|_| "[redacted]"))
            .field("region", &self.region)
            .field("resource_id", &self.resource_id)
            .field("custom_endpoint", &self.custom_endpoint)
            .finish()
    }
}

/// Document Intelligence settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Authentication mode.
    #[serde(default)]
    pub auth_mode: AuthMode,

    /// API key, required in key mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Service endpoint URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl fmt::Debug for DocumentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentConfig")
            .field("auth_mode", &self.auth_mode)
            .field("key", &self.key.as_ref().map(|_| "[redacted]"))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Caller authorization settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Tenant IDs whose client principals are accepted.
    #[serde(default)]
    pub authorized_tenants: Vec<String>,
}

/// Configuration for speechauth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Speech service settings.
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Document Intelligence settings.
    #[serde(default)]
    pub document: DocumentConfig,

    /// Caller authorization settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Speaker name to Azure voice name.
    #[serde(default = "default_voices")]
    pub voices: BTreeMap<String, String>,
}

/// Default podcast hosts and their HD voices.
fn default_voices() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "Andrew".to_string(),
            "en-US-Andrew:DragonHDLatestNeural".to_string(),
        ),
        (
            "Emma".to_string(),
            "en-US-Emma:DragonHDLatestNeural".to_string(),
        ),
    ])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speech: SpeechConfig::default(),
            document: DocumentConfig::default(),
            auth: AuthConfig::default(),
            voices: default_voices(),
        }
    }
}

impl Config {
    /// Loads configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file at `path`, if it exists
    /// 3. Environment variables
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file exists but cannot be read
    /// - Configuration file contains invalid TOML
    /// - Configuration values fail validation
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Loads configuration using a custom environment lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            config = toml::from_str(&content)
                .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        }

        config.apply_env_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Applies environment overrides to the configuration.
    ///
    /// Supported variables:
    /// - `AZURE_SPEECH_KEY` - Speech key; switches speech to key mode
    /// - `AZURE_SPEECH_REGION` - Speech region
    /// - `AZURE_SPEECH_RESOURCE_ID` - Speech resource ID or name
    /// - `AZURE_SPEECH_CUSTOM_ENDPOINT` - Speech custom endpoint
    /// - `DOCUMENTINTELLIGENCE_ENDPOINT` - Document Intelligence endpoint
    /// - `DOCUMENTINTELLIGENCE_API_KEY` - Document key; switches document to key mode
    /// - `SPEECHAUTH_AUTHORIZED_TENANTS` - Comma-separated tenant IDs
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = get("AZURE_SPEECH_KEY") {
            self.speech.key = Some(key);
            self.speech.auth_mode = AuthMode::Key;
        }
        if let Some(region) = get("AZURE_SPEECH_REGION") {
            self.speech.region = Some(region);
        }
        if let Some(resource_id) = get("AZURE_SPEECH_RESOURCE_ID") {
            self.speech.resource_id = Some(resource_id);
        }
        if let Some(endpoint) = get("AZURE_SPEECH_CUSTOM_ENDPOINT") {
            self.speech.custom_endpoint = Some(endpoint);
        }

        if let Some(endpoint) = get("DOCUMENTINTELLIGENCE_ENDPOINT") {
            self.document.endpoint = Some(endpoint);
        }
        if let Some(key) = get("DOCUMENTINTELLIGENCE_API_KEY") {
            self.document.key = Some(key);
            self.document.auth_mode = AuthMode::Key;
        }

        if let Some(tenants) = get("SPEECHAUTH_AUTHORIZED_TENANTS") {
            self.auth.authorized_tenants = tenants
                .split(',')
                .map(str::trim)
                .filter(|tenant| !tenant.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a service in key mode has no key
    /// - a voice mapping has an empty voice name
    pub fn validate(&self) -> Result<()> {
        if self.speech.auth_mode == AuthMode::Key && is_blank(self.speech.key.as_deref()) {
            return Err(Error::InvalidConfig(
                "speech.key is required when speech.auth_mode = \"key\"".to_string(),
            ));
        }

        if self.document.auth_mode == AuthMode::Key && is_blank(self.document.key.as_deref()) {
            return Err(Error::InvalidConfig(
                "document.key is required when document.auth_mode = \"key\"".to_string(),
            ));
        }

        if let Some((speaker, _)) = self.voices.iter().find(|(_, voice)| voice.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "voice for speaker '{speaker}' must not be empty"
            )));
        }

        Ok(())
    }

    /// Saves the configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}
