// Rust guideline compliant 2026-10-18

//! Implementation of the `speechauth token` command.

use crate::OutputFormatter;
use chrono::SecondsFormat;
use serde::Serialize;
use speechauth_app::{AppError, Result};
use speechauth_core::{
    get_speech_token, AzureCliCredential, DefaultCredentialChain, SpeechConfig, TokenCredential,
};

/// Summary of an issued speech authorization token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenReport {
    /// Resource identifier embedded in the token.
    pub resource_identifier: String,
    /// Expiry of the underlying access token, RFC 3339.
    pub expires_on: String,
    /// Short SHA-256 fingerprint of the full token.
    pub fingerprint: String,
    /// Full token, only when revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Command-line inputs for `token`.
#[derive(Debug, Clone, Default)]
pub struct TokenArgs {
    /// Resource ID or name; falls back to `speech.resource_id`.
    pub resource_id: Option<String>,
    /// Custom endpoint; falls back to `speech.custom_endpoint`.
    pub custom_endpoint: Option<String>,
    /// Tenant passed to the Azure CLI.
    pub tenant: Option<String>,
    /// Whether to print the full token.
    pub reveal: bool,
}

/// Builds a speech authorization token.
///
/// # Errors
///
/// Returns an error if no resource ID is available, the resource ID is invalid,
/// or the credential fails.
pub fn run(
    args: &TokenArgs,
    speech: &SpeechConfig,
    credential: &dyn TokenCredential,
) -> Result<TokenReport> {
    let resource_id = args
        .resource_id
        .as_deref()
        .or(speech.resource_id.as_deref())
        .ok_or(AppError::MissingSetting {
            setting: "speech.resource_id",
        })?;
    let custom_endpoint = args
        .custom_endpoint
        .as_deref()
        .or(speech.custom_endpoint.as_deref());

    let token = get_speech_token(resource_id, custom_endpoint, credential)?;
    Ok(TokenReport {
        resource_identifier: token.resource_identifier().to_string(),
        expires_on: token.expires_on().to_rfc3339_opts(SecondsFormat::Secs, true),
        fingerprint: token.fingerprint(),
        token: args.reveal.then(|| token.into_string()),
    })
}

/// Default credential chain for the CLI.
///
/// Each invocation issues a single token, so nothing is cached.
pub fn default_credential(tenant: Option<&str>) -> DefaultCredentialChain {
    let azure_cli = match tenant {
        Some(tenant) => AzureCliCredential::new().with_tenant(tenant),
        None => AzureCliCredential::new(),
    };
    DefaultCredentialChain::from_lookup(|key| std::env::var(key).ok(), azure_cli)
}

/// Builds a token with the default credential chain and prints its summary.
///
/// # Errors
///
/// See [`run`].
pub fn execute(args: &TokenArgs, speech: &SpeechConfig, formatter: &dyn OutputFormatter) -> Result<()> {
    let credential = default_credential(args.tenant.as_deref());
    let report = run(args, speech, &credential)?;
    println!("{}", formatter.format_token(&report));
    Ok(())
}
