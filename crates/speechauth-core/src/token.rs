// Rust guideline compliant 2026-10-18

//! Speech service authorization token assembly.
//!
//! The Speech service accepts Entra ID authentication through an
//! authorization token of the form `aad#{resource_identifier}#{access_token}`.
//! The `aad#` prefix and the `#` separator are fixed by the service.

use crate::credential::TokenCredential;
use crate::resource::{extract_resource_name, is_arm_path, validate_resource_id};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::{debug, error, info};

/// Entra ID scope for Cognitive Services.
pub const COGNITIVE_SERVICES_SCOPE: &str = "https://cognitiveservices.azure.com/.default";

const TOKEN_PREFIX: &str = "aad#";
const TOKEN_SEPARATOR: char = '#';

/// Authorization token for the Speech service.
///
/// `Debug` and `Display` never print the embedded access token; use
/// [`AuthorizationToken::as_str`] to obtain the credential.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationToken {
    value: String,
    resource_identifier: String,
    expires_on: DateTime<Utc>,
}

impl AuthorizationToken {
    fn compose(resource_identifier: String, access_token: &str, expires_on: DateTime<Utc>) -> Self {
        let mut value =
            String::with_capacity(TOKEN_PREFIX.len() + resource_identifier.len() + 1 + access_token.len());
        value.push_str(TOKEN_PREFIX);
        value.push_str(&resource_identifier);
        value.push(TOKEN_SEPARATOR);
        value.push_str(access_token);
        Self {
            value,
            resource_identifier,
            expires_on,
        }
    }

    /// Returns the full token string to hand to the Speech service.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consumes the token and returns the full token string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.value
    }

    /// Returns the resource identifier embedded in the token.
    #[must_use]
    pub fn resource_identifier(&self) -> &str {
        &self.resource_identifier
    }

    /// Returns the expiry of the underlying access token.
    #[must_use]
    pub fn expires_on(&self) -> DateTime<Utc> {
        self.expires_on
    }

    /// Returns a short SHA-256 fingerprint of the full token.
    ///
    /// Useful to correlate tokens in logs without revealing them.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.value.as_bytes());
        digest
            .iter()
            .take(6)
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }
}

impl fmt::Display for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TOKEN_PREFIX}{}{TOKEN_SEPARATOR}[access_token]", self.resource_identifier)
    }
}

impl fmt::Debug for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationToken")
            .field("resource_identifier", &self.resource_identifier)
            .field("expires_on", &self.expires_on)
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Creates a Speech service authorization token.
///
/// Full ARM resource IDs are embedded verbatim. Plain resource names are
/// resolved with [`extract_resource_name`], so a custom endpoint's domain takes
/// precedence over the name.
///
/// # Arguments
///
/// * `resource_id` - ARM resource ID or resource name
/// * `custom_endpoint` - Optional custom endpoint URL
/// * `credential` - Identity provider used for the Cognitive Services scope
///
/// # Returns
///
/// The composed authorization token.
///
/// # Errors
///
/// Returns an error if:
/// - `resource_id` fails [`validate_resource_id`]; the credential is not called
/// - the credential fails
/// - the credential returns an empty token
///
/// # Examples
///
/// ```
/// use speechauth_core::{get_speech_token, StaticTokenCredential};
///
/// let credential = StaticTokenCredential::new("TOKEN123");
/// let token = get_speech_token("speech-resource", None, &credential).unwrap();
/// assert_eq!(token.as_str(), "aad#speech-resource#TOKEN123");
/// ```
pub fn get_speech_token(
    resource_id: &str,
    custom_endpoint: Option<&str>,
    credential: &dyn TokenCredential,
) -> Result<AuthorizationToken> {
    info!(%resource_id, custom_endpoint = ?custom_endpoint, "creating speech token");

    if !validate_resource_id(resource_id) {
        error!(%resource_id, "resource ID validation failed");
        return Err(Error::InvalidResourceIdentifier(resource_id.to_string()));
    }

    let resource_identifier = if is_arm_path(resource_id) {
        info!(%resource_id, "using full ARM resource ID for speech token");
        resource_id.to_string()
    } else {
        let identifier = extract_resource_name(resource_id, custom_endpoint);
        info!(resource_identifier = %identifier, "using resource identifier for speech token");
        identifier
    };

    let access_token = credential
        .get_token(COGNITIVE_SERVICES_SCOPE)
        .inspect_err(|err| error!(error = %err, "failed to create speech token"))?;

    if access_token.token.is_empty() {
        error!(scope = COGNITIVE_SERVICES_SCOPE, "identity provider returned an empty token");
        return Err(Error::TokenAcquisitionFailure(format!(
            "empty access token for scope '{COGNITIVE_SERVICES_SCOPE}' (resource '{resource_id}')"
        )));
    }

    let token = AuthorizationToken::compose(resource_identifier, &access_token.token, access_token.expires_on);
    info!("speech authorization token created");
    debug!(token = %token, length = token.as_str().len(), "speech token format");
    Ok(token)
}
