// Rust guideline compliant 2026-10-18

//! Identity collaborator seam and credential sources.
//!
//! The core never issues tokens itself. It asks a [`TokenCredential`] for an
//! access token for a scope and treats the call as blocking.

use crate::{Error, Result};
use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Environment variable holding a pre-issued access token.
pub const ACCESS_TOKEN_ENV: &str = "AZURE_ACCESS_TOKEN";

/// Environment variable holding the pre-issued token's expiry (unix seconds).
pub const ACCESS_TOKEN_EXPIRES_ON_ENV: &str = "AZURE_ACCESS_TOKEN_EXPIRES_ON";

/// Environment variables read by [`ServicePrincipalCredential`].
pub const TENANT_ID_ENV: &str = "AZURE_TENANT_ID";
/// Client ID of a service principal or user-assigned managed identity.
pub const CLIENT_ID_ENV: &str = "AZURE_CLIENT_ID";
/// Service principal secret.
pub const CLIENT_SECRET_ENV: &str = "AZURE_CLIENT_SECRET";
/// Entra ID authority override.
pub const AUTHORITY_HOST_ENV: &str = "AZURE_AUTHORITY_HOST";

/// App Service / Functions managed identity endpoint.
pub const IDENTITY_ENDPOINT_ENV: &str = "IDENTITY_ENDPOINT";
/// Secret header value for [`IDENTITY_ENDPOINT_ENV`].
pub const IDENTITY_HEADER_ENV: &str = "IDENTITY_HEADER";

const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
const IMDS_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";
const IMDS_API_VERSION: &str = "2018-02-01";
const APP_SERVICE_API_VERSION: &str = "2019-08-01";
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;
const HTTP_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
const IMDS_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);

/// An access token issued by the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Opaque bearer token.
    pub token: String,
    /// Instant after which the token is no longer accepted.
    pub expires_on: DateTime<Utc>,
}

impl AccessToken {
    /// Creates a new access token.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_on: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_on,
        }
    }

    /// Returns `true` if the token expires before `now + skew`.
    #[must_use]
    pub fn expires_within(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        self.expires_on <= now + skew
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[redacted]")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// Source of Entra ID access tokens.
///
/// Implementations may block on a network round trip or a child process.
pub trait TokenCredential: Send + Sync {
    /// Obtains an access token for `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credential`] if the provider cannot issue a token.
    fn get_token(&self, scope: &str) -> Result<AccessToken>;
}

impl<T: TokenCredential + ?Sized> TokenCredential for &T {
    fn get_token(&self, scope: &str) -> Result<AccessToken> {
        (**self).get_token(scope)
    }
}

impl<T: TokenCredential + ?Sized> TokenCredential for Box<T> {
    fn get_token(&self, scope: &str) -> Result<AccessToken> {
        (**self).get_token(scope)
    }
}

impl<T: TokenCredential + ?Sized> TokenCredential for Arc<T> {
    fn get_token(&self, scope: &str) -> Result<AccessToken> {
        (**self).get_token(scope)
    }
}

/// Credential returning a fixed token for every scope.
#[derive(Debug, Clone)]
pub struct StaticTokenCredential {
    token: AccessToken,
}

impl StaticTokenCredential {
    /// Creates a credential from a token string valid for one hour.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token, Utc::now() + Duration::hours(1)),
        }
    }

    /// Creates a credential from a complete access token.
    #[must_use]
    pub fn from_access_token(token: AccessToken) -> Self {
        Self { token }
    }
}

impl TokenCredential for StaticTokenCredential {
    fn get_token(&self, _scope: &str) -> Result<AccessToken> {
        Ok(self.token.clone())
    }
}

/// Credential reading a pre-issued token from the environment.
///
/// Values are captured once at construction.
#[derive(Clone, Default)]
pub struct EnvironmentTokenCredential {
    token: Option<String>,
    expires_on: Option<i64>,
}

impl EnvironmentTokenCredential {
    /// Captures `AZURE_ACCESS_TOKEN` and `AZURE_ACCESS_TOKEN_EXPIRES_ON`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Captures the token variables through a custom lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            token: lookup(ACCESS_TOKEN_ENV).filter(|value| !value.is_empty()),
            expires_on: lookup(ACCESS_TOKEN_EXPIRES_ON_ENV).and_then(|value| value.parse().ok()),
        }
    }
}

impl fmt::Debug for EnvironmentTokenCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentTokenCredential")
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

impl TokenCredential for EnvironmentTokenCredential {
    fn get_token(&self, _scope: &str) -> Result<AccessToken> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| Error::Credential(format!("{ACCESS_TOKEN_ENV} is not set")))?;
        let expires_on = match self.expires_on {
            Some(secs) => Utc.timestamp_opt(secs, 0).single().ok_or_else(|| {
                Error::Credential(format!("{ACCESS_TOKEN_EXPIRES_ON_ENV} is out of range: {secs}"))
            })?,
            None => Utc::now() + Duration::hours(1),
        };
        Ok(AccessToken::new(token.clone(), expires_on))
    }
}

/// Credential shelling out to `az account get-access-token`.
#[derive(Debug, Clone)]
pub struct AzureCliCredential {
    program: String,
    tenant_id: Option<String>,
}

impl Default for AzureCliCredential {
    fn default() -> Self {
        Self {
            program: "az".to_string(),
            tenant_id: None,
        }
    }
}

impl AzureCliCredential {
    /// Creates a credential using the `az` binary on `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests tokens for a specific tenant.
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Overrides the Azure CLI executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl TokenCredential for AzureCliCredential {
    fn get_token(&self, scope: &str) -> Result<AccessToken> {
        let mut command = Command::new(&self.program);
        command.args(["account", "get-access-token", "--scope", scope, "--output", "json"]);
        if let Some(tenant) = &self.tenant_id {
            command.args(["--tenant", tenant]);
        }

        debug!(program = %self.program, %scope, "requesting access token from Azure CLI");
        let output = command.output().map_err(|err| {
            Error::Credential(format!(
                "Azure CLI '{}' could not be started: {err}. Install the Azure CLI or set {ACCESS_TOKEN_ENV}.",
                self.program
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Credential(format!(
                "az account get-access-token failed: {}. Run 'az login' first.",
                stderr.trim()
            )));
        }

        parse_cli_token(&output.stdout)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliTokenOutput {
    access_token: String,
    #[serde(rename = "expires_on")]
    expires_on_unix: Option<i64>,
    expires_on: Option<String>,
}

/// Parses the JSON printed by `az account get-access-token`.
///
/// Prefers the `expires_on` unix timestamp and falls back to the local-time
/// `expiresOn` string printed by older CLI versions.
///
/// # Errors
///
/// Returns [`Error::Credential`] if the output is not valid JSON or carries no
/// parseable expiry.
pub fn parse_cli_token(stdout: &[u8]) -> Result<AccessToken> {
    let parsed: CliTokenOutput = serde_json::from_slice(stdout)
        .map_err(|err| Error::Credential(format!("Azure CLI output parse: {err}")))?;

    let expires_on = match (parsed.expires_on_unix, parsed.expires_on.as_deref()) {
        (Some(secs), _) => Utc.timestamp_opt(secs, 0).single(),
        (None, Some(local)) => NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M:%S%.f")
            .ok()
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .map(|local| local.with_timezone(&Utc)),
        (None, None) => None,
    }
    .ok_or_else(|| Error::Credential("Azure CLI output has no valid expiry".to_string()))?;

    Ok(AccessToken::new(parsed.access_token, expires_on))
}

/// Credential using the OAuth2 client-credentials grant of a service principal.
#[derive(Clone)]
pub struct ServicePrincipalCredential {
    authority_host: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
}

impl ServicePrincipalCredential {
    /// Creates a credential for an explicit service principal.
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Reads `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` and `AZURE_CLIENT_SECRET`.
    ///
    /// Returns `None` unless all three are set and non-empty.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let credential = Self::new(
            read(TENANT_ID_ENV)?,
            read(CLIENT_ID_ENV)?,
            read(CLIENT_SECRET_ENV)?,
        );
        Some(match read(AUTHORITY_HOST_ENV) {
            Some(host) => credential.with_authority_host(host),
            None => credential,
        })
    }

    /// Overrides the Entra ID authority, e.g. for sovereign clouds.
    #[must_use]
    pub fn with_authority_host(mut self, host: impl Into<String>) -> Self {
        self.authority_host = host.into().trim_end_matches('/').to_string();
        self
    }

    fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority_host, self.tenant_id)
    }
}

impl fmt::Debug for ServicePrincipalCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePrincipalCredential")
            .field("authority_host", &self.authority_host)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

impl TokenCredential for ServicePrincipalCredential {
    fn get_token(&self, scope: &str) -> Result<AccessToken> {
        let url = self.token_url();
        debug!(%url, client_id = %self.client_id, %scope, "requesting client-credentials token");

        let agent = http_agent(HTTP_TIMEOUT);
        let mut response = agent
            .post(url.as_str())
            .send_form([
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", scope),
            ])
            .map_err(|err| {
                Error::Credential(format!("service principal token request failed: {err}"))
            })?;
        let body: Value = response
            .body_mut()
            .read_json()
            .map_err(|err| Error::Credential(format!("service principal token response: {err}")))?;

        parse_token_response(&body, Utc::now())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum IdentityEndpoint {
    AppService { endpoint: String, header: String },
    Imds,
}

/// Credential using the managed identity of the hosting Azure resource.
///
/// Uses the App Service endpoint when `IDENTITY_ENDPOINT` and `IDENTITY_HEADER`
/// are set, otherwise the instance metadata service. `AZURE_CLIENT_ID` selects
/// a user-assigned identity.
#[derive(Clone)]
pub struct ManagedIdentityCredential {
    endpoint: IdentityEndpoint,
    client_id: Option<String>,
}

impl ManagedIdentityCredential {
    /// Reads the managed identity settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the managed identity settings through a custom lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let endpoint = match (read(IDENTITY_ENDPOINT_ENV), read(IDENTITY_HEADER_ENV)) {
            (Some(endpoint), Some(header)) => IdentityEndpoint::AppService { endpoint, header },
            _ => IdentityEndpoint::Imds,
        };
        Self {
            endpoint,
            client_id: read(CLIENT_ID_ENV),
        }
    }

    /// Returns `true` if the App Service identity endpoint is used.
    #[must_use]
    pub fn is_app_service(&self) -> bool {
        matches!(self.endpoint, IdentityEndpoint::AppService { .. })
    }

    /// Returns the token endpoint URL without query parameters.
    #[must_use]
    pub fn endpoint_url(&self) -> &str {
        match &self.endpoint {
            IdentityEndpoint::AppService { endpoint, .. } => endpoint,
            IdentityEndpoint::Imds => IMDS_ENDPOINT,
        }
    }
}

impl fmt::Debug for ManagedIdentityCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedIdentityCredential")
            .field("endpoint", &self.endpoint_url())
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl TokenCredential for ManagedIdentityCredential {
    fn get_token(&self, scope: &str) -> Result<AccessToken> {
        let resource = scope_to_resource(scope);
        debug!(endpoint = %self.endpoint_url(), %resource, "requesting managed identity token");

        let request = match &self.endpoint {
            IdentityEndpoint::AppService { endpoint, header } => http_agent(HTTP_TIMEOUT)
                .get(endpoint.as_str())
                .header("X-IDENTITY-HEADER", header.as_str())
                .query("api-version", APP_SERVICE_API_VERSION),
            IdentityEndpoint::Imds => http_agent(IMDS_TIMEOUT)
                .get(IMDS_ENDPOINT)
                .header("Metadata", "true")
                .query("api-version", IMDS_API_VERSION),
        };
        let request = request.query("resource", resource);
        let request = match &self.client_id {
            Some(client_id) => request.query("client_id", client_id),
            None => request,
        };

        let mut response = request.call().map_err(|err| {
            Error::Credential(format!("managed identity token request failed: {err}"))
        })?;
        let body: Value = response
            .body_mut()
            .read_json()
            .map_err(|err| Error::Credential(format!("managed identity token response: {err}")))?;

        parse_token_response(&body, Utc::now())
    }
}

fn http_agent(timeout: std::time::Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

/// Converts a `.default` scope into the resource URI managed identity expects.
fn scope_to_resource(scope: &str) -> &str {
    scope.strip_suffix("/.default").unwrap_or(scope)
}

fn json_seconds(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Parses an Entra ID or managed identity token response.
///
/// Reads `expires_on` (unix seconds) when present, else `expires_in`
/// relative to `now`, else one hour. Both may be numbers or strings.
///
/// # Errors
///
/// Returns [`Error::Credential`] if `access_token` is missing or an expiry is
/// out of range.
pub fn parse_token_response(body: &Value, now: DateTime<Utc>) -> Result<AccessToken> {
    let token = body
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Credential("token response has no access_token".to_string()))?;

    let expires_on = match json_seconds(body.get("expires_on")) {
        Some(secs) => Utc.timestamp_opt(secs, 0).single(),
        None => {
            let expires_in =
                json_seconds(body.get("expires_in")).unwrap_or(DEFAULT_EXPIRES_IN_SECS);
            Duration::try_seconds(expires_in).and_then(|ttl| now.checked_add_signed(ttl))
        }
    }
    .ok_or_else(|| Error::Credential("token response expiry is out of range".to_string()))?;

    Ok(AccessToken::new(token, expires_on))
}

/// Tries each credential in order and returns the first token issued.
pub struct DefaultCredentialChain {
    sources: Vec<(&'static str, Box<dyn TokenCredential>)>,
}

impl Default for DefaultCredentialChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialChain {
    /// Creates the default chain from the process environment.
    ///
    /// See [`DefaultCredentialChain::from_lookup`] for the order.
    #[must_use]
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), AzureCliCredential::new())
    }

    /// Creates the default chain reading settings through `lookup`.
    ///
    /// Order: environment token, service principal (only when configured),
    /// managed identity, then `azure_cli`.
    #[must_use]
    pub fn from_lookup<F>(lookup: F, azure_cli: AzureCliCredential) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut chain =
            Self::empty().with_source("environment", EnvironmentTokenCredential::from_lookup(&lookup));
        if let Some(service_principal) = ServicePrincipalCredential::from_lookup(&lookup) {
            chain = chain.with_source("service_principal", service_principal);
        }
        chain
            .with_source("managed_identity", ManagedIdentityCredential::from_lookup(&lookup))
            .with_source("azure_cli", azure_cli)
    }

    /// Creates a chain with no sources.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Appends a named credential source.
    #[must_use]
    pub fn with_source(
        mut self,
        name: &'static str,
        credential: impl TokenCredential + 'static,
    ) -> Self {
        self.sources.push((name, Box::new(credential)));
        self
    }
}

impl fmt::Debug for DefaultCredentialChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|(name, _)| *name).collect();
        f.debug_struct("DefaultCredentialChain")
            .field("sources", &names)
            .finish()
    }
}

impl TokenCredential for DefaultCredentialChain {
    fn get_token(&self, scope: &str) -> Result<AccessToken> {
        let mut failures = Vec::new();
        for (name, source) in &self.sources {
            match source.get_token(scope) {
                Ok(token) => {
                    info!(source = name, %scope, "access token retrieved");
                    debug!(expires_on = %token.expires_on, "access token expiry");
                    return Ok(token);
                }
                Err(err) => {
                    warn!(source = name, error = %err, "credential source failed");
                    failures.push(format!("{name}: {err}"));
                }
            }
        }
        Err(Error::Credential(format!(
            "no credential source issued a token for scope '{scope}' ({})",
            failures.join("; ")
        )))
    }
}
