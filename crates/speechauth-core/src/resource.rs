// Rust guideline compliant 2026-10-18

//! Azure resource identifier parsing and validation.
//!
//! Speech resources can be referenced in three shapes:
//!
//! - Full ARM resource ID:
//!   `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.CognitiveServices/accounts/{name}`
//! - Plain resource name: `speech-resource`
//! - Custom endpoint URL: `https://{domain}.cognitiveservices.azure.com/`
//!
//! [`validate_resource_id`] is the single predicate deciding what is accepted;
//! [`ResourceId::parse`] is its typed counterpart.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::{debug, error, info, warn};

const ARM_PREFIX: &str = "/subscriptions/";

const ARM_FORMAT_HINT: &str = "/subscriptions/{subscription-id}/resourceGroups/{resource-group-name}/providers/Microsoft.CognitiveServices/accounts/{resource-name}";

static ARM_RESOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^/subscriptions/([a-f0-9-]{36})/resourceGroups/([^/]+)/providers/Microsoft\.CognitiveServices/accounts/([^/]+)$",
    )
    .unwrap()
});

static RESOURCE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]$|^[a-zA-Z0-9]$").unwrap());

// Anchored at the start only: trailing paths after the host are tolerated.
static CUSTOM_ENDPOINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://([^.]+)\.cognitiveservices\.azure\.com/?").unwrap());

/// Returns `true` if the value looks like an ARM resource path.
#[inline]
pub fn is_arm_path(resource_id: &str) -> bool {
    resource_id.starts_with(ARM_PREFIX)
}

/// Extracts the resource name to use for speech authentication.
///
/// Resolution order:
/// 1. If `custom_endpoint` matches `https://{domain}.cognitiveservices.azure.com/`,
///    the custom domain is returned.
/// 2. If `resource_id` is itself such an endpoint URL, its domain is returned.
/// 3. If `resource_id` is an ARM path ending in `accounts/{name}`, `{name}` is returned.
/// 4. Otherwise `resource_id` is returned unchanged.
///
/// A custom endpoint that does not match and an ARM path with an unexpected
/// shape are both reported as warnings, never as errors. Callers that need a
/// hard failure should use [`ResourceId::parse`].
///
/// # Arguments
///
/// * `resource_id` - ARM resource ID, plain resource name, or custom endpoint URL
/// * `custom_endpoint` - Optional custom endpoint URL
///
/// # Returns
///
/// The resolved resource name, or the input unchanged.
///
/// # Examples
///
/// ```
/// use speechauth_core::extract_resource_name;
///
/// assert_eq!(
///     extract_resource_name("speech", Some("https://wkswecenspeech.cognitiveservices.azure.com/")),
///     "wkswecenspeech"
/// );
/// assert_eq!(extract_resource_name("speech-resource", None), "speech-resource");
/// ```
pub fn extract_resource_name(resource_id: &str, custom_endpoint: Option<&str>) -> String {
    if resource_id.is_empty() {
        return String::new();
    }

    if let Some(endpoint) = custom_endpoint.filter(|endpoint| !endpoint.is_empty()) {
        match CUSTOM_ENDPOINT_RE.captures(endpoint) {
            Some(captures) => {
                let domain = captures[1].to_string();
                info!(%domain, %endpoint, "extracted custom domain name from custom endpoint");
                return domain;
            }
            None => {
                warn!(%endpoint, "could not extract custom domain name from endpoint");
            }
        }
    }

    if let Some(captures) = CUSTOM_ENDPOINT_RE.captures(resource_id) {
        let domain = captures[1].to_string();
        info!(%domain, "extracted custom domain name from endpoint resource ID");
        return domain;
    }

    if is_arm_path(resource_id) {
        let parts: Vec<&str> = resource_id.split('/').collect();
        if parts.len() >= 8 && parts[parts.len() - 2].eq_ignore_ascii_case("accounts") {
            let name = parts[parts.len() - 1];
            info!(resource_name = %name, "extracted resource name from ARM resource ID");
            return name.to_string();
        }
        warn!(%resource_id, "ARM resource ID format appears invalid");
        return resource_id.to_string();
    }

    debug!(%resource_id, "using provided value as resource name");
    resource_id.to_string()
}

/// Validates an Azure Speech resource identifier.
///
/// Accepts either a full Cognitive Services ARM resource ID (lowercase
/// 36-character subscription ID) or a plain resource name made of
/// alphanumerics and hyphens that starts and ends with an alphanumeric.
///
/// # Arguments
///
/// * `resource_id` - The identifier, or `None`
///
/// # Returns
///
/// `true` if the identifier has a valid format, `false` otherwise.
///
/// # Examples
///
/// ```
/// use speechauth_core::validate_resource_id;
///
/// assert!(validate_resource_id("speech-resource"));
/// assert!(!validate_resource_id("-speech"));
/// assert!(!validate_resource_id(None));
/// ```
pub fn validate_resource_id<'a>(resource_id: impl Into<Option<&'a str>>) -> bool {
    let resource_id = match resource_id.into() {
        Some(value) if !value.is_empty() => value,
        _ => {
            error!("resource ID is empty or missing");
            return false;
        }
    };

    if is_arm_path(resource_id) {
        if ARM_RESOURCE_RE.is_match(resource_id) {
            debug!(%resource_id, "valid ARM resource ID format");
            return true;
        }
        error!(
            %resource_id,
            expected = ARM_FORMAT_HINT,
            "invalid ARM resource ID format"
        );
        return false;
    }

    if RESOURCE_NAME_RE.is_match(resource_id) {
        debug!(%resource_id, "valid resource name format");
        return true;
    }
    error!(
        %resource_id,
        "invalid resource name format: only alphanumerics and hyphens, starting and ending with an alphanumeric"
    );
    false
}

/// A validated Speech resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceId {
    /// Full Azure Resource Manager path.
    Arm {
        /// Subscription GUID.
        subscription_id: String,
        /// Resource group name.
        resource_group: String,
        /// Cognitive Services account name.
        account_name: String,
    },
    /// Plain resource name.
    Name(String),
}

impl ResourceId {
    /// Parses and validates a resource identifier.
    ///
    /// Accepts exactly the inputs [`validate_resource_id`] accepts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResourceIdentifier`] naming the input if it is
    /// neither a Cognitive Services ARM path nor a valid resource name.
    pub fn parse(resource_id: &str) -> Result<Self> {
        if !validate_resource_id(resource_id) {
            return Err(Error::InvalidResourceIdentifier(resource_id.to_string()));
        }

        match ARM_RESOURCE_RE.captures(resource_id) {
            Some(captures) => Ok(Self::Arm {
                subscription_id: captures[1].to_string(),
                resource_group: captures[2].to_string(),
                account_name: captures[3].to_string(),
            }),
            None => Ok(Self::Name(resource_id.to_string())),
        }
    }

    /// Returns the Cognitive Services account name.
    #[must_use]
    pub fn account_name(&self) -> &str {
        match self {
            Self::Arm { account_name, .. } => account_name,
            Self::Name(name) => name,
        }
    }

    /// Returns `true` for full ARM resource paths.
    #[must_use]
    pub fn is_arm(&self) -> bool {
        matches!(self, Self::Arm { .. })
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arm {
                subscription_id,
                resource_group,
                account_name,
            } => write!(
                f,
                "/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/Microsoft.CognitiveServices/accounts/{account_name}"
            ),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl std::str::FromStr for ResourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
