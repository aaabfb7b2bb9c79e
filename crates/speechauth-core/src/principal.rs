// Rust guideline compliant 2026-10-18

//! Client principal tenant authorization.
//!
//! App Service authentication forwards the caller's claims as a base64
//! encoded JSON document (`X-MS-CLIENT-PRINCIPAL`).

use crate::{Error, Result};
use base64::Engine;
use serde::Deserialize;

/// Claim type carrying the caller's tenant ID.
pub const TENANT_ID_CLAIM: &str = "http://schemas.microsoft.com/identity/claims/tenantid";

#[derive(Debug, Deserialize)]
struct ClientPrincipal {
    claims: Vec<Claim>,
}

#[derive(Debug, Deserialize)]
struct Claim {
    typ: String,
    val: String,
}

/// Returns the tenant ID claimed by an encoded client principal, if any.
///
/// # Errors
///
/// Returns [`Error::InvalidClientPrincipal`] if the value is not base64
/// encoded UTF-8 JSON with a `claims` array.
pub fn tenant_id(client_principal: &str) -> Result<Option<String>> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(client_principal.trim())
        .map_err(|err| Error::InvalidClientPrincipal(format!("base64: {err}")))?;
    let json = String::from_utf8(bytes)
        .map_err(|err| Error::InvalidClientPrincipal(format!("utf-8: {err}")))?;
    let principal: ClientPrincipal = serde_json::from_str(&json)
        .map_err(|err| Error::InvalidClientPrincipal(format!("json: {err}")))?;

    Ok(principal
        .claims
        .into_iter()
        .find(|claim| claim.typ == TENANT_ID_CLAIM)
        .map(|claim| claim.val))
}

/// Checks whether a client principal belongs to an authorized tenant.
///
/// A principal without a tenant claim is never authorized.
///
/// # Errors
///
/// Returns an error if the principal cannot be decoded; see [`tenant_id`].
pub fn check_claim_for_tenant(client_principal: &str, authorized_tenants: &[String]) -> Result<bool> {
    Ok(tenant_id(client_principal)?
        .is_some_and(|tenant| authorized_tenants.iter().any(|allowed| *allowed == tenant)))
}
