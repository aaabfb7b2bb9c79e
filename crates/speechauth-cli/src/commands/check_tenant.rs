// Rust guideline compliant 2026-10-18

//! Implementation of the `speechauth check-tenant` command.

use crate::OutputFormatter;
use serde::Serialize;
use speechauth_app::Result;
use speechauth_core::principal::tenant_id;
use speechauth_core::check_claim_for_tenant;
use tracing::warn;

/// Tenant authorization result for a client principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantReport {
    /// Tenant claim, if present.
    pub tenant_id: Option<String>,
    /// Whether the tenant is in the authorized list.
    pub authorized: bool,
}

/// Checks a base64 client principal against the authorized tenants.
///
/// # Errors
///
/// Returns an error if the principal cannot be decoded.
pub fn run(client_principal: &str, authorized_tenants: &[String]) -> Result<TenantReport> {
    if authorized_tenants.is_empty() {
        warn!("no authorized tenants configured");
    }

    Ok(TenantReport {
        tenant_id: tenant_id(client_principal)?,
        authorized: check_claim_for_tenant(client_principal, authorized_tenants)?,
    })
}

/// Prints whether the principal's tenant is authorized.
///
/// # Errors
///
/// See [`run`].
pub fn execute(
    client_principal: &str,
    authorized_tenants: &[String],
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let report = run(client_principal, authorized_tenants)?;
    println!("{}", formatter.format_tenant(&report));
    Ok(())
}
