// Rust guideline compliant 2026-10-18

//! Implementation of the `speechauth extract` command.

use crate::OutputFormatter;
use serde::Serialize;
use speechauth_core::extract_resource_name;

/// Resource name resolution for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractReport {
    /// Input as given.
    pub resource_id: String,
    /// Custom endpoint consulted, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_endpoint: Option<String>,
    /// Resolved resource name.
    pub resource_name: String,
}

/// Resolves the resource name for an ARM path or name.
pub fn run(resource_id: &str, custom_endpoint: Option<&str>) -> ExtractReport {
    ExtractReport {
        resource_id: resource_id.to_string(),
        custom_endpoint: custom_endpoint.map(str::to_string),
        resource_name: extract_resource_name(resource_id, custom_endpoint),
    }
}

/// Prints the resolved resource name.
pub fn execute(resource_id: &str, custom_endpoint: Option<&str>, formatter: &dyn OutputFormatter) {
    println!("{}", formatter.format_extract(&run(resource_id, custom_endpoint)));
}
