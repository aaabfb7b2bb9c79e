// Rust guideline compliant 2026-10-18

//! Implementation of the `speechauth validate` command.

use crate::OutputFormatter;
use rayon::prelude::*;
use serde::Serialize;
use speechauth_app::{AppError, Result};
use speechauth_core::ResourceId;

/// Validation outcome for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Input as given.
    pub resource_id: String,
    /// Whether the input is a valid ARM path or resource name.
    pub valid: bool,
    /// `arm` or `name` for valid inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    /// Account name for valid inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
}

impl ValidationReport {
    fn for_input(resource_id: &str) -> Self {
        let parsed = ResourceId::parse(resource_id).ok();

        Self {
            resource_id: resource_id.to_string(),
            valid: parsed.is_some(),
            kind: parsed
                .as_ref()
                .map(|id| if id.is_arm() { "arm" } else { "name" }),
            account_name: parsed.map(|id| id.account_name().to_string()),
        }
    }
}

/// Validates every input in parallel, preserving input order.
pub fn run(resource_ids: &[String]) -> Vec<ValidationReport> {
    resource_ids
        .par_iter()
        .map(|resource_id| ValidationReport::for_input(resource_id))
        .collect()
}

/// Validates resource identifiers and prints one row per input.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] if any input is invalid. The report is
/// printed first.
pub fn execute(resource_ids: &[String], formatter: &dyn OutputFormatter) -> Result<()> {
    let reports = run(resource_ids);
    println!("{}", formatter.format_validation(&reports));

    let invalid = reports.iter().filter(|report| !report.valid).count();
    if invalid > 0 {
        return Err(AppError::InvalidInput(format!(
            "{invalid} of {} resource IDs are invalid",
            reports.len()
        )));
    }
    Ok(())
}
