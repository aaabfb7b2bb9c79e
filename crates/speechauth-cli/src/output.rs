// Rust guideline compliant 2026-10-18

//! Output formatting for the speechauth CLI.
//!
//! Every command produces a serializable report; this module renders it as
//! JSON, a table, or plain text.

use crate::commands::{ExtractReport, TenantReport, TokenReport, ValidationReport};
use serde::Serialize;
use serde_json::json;
use speechauth_app::{AppError, ErrorEnvelope, SuccessEnvelope};
use speechauth_core::Config;
use std::io::Write;
use tabled::{builder::Builder, settings::Style};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

/// Output formatter trait.
///
/// Defines the interface for rendering command reports in different formats.
pub trait OutputFormatter {
    /// Formats per-input validation results.
    fn format_validation(&self, reports: &[ValidationReport]) -> String;

    /// Formats a resolved resource name.
    fn format_extract(&self, report: &ExtractReport) -> String;

    /// Formats a speech authorization token summary.
    fn format_token(&self, report: &TokenReport) -> String;

    /// Formats an SSML document.
    fn format_ssml(&self, ssml: &str) -> String;

    /// Formats a tenant authorization result.
    fn format_tenant(&self, report: &TenantReport) -> String;

    /// Formats a configuration whose secrets are already redacted.
    fn format_config(&self, config: &Config) -> String;

    /// Formats an error for display.
    fn format_error(&self, error: &anyhow::Error) -> String;
}

/// JSON output formatter.
///
/// Wraps results in the standard success and error envelopes.
pub struct JsonFormatter;

impl JsonFormatter {
    fn envelope<T: Serialize>(result: T) -> String {
        serde_json::to_string_pretty(&SuccessEnvelope::new(result))
            .unwrap_or_else(|_| json!({ "status": "error", "message": "Failed to serialize result" }).to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_validation(&self, reports: &[ValidationReport]) -> String {
        let invalid = reports.iter().filter(|report| !report.valid).count();
        Self::envelope(json!({
            "resources": reports,
            "total": reports.len(),
            "invalid": invalid,
        }))
    }

    fn format_extract(&self, report: &ExtractReport) -> String {
        Self::envelope(report)
    }

    fn format_token(&self, report: &TokenReport) -> String {
        Self::envelope(report)
    }

    fn format_ssml(&self, ssml: &str) -> String {
        Self::envelope(json!({ "ssml": ssml }))
    }

    fn format_tenant(&self, report: &TenantReport) -> String {
        Self::envelope(report)
    }

    fn format_config(&self, config: &Config) -> String {
        Self::envelope(config)
    }

    fn format_error(&self, error: &anyhow::Error) -> String {
        let value = match error.downcast_ref::<AppError>() {
            Some(app) => serde_json::to_value(ErrorEnvelope::from_error(app))
                .unwrap_or_else(|_| json!({ "status": "error", "message": app.to_string() })),
            None => json!({ "status": "error", "message": error.to_string() }),
        };
        value.to_string()
    }
}

/// Table output formatter.
///
/// Formats reports as human-readable tables.
pub struct TableFormatter {
    use_color: bool,
}

impl TableFormatter {
    /// Creates a new table formatter.
    ///
    /// # Arguments
    /// * `use_color` - Whether to use colored output
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }
}

fn build_table(header: [&str; 2], rows: Vec<[String; 2]>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

impl OutputFormatter for TableFormatter {
    fn format_validation(&self, reports: &[ValidationReport]) -> String {
        if reports.is_empty() {
            return "No resource IDs given.".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["Resource ID", "Valid", "Kind", "Account"]);
        for report in reports {
            builder.push_record([
                report.resource_id.as_str(),
                if report.valid { "yes" } else { "no" },
                report.kind.unwrap_or("-"),
                report.account_name.as_deref().unwrap_or("-"),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        table.to_string()
    }

    fn format_extract(&self, report: &ExtractReport) -> String {
        build_table(
            ["Field", "Value"],
            vec![
                ["Resource ID".to_string(), report.resource_id.clone()],
                [
                    "Custom endpoint".to_string(),
                    report.custom_endpoint.clone().unwrap_or_else(|| "-".to_string()),
                ],
                ["Resource name".to_string(), report.resource_name.clone()],
            ],
        )
    }

    fn format_token(&self, report: &TokenReport) -> String {
        let mut rows = vec![
            ["Resource".to_string(), report.resource_identifier.clone()],
            ["Expires".to_string(), report.expires_on.clone()],
            ["Fingerprint".to_string(), report.fingerprint.clone()],
        ];
        if let Some(token) = &report.token {
            rows.push(["Token".to_string(), token.clone()]);
        }
        build_table(["Field", "Value"], rows)
    }

    fn format_ssml(&self, ssml: &str) -> String {
        ssml.to_string()
    }

    fn format_tenant(&self, report: &TenantReport) -> String {
        build_table(
            ["Field", "Value"],
            vec![
                [
                    "Tenant".to_string(),
                    report.tenant_id.clone().unwrap_or_else(|| "-".to_string()),
                ],
                [
                    "Authorized".to_string(),
                    if report.authorized { "yes" } else { "no" }.to_string(),
                ],
            ],
        )
    }

    fn format_config(&self, config: &Config) -> String {
        let rows = config_rows(config)
            .into_iter()
            .map(|(key, value)| [key, value])
            .collect();
        build_table(["Setting", "Value"], rows)
    }

    fn format_error(&self, error: &anyhow::Error) -> String {
        let mut buffer = if self.use_color {
            Buffer::ansi()
        } else {
            Buffer::no_color()
        };
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        let _ = write!(buffer, "Error:");
        let _ = buffer.reset();
        let _ = write!(buffer, " {}", error);
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }
}

/// Plain text output formatter.
///
/// One value per line, suitable for shell pipelines.
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn format_validation(&self, reports: &[ValidationReport]) -> String {
        reports
            .iter()
            .map(|report| {
                let status = if report.valid { "valid" } else { "invalid" };
                format!("{} {}\n", status, report.resource_id)
            })
            .collect()
    }

    fn format_extract(&self, report: &ExtractReport) -> String {
        report.resource_name.clone()
    }

    fn format_token(&self, report: &TokenReport) -> String {
        match &report.token {
            Some(token) => token.clone(),
            None => format!(
                "{} {} {}",
                report.resource_identifier, report.expires_on, report.fingerprint
            ),
        }
    }

    fn format_ssml(&self, ssml: &str) -> String {
        ssml.to_string()
    }

    fn format_tenant(&self, report: &TenantReport) -> String {
        report.authorized.to_string()
    }

    fn format_config(&self, config: &Config) -> String {
        config_rows(config)
            .into_iter()
            .map(|(key, value)| format!("{key} = {value}\n"))
            .collect()
    }

    fn format_error(&self, error: &anyhow::Error) -> String {
        format!("Error: {}", error)
    }
}

fn config_rows(config: &Config) -> Vec<(String, String)> {
    fn show(value: &Option<String>) -> String {
        value.clone().unwrap_or_else(|| "-".to_string())
    }
    fn mode(mode: speechauth_core::AuthMode) -> String {
        match mode {
            speechauth_core::AuthMode::Key => "key".to_string(),
            speechauth_core::AuthMode::ManagedIdentity => "managed_identity".to_string(),
        }
    }

    let mut rows = vec![
        ("speech.auth_mode".to_string(), mode(config.speech.auth_mode)),
        ("speech.key".to_string(), show(&config.speech.key)),
        ("speech.region".to_string(), show(&config.speech.region)),
        ("speech.resource_id".to_string(), show(&config.speech.resource_id)),
        ("speech.custom_endpoint".to_string(), show(&config.speech.custom_endpoint)),
        ("document.auth_mode".to_string(), mode(config.document.auth_mode)),
        ("document.key".to_string(), show(&config.document.key)),
        ("document.endpoint".to_string(), show(&config.document.endpoint)),
        (
            "auth.authorized_tenants".to_string(),
            config.auth.authorized_tenants.join(","),
        ),
    ];
    rows.extend(
        config
            .voices
            .iter()
            .map(|(speaker, voice)| (format!("voices.{speaker}"), voice.clone())),
    );
    rows
}

/// Factory function to create an appropriate formatter.
///
/// # Arguments
/// * `format` - The desired output format ("json", "table", or "plain")
/// * `use_color` - Whether to use colored output (ignored for JSON and plain)
///
/// # Returns
/// A boxed OutputFormatter instance
pub fn create_formatter(format: &str, use_color: bool) -> Box<dyn OutputFormatter> {
    match format {
        "json" => Box::new(JsonFormatter),
        "plain" => Box::new(PlainFormatter),
        _ => Box::new(TableFormatter::new(use_color)),
    }
}
