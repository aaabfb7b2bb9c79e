// Rust guideline compliant 2026-10-18

//! Command implementations for the speechauth CLI.
//!
//! Each command exposes a `run` function returning a serializable report and
//! an `execute` function printing it through an [`crate::OutputFormatter`].

pub mod check_tenant;
pub mod config;
pub mod extract;
pub mod ssml;
pub mod token;
pub mod validate;

pub use check_tenant::TenantReport;
pub use extract::ExtractReport;
pub use token::TokenReport;
pub use validate::ValidationReport;
