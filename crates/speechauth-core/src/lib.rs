// Rust guideline compliant 2026-10-18

//! speechauth Core Library
//!
//! This crate provides the foundational components for authenticating against
//! Azure AI services:
//! - Resource identifier parsing and validation (ARM paths, resource names, custom endpoints)
//! - Speech authorization token assembly (`aad#{resource}#{token}`)
//! - Identity collaborator seam and credential sources
//! - Configuration loading (TOML file plus environment overrides)
//! - SSML generation for podcast scripts
//! - Client principal tenant checks
//! - Error types and result handling

pub mod config;
pub mod credential;
pub mod error;
pub mod principal;
pub mod resource;
pub mod ssml;
pub mod token;

pub use config::{AuthMode, AuthConfig, Config, DocumentConfig, SpeechConfig};
pub use credential::{
    AccessToken, AzureCliCredential, DefaultCredentialChain, EnvironmentTokenCredential,
    ManagedIdentityCredential, ServicePrincipalCredential, StaticTokenCredential, TokenCredential,
};
pub use error::{Error, Result};
pub use principal::check_claim_for_tenant;
pub use resource::{extract_resource_name, validate_resource_id, ResourceId};
pub use ssml::{podcast_script_to_ssml, PodcastScript, ScriptLine};
pub use token::{get_speech_token, AuthorizationToken, COGNITIVE_SERVICES_SCOPE};
