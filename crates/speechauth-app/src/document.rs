// Rust guideline compliant 2026-10-18

//! Document-to-markdown conversion through Document Intelligence.

use crate::error::{AppError, Result};
use serde::Serialize;
use speechauth_core::{
    AccessToken, AuthMode, DocumentConfig, TokenCredential, COGNITIVE_SERVICES_SCOPE,
};
use std::fmt;
use tracing::info;

/// Prebuilt model extracting text, tables, and structure.
pub const LAYOUT_MODEL: &str = "prebuilt-layout";

/// Content format of the analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    /// Plain text.
    Text,
    /// Markdown.
    Markdown,
}

impl ContentFormat {
    /// Returns the `outputContentFormat` value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Markdown => "markdown",
        }
    }
}

/// Credential handed to the document collaborator.
#[derive(Clone, PartialEq, Eq)]
pub enum DocumentCredential {
    /// API key authentication.
    ApiKey(String),
    /// Entra ID bearer token.
    Bearer(AccessToken),
}

impl fmt::Debug for DocumentCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey([redacted])"),
            Self::Bearer(token) => f.debug_tuple("Bearer").field(token).finish(),
        }
    }
}

/// Endpoint and credential for Document Intelligence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
    /// Service endpoint URL.
    pub endpoint: String,
    /// Credential to authenticate with.
    pub credential: DocumentCredential,
}

/// Resolves the Document Intelligence endpoint and credential.
///
/// # Errors
///
/// Returns an error if the endpoint or key is missing, or the token cannot be
/// obtained.
pub fn resolve_document_target(
    config: &DocumentConfig,
    credential: &dyn TokenCredential,
) -> Result<DocumentTarget> {
    let endpoint = config
        .endpoint
        .as_deref()
        .map(str::trim)
        .filter(|endpoint| !endpoint.is_empty())
        .ok_or(AppError::MissingSetting {
            setting: "document.endpoint",
        })?;

    let credential = match config.auth_mode {
        AuthMode::Key => {
            let key = config
                .key
                .as_deref()
                .filter(|key| !key.trim().is_empty())
                .ok_or(AppError::MissingSetting {
                    setting: "document.key",
                })?;
            DocumentCredential::ApiKey(key.to_string())
        }
        AuthMode::ManagedIdentity => {
            DocumentCredential::Bearer(credential.get_token(COGNITIVE_SERVICES_SCOPE)?)
        }
    };

    Ok(DocumentTarget {
        endpoint: endpoint.to_string(),
        credential,
    })
}

/// Request handed to the document collaborator.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest<'a> {
    /// Endpoint and credential.
    pub target: &'a DocumentTarget,
    /// Model to run.
    pub model_id: &'static str,
    /// Requested content format.
    pub content_format: ContentFormat,
    /// Raw document bytes.
    pub bytes: &'a [u8],
}

/// Analysis result returned by the collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzeResult {
    /// Document content in the requested format.
    pub content: String,
    /// Page numbers detected in the document.
    pub pages: Vec<u32>,
}

/// Document analysis collaborator.
pub trait DocumentAnalyzer {
    /// Runs a model over a document and waits for the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the service fails.
    fn analyze(&self, request: &AnalyzeRequest<'_>) -> Result<AnalyzeResult>;
}

/// Markdown conversion of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentResponse {
    /// Document content as markdown.
    pub markdown: String,
    /// Number of pages.
    pub pages: usize,
}

/// Converts a document to markdown with the layout model.
///
/// # Errors
///
/// Returns an error if the document is empty or analysis fails.
pub fn document_to_markdown(
    analyzer: &dyn DocumentAnalyzer,
    target: &DocumentTarget,
    file: &[u8],
) -> Result<DocumentResponse> {
    if file.is_empty() {
        return Err(AppError::InvalidInput("document is empty".to_string()));
    }

    let request = AnalyzeRequest {
        target,
        model_id: LAYOUT_MODEL,
        content_format: ContentFormat::Markdown,
        bytes: file,
    };
    let result = analyzer.analyze(&request)?;
    info!(pages = result.pages.len(), "document converted to markdown");

    Ok(DocumentResponse {
        markdown: result.content,
        pages: result.pages.len(),
    })
}
