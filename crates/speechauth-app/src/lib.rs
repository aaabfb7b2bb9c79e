// Rust guideline compliant 2026-10-18

//! Shared application services for speechauth.
//!
//! This crate sits between the core library and a user-facing surface. It
//! owns the token cache, resolves service credentials from configuration,
//! drives the speech and document collaborators, and provides standardized
//! error codes and response envelopes.

pub mod cache;
pub mod document;
pub mod error;
pub mod response;
pub mod speech;

pub use cache::CachedCredential;
pub use document::{
    document_to_markdown, resolve_document_target, AnalyzeRequest, AnalyzeResult, ContentFormat,
    DocumentAnalyzer, DocumentCredential, DocumentResponse, DocumentTarget,
};
pub use error::{AppError, ErrorCode, Result};
pub use response::{ErrorEnvelope, SuccessEnvelope};
pub use speech::{
    resolve_speech_credential, synthesize_podcast, text_to_speech, CancellationReason,
    OutputFormat, SpeechCredential, SpeechSynthesizer, SynthesisRequest, SynthesisResult,
};
