// Rust guideline compliant 2026-10-18

//! Integration tests for speech token creation against a mocked identity provider.

use chrono::{Duration, Utc};
use speechauth_core::{
    extract_resource_name, get_speech_token, AccessToken, Error, Result, TokenCredential,
    COGNITIVE_SERVICES_SCOPE,
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Credential returning a fixed token and recording every call.
struct RecordingCredential {
    token: String,
    calls: AtomicUsize,
    scopes: Mutex<Vec<String>>,
}

impl RecordingCredential {
    fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            calls: AtomicUsize::new(0),
            scopes: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenCredential for RecordingCredential {
    fn get_token(&self, scope: &str) -> Result<AccessToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.scopes.lock().unwrap().push(scope.to_string());
        Ok(AccessToken::new(self.token.clone(), Utc::now() + Duration::hours(1)))
    }
}

struct FailingCredential;

impl TokenCredential for FailingCredential {
    fn get_token(&self, _scope: &str) -> Result<AccessToken> {
        Err(Error::Credential("identity endpoint unreachable".to_string()))
    }
}

/// Log sink shared with a scoped subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn test_plain_name_token() {
    let credential = RecordingCredential::new("TOKEN123");
    let token = get_speech_token("speech-resource", None, &credential).unwrap();
    assert_eq!(token.as_str(), "aad#speech-resource#TOKEN123");
    assert_eq!(credential.calls(), 1);
}

#[test]
fn test_token_uses_cognitive_services_scope() {
    let credential = RecordingCredential::new("TOKEN123");
    get_speech_token("speech-resource", None, &credential).unwrap();
    assert_eq!(
        *credential.scopes.lock().unwrap(),
        vec![COGNITIVE_SERVICES_SCOPE.to_string()]
    );
    assert_eq!(
        COGNITIVE_SERVICES_SCOPE,
        "https://cognitiveservices.azure.com/.default"
    );
}

#[test]
fn test_arm_path_token_is_verbatim() {
    let path = "/subscriptions/12345678-1234-1234-1234-123456789abc/resourceGroups/rg/providers/Microsoft.CognitiveServices/accounts/speech-resource";
    let credential = RecordingCredential::new("TOKEN123");
    let token = get_speech_token(path, None, &credential).unwrap();
    assert_eq!(token.into_string(), format!("aad#{path}#TOKEN123"));
}

#[test]
fn test_invalid_identifier_never_calls_credential() {
    let credential = RecordingCredential::new("TOKEN123");
    let err = get_speech_token("not a valid id!!", None, &credential).unwrap_err();

    assert!(matches!(err, Error::InvalidResourceIdentifier(ref value) if value == "not a valid id!!"));
    assert!(err.to_string().contains("not a valid id!!"));
    assert_eq!(credential.calls(), 0);
}

#[test]
fn test_empty_identifier_is_rejected() {
    let credential = RecordingCredential::new("TOKEN123");
    let err = get_speech_token("", None, &credential).unwrap_err();
    assert!(matches!(err, Error::InvalidResourceIdentifier(_)));
    assert_eq!(credential.calls(), 0);
}

#[test]
fn test_lenient_arm_shape_is_rejected_before_token() {
    let credential = RecordingCredential::new("TOKEN123");
    let input = "/subscriptions/abc/resourceGroups/rg/providers/Microsoft.CognitiveServices/accounts/speech-resource";
    let err = get_speech_token(input, None, &credential).unwrap_err();
    assert!(matches!(err, Error::InvalidResourceIdentifier(_)));
    assert_eq!(credential.calls(), 0);
}

#[test]
fn test_empty_access_token_fails() {
    let credential = RecordingCredential::new("");
    let err = get_speech_token("speech-resource", None, &credential).unwrap_err();
    assert!(matches!(err, Error::TokenAcquisitionFailure(_)));
    assert!(err.to_string().contains("speech-resource"));
}

#[test]
fn test_credential_failure_propagates() {
    let err = get_speech_token("speech-resource", None, &FailingCredential).unwrap_err();
    assert!(matches!(err, Error::Credential(ref msg) if msg.contains("unreachable")));
}

#[test]
fn test_token_expiry_follows_access_token() {
    let expires_on = Utc::now() + Duration::minutes(42);
    let credential = speechauth_core::StaticTokenCredential::from_access_token(AccessToken::new(
        "TOKEN123", expires_on,
    ));
    let token = get_speech_token("speech-resource", None, &credential).unwrap();
    assert_eq!(token.expires_on(), expires_on);
}

#[test]
fn test_malformed_custom_endpoint_is_logged_not_raised() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let name = tracing::subscriber::with_default(subscriber, || {
        extract_resource_name("speech-resource", Some("https://speech.example.com/"))
    });

    assert_eq!(name, "speech-resource");
    let output = logs.contents();
    assert!(output.contains("WARN"), "expected a warning, got: {output}");
    assert!(output.contains("could not extract custom domain name"));
}

#[test]
fn test_malformed_custom_endpoint_still_builds_token() {
    let credential = RecordingCredential::new("TOKEN123");
    let token = get_speech_token(
        "speech-resource",
        Some("https://speech.example.com/"),
        &credential,
    )
    .unwrap();
    assert_eq!(token.as_str(), "aad#speech-resource#TOKEN123");
}

#[test]
fn test_tokens_can_be_built_in_parallel() {
    let credential = Arc::new(RecordingCredential::new("TOKEN123"));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let credential = Arc::clone(&credential);
            std::thread::spawn(move || {
                let name = format!("speech-{i}");
                get_speech_token(&name, None, credential.as_ref()).map(|t| t.into_string())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let token = handle.join().unwrap().unwrap();
        assert_eq!(token, format!("aad#speech-{i}#TOKEN123"));
    }
    assert_eq!(credential.calls(), 8);
}
