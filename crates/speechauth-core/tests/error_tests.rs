// Rust guideline compliant 2026-10-18

//! Unit tests for error types and messages.
//!
//! Every error must carry the offending input so callers can report it.

use speechauth_core::Error;

#[test]
fn test_io_error_formatting() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error = Error::Io(io_err);
    assert!(error.to_string().contains("IO error"));
}

#[test]
fn test_json_error_formatting() {
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json")
        .expect_err("Should fail to parse invalid JSON");
    let error = Error::Json(json_err);
    assert!(error.to_string().contains("JSON error"));
}

#[test]
fn test_invalid_resource_identifier_formatting() {
    let error = Error::InvalidResourceIdentifier("not a valid id!!".to_string());
    assert_eq!(
        error.to_string(),
        "Invalid Azure Speech resource ID format: not a valid id!!"
    );
}

#[test]
fn test_token_acquisition_failure_formatting() {
    let error = Error::TokenAcquisitionFailure("empty access token".to_string());
    assert_eq!(
        error.to_string(),
        "Failed to retrieve valid access token: empty access token"
    );
}

#[test]
fn test_credential_error_formatting() {
    let error = Error::Credential("az login required".to_string());
    assert_eq!(error.to_string(), "Credential error: az login required");
}

#[test]
fn test_invalid_config_formatting() {
    let error = Error::InvalidConfig("speech.key is required".to_string());
    assert!(error.to_string().starts_with("Invalid configuration"));
    assert!(error.to_string().contains("speech.key"));
}

#[test]
fn test_unknown_speaker_formatting() {
    let error = Error::UnknownSpeaker("Zed".to_string());
    assert_eq!(error.to_string(), "Unknown speaker: Zed");
}

#[test]
fn test_invalid_client_principal_formatting() {
    let error = Error::InvalidClientPrincipal("base64: invalid byte".to_string());
    assert!(error.to_string().contains("base64"));
}

#[test]
fn test_io_error_converts() {
    fn read_missing() -> speechauth_core::Result<String> {
        Ok(std::fs::read_to_string("/definitely/not/here/speechauth.toml")?)
    }
    assert!(matches!(read_missing(), Err(Error::Io(_))));
}
