// Rust guideline compliant 2026-10-18

//! Property-based tests for resource identifier resolution.
//!
//! These tests validate universal properties of validation, name extraction,
//! typed parsing, and speech token assembly.

use proptest::prelude::*;
use speechauth_core::{
    extract_resource_name, get_speech_token, validate_resource_id, ResourceId,
    StaticTokenCredential,
};

/// Generates 36-character lowercase subscription IDs.
fn arb_subscription_id() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-f0-9-]{36}").unwrap()
}

/// Generates resource group names.
fn arb_resource_group() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9._()-]{1,40}").unwrap()
}

/// Generates valid plain resource names.
fn arb_resource_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]{0,40}[a-zA-Z0-9]").unwrap()
}

/// Generates well-formed Cognitive Services ARM paths.
fn arb_arm_path() -> impl Strategy<Value = String> {
    (arb_subscription_id(), arb_resource_group(), arb_resource_name()).prop_map(
        |(sub, rg, name)| {
            format!(
                "/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.CognitiveServices/accounts/{name}"
            )
        },
    )
}

/// Generates arbitrary identifier-like strings, valid or not.
fn arb_any_identifier() -> impl Strategy<Value = String> {
    prop_oneof![
        ".{0,60}",
        "[a-zA-Z0-9 _!.-]{0,20}",
        arb_resource_name(),
        arb_arm_path(),
        arb_arm_path().prop_map(|path| format!("{path}/")),
        arb_arm_path().prop_map(|path| path.to_uppercase()),
    ]
}

proptest! {
    /// Every well-formed ARM path validates and is embedded verbatim.
    #[test]
    fn test_arm_paths_validate_and_embed_verbatim(path in arb_arm_path()) {
        prop_assert!(validate_resource_id(path.as_str()));

        let credential = StaticTokenCredential::new("TOKEN123");
        let token = get_speech_token(&path, None, &credential).unwrap();
        prop_assert_eq!(token.as_str(), format!("aad#{path}#TOKEN123"));
        prop_assert_eq!(token.resource_identifier(), path.as_str());
    }

    /// A custom endpoint never replaces a full ARM path in the token.
    #[test]
    fn test_arm_path_ignores_custom_endpoint(path in arb_arm_path()) {
        let credential = StaticTokenCredential::new("TOKEN123");
        let token = get_speech_token(
            &path,
            Some("https://custom.cognitiveservices.azure.com/"),
            &credential,
        )
        .unwrap();
        prop_assert_eq!(token.resource_identifier(), path.as_str());
    }

    /// Every name matching the resource name pattern validates.
    #[test]
    fn test_resource_names_validate(name in arb_resource_name()) {
        prop_assert!(validate_resource_id(name.as_str()));
    }

    /// Plain names resolve to themselves without a custom endpoint.
    #[test]
    fn test_plain_names_extract_to_themselves(name in arb_resource_name()) {
        prop_assert_eq!(extract_resource_name(&name, None), name);
    }

    /// The account name is extracted from every well-formed ARM path.
    #[test]
    fn test_arm_paths_extract_account_name(
        sub in arb_subscription_id(),
        rg in arb_resource_group(),
        name in arb_resource_name()
    ) {
        let path = format!(
            "/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.CognitiveServices/accounts/{name}"
        );
        prop_assert_eq!(extract_resource_name(&path, None), name);
    }

    /// Custom endpoints win for plain names.
    #[test]
    fn test_custom_endpoint_domain_extraction(
        name in arb_resource_name(),
        domain in "[a-z0-9-]{1,30}"
    ) {
        let endpoint = format!("https://{domain}.cognitiveservices.azure.com/");
        prop_assert_eq!(extract_resource_name(&name, Some(&endpoint)), domain);
    }

    /// Typed parsing accepts exactly what validation accepts.
    #[test]
    fn test_parse_agrees_with_validate(input in arb_any_identifier()) {
        prop_assert_eq!(ResourceId::parse(&input).is_ok(), validate_resource_id(input.as_str()));
    }

    /// Parsed identifiers render back to their input.
    #[test]
    fn test_parse_display_roundtrip(input in arb_any_identifier()) {
        if let Ok(parsed) = ResourceId::parse(&input) {
            prop_assert_eq!(parsed.to_string(), input);
        }
    }

    /// Validation is a pure function.
    #[test]
    fn test_validation_is_idempotent(input in arb_any_identifier()) {
        let first = validate_resource_id(input.as_str());
        let second = validate_resource_id(input.as_str());
        prop_assert_eq!(first, second);
    }

    /// Invalid inputs never produce a token.
    #[test]
    fn test_invalid_inputs_never_produce_tokens(input in arb_any_identifier()) {
        let credential = StaticTokenCredential::new("TOKEN123");
        let result = get_speech_token(&input, None, &credential);
        prop_assert_eq!(result.is_ok(), validate_resource_id(input.as_str()));
    }
}
