use crate::AsrError;
use crate::asr::tencent::{TencentCredentials, parse_response, sign_request, utc_date};

fn test_credentials() -> TencentCredentials {
    TencentCredentials {
        secret_id: "AKIDtest".to_string(),
        secret_key: "secret".to_string(),
        region: "ap-shanghai".to_string(),
    }
}

/// WHAT: A success envelope yields the recognized text
/// WHY: Result lives inside the vendor's Response wrapper
#[test]
#[allow(clippy::unwrap_used)]
fn given_success_envelope_when_parsing_then_text_extracted() {
    let body = r#"{"Response":{"Result":"测试文本","RequestId":"abc"}}"#;
    let text = parse_response(body).unwrap();
    assert_eq!(text, "测试文本");
}

/// WHAT: A vendor error envelope becomes a structured API error
/// WHY: Credential and quota failures arrive inside HTTP 200 replies
#[test]
#[allow(clippy::panic)]
fn given_error_envelope_when_parsing_then_api_error() {
    // Given: The vendor's error shape
    let body = r#"{"Response":{"Error":{"Code":"AuthFailure.SignatureFailure","Message":"signature mismatch"},"RequestId":"abc"}}"#;

    // When/Then: The code and message surface in the error
    match parse_response(body) {
        Err(AsrError::Api { code, message, .. }) => {
            assert_eq!(code, "AuthFailure.SignatureFailure");
            assert_eq!(message, "signature mismatch");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

/// WHAT: A non-JSON body is malformed, never a panic
/// WHY: Scenario: backend replies HTTP 500 with an HTML error page
#[test]
fn given_garbage_body_when_parsing_then_malformed() {
    let result = parse_response("<html>Internal Server Error</html>");
    assert!(matches!(result, Err(AsrError::MalformedResponse { .. })));
}

/// WHAT: Missing Result in a success envelope yields empty text
/// WHY: Silence is a valid recognition outcome
#[test]
#[allow(clippy::unwrap_used)]
fn given_success_without_result_when_parsing_then_empty_text() {
    let text = parse_response(r#"{"Response":{"RequestId":"abc"}}"#).unwrap();
    assert!(text.is_empty());
}

/// WHAT: The unix epoch maps to the correct UTC dates
/// WHY: The signing scope uses the UTC date; local time would break auth
#[test]
fn given_known_timestamps_when_formatting_date_then_utc() {
    assert_eq!(utc_date(0), "1970-01-01");
    assert_eq!(utc_date(86_400), "1970-01-02");
    // Leap-year boundary
    assert_eq!(utc_date(951_782_400), "2000-02-29");
    assert_eq!(utc_date(1_700_000_000), "2023-11-14");
}

/// WHAT: Signing is deterministic and carries the credential scope
/// WHY: The Authorization header format is fixed by the TC3 recipe
#[test]
#[allow(clippy::unwrap_used)]
fn given_fixed_inputs_when_signing_then_deterministic_header() {
    // Given: Fixed credentials, payload and timestamp
    let creds = test_credentials();
    let payload = r#"{"Data":"AAAA"}"#;
    let timestamp = 1_700_000_000;

    // When: Signing twice
    let first = sign_request(&creds, payload, timestamp);
    let second = sign_request(&creds, payload, timestamp);

    // Then: Output is stable and structured as expected
    assert_eq!(first, second);
    assert!(first.starts_with("TC3-HMAC-SHA256 Credential=AKIDtest/2023-11-14/asr/tc3_request,"));
    assert!(first.contains("SignedHeaders=content-type;host"));
    let signature = first.rsplit("Signature=").next().unwrap();
    assert_eq!(signature.len(), 64);
    assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
}

/// WHAT: Different payloads produce different signatures
/// WHY: The payload hash participates in the canonical request
#[test]
fn given_different_payloads_when_signing_then_signatures_differ() {
    let creds = test_credentials();
    let a = sign_request(&creds, r#"{"Data":"AAAA"}"#, 1_700_000_000);
    let b = sign_request(&creds, r#"{"Data":"BBBB"}"#, 1_700_000_000);
    assert_ne!(a, b);
}
