use crate::AsrError;
use crate::asr::volcengine::parse_response;

/// WHAT: Success status header plus result body yields the text
/// WHY: The 20000000 header value is the only success signal
#[test]
#[allow(clippy::unwrap_used)]
fn given_ok_status_when_parsing_then_text_extracted() {
    // Given: A successful flash-recognition reply
    let body = r#"{"result":{"text":"你好"}}"#;

    // When: Parsing with the success status header
    let text = parse_response(Some("20000000"), None, body).unwrap();

    // Then: The recognized text is returned
    assert_eq!(text, "你好");
}

/// WHAT: Non-success status header becomes a structured API error
/// WHY: Vendor errors carry a code and message and are never retried
#[test]
#[allow(clippy::panic)]
fn given_error_status_when_parsing_then_api_error() {
    // Given: An error status and message header
    let result = parse_response(Some("45000001"), Some("invalid audio"), "{}");

    // Then: An Api error with the vendor code surfaces
    match result {
        Err(AsrError::Api { code, message, .. }) => {
            assert_eq!(code, "45000001");
            assert_eq!(message, "invalid audio");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

/// WHAT: Missing status header is malformed, not success
/// WHY: A proxy or outage must not be mistaken for recognition
#[test]
fn given_missing_status_header_when_parsing_then_malformed() {
    let result = parse_response(None, None, r#"{"result":{"text":"hi"}}"#);
    assert!(matches!(result, Err(AsrError::MalformedResponse { .. })));
}

/// WHAT: Success with an empty result yields empty text
/// WHY: Silence is a valid outcome the sink suppresses, not an error
#[test]
#[allow(clippy::unwrap_used)]
fn given_ok_status_with_empty_result_when_parsing_then_empty_text() {
    let text = parse_response(Some("20000000"), None, "{}").unwrap();
    assert!(text.is_empty());
}

/// WHAT: Invalid JSON body under a success header is malformed
/// WHY: Text extraction must not panic on a broken body
#[test]
fn given_ok_status_with_bad_json_when_parsing_then_malformed() {
    let result = parse_response(Some("20000000"), None, "not json");
    assert!(matches!(result, Err(AsrError::MalformedResponse { .. })));
}
