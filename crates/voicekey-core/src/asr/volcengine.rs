//! Volcengine big-model flash recognition client (backend A).
//!
//! Single HTTPS POST with a JSON body carrying base64 WAV bytes. Success is
//! signaled by the `X-Api-Status-Code` response header; anything but
//! `20000000` is a structured API error and is never retried here.

use crate::{AsrError, AsrResult};

use std::panic::Location;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use error_location::ErrorLocation;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};
use uuid::Uuid;

const ENDPOINT: &str = "https://openspeech.bytedance.com/api/v3/auc/bigmodel/recognize/flash";
const RESOURCE_ID: &str = "volc.bigasr.auc_turbo";
const MODEL_NAME: &str = "bigmodel";
const STATUS_OK: &str = "20000000";

/// Volcengine application credentials.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct VolcengineCredentials {
    /// Application key (`X-Api-App-Key`).
    pub app_key: String,
    /// Access token (`X-Api-Access-Key`).
    pub access_key: String,
}

#[derive(Debug, Deserialize)]
struct FlashResponse {
    result: Option<FlashResult>,
}

#[derive(Debug, Deserialize)]
struct FlashResult {
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct VolcengineClient {
    credentials: VolcengineCredentials,
    http: reqwest::Client,
    endpoint: String,
}

impl VolcengineClient {
    pub(crate) fn new(credentials: VolcengineCredentials) -> Self {
        Self {
            credentials,
            http: reqwest::Client::new(),
            endpoint: ENDPOINT.to_string(),
        }
    }

    /// Recognize one WAV buffer, returning the transcript text.
    #[instrument(skip(self, wav_bytes), fields(byte_len = wav_bytes.len()))]
    pub(crate) async fn recognize(&self, wav_bytes: &[u8]) -> AsrResult<String> {
        let request_id = Uuid::new_v4().to_string();

        let body = json!({
            "user": { "uid": self.credentials.app_key },
            "audio": { "data": BASE64.encode(wav_bytes) },
            "request": { "model_name": MODEL_NAME },
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Api-App-Key", &self.credentials.app_key)
            .header("X-Api-Access-Key", &self.credentials.access_key)
            .header("X-Api-Resource-Id", RESOURCE_ID)
            .header("X-Api-Request-Id", &request_id)
            .header("X-Api-Sequence", "-1")
            .json(&body)
            .send()
            .await
            .map_err(|e| AsrError::RequestFailed {
                reason: format!("Volcengine request failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if !response.status().is_success() {
            return Err(AsrError::RequestFailed {
                reason: format!("Volcengine HTTP status {}", response.status()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let status_code = header_value(&response, "X-Api-Status-Code");
        let message = header_value(&response, "X-Api-Message");

        let body = response.text().await.map_err(|e| AsrError::RequestFailed {
            reason: format!("Failed to read Volcengine response body: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let text = parse_response(status_code.as_deref(), message.as_deref(), &body)?;

        debug!(request_id, text_len = text.len(), "Volcengine recognition complete");

        Ok(text)
    }
}

fn header_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Interpret the status header plus JSON body of a flash-recognition reply.
///
/// Split out from the HTTP call so the protocol handling is testable
/// without a live endpoint.
#[track_caller]
pub(crate) fn parse_response(
    status_code: Option<&str>,
    message: Option<&str>,
    body: &str,
) -> AsrResult<String> {
    match status_code {
        Some(STATUS_OK) => {}
        Some(code) => {
            return Err(AsrError::Api {
                code: code.to_string(),
                message: message.unwrap_or("Unknown error").to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        None => {
            return Err(AsrError::MalformedResponse {
                reason: "Missing X-Api-Status-Code header".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    }

    let parsed: FlashResponse =
        serde_json::from_str(body).map_err(|e| AsrError::MalformedResponse {
            reason: format!("Invalid JSON body: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(parsed
        .result
        .and_then(|r| r.text)
        .unwrap_or_default())
}
