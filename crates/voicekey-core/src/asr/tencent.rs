//! Tencent Cloud sentence recognition client (backend B).
//!
//! Builds a TC3-HMAC-SHA256 signed `SentenceRecognition` request instead of
//! pulling in the vendor SDK. Several credential sets may be configured;
//! one is picked at random per call for simple load distribution — there is
//! no health-aware selection.

use crate::{AsrError, AsrResult};

use std::{
    panic::Location,
    time::{SystemTime, UNIX_EPOCH},
};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use rand::seq::SliceRandom;
use ring::{digest, hmac};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

const HOST: &str = "asr.tencentcloudapi.com";
const SERVICE: &str = "asr";
const ACTION: &str = "SentenceRecognition";
const VERSION: &str = "2019-06-14";
const ALGORITHM: &str = "TC3-HMAC-SHA256";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const ENGINE_TYPE: &str = "16k_zh";

/// One Tencent Cloud credential set.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct TencentCredentials {
    /// API secret id.
    pub secret_id: String,
    /// API secret key.
    pub secret_key: String,
    /// Service region, e.g. `ap-shanghai`.
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "ap-shanghai".to_string()
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(rename = "Response")]
    response: ApiResponse,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(rename = "Result")]
    result: Option<String>,
    #[serde(rename = "Error")]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
}

#[derive(Debug, Clone)]
pub(crate) struct TencentClient {
    credentials: Vec<TencentCredentials>,
    http: reqwest::Client,
    endpoint: String,
}

impl TencentClient {
    #[track_caller]
    pub(crate) fn new(credentials: Vec<TencentCredentials>) -> AsrResult<Self> {
        if credentials.is_empty() {
            return Err(AsrError::MissingCredentials {
                reason: "No Tencent credential sets configured".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            credentials,
            http: reqwest::Client::new(),
            endpoint: format!("https://{}", HOST),
        })
    }

    /// Random credential set per call.
    #[track_caller]
    fn pick_credentials(&self) -> AsrResult<&TencentCredentials> {
        self.credentials
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| AsrError::MissingCredentials {
                reason: "No Tencent credential sets configured".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Recognize one WAV buffer, returning the transcript text.
    #[instrument(skip(self, wav_bytes), fields(byte_len = wav_bytes.len()))]
    pub(crate) async fn recognize(&self, wav_bytes: &[u8]) -> AsrResult<String> {
        let credentials = self.pick_credentials()?;

        let payload = json!({
            "ProjectId": 0,
            "SubServiceType": 2,
            "EngSerViceType": ENGINE_TYPE,
            "SourceType": 1,
            "VoiceFormat": "wav",
            "Data": BASE64.encode(wav_bytes),
            "DataLen": wav_bytes.len(),
        })
        .to_string();

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AsrError::RequestFailed {
                reason: format!("System clock before epoch: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .as_secs();

        let authorization = sign_request(credentials, &payload, timestamp);

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("Host", HOST)
            .header("X-TC-Action", ACTION)
            .header("X-TC-Version", VERSION)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Region", &credentials.region)
            .body(payload)
            .send()
            .await
            .map_err(|e| AsrError::RequestFailed {
                reason: format!("Tencent request failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if !response.status().is_success() {
            return Err(AsrError::RequestFailed {
                reason: format!("Tencent HTTP status {}", response.status()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let body = response.text().await.map_err(|e| AsrError::RequestFailed {
            reason: format!("Failed to read Tencent response body: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let text = parse_response(&body)?;

        debug!(text_len = text.len(), "Tencent recognition complete");

        Ok(text)
    }
}

/// Interpret a `SentenceRecognition` reply body.
///
/// Vendor errors come back inside a 200 response as `Response.Error`.
#[track_caller]
pub(crate) fn parse_response(body: &str) -> AsrResult<String> {
    let envelope: ApiEnvelope =
        serde_json::from_str(body).map_err(|e| AsrError::MalformedResponse {
            reason: format!("Invalid JSON body: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    if let Some(error) = envelope.response.error {
        return Err(AsrError::Api {
            code: error.code,
            message: error.message,
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(envelope.response.result.unwrap_or_default())
}

fn hmac_sha256(key: &[u8], message: &str) -> hmac::Tag {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    hmac::sign(&key, message.as_bytes())
}

fn sha256_hex(data: &str) -> String {
    hex::encode(digest::digest(&digest::SHA256, data.as_bytes()))
}

/// Produce the TC3-HMAC-SHA256 `Authorization` header value.
///
/// Steps follow the vendor signing recipe: canonical request, string to
/// sign, derived signing key (date -> service -> tc3_request), signature.
pub(crate) fn sign_request(
    credentials: &TencentCredentials,
    payload: &str,
    timestamp: u64,
) -> String {
    let date = utc_date(timestamp);

    let canonical_headers = format!("content-type:{}\nhost:{}\n", CONTENT_TYPE, HOST);
    let signed_headers = "content-type;host";
    let canonical_request = format!(
        "POST\n/\n\n{}\n{}\n{}",
        canonical_headers,
        signed_headers,
        sha256_hex(payload)
    );

    let credential_scope = format!("{}/{}/tc3_request", date, SERVICE);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        timestamp,
        credential_scope,
        sha256_hex(&canonical_request)
    );

    let k_date = hmac_sha256(format!("TC3{}", credentials.secret_key).as_bytes(), &date);
    let k_service = hmac_sha256(k_date.as_ref(), SERVICE);
    let k_signing = hmac_sha256(k_service.as_ref(), "tc3_request");
    let signature = hex::encode(hmac_sha256(k_signing.as_ref(), &string_to_sign));

    format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, credentials.secret_id, credential_scope, signed_headers, signature
    )
}

/// `YYYY-MM-DD` in UTC for the given unix timestamp.
///
/// The signing scope must never depend on local time.
pub(crate) fn utc_date(timestamp: u64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp as i64, 0)
        .unwrap_or_default()
        .format("%Y-%m-%d")
        .to_string()
}
