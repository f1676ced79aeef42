//! Cloud speech recognition: request/result types, the two backend clients
//! and the dispatcher that swaps between them.

mod dispatcher;
pub(crate) mod tencent;
pub(crate) mod volcengine;

pub use dispatcher::{AsrDispatcher, BackendCredentials};
pub use tencent::TencentCredentials;
pub use volcengine::VolcengineCredentials;

pub(crate) use {tencent::TencentClient, volcengine::VolcengineClient};

use crate::{AsrError, AsrResult, audio::RecordingArtifact};

use std::{fs, panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Which cloud backend performs recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsrService {
    /// Volcengine big-model flash recognition (backend A).
    Volcengine,
    /// Tencent Cloud sentence recognition (backend B).
    Tencent,
}

impl std::fmt::Display for AsrService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsrService::Volcengine => write!(f, "volcengine"),
            AsrService::Tencent => write!(f, "tencent"),
        }
    }
}

/// Audio handed to a backend: a WAV file on disk or in-memory WAV bytes.
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Path to a 16 kHz/mono/16-bit WAV file.
    File(PathBuf),
    /// In-memory WAV bytes in the same format.
    Data(Vec<u8>),
}

impl AudioSource {
    /// Human-readable reference for logs and the transcript record.
    pub fn reference(&self) -> String {
        match self {
            AudioSource::File(path) => path.display().to_string(),
            AudioSource::Data(_) => "data".to_string(),
        }
    }

    /// Load the WAV bytes, reading from disk for file sources.
    #[track_caller]
    pub(crate) fn into_bytes(self) -> AsrResult<Vec<u8>> {
        match self {
            AudioSource::Data(bytes) => Ok(bytes),
            AudioSource::File(path) => fs::read(&path).map_err(|e| AsrError::AudioRead {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// One recognition call. Format metadata is fixed by the capture pipeline.
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    /// The audio to recognize.
    pub source: AudioSource,
}

impl RecognitionRequest {
    /// Build a request from a stopped recording.
    pub fn from_artifact(artifact: RecordingArtifact) -> Self {
        let source = match artifact {
            RecordingArtifact::File(path) => AudioSource::File(path),
            RecordingArtifact::Buffer(bytes) => AudioSource::Data(bytes),
        };
        Self { source }
    }
}

/// Outcome of one completed recognition call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    /// Backend that produced the text.
    pub backend: AsrService,
    /// Recognized text; may be empty when the backend heard nothing.
    pub text: String,
    /// File path or `"data"` the audio came from.
    pub source_ref: String,
}
