//! VoiceKey Core Library
//!
//! Push-to-talk dictation pipeline: microphone capture via CPAL, 16 kHz WAV
//! serialization via Hound, and cloud speech recognition over HTTPS with two
//! interchangeable backends (Volcengine and Tencent Cloud).
//!
//! # Example
//!
//! ```no_run
//! use voicekey_core::{AsrDispatcher, AsrService, AudioRecorder, BackendCredentials,
//!     RecognitionRequest, VolcengineCredentials};
//!
//! use std::{thread::sleep, time::Duration};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut recorder = AudioRecorder::new(None)?;
//!
//!     recorder.start()?;
//!     sleep(Duration::from_secs(3));
//!     let artifact = recorder.stop(None)?;
//!
//!     let credentials = BackendCredentials {
//!         volcengine: Some(VolcengineCredentials {
//!             app_key: "app".into(),
//!             access_key: "key".into(),
//!         }),
//!         tencent: Vec::new(),
//!     };
//!     let dispatcher = AsrDispatcher::new(AsrService::Volcengine, &credentials)?;
//!
//!     if let Some(artifact) = artifact {
//!         let result = dispatcher
//!             .recognize(RecognitionRequest::from_artifact(artifact))
//!             .await?;
//!         println!("Recognized: {}", result.text);
//!     }
//!     Ok(())
//! }
//! ```

mod asr;
mod audio;
mod error;

pub use {
    asr::{
        AsrDispatcher, AsrService, AudioSource, BackendCredentials, RecognitionRequest,
        RecognitionResult, TencentCredentials, VolcengineCredentials,
    },
    audio::{AudioRecorder, RecordingArtifact, wav},
    error::{AsrError, AsrResult, AudioError, Result as CoreResult},
};

#[cfg(test)]
mod tests;
