pub(crate) mod capture;
mod recorder;
mod resampler;
pub mod wav;

pub(crate) use {capture::AudioCapturer, resampler::Resampler};

pub use recorder::{AudioRecorder, RecordingArtifact};

/// Sample rate of every recording artifact handed to recognition.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;
