use crate::{
    CoreResult,
    audio::{AudioCapturer, Resampler, TARGET_SAMPLE_RATE, wav},
};

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

/// Where a stopped recording ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingArtifact {
    /// WAV file on disk.
    File(PathBuf),
    /// In-memory WAV bytes.
    Buffer(Vec<u8>),
}

/// Orchestrates one recording session: capture, resample, serialize.
///
/// The device handle is exclusively owned for the lifetime of a session and
/// fully released in `stop()`/`discard()` before the next session may open
/// it. Not thread-safe; callers hold it behind a single lock.
pub struct AudioRecorder {
    capturer: AudioCapturer,
    resampler: Option<Resampler>,
    recording: bool,
}

impl AudioRecorder {
    /// Open an input device, preferring `device_name` when set.
    #[track_caller]
    #[instrument]
    pub fn new(device_name: Option<&str>) -> CoreResult<Self> {
        let capturer = AudioCapturer::new(device_name)?;

        info!("AudioRecorder initialized");

        Ok(Self {
            capturer,
            resampler: None,
            recording: false,
        })
    }

    /// Begin buffering frames on the capture thread.
    ///
    /// A no-op if a session is already running — the gesture layer must
    /// never interleave two captures, and a redundant start must not
    /// restart the stream mid-session.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<()> {
        if self.recording {
            warn!("start() while already recording, ignoring");
            return Ok(());
        }

        let device_rate = self.capturer.sample_rate();
        if device_rate != TARGET_SAMPLE_RATE {
            self.resampler = Some(Resampler::new(device_rate)?);
            debug!(device_rate, target_rate = TARGET_SAMPLE_RATE, "Resampler configured");
        } else {
            self.resampler = None;
        }

        self.capturer.start()?;
        self.recording = true;

        info!("Recording started");

        Ok(())
    }

    /// Stop buffering and serialize the session to a WAV artifact.
    ///
    /// Returns `Ok(None)` when no recording is active (idempotent), and
    /// when the device produced zero frames before stop — an empty WAV is
    /// never written. With `destination` set the artifact is a file at that
    /// path, otherwise an in-memory buffer.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self, destination: Option<&Path>) -> CoreResult<Option<RecordingArtifact>> {
        let Some(samples) = self.drain()? else {
            return Ok(None);
        };

        let artifact = match destination {
            Some(path) => {
                wav::write_to_file(path, &samples)?;
                info!(path = ?path, "Recording saved");
                RecordingArtifact::File(path.to_path_buf())
            }
            None => {
                let bytes = wav::encode_to_buffer(&samples)?;
                RecordingArtifact::Buffer(bytes)
            }
        };

        Ok(Some(artifact))
    }

    /// Stop buffering and throw the session away (cancelled gesture).
    #[track_caller]
    #[instrument(skip(self))]
    pub fn discard(&mut self) -> CoreResult<()> {
        if let Some(samples) = self.drain()? {
            debug!(sample_count = samples.len(), "Recording discarded");
        }
        Ok(())
    }

    /// Whether a session is currently buffering.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Common stop path: close the stream, drain frames, resample to 16 kHz.
    ///
    /// `None` means there was nothing to stop or nothing was captured.
    fn drain(&mut self) -> CoreResult<Option<Vec<f32>>> {
        if !self.recording {
            debug!("stop() with no active recording, nothing to do");
            return Ok(None);
        }
        self.recording = false;

        let raw = self.capturer.stop()?;
        if raw.is_empty() {
            warn!("Recording stopped with zero captured frames");
            return Ok(None);
        }

        let samples = match self.resampler.as_mut() {
            Some(resampler) => resampler.to_target_rate(&raw)?,
            None => raw,
        };

        if samples.is_empty() {
            return Ok(None);
        }

        info!(sample_count = samples.len(), "Recording stopped");

        Ok(Some(samples))
    }
}
