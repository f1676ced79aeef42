use crate::{AudioError, CoreResult};

use std::{
    collections::VecDeque,
    panic::Location,
    sync::{
        atomic::{AtomicBool, Ordering},
        {Arc, Mutex},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Maximum samples to buffer (5 minutes at 48kHz mono).
/// Prevents unbounded memory growth if a stop keystroke never arrives.
pub(crate) const MAX_BUFFER_SAMPLES: usize = 48_000 * 60 * 5;

/// Owns the microphone stream for one dictation session.
///
/// Frames arrive on the CPAL callback thread and are appended to a shared
/// ring buffer; `stop()` drains the buffer exactly once. Device read errors
/// during a session are logged and buffering continues — a glitchy driver
/// should cost a few frames, not the whole gesture.
pub struct AudioCapturer {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    frames: Arc<Mutex<VecDeque<f32>>>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream so no in-flight callback writes after the
    /// buffer is drained in `stop()`.
    shutdown: Arc<AtomicBool>,
}

impl AudioCapturer {
    /// Open an input device, preferring `preferred` by name.
    ///
    /// An unknown or unavailable preferred device falls back to the system
    /// default with a warning rather than failing the session. Fails with
    /// [`AudioError::NoMicrophoneFound`] if the host enumerates no input
    /// device at all.
    #[track_caller]
    #[instrument]
    pub fn new(preferred: Option<&str>) -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = Self::select_device(&host, preferred).ok_or(
            AudioError::NoMicrophoneFound {
                location: ErrorLocation::from(Location::caller()),
            },
        )?;

        let config = device
            .default_input_config()
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to get input config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "AudioCapturer initialized"
        );

        Ok(Self {
            device,
            config: config.into(),
            stream: None,
            frames: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_BUFFER_SAMPLES))),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    fn select_device(host: &cpal::Host, preferred: Option<&str>) -> Option<Device> {
        if let Some(name) = preferred {
            let found = host
                .input_devices()
                .ok()
                .and_then(|mut devices| {
                    devices.find(|d| d.name().map(|n| n == name).unwrap_or(false))
                });

            match found {
                Some(device) => return Some(device),
                None => warn!(name, "Configured input device not found, using default"),
            }
        }

        host.default_input_device()
    }

    /// Begin buffering frames from the input device.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<()> {
        let frames = Arc::clone(&self.frames);
        let shutdown = Arc::clone(&self.shutdown);
        let channels = self.config.channels as usize;

        self.shutdown.store(false, Ordering::Release);

        // Clear leftovers from the previous session.
        frames
            .lock()
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to lock frame buffer: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .clear();

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Once stop() sets this flag no new frames are written,
                    // even if CPAL fires one more callback before the stream
                    // is dropped.
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    // Recover from lock poison rather than dropping audio.
                    // A poisoned mutex means a previous holder panicked, but
                    // the VecDeque itself is still valid.
                    let mut buf = frames.lock().unwrap_or_else(|e| {
                        error!("Frame buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    if channels <= 1 {
                        buf.extend(data.iter().copied());
                    } else {
                        // Downmix interleaved multi-channel input to mono.
                        for frame in data.chunks_exact(channels) {
                            buf.push_back(frame.iter().sum::<f32>() / channels as f32);
                        }
                    }
                    // Ring buffer: drop oldest samples past the cap.
                    while buf.len() > MAX_BUFFER_SAMPLES {
                        buf.pop_front();
                    }
                },
                |err| {
                    // Stream errors are non-fatal to the session.
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!("Audio capture started");

        Ok(())
    }

    /// Stop buffering, release the device handle and drain the buffer.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<Vec<f32>> {
        // Signal the callback before dropping the stream so a late callback
        // observes the flag and returns early.
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Brief yield so any in-flight callback observes the shutdown
            // flag. On most CPAL backends drop() joins the audio thread and
            // this is redundant, but not on all of them.
            std::thread::sleep(std::time::Duration::from_millis(5));
            info!("Audio capture stopped");
        }

        let samples: Vec<f32> = self
            .frames
            .lock()
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to lock frame buffer: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .drain(..)
            .collect();

        debug!(sample_count = samples.len(), "Captured audio drained");

        Ok(samples)
    }

    /// Whether a stream is currently open.
    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// The device sample rate frames are captured at.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }
}
