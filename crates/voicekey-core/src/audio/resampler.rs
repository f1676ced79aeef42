use crate::{AudioError, CoreResult, audio::TARGET_SAMPLE_RATE};

use std::panic::Location;

use audioadapter_buffers::direct::InterleavedSlice;
use error_location::ErrorLocation;
use rubato::{Fft, FixedSync, Resampler as RubatoResampler};
use tracing::{debug, instrument};

const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 2;

/// Converts captured mono audio from the device rate to 16 kHz.
///
/// Only constructed when the device does not capture at 16 kHz natively;
/// the recognition backends accept nothing else.
pub struct Resampler {
    resampler: Fft<f32>,
    input_rate: u32,
}

impl Resampler {
    /// Build an FFT resampler from `input_rate` down (or up) to 16 kHz.
    #[track_caller]
    #[instrument]
    pub fn new(input_rate: u32) -> CoreResult<Self> {
        let resampler = Fft::<f32>::new(
            input_rate as usize,
            TARGET_SAMPLE_RATE as usize,
            CHUNK_SIZE,
            SUB_CHUNKS,
            1, // mono
            FixedSync::Input,
        )
        .map_err(|e| AudioError::ResamplingError {
            reason: format!("Failed to create resampler: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(input_rate, output_rate = TARGET_SAMPLE_RATE, "Resampler initialized");

        Ok(Self {
            resampler,
            input_rate,
        })
    }

    /// Resample a full capture buffer to 16 kHz.
    ///
    /// The final partial chunk is zero-padded; output is truncated back to
    /// the rate-scaled length so padding never leaks into the artifact.
    #[track_caller]
    #[instrument(skip(self, samples))]
    pub fn to_target_rate(&mut self, samples: &[f32]) -> CoreResult<Vec<f32>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let expected_len = (samples.len() as f64 * f64::from(TARGET_SAMPLE_RATE)
            / f64::from(self.input_rate)) as usize;
        let mut output = Vec::with_capacity(expected_len);

        for chunk in samples.chunks(CHUNK_SIZE) {
            let mut input_chunk = chunk.to_vec();
            input_chunk.resize(CHUNK_SIZE, 0.0);

            let input_adapter = InterleavedSlice::new(&input_chunk, 1, CHUNK_SIZE).map_err(
                |e| AudioError::ResamplingError {
                    reason: format!("Failed to create input adapter: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                },
            )?;

            let max_out = self.resampler.output_frames_max();
            let mut output_chunk = vec![0.0f32; max_out];

            let mut output_adapter = InterleavedSlice::new_mut(&mut output_chunk, 1, max_out)
                .map_err(|e| AudioError::ResamplingError {
                    reason: format!("Failed to create output adapter: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            let (_consumed, written) = self
                .resampler
                .process_into_buffer(&input_adapter, &mut output_adapter, None)
                .map_err(|e| AudioError::ResamplingError {
                    reason: format!("Resampling failed: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            output.extend_from_slice(&output_chunk[..written]);
        }

        output.truncate(expected_len);

        debug!(
            input_len = samples.len(),
            output_len = output.len(),
            input_rate = self.input_rate,
            "Audio resampled to 16kHz"
        );

        Ok(output)
    }
}
