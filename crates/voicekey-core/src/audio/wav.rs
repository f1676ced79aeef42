//! 16 kHz / mono / 16-bit PCM WAV serialization.
//!
//! Recognition backends consume exactly this format, so it is fixed at
//! compile time rather than configurable.

use crate::{AudioError, CoreResult, audio::TARGET_SAMPLE_RATE};

use std::{fs, io::Cursor, panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing::debug;

/// Container spec shared by file and in-memory encoding.
pub fn spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate: TARGET_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

fn write_samples<W>(writer: &mut hound::WavWriter<W>, samples: &[f32]) -> CoreResult<()>
where
    W: std::io::Write + std::io::Seek,
{
    // f32 [-1.0, 1.0] -> i16, clamped so out-of-range capture never wraps.
    for &sample in samples {
        let scaled = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer
            .write_sample(scaled)
            .map_err(|e| AudioError::WavEncodingError {
                reason: format!("Failed to write sample: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
    }
    Ok(())
}

/// Serialize samples into an in-memory WAV byte buffer.
#[track_caller]
pub fn encode_to_buffer(samples: &[f32]) -> CoreResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    let mut writer =
        hound::WavWriter::new(&mut buffer, spec()).map_err(|e| AudioError::WavEncodingError {
            reason: format!("Failed to create WAV writer: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    write_samples(&mut writer, samples)?;

    writer
        .finalize()
        .map_err(|e| AudioError::WavEncodingError {
            reason: format!("Failed to finalize WAV: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let bytes = buffer.into_inner();
    debug!(sample_count = samples.len(), byte_len = bytes.len(), "WAV encoded to buffer");

    Ok(bytes)
}

/// Serialize samples into a WAV file, creating parent directories as needed.
#[track_caller]
pub fn write_to_file(path: &Path, samples: &[f32]) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AudioError::WavEncodingError {
            reason: format!("Failed to create recordings directory: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
    }

    let mut writer =
        hound::WavWriter::create(path, spec()).map_err(|e| AudioError::WavEncodingError {
            reason: format!("Failed to create WAV file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    write_samples(&mut writer, samples)?;

    writer
        .finalize()
        .map_err(|e| AudioError::WavEncodingError {
            reason: format!("Failed to finalize WAV file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    debug!(path = ?path, sample_count = samples.len(), "WAV written to file");

    Ok(())
}
