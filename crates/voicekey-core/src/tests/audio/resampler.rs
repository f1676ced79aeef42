use crate::audio::Resampler;

const DEVICE_SAMPLE_RATE: u32 = 48000;
const ONE_SECOND_INPUT_SAMPLES: usize = DEVICE_SAMPLE_RATE as usize;
const ONE_SECOND_OUTPUT_SAMPLES: usize = 16000;
const LENGTH_TOLERANCE: u64 = 100;
const TEST_SIGNAL_AMPLITUDE: f32 = 0.5;

/// WHAT: Resampler converts 48kHz capture to 16kHz correctly
/// WHY: Recognition backends accept 16kHz audio only
#[test]
#[allow(clippy::unwrap_used)]
fn given_48khz_audio_when_resampling_then_output_length_approximately_correct() {
    // Given: Resampler configured for a 48kHz device
    let mut resampler = Resampler::new(DEVICE_SAMPLE_RATE).unwrap();
    let input = vec![TEST_SIGNAL_AMPLITUDE; ONE_SECOND_INPUT_SAMPLES];

    // When: Resampling one second of audio
    let output = resampler.to_target_rate(&input).unwrap();

    // Then: Output is approximately 1 second at 16kHz
    assert!(
        (output.len() as i64 - ONE_SECOND_OUTPUT_SAMPLES as i64).unsigned_abs() < LENGTH_TOLERANCE,
        "Expected ~{} samples, got {}",
        ONE_SECOND_OUTPUT_SAMPLES,
        output.len()
    );
    assert!(output.iter().all(|&s| s.is_finite()));
}

/// WHAT: Empty capture returns empty output
/// WHY: Edge case handling for zero-length input
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_capture_when_resampling_then_empty_output() {
    // Given: Resampler and empty input
    let mut resampler = Resampler::new(DEVICE_SAMPLE_RATE).unwrap();
    let empty: Vec<f32> = vec![];

    // When: Resampling empty data
    let output = resampler.to_target_rate(&empty).unwrap();

    // Then: Output is also empty
    assert!(output.is_empty());
}

/// WHAT: Resampling a tone keeps samples finite and bounded
/// WHY: Validates audio is not distorted beyond the container's range
#[test]
#[allow(clippy::unwrap_used)]
fn given_tone_signal_when_resampling_then_output_stays_bounded() {
    // Given: Resampler and a simple tone signal (100ms at 48kHz)
    let mut resampler = Resampler::new(DEVICE_SAMPLE_RATE).unwrap();
    let input: Vec<f32> = (0..4800).map(|i| (i as f32 * 0.1).sin()).collect();

    // When: Resampling the signal
    let output = resampler.to_target_rate(&input).unwrap();

    // Then: Output has the rate-scaled length and bounded samples
    assert!(
        (output.len() as i64 - 1600).unsigned_abs() < LENGTH_TOLERANCE,
        "Expected ~1600 samples, got {}",
        output.len()
    );
    assert!(output.iter().all(|&s| s.is_finite() && s.abs() <= 1.5));
}
