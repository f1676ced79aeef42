use crate::audio::wav;

use std::io::Cursor;

/// WHAT: WAV buffer round-trips through a standard reader
/// WHY: Backends reject artifacts that are not 16kHz/mono/16-bit
#[test]
#[allow(clippy::unwrap_used)]
fn given_samples_when_encoding_to_buffer_then_reader_reproduces_format() {
    // Given: 100ms of a quiet tone at 16kHz
    let samples: Vec<f32> = (0..1600).map(|i| (i as f32 * 0.05).sin() * 0.25).collect();

    // When: Encoding to an in-memory WAV and reading it back
    let bytes = wav::encode_to_buffer(&samples).unwrap();
    let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();

    // Then: Spec and sample count survive the round trip
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.len() as usize, samples.len());
}

/// WHAT: Decoded samples match the encoded values
/// WHY: Scaling to i16 must be lossless enough to preserve the waveform
#[test]
#[allow(clippy::unwrap_used)]
fn given_known_samples_when_round_tripping_then_values_close() {
    // Given: A handful of known amplitudes
    let samples = vec![0.0f32, 0.5, -0.5, 1.0, -1.0];

    // When: Encoding and decoding
    let bytes = wav::encode_to_buffer(&samples).unwrap();
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let decoded: Vec<f32> = reader
        .samples::<i16>()
        .map(|s| f32::from(s.unwrap()) / f32::from(i16::MAX))
        .collect();

    // Then: Each decoded value is within one quantization step
    assert_eq!(decoded.len(), samples.len());
    for (original, decoded) in samples.iter().zip(decoded.iter()) {
        assert!(
            (original - decoded).abs() < 1.0 / f32::from(i16::MAX) * 2.0,
            "expected {} got {}",
            original,
            decoded
        );
    }
}

/// WHAT: Out-of-range samples are clamped, not wrapped
/// WHY: A hot microphone must produce clipping, not garbage
#[test]
#[allow(clippy::unwrap_used)]
fn given_out_of_range_samples_when_encoding_then_clamped() {
    // Given: Samples beyond [-1.0, 1.0]
    let samples = vec![2.0f32, -3.0];

    // When: Encoding and decoding
    let bytes = wav::encode_to_buffer(&samples).unwrap();
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

    // Then: Values sit at the integer range limits
    assert_eq!(decoded[0], i16::MAX);
    assert_eq!(decoded[1], -i16::MAX);
}

/// WHAT: WAV file writing creates parent directories and a readable file
/// WHY: The recordings directory may not exist on first gesture
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_directory_when_writing_file_then_created_and_readable() {
    // Given: A destination under a directory that does not exist yet
    let dir = std::env::temp_dir().join(format!("voicekey-wav-test-{}", std::process::id()));
    let path = dir.join("nested").join("recording.wav");
    let samples = vec![0.1f32; 320];

    // When: Writing the WAV file
    wav::write_to_file(&path, &samples).unwrap();

    // Then: A standard reader accepts the file
    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().sample_rate, 16000);
    assert_eq!(reader.len() as usize, samples.len());

    let _ = std::fs::remove_dir_all(&dir);
}
