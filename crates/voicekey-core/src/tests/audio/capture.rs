use crate::audio::capture::MAX_BUFFER_SAMPLES;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// WHAT: Frame buffer respects MAX_BUFFER_SAMPLES limit
/// WHY: A lost stop keystroke must not grow memory without bound
#[test]
fn given_buffer_at_max_capacity_when_adding_frames_then_oldest_discarded() {
    // Given: A VecDeque at max capacity filled with 0.0
    let mut buf = VecDeque::with_capacity(MAX_BUFFER_SAMPLES);
    buf.extend(std::iter::repeat(0.0f32).take(MAX_BUFFER_SAMPLES));
    assert_eq!(buf.len(), MAX_BUFFER_SAMPLES);

    // When: Adding 1024 new frames (value 1.0) beyond the limit
    let new_frames = vec![1.0f32; 1024];
    buf.extend(new_frames.iter().copied());
    while buf.len() > MAX_BUFFER_SAMPLES {
        buf.pop_front();
    }

    // Then: Buffer stays at MAX_BUFFER_SAMPLES and newest frames preserved
    assert_eq!(buf.len(), MAX_BUFFER_SAMPLES);
    assert!((buf[MAX_BUFFER_SAMPLES - 1] - 1.0).abs() < f32::EPSILON);
    assert!((buf[MAX_BUFFER_SAMPLES - 1024] - 1.0).abs() < f32::EPSILON);
}

/// WHAT: Lock poison recovery preserves buffered frames
/// WHY: Captured dictation audio is never silently lost on mutex poison
#[test]
#[allow(clippy::unwrap_used, clippy::panic)]
fn given_poisoned_mutex_when_recovering_then_frames_preserved() {
    // Given: A mutex poisoned by a panic while holding the lock
    let buf = Arc::new(Mutex::new(VecDeque::from(vec![0.5f32; 100])));
    let buf_clone = Arc::clone(&buf);

    let _ = std::thread::spawn(move || {
        let _guard = buf_clone.lock().unwrap();
        panic!("intentional panic to poison mutex");
    })
    .join();

    // When: Recovering from poisoned lock using unwrap_or_else
    let recovered = buf.lock().unwrap_or_else(|e| e.into_inner());

    // Then: Original frames are fully preserved
    assert_eq!(recovered.len(), 100);
    assert!(recovered.iter().all(|&s| (s - 0.5).abs() < f32::EPSILON));
}

/// WHAT: Interleaved stereo frames downmix to a mono average
/// WHY: Backends accept mono only; both channels must contribute
#[test]
fn given_stereo_frames_when_downmixing_then_channels_averaged() {
    // Given: Interleaved L/R data with distinct channel values
    let data: Vec<f32> = vec![0.2, 0.4, 0.6, 0.8, -1.0, 1.0];
    let channels = 2;
    let mut buf: VecDeque<f32> = VecDeque::new();

    // When: Downmixing the way the capture callback does
    for frame in data.chunks_exact(channels) {
        buf.push_back(frame.iter().sum::<f32>() / channels as f32);
    }

    // Then: Each mono sample is the frame average
    let mono: Vec<f32> = buf.into_iter().collect();
    assert_eq!(mono.len(), 3);
    assert!((mono[0] - 0.3).abs() < 1e-6);
    assert!((mono[1] - 0.7).abs() < 1e-6);
    assert!(mono[2].abs() < 1e-6);
}

/// WHAT: Concurrent writers to the shared buffer produce consistent state
/// WHY: Validates Arc<Mutex<VecDeque>> under callback/stop contention
#[test]
#[allow(clippy::unwrap_used)]
fn given_concurrent_writers_when_writing_to_buffer_then_no_corruption() {
    // Given: Shared buffer simulating audio callback contention
    let buf = Arc::new(Mutex::new(VecDeque::with_capacity(MAX_BUFFER_SAMPLES)));
    let mut handles = vec![];

    // When: 4 threads write 1000 batches of 48 frames each concurrently
    for i in 0..4u8 {
        let buf_clone = Arc::clone(&buf);
        handles.push(std::thread::spawn(move || {
            for _ in 0..1000 {
                let mut b = buf_clone.lock().unwrap_or_else(|e| e.into_inner());
                b.extend(std::iter::repeat(f32::from(i)).take(48));
                while b.len() > MAX_BUFFER_SAMPLES {
                    b.pop_front();
                }
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    // Then: Buffer is within bounds and contains only finite values
    let b = buf.lock().unwrap();
    assert!(b.len() <= MAX_BUFFER_SAMPLES);
    assert!(b.iter().all(|s| s.is_finite()));
    assert_eq!(b.len(), 4 * 1000 * 48);
}
