use crate::asr::{AsrDispatcher, AsrService, BackendCredentials};
use crate::{AsrError, RecognitionRequest, AudioSource};

fn full_credentials() -> BackendCredentials {
    BackendCredentials {
        volcengine: Some(crate::asr::VolcengineCredentials {
            app_key: "app".to_string(),
            access_key: "key".to_string(),
        }),
        tencent: vec![crate::asr::TencentCredentials {
            secret_id: "id".to_string(),
            secret_key: "secret".to_string(),
            region: "ap-shanghai".to_string(),
        }],
    }
}

/// WHAT: Construction fails when the selected backend has no credentials
/// WHY: Startup must abort before the hotkey hook if no call could succeed
#[test]
fn given_no_credentials_when_building_dispatcher_then_missing_credentials() {
    // Given: Empty credential config
    let credentials = BackendCredentials::default();

    // When: Building for either backend
    let volcengine = AsrDispatcher::new(AsrService::Volcengine, &credentials);
    let tencent = AsrDispatcher::new(AsrService::Tencent, &credentials);

    // Then: Both fail with MissingCredentials
    assert!(matches!(volcengine, Err(AsrError::MissingCredentials { .. })));
    assert!(matches!(tencent, Err(AsrError::MissingCredentials { .. })));
}

/// WHAT: reload() swaps the active backend
/// WHY: The tray menu switches services without restarting the listener
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_dispatcher_when_reloading_then_service_switches() {
    // Given: A dispatcher on Volcengine with both credential sets
    let credentials = full_credentials();
    let dispatcher = AsrDispatcher::new(AsrService::Volcengine, &credentials).unwrap();
    assert_eq!(dispatcher.service().await, AsrService::Volcengine);

    // When: Reloading to Tencent
    dispatcher
        .reload(AsrService::Tencent, &credentials)
        .await
        .unwrap();

    // Then: The active service changed
    assert_eq!(dispatcher.service().await, AsrService::Tencent);
}

/// WHAT: A failed reload leaves the current backend in place
/// WHY: Switching to an unconfigured backend must not kill recognition
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_missing_target_credentials_when_reloading_then_backend_unchanged() {
    // Given: A dispatcher on Volcengine, no Tencent credentials
    let mut credentials = full_credentials();
    credentials.tencent.clear();
    let dispatcher = AsrDispatcher::new(AsrService::Volcengine, &credentials).unwrap();

    // When: Reloading to Tencent fails
    let result = dispatcher.reload(AsrService::Tencent, &credentials).await;

    // Then: The error surfaces and Volcengine stays active
    assert!(matches!(result, Err(AsrError::MissingCredentials { .. })));
    assert_eq!(dispatcher.service().await, AsrService::Volcengine);
}

/// WHAT: A file source that does not exist fails before any network call
/// WHY: Recognition errors must be contained, not crash the worker
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_missing_audio_file_when_recognizing_then_audio_read_error() {
    // Given: A request pointing at a non-existent artifact
    let credentials = full_credentials();
    let dispatcher = AsrDispatcher::new(AsrService::Volcengine, &credentials).unwrap();
    let request = RecognitionRequest {
        source: AudioSource::File("/nonexistent/recording.wav".into()),
    };

    // When: Recognizing
    let result = dispatcher.recognize(request).await;

    // Then: The read failure is structured, not a panic
    assert!(matches!(result, Err(AsrError::AudioRead { .. })));
}
