use uuid::Uuid;
use voicekey_core::AsrService;

/// Commands sent from the hotkey handler (and tray) to the main application.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Start capturing audio for a new session.
    StartRecording {
        /// Unique session ID for this dictation.
        session_id: Uuid,
    },
    /// Stop capturing and submit the audio for recognition.
    FinishRecording {
        /// Session ID of the dictation to finish.
        session_id: Uuid,
        /// Re-tap the dictation key after stopping.
        replay_key: bool,
    },
    /// Stop capturing and discard the audio.
    CancelRecording {
        /// Session ID of the dictation to cancel.
        session_id: Uuid,
        /// Re-tap the dictation key so its normal function still happens.
        replay_key: bool,
    },
    /// Switch the recognition backend and persist the choice.
    SwitchBackend {
        /// Backend to switch to.
        service: AsrService,
    },
    /// Request application shutdown.
    Shutdown,
}
