/// Tray icon states corresponding to the dictation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Ready for the next gesture.
    Idle,
    /// Currently capturing audio.
    Recording,
    /// Waiting on the recognition backend.
    Processing,
}
