//! Clipboard integration, auto-paste and key replay.
//!
//! Handles copying recognized text to the clipboard, optionally simulating
//! the paste chord into the active window, optionally restoring the previous
//! clipboard contents afterwards, and re-tapping the dictation key when a
//! gesture turned out to be an ordinary key press.

use crate::{AppError, AppResult, PasteKeyGuard, config::BehaviourConfig};

use std::panic::Location;
use std::time::Duration;

use arboard::Clipboard;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Delay between clipboard write and paste simulation.
///
/// This gives the OS clipboard manager time to process the write before
/// we simulate the paste chord. Too short and the paste may get stale
/// content; too long and the user perceives lag. 50ms is empirically
/// reliable across Windows, macOS, and Linux desktop environments.
const CLIPBOARD_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Delay between key events in the paste simulation.
///
/// Keyboard event timing: some applications and input method editors
/// need a small gap between key_down, key_click, and key_up to register
/// events correctly. 10ms is the minimum reliable interval.
const KEY_EVENT_DELAY: Duration = Duration::from_millis(10);

/// How long the pasted text stays on the clipboard before the previous
/// contents are restored. Long enough for the target application to read
/// the paste, short enough that the user rarely notices.
const CLIPBOARD_RESTORE_DELAY: Duration = Duration::from_millis(500);

/// Output handler for clipboard, auto-paste and key replay operations.
pub struct OutputHandler {
    pub(crate) clipboard: Clipboard,
}

impl OutputHandler {
    /// Create a new output handler.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let clipboard = Clipboard::new().map_err(|e| AppError::ClipboardError {
            reason: format!("Failed to initialize clipboard: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("OutputHandler initialized");

        Ok(Self { clipboard })
    }

    /// Deliver recognized text to the active window.
    ///
    /// Always copies to clipboard first. If pasting is enabled, simulates
    /// the paste chord after a short delay; if clipboard restore is enabled,
    /// the previous clipboard text comes back shortly afterwards.
    #[instrument(skip(self, text, behaviour))]
    pub async fn deliver(&mut self, text: &str, behaviour: &BehaviourConfig) -> AppResult<()> {
        // Remember what the user had before we overwrite it. Non-text
        // contents (images, files) are not preserved.
        let previous = if behaviour.restore_clipboard {
            self.clipboard.get_text().ok()
        } else {
            None
        };

        self.clipboard
            .set_text(text)
            .map_err(|e| AppError::ClipboardError {
                reason: format!("Failed to set clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(text_len = text.len(), "Text copied to clipboard");

        if behaviour.paste {
            // Allow clipboard manager to process the write before pasting.
            // See CLIPBOARD_SETTLE_DELAY documentation for rationale.
            tokio::time::sleep(CLIPBOARD_SETTLE_DELAY).await;

            if let Err(e) = self.paste().await {
                // Log paste failure but text is already in clipboard
                warn!(
                    error = ?e,
                    "Auto-paste failed, but text is in clipboard"
                );
                return Err(e);
            }
        }

        if let Some(previous) = previous {
            Self::schedule_clipboard_restore(previous);
        }

        info!(
            text_len = text.len(),
            pasted = behaviour.paste,
            "Text output complete"
        );

        Ok(())
    }

    /// Simulate a single tap of the dictation key.
    ///
    /// Used when a gesture is resolved as an ordinary key press: the hook
    /// consumed the physical event, so its function is reproduced here.
    #[instrument(skip(self))]
    pub async fn replay_key(&self, key: enigo::Key) -> AppResult<()> {
        use enigo::{Direction, Enigo, Keyboard, Settings};

        // Enigo is not Send; created inside the blocking task like paste().
        let result = tokio::task::spawn_blocking(move || {
            let mut enigo =
                Enigo::new(&Settings::default()).map_err(|e| AppError::KeySimulationFailed {
                    reason: format!("Failed to create Enigo: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            std::thread::sleep(KEY_EVENT_DELAY);

            enigo
                .key(key, Direction::Click)
                .map_err(|e| AppError::KeySimulationFailed {
                    reason: format!("Failed to replay key: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })
        })
        .await
        .map_err(|e| AppError::KeySimulationFailed {
            reason: format!("Key replay task panicked: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        result?;

        debug!("Dictation key replayed");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn paste(&mut self) -> AppResult<()> {
        use enigo::{Direction, Key, Keyboard};

        // enigo calls are synchronous and sleep between key events, so the
        // whole chord runs on spawn_blocking. Enigo is not Send, which is
        // why the instance is created inside the closure rather than held
        // on the handler; Enigo::new() is cheap enough for that.
        let paste_result = tokio::task::spawn_blocking(|| {
            let mut guard = PasteKeyGuard::new()?;

            std::thread::sleep(KEY_EVENT_DELAY);

            guard
                .enigo_mut()
                .key(Key::Unicode('v'), Direction::Click)
                .map_err(|e| AppError::KeySimulationFailed {
                    reason: format!("Failed to press V: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            std::thread::sleep(KEY_EVENT_DELAY);

            // Guard drops here and releases the modifier.
            Ok::<(), AppError>(())
        })
        .await
        .map_err(|e| AppError::KeySimulationFailed {
            reason: format!("Paste task panicked: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        paste_result?;

        debug!("Auto-paste simulated");

        Ok(())
    }

    /// Put the previous clipboard text back after the paste has landed.
    ///
    /// Best-effort on a background task: a fresh Clipboard handle is opened
    /// there because the restore outlives this handler's borrow.
    fn schedule_clipboard_restore(previous: String) {
        tokio::spawn(async move {
            tokio::time::sleep(CLIPBOARD_RESTORE_DELAY).await;

            let result = tokio::task::spawn_blocking(move || {
                Clipboard::new().and_then(|mut clipboard| clipboard.set_text(previous))
            })
            .await;

            match result {
                Ok(Ok(())) => debug!("Previous clipboard contents restored"),
                Ok(Err(e)) => warn!(error = ?e, "Failed to restore clipboard"),
                Err(e) => warn!(error = ?e, "Clipboard restore task panicked"),
            }
        });
    }
}
