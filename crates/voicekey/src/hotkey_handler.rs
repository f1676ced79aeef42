//! Global hotkey handler driving the gesture state machine.
//!
//! Registers the configured dictation key as a global hotkey and turns its
//! press/release stream into gesture events. Uses async channels to
//! communicate with the main application; threshold countdowns are tokio
//! sleep tasks that post their token back into the same select loop.

use crate::{
    AppCommand, AppError, AppResult, Shortcut,
    gesture::{GestureAction, GestureEvent, GestureMachine, GesturePolicy},
};

use std::{
    panic::Location,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Global hotkey handler with gesture state machine.
pub struct HotkeyHandler {
    hotkey_id: u32,
    machine: GestureMachine,
    command_tx: mpsc::Sender<AppCommand>,
}

impl HotkeyHandler {
    /// Register the configured key as the global hotkey.
    ///
    /// Must be called on a thread with a message pump (e.g. the main thread
    /// running a `tao`/`winit` event loop) so that `WM_HOTKEY` messages are
    /// dispatched on Windows. The returned [`GlobalHotKeyManager`] must be
    /// kept alive on that thread for the hotkey to remain registered.
    ///
    /// Registration failure usually means another process (or another
    /// voicekey instance) already owns the key.
    #[track_caller]
    #[instrument(skip(shortcut))]
    pub fn register_hotkey(shortcut: &Shortcut) -> AppResult<(GlobalHotKeyManager, u32)> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let hotkey = shortcut.hotkey();

        manager
            .register(hotkey)
            .map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to register {:?}: {}", shortcut.code, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(code = ?shortcut.code, "Global hotkey registered");

        Ok((manager, hotkey.id()))
    }

    /// Create a handler for a previously registered hotkey.
    ///
    /// The `hotkey_id` should come from [`Self::register_hotkey`]. This
    /// struct is `Send` and can live on any thread — it only listens on the
    /// global [`GlobalHotKeyEvent`] channel.
    pub fn new(hotkey_id: u32, policy: GesturePolicy, command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self {
            hotkey_id,
            machine: GestureMachine::new(policy),
            command_tx,
        }
    }

    /// Run the hotkey handler event loop.
    ///
    /// This method blocks until a shutdown signal is received.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // Single persistent blocking task that forwards hotkey events.
        // GlobalHotKeyEvent::receiver() returns a crossbeam_channel::Receiver
        // which has blocking recv() -- zero polling, instant response, one thread.
        //
        // Shutdown: when event_rx is dropped (loop breaks), the next
        // event_tx.blocking_send() fails, breaking the blocking loop.
        // The JoinHandle is awaited with a timeout after the main loop exits.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        // Countdown tasks post their token here when they fire.
        let (timer_tx, mut timer_rx) = mpsc::channel::<u64>(8);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if event.id == self.hotkey_id {
                        self.handle_key_event(event.state, &timer_tx).await?;
                    }
                }
                Some(token) = timer_rx.recv() => {
                    self.handle_gesture_event(
                        GestureEvent::ThresholdElapsed { token },
                        &timer_tx,
                    )
                    .await?;
                }
            }
        }

        // Drop event_rx to unblock the blocking task's next blocking_send().
        // The task will break out of its loop when blocking_send returns Err.
        drop(event_rx);

        // Best-effort join: the blocking task may be stuck in recv() if no
        // hotkey event arrives after shutdown. Use a timeout to avoid hanging.
        // The task is cleaned up by the runtime on process exit regardless.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    async fn handle_key_event(
        &mut self,
        state: HotKeyState,
        timer_tx: &mpsc::Sender<u64>,
    ) -> AppResult<()> {
        let event = match state {
            HotKeyState::Pressed => GestureEvent::Pressed,
            HotKeyState::Released => GestureEvent::Released,
        };

        self.handle_gesture_event(event, timer_tx).await
    }

    #[instrument(skip(self, timer_tx))]
    async fn handle_gesture_event(
        &mut self,
        event: GestureEvent,
        timer_tx: &mpsc::Sender<u64>,
    ) -> AppResult<()> {
        let actions = self.machine.on_event(event, Instant::now());

        for action in actions {
            match action {
                GestureAction::StartSession { session_id } => {
                    self.send_command(AppCommand::StartRecording { session_id })
                        .await?;
                    info!(session_id = %session_id, "Gesture started");
                }
                GestureAction::SubmitSession {
                    session_id,
                    replay_key,
                } => {
                    self.send_command(AppCommand::FinishRecording {
                        session_id,
                        replay_key,
                    })
                    .await?;
                    info!(session_id = %session_id, "Gesture submitted");
                }
                GestureAction::CancelSession {
                    session_id,
                    replay_key,
                } => {
                    self.send_command(AppCommand::CancelRecording {
                        session_id,
                        replay_key,
                    })
                    .await?;
                    info!(session_id = %session_id, replay_key, "Gesture cancelled");
                }
                GestureAction::ArmTimer { token, delay } => {
                    // The machine invalidates tokens itself, so a late fire
                    // after the state moved on is a harmless no-op.
                    let timer_tx = timer_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = timer_tx.send(token).await;
                    });
                }
            }
        }

        Ok(())
    }

    async fn send_command(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send gesture command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
