use crate::{
    AppCommand, AppResult, OutputHandler, TranscriptLog, TrayCommand, TrayIconState,
    config::Config,
    session::{ActiveSession, SessionContext},
};

use std::{path::PathBuf, sync::Arc, time::Instant};

use tao::event_loop::EventLoopProxy;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{error, info, instrument, warn};
use tray_icon::menu::MenuEvent;
use uuid::Uuid;
use voicekey_core::{AsrDispatcher, AudioRecorder, RecognitionRequest};

/// Main application state.
///
/// Runs on the async runtime thread. Communicates tray icon updates
/// back to the main thread via `tray_proxy` because `TrayIcon` is `!Send`
/// and must remain on the UI thread.
pub struct App {
    pub(crate) recorder: Arc<Mutex<AudioRecorder>>,
    pub(crate) dispatcher: Arc<AsrDispatcher>,
    pub(crate) output_handler: Arc<Mutex<OutputHandler>>,
    pub(crate) transcript_log: Arc<TranscriptLog>,
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) config: Arc<Mutex<Config>>,
    pub(crate) session: SessionContext,
    pub(crate) replay_key: enigo::Key,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) volcengine_menu_id: tray_icon::menu::MenuId,
    pub(crate) tencent_menu_id: tray_icon::menu::MenuId,
    pub(crate) exit_menu_id: tray_icon::menu::MenuId,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("VoiceKey starting");

        // Tray menu events are forwarded by one persistent blocking task:
        // MenuEvent::receiver() is a crossbeam Receiver with a blocking
        // recv(), so no polling is needed. Dropping tray_event_rx after the
        // main loop breaks makes the next blocking_send() fail, which ends
        // the forwarder.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    if let Err(e) = self.handle_tray_event(event).await {
                        error!(error = ?e, "Failed to handle tray event");
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AppCommand::StartRecording { session_id } => {
                            if let Err(e) = self.start_recording(session_id).await {
                                error!(session_id = %session_id, error = ?e, "Failed to start recording");
                            }
                        }
                        AppCommand::FinishRecording { session_id, replay_key } => {
                            self.finish_recording(session_id, replay_key).await;
                        }
                        AppCommand::CancelRecording { session_id, replay_key } => {
                            self.cancel_recording(session_id, replay_key).await;
                        }
                        AppCommand::SwitchBackend { service } => {
                            if let Err(e) = self.switch_backend(service).await {
                                error!(%service, error = ?e, "Failed to switch backend");
                            }
                        }
                        AppCommand::Shutdown => {
                            info!("Shutdown requested");
                            self.discard_active_session().await;
                            break;
                        }
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        drop(tray_event_rx);

        match tokio::time::timeout(std::time::Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        let _ = self.shutdown_tx.send(true);
        // Harmless duplicate when shutdown came from the tray menu; required
        // when it came from a signal, or the UI event loop would keep running.
        let _ = self.tray_proxy.send_event(TrayCommand::Shutdown);
        info!("VoiceKey shut down successfully");

        Ok(())
    }

    /// Start capturing audio for a new session.
    #[instrument(skip(self))]
    async fn start_recording(&mut self, session_id: Uuid) -> AppResult<()> {
        if self.session.is_active() {
            // Commands are serialized through one channel, so this only
            // happens if a gesture raced a still-draining session.
            warn!(session_id = %session_id, "Session already active, ignoring start");
            return Ok(());
        }

        let audio_path = {
            let cfg = self.config.lock().await;
            if cfg.behaviour.save_audio {
                Some(Self::recording_path(session_id)?)
            } else {
                None
            }
        };

        let mut recorder = self.recorder.lock().await;
        recorder.start()?;
        drop(recorder);

        self.session.begin(ActiveSession {
            session_id,
            started_at: Instant::now(),
            audio_path,
        });

        let _ = self
            .tray_proxy
            .send_event(TrayCommand::SetState(TrayIconState::Recording));

        info!(session_id = %session_id, "Recording started");

        Ok(())
    }

    /// Stop capturing and hand the audio to recognition in the background.
    #[instrument(skip(self))]
    async fn finish_recording(&mut self, session_id: Uuid, replay_key: bool) {
        let Some(session) = self.session.end(session_id) else {
            warn!(session_id = %session_id, "No matching session, ignoring finish");
            return;
        };

        let _ = self
            .tray_proxy
            .send_event(TrayCommand::SetState(TrayIconState::Processing));

        let artifact = {
            let mut recorder = self.recorder.lock().await;
            match recorder.stop(session.audio_path.as_deref()) {
                Ok(a) => a,
                Err(e) => {
                    error!(session_id = %session_id, error = ?e, "Failed to stop recording");
                    self.set_tray_idle();
                    return;
                }
            }
        };

        if replay_key {
            self.replay_dictation_key(session_id).await;
        }

        let Some(artifact) = artifact else {
            warn!(session_id = %session_id, "No audio captured, nothing to recognize");
            self.set_tray_idle();
            return;
        };

        let duration = session.started_at.elapsed();
        info!(
            session_id = %session_id,
            duration_ms = duration.as_millis(),
            "Recording stopped"
        );

        let dispatcher = Arc::clone(&self.dispatcher);
        let output_handler = Arc::clone(&self.output_handler);
        let transcript_log = Arc::clone(&self.transcript_log);
        let config = Arc::clone(&self.config);
        let tray_proxy = self.tray_proxy.clone();

        tokio::task::spawn(async move {
            let start = std::time::Instant::now();

            let request = RecognitionRequest::from_artifact(artifact);
            let result = match dispatcher.recognize(request).await {
                Ok(r) => r,
                Err(e) => {
                    error!(session_id = %session_id, error = ?e, "Recognition failed");
                    let _ = tray_proxy.send_event(TrayCommand::SetState(TrayIconState::Idle));
                    return;
                }
            };

            let duration = start.elapsed();
            info!(
                session_id = %session_id,
                backend = %result.backend,
                duration_ms = duration.as_millis(),
                text_len = result.text.len(),
                "Recognition complete"
            );

            if result.text.is_empty() {
                warn!(session_id = %session_id, "Backend heard nothing, skipping delivery");
                let _ = tray_proxy.send_event(TrayCommand::SetState(TrayIconState::Idle));
                return;
            }

            let behaviour = {
                let cfg = config.lock().await;
                cfg.behaviour.clone()
            };

            let mut output = output_handler.lock().await;
            if let Err(e) = output.deliver(&result.text, &behaviour).await {
                error!(session_id = %session_id, error = ?e, "Failed to output text");
            }
            drop(output);

            // History is best-effort; a full disk must not break dictation.
            if let Err(e) = transcript_log.append(&result) {
                warn!(session_id = %session_id, error = ?e, "Failed to append transcript");
            }

            let _ = tray_proxy.send_event(TrayCommand::SetState(TrayIconState::Idle));
        });
    }

    /// Stop capturing and discard the audio.
    #[instrument(skip(self))]
    async fn cancel_recording(&mut self, session_id: Uuid, replay_key: bool) {
        let Some(_session) = self.session.end(session_id) else {
            warn!(session_id = %session_id, "No matching session, ignoring cancel");
            return;
        };

        {
            let mut recorder = self.recorder.lock().await;
            if let Err(e) = recorder.discard() {
                error!(session_id = %session_id, error = ?e, "Failed to discard recording");
            }
        }

        if replay_key {
            self.replay_dictation_key(session_id).await;
        }

        self.set_tray_idle();

        info!(session_id = %session_id, "Recording cancelled");
    }

    /// Switch the recognition backend, persisting the choice on success.
    #[instrument(skip(self))]
    async fn switch_backend(&mut self, service: voicekey_core::AsrService) -> AppResult<()> {
        let mut cfg = self.config.lock().await;

        // Reload first: a backend without credentials must not be persisted.
        self.dispatcher.reload(service, &cfg.asr.credentials()).await?;

        cfg.asr.service = service;
        cfg.save()?;
        drop(cfg);

        let _ = self.tray_proxy.send_event(TrayCommand::SetBackend(service));

        info!(%service, "Backend switched");

        Ok(())
    }

    /// Handle tray menu events.
    #[instrument(skip(self))]
    async fn handle_tray_event(&mut self, event: MenuEvent) -> AppResult<()> {
        let event_id = &event.id;

        if *event_id == self.volcengine_menu_id {
            self.send_switch(voicekey_core::AsrService::Volcengine).await;
        } else if *event_id == self.tencent_menu_id {
            self.send_switch(voicekey_core::AsrService::Tencent).await;
        } else if *event_id == self.exit_menu_id {
            info!("Exit requested from tray menu");
            let _ = self.tray_proxy.send_event(TrayCommand::Shutdown);
            if let Err(e) = self.command_tx.send(AppCommand::Shutdown).await {
                error!(error = ?e, "Failed to send shutdown command");
            }
        }

        Ok(())
    }

    /// Queue a backend switch behind any gesture commands already in flight.
    async fn send_switch(&self, service: voicekey_core::AsrService) {
        if let Err(e) = self
            .command_tx
            .send(AppCommand::SwitchBackend { service })
            .await
        {
            error!(%service, error = ?e, "Failed to queue backend switch");
        }
    }

    /// Tear down any in-flight capture before the loop exits.
    ///
    /// The main thread exits the process on `TrayCommand::Shutdown`, so the
    /// device must be released here rather than left to a racing drop.
    async fn discard_active_session(&mut self) {
        let Some(session) = self.session.take_active() else {
            return;
        };

        let mut recorder = self.recorder.lock().await;
        if let Err(e) = recorder.discard() {
            error!(
                session_id = %session.session_id,
                error = ?e,
                "Failed to discard recording during shutdown"
            );
        }

        info!(session_id = %session.session_id, "In-flight recording discarded for shutdown");
    }

    async fn replay_dictation_key(&self, session_id: Uuid) {
        let output = self.output_handler.lock().await;
        if let Err(e) = output.replay_key(self.replay_key).await {
            warn!(session_id = %session_id, error = ?e, "Failed to replay dictation key");
        }
    }

    fn set_tray_idle(&self) {
        let _ = self
            .tray_proxy
            .send_event(TrayCommand::SetState(TrayIconState::Idle));
    }

    fn recording_path(session_id: Uuid) -> AppResult<PathBuf> {
        Ok(Config::recordings_dir()?.join(format!("{}.wav", session_id)))
    }
}
