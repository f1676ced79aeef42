//! VoiceKey: push-to-talk dictation with a global hotkey and cloud recognition.

mod app;
mod app_command;
mod config;
mod error;
mod gesture;
mod hotkey_handler;
mod output_handler;
mod paste_guard;
mod session;
mod shortcut;
mod single_instance;
#[cfg(test)]
mod tests;
mod transcript_log;
mod tray_command;
mod tray_icon_state;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
    output_handler::OutputHandler,
    paste_guard::PasteKeyGuard,
    shortcut::Shortcut,
    single_instance::SingleInstanceGuard,
    transcript_log::TranscriptLog,
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::TrayManager,
};

use crate::{config::Config, gesture::GesturePolicy, session::SessionContext};

use std::{sync::Arc, time::Duration};

use global_hotkey::GlobalHotKeyManager;
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy},
};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{error, info};
use voicekey_core::{AsrDispatcher, AudioRecorder};

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("voicekey=debug,voicekey_core=debug")
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate_credentials() {
        error!("Credential validation failed: {:?}", e);
        std::process::exit(1);
    }

    let shortcut = match Shortcut::parse(&config.hotkey.shortcut) {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid shortcut: {:?}", e);
            std::process::exit(1);
        }
    };

    // Refuse to start a second instance: it would fight over the hotkey.
    let instance_guard = match SingleInstanceGuard::acquire() {
        Ok(guard) => guard,
        Err(e) => {
            error!("{:?}", e);
            std::process::exit(1);
        }
    };

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new(config.asr.service) {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    let mut config = Some(config);

    // Persists across event loop iterations — dropping it unregisters the hotkey.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        // Keep the guard alive for the whole event loop. tao exits the
        // process directly, so the pid file may outlive us; the next start
        // reclaims it via the liveness probe.
        let _ = &instance_guard;

        match event {
            Event::UserEvent(cmd) => {
                match cmd {
                    TrayCommand::SetState(state) => {
                        if let Err(e) = tray_manager.update_state(state) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                    TrayCommand::SetBackend(service) => {
                        tray_manager.update_backend(service);
                    }
                    TrayCommand::Shutdown => {
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
                return;
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let Some(config) = config.take() else {
                    return;
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                // Register hotkey on the main thread — tao's event loop pumps
                // the Windows messages needed for WM_HOTKEY delivery.
                // hotkey_manager is stored in the closure's captured state so it
                // lives for the entire app lifetime.
                let (manager, hotkey_id) = match HotkeyHandler::register_hotkey(&shortcut) {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Failed to register hotkey: {:?}", e);
                        std::process::exit(1);
                    }
                };
                hotkey_manager = Some(manager);

                let tray_proxy = tray_proxy.clone();
                let volcengine_menu_id = tray_manager.volcengine_item_id().clone();
                let tencent_menu_id = tray_manager.tencent_item_id().clone();
                let exit_menu_id = tray_manager.exit_item_id().clone();

                // Spawn tokio runtime on separate thread.
                // TrayManager and hotkey_manager stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async move {
                        if let Err(e) = run_runtime(
                            config,
                            shortcut,
                            hotkey_id,
                            tray_proxy,
                            volcengine_menu_id,
                            tencent_menu_id,
                            exit_menu_id,
                        )
                        .await
                        {
                            error!(error = ?e, "Runtime error");
                            std::process::exit(1);
                        }
                    });
                });
            }
            _ => {}
        }

        // Keep hotkey_manager alive in the closure for the app's lifetime.
        let _ = &hotkey_manager;
    });
}

/// Build the async side of the app and run it to completion.
#[allow(clippy::too_many_arguments)]
async fn run_runtime(
    config: Config,
    shortcut: Shortcut,
    hotkey_id: u32,
    tray_proxy: EventLoopProxy<TrayCommand>,
    volcengine_menu_id: tray_icon::menu::MenuId,
    tencent_menu_id: tray_icon::menu::MenuId,
    exit_menu_id: tray_icon::menu::MenuId,
) -> AppResult<()> {
    let recorder = Arc::new(Mutex::new(AudioRecorder::new(
        config.audio.selected_device.as_deref(),
    )?));

    let dispatcher = Arc::new(AsrDispatcher::new(
        config.asr.service,
        &config.asr.credentials(),
    )?);

    let output_handler = Arc::new(Mutex::new(OutputHandler::new()?));
    let transcript_log = Arc::new(TranscriptLog::new(Config::results_dir()?));

    let policy = GesturePolicy {
        hold_mode: config.hotkey.hold_mode,
        threshold: Duration::from_millis(config.hotkey.threshold_ms),
        suppress: config.hotkey.suppress,
        restore_key: config.hotkey.restore_key,
    };

    let config = Arc::new(Mutex::new(config));
    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    spawn_signal_listener(command_tx.clone());

    let hotkey_handler = HotkeyHandler::new(hotkey_id, policy, command_tx.clone());

    let app = App {
        recorder,
        dispatcher,
        output_handler,
        transcript_log,
        tray_proxy,
        config,
        session: SessionContext::default(),
        replay_key: shortcut.replay,
        command_tx,
        command_rx,
        shutdown_tx,
        volcengine_menu_id,
        tencent_menu_id,
        exit_menu_id,
    };

    let (hotkey_result, app_result) =
        tokio::join!(hotkey_handler.run(shutdown_rx), app.run());

    hotkey_result?;
    app_result?;

    Ok(())
}

/// Forward SIGINT/SIGTERM (or Ctrl-C elsewhere) into an orderly shutdown.
fn spawn_signal_listener(command_tx: mpsc::Sender<AppCommand>) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(s) => s,
                Err(e) => {
                    error!(error = ?e, "Failed to install SIGINT handler");
                    return;
                }
            };
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    error!(error = ?e, "Failed to install SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = sigint.recv() => info!("SIGINT received"),
                _ = sigterm.recv() => info!("SIGTERM received"),
            }
        }
        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = ?e, "Failed to wait for Ctrl-C");
                return;
            }
            info!("Ctrl-C received");
        }

        let _ = command_tx.send(AppCommand::Shutdown).await;
    });
}
