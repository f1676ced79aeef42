//! Configuration management for voicekey.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, startup credential validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{AsrConfig, AudioConfig, BehaviourConfig, HotkeyConfig},
};

use std::{fs, io::Write, panic::Location, path::PathBuf};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Hotkey and gesture settings.
    #[serde(default)]
    pub hotkey: HotkeyConfig,
    /// Application behavior settings.
    #[serde(default)]
    pub behaviour: BehaviourConfig,
    /// Audio device settings.
    #[serde(default)]
    pub audio: AudioConfig,
    /// Recognition backend settings.
    #[serde(default)]
    pub asr: AsrConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    ///
    /// Note: This does NOT validate credentials. Call
    /// `validate_credentials()` at startup so a misconfigured backend
    /// aborts before the hotkey hook is installed.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            Self::create_default()
        }
    }

    /// Validate that the selected backend has usable credentials.
    ///
    /// Dictation without credentials can never produce text, so this is a
    /// startup failure rather than a per-gesture one.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate_credentials(&self) -> AppResult<()> {
        let usable = match self.asr.service {
            voicekey_core::AsrService::Volcengine => self.asr.volcengine.is_some(),
            voicekey_core::AsrService::Tencent => !self.asr.tencent.is_empty(),
        };

        if !usable {
            return Err(AppError::ConfigError {
                reason: format!(
                    "No credentials configured for the '{}' backend. Edit {:?} and restart.",
                    self.asr.service,
                    Self::config_path()?
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Save configuration to disk using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, &config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Directory where recorded WAV files are kept.
    #[track_caller]
    pub fn recordings_dir() -> AppResult<PathBuf> {
        Ok(Self::data_dir()?.join("recordings"))
    }

    /// Directory where transcript logs are written.
    #[track_caller]
    pub fn results_dir() -> AppResult<PathBuf> {
        Ok(Self::data_dir()?.join("results"))
    }

    #[track_caller]
    fn data_dir() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "voicekey", "VoiceKey").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn create_default() -> AppResult<Self> {
        let config = Config::default();

        config.save()?;

        warn!(
            config_path = ?Self::config_path()?,
            "Default config created. Backend credentials must be added before dictating."
        );

        Ok(config)
    }
}
