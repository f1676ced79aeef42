//! Single-instance enforcement via a pid file.
//!
//! Two instances would both register the dictation hotkey (or fight over
//! it), so a second launch is refused while the first is alive. A stale pid
//! file left by a crash is detected with a liveness probe and reclaimed.

use crate::{AppError, AppResult};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use tracing::{debug, info, warn};

/// Holds the pid file for this process; removes it on drop.
pub struct SingleInstanceGuard {
    pid_path: PathBuf,
}

impl SingleInstanceGuard {
    /// Claim the pid file, failing if another live instance holds it.
    #[track_caller]
    pub fn acquire() -> AppResult<Self> {
        let pid_path = Self::pid_path()?;

        if let Some(pid) = Self::read_pid(&pid_path) {
            if Self::is_alive(pid) {
                return Err(AppError::AlreadyRunning {
                    pid,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            warn!(pid, "Removing stale pid file from a dead instance");
        }

        if let Some(parent) = pid_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let pid = std::process::id();
        fs::write(&pid_path, pid.to_string())?;

        info!(pid, pid_path = ?pid_path, "Instance lock acquired");

        Ok(Self { pid_path })
    }

    fn read_pid(path: &Path) -> Option<u32> {
        fs::read_to_string(path).ok()?.trim().parse().ok()
    }

    /// Whether a process with the given pid exists.
    ///
    /// On unix, signal 0 performs the permission and existence checks
    /// without delivering anything. Elsewhere the pid file is simply
    /// trusted, so a crashed instance needs its file removed by hand.
    fn is_alive(pid: u32) -> bool {
        #[cfg(unix)]
        {
            // SAFETY: kill with signal 0 only probes for existence.
            unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
        }
        #[cfg(not(unix))]
        {
            let _ = pid;
            true
        }
    }

    #[track_caller]
    fn pid_path() -> AppResult<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("com", "voicekey", "VoiceKey").ok_or_else(|| {
                AppError::ConfigError {
                    reason: "Failed to get project directories".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        // runtime_dir is unset on some platforms; fall back to the cache dir.
        let dir = proj_dirs
            .runtime_dir()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| proj_dirs.cache_dir().to_path_buf());

        Ok(dir.join("voicekey.pid"))
    }
}

impl Drop for SingleInstanceGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.pid_path) {
            debug!(error = ?e, "Failed to remove pid file");
        }
    }
}
