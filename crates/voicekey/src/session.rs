use std::{path::PathBuf, time::Instant};

use uuid::Uuid;

/// One in-flight dictation, from key press to delivered text.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    /// Unique session ID for log correlation.
    pub session_id: Uuid,
    /// When capture started.
    pub started_at: Instant,
    /// Where the WAV file will be written, when audio saving is enabled.
    pub audio_path: Option<PathBuf>,
}

/// App-level session bookkeeping.
///
/// The gesture machine already serializes gestures, but commands arrive over
/// a channel, so the app re-checks here that start/finish/cancel line up
/// with the session it actually has running.
#[derive(Debug, Default)]
pub struct SessionContext {
    active: Option<ActiveSession>,
}

impl SessionContext {
    /// Record a new active session. Returns false if one is already running,
    /// in which case the caller must drop the new session.
    pub fn begin(&mut self, session: ActiveSession) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(session);
        true
    }

    /// Take the active session if it matches `session_id`.
    ///
    /// A mismatch means the command is stale (e.g. a cancel raced a finish)
    /// and must be ignored.
    pub fn end(&mut self, session_id: Uuid) -> Option<ActiveSession> {
        match &self.active {
            Some(active) if active.session_id == session_id => self.active.take(),
            _ => None,
        }
    }

    /// Take the active session regardless of id.
    ///
    /// Shutdown path: whatever is running must be torn down, so the
    /// id check that protects normal finish/cancel does not apply.
    pub fn take_active(&mut self) -> Option<ActiveSession> {
        self.active.take()
    }

    /// Whether a session is currently running.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
