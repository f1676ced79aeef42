use crate::config::{
    default_hold_mode, default_restore_key, default_shortcut, default_suppress,
    default_threshold_ms,
};

use serde::{Deserialize, Serialize};

/// Hotkey and gesture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Key that drives the dictation gesture, e.g. `CapsLock` or `F2`.
    #[serde(default = "default_shortcut")]
    pub shortcut: String,
    /// Hold-to-talk when true, click-to-toggle when false.
    #[serde(default = "default_hold_mode")]
    pub hold_mode: bool,
    /// Short-press cutoff in milliseconds.
    #[serde(default = "default_threshold_ms")]
    pub threshold_ms: u64,
    /// Whether the key's original function is withheld on short presses.
    #[serde(default = "default_suppress")]
    pub suppress: bool,
    /// Whether to re-tap the key after a completed hold-mode dictation.
    #[serde(default = "default_restore_key")]
    pub restore_key: bool,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            shortcut: default_shortcut(),
            hold_mode: default_hold_mode(),
            threshold_ms: default_threshold_ms(),
            suppress: default_suppress(),
            restore_key: default_restore_key(),
        }
    }
}
