use crate::config::{default_paste, default_restore_clipboard, default_save_audio};

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Whether to automatically paste transcribed text.
    #[serde(default = "default_paste")]
    pub paste: bool,
    /// Whether to restore the previous clipboard contents after pasting.
    #[serde(default = "default_restore_clipboard")]
    pub restore_clipboard: bool,
    /// Whether to keep recorded WAV files on disk.
    #[serde(default = "default_save_audio")]
    pub save_audio: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            paste: default_paste(),
            restore_clipboard: default_restore_clipboard(),
            save_audio: default_save_audio(),
        }
    }
}
