mod asr_config;
mod audio_config;
mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod hotkey_config;

pub(crate) use {
    asr_config::AsrConfig, audio_config::AudioConfig, behaviour_config::BehaviourConfig,
    config::Config, hotkey_config::HotkeyConfig,
};

pub(crate) const DEFAULT_SHORTCUT: &str = "CapsLock";
pub(crate) const DEFAULT_HOLD_MODE: bool = true;
pub(crate) const DEFAULT_THRESHOLD_MS: u64 = 300;
pub(crate) const DEFAULT_SUPPRESS: bool = false;
pub(crate) const DEFAULT_RESTORE_KEY: bool = true;
pub(crate) const DEFAULT_PASTE: bool = true;
pub(crate) const DEFAULT_RESTORE_CLIPBOARD: bool = true;
pub(crate) const DEFAULT_SAVE_AUDIO: bool = true;

pub(crate) fn default_shortcut() -> String {
    DEFAULT_SHORTCUT.to_string()
}

pub(crate) fn default_hold_mode() -> bool {
    DEFAULT_HOLD_MODE
}

pub(crate) fn default_threshold_ms() -> u64 {
    DEFAULT_THRESHOLD_MS
}

pub(crate) fn default_suppress() -> bool {
    DEFAULT_SUPPRESS
}

pub(crate) fn default_restore_key() -> bool {
    DEFAULT_RESTORE_KEY
}

pub(crate) fn default_paste() -> bool {
    DEFAULT_PASTE
}

pub(crate) fn default_restore_clipboard() -> bool {
    DEFAULT_RESTORE_CLIPBOARD
}

pub(crate) fn default_save_audio() -> bool {
    DEFAULT_SAVE_AUDIO
}
