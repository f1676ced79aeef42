//! Mapping from the configured shortcut name to platform key codes.
//!
//! The same key needs two representations: a `global_hotkey` code to
//! register the hook, and an `enigo` key to re-tap it when a gesture turns
//! out to be an ordinary key press.

use crate::{AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use global_hotkey::hotkey::{Code, HotKey};

/// Both representations of the dictation key.
#[derive(Debug, Clone, Copy)]
pub struct Shortcut {
    /// Hook registration code.
    pub code: Code,
    /// Key used for replay taps.
    pub replay: enigo::Key,
}

impl Shortcut {
    /// Parse a configured key name, e.g. `CapsLock`, `F2` or `Z`.
    ///
    /// Single unmodified keys only. Modifier combinations would be consumed
    /// by the gesture machine before the modifier state can be observed, so
    /// they are rejected up front.
    #[track_caller]
    pub fn parse(name: &str) -> AppResult<Self> {
        use enigo::Key;

        let (code, replay) = match name {
            "CapsLock" => (Code::CapsLock, Key::CapsLock),
            "Space" => (Code::Space, Key::Space),
            "Tab" => (Code::Tab, Key::Tab),
            "Escape" => (Code::Escape, Key::Escape),
            "Home" => (Code::Home, Key::Home),
            "End" => (Code::End, Key::End),
            "PageUp" => (Code::PageUp, Key::PageUp),
            "PageDown" => (Code::PageDown, Key::PageDown),
            "F1" => (Code::F1, Key::F1),
            "F2" => (Code::F2, Key::F2),
            "F3" => (Code::F3, Key::F3),
            "F4" => (Code::F4, Key::F4),
            "F5" => (Code::F5, Key::F5),
            "F6" => (Code::F6, Key::F6),
            "F7" => (Code::F7, Key::F7),
            "F8" => (Code::F8, Key::F8),
            "F9" => (Code::F9, Key::F9),
            "F10" => (Code::F10, Key::F10),
            "F11" => (Code::F11, Key::F11),
            "F12" => (Code::F12, Key::F12),
            other => Self::parse_character(other)?,
        };

        Ok(Self { code, replay })
    }

    /// The hotkey to register: the bare key, no modifiers.
    pub fn hotkey(&self) -> HotKey {
        HotKey::new(None, self.code)
    }

    #[track_caller]
    fn parse_character(name: &str) -> AppResult<(Code, enigo::Key)> {
        let mut chars = name.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(Self::unknown(name));
        };

        let code = match c.to_ascii_uppercase() {
            'A' => Code::KeyA,
            'B' => Code::KeyB,
            'C' => Code::KeyC,
            'D' => Code::KeyD,
            'E' => Code::KeyE,
            'F' => Code::KeyF,
            'G' => Code::KeyG,
            'H' => Code::KeyH,
            'I' => Code::KeyI,
            'J' => Code::KeyJ,
            'K' => Code::KeyK,
            'L' => Code::KeyL,
            'M' => Code::KeyM,
            'N' => Code::KeyN,
            'O' => Code::KeyO,
            'P' => Code::KeyP,
            'Q' => Code::KeyQ,
            'R' => Code::KeyR,
            'S' => Code::KeyS,
            'T' => Code::KeyT,
            'U' => Code::KeyU,
            'V' => Code::KeyV,
            'W' => Code::KeyW,
            'X' => Code::KeyX,
            'Y' => Code::KeyY,
            'Z' => Code::KeyZ,
            '0' => Code::Digit0,
            '1' => Code::Digit1,
            '2' => Code::Digit2,
            '3' => Code::Digit3,
            '4' => Code::Digit4,
            '5' => Code::Digit5,
            '6' => Code::Digit6,
            '7' => Code::Digit7,
            '8' => Code::Digit8,
            '9' => Code::Digit9,
            _ => return Err(Self::unknown(name)),
        };

        Ok((code, enigo::Key::Unicode(c.to_ascii_lowercase())))
    }

    #[track_caller]
    fn unknown(name: &str) -> AppError {
        AppError::ConfigError {
            reason: format!(
                "Unsupported shortcut '{}'. Use a single key name such as CapsLock, F2 or Z.",
                name
            ),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
