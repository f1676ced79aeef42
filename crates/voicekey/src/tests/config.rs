use crate::config::{
    Config, DEFAULT_HOLD_MODE, DEFAULT_PASTE, DEFAULT_RESTORE_CLIPBOARD, DEFAULT_RESTORE_KEY,
    DEFAULT_SAVE_AUDIO, DEFAULT_SHORTCUT, DEFAULT_SUPPRESS, DEFAULT_THRESHOLD_MS,
};

use voicekey_core::AsrService;

/// WHAT: An empty TOML document yields the documented defaults
/// WHY: Every field must be optional so upgrades never break old configs
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_toml_when_parsing_then_defaults_applied() {
    // Given/When: Parsing an empty document
    let config: Config = toml::from_str("").unwrap();

    // Then: All defaults hold
    assert_eq!(config.hotkey.shortcut, DEFAULT_SHORTCUT);
    assert_eq!(config.hotkey.hold_mode, DEFAULT_HOLD_MODE);
    assert_eq!(config.hotkey.threshold_ms, DEFAULT_THRESHOLD_MS);
    assert_eq!(config.hotkey.suppress, DEFAULT_SUPPRESS);
    assert_eq!(config.hotkey.restore_key, DEFAULT_RESTORE_KEY);
    assert_eq!(config.behaviour.paste, DEFAULT_PASTE);
    assert_eq!(config.behaviour.restore_clipboard, DEFAULT_RESTORE_CLIPBOARD);
    assert_eq!(config.behaviour.save_audio, DEFAULT_SAVE_AUDIO);
    assert!(config.audio.selected_device.is_none());
    assert_eq!(config.asr.service, AsrService::Volcengine);
    assert!(config.asr.volcengine.is_none());
    assert!(config.asr.tencent.is_empty());
}

/// WHAT: A partial document keeps defaults for omitted fields
/// WHY: Users edit only the keys they care about
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_toml_when_parsing_then_other_fields_defaulted() {
    // Given: Only the hotkey mode and backend are set
    let toml = r#"
        [hotkey]
        shortcut = "F2"
        hold_mode = false

        [asr]
        service = "tencent"

        [[asr.tencent]]
        secret_id = "id"
        secret_key = "key"
    "#;

    // When: Parsing
    let config: Config = toml::from_str(toml).unwrap();

    // Then: Set fields stick, the rest default
    assert_eq!(config.hotkey.shortcut, "F2");
    assert!(!config.hotkey.hold_mode);
    assert_eq!(config.hotkey.threshold_ms, DEFAULT_THRESHOLD_MS);
    assert_eq!(config.asr.service, AsrService::Tencent);
    assert_eq!(config.asr.tencent.len(), 1);
    assert_eq!(config.asr.tencent[0].region, "ap-shanghai");
    assert_eq!(config.behaviour.paste, DEFAULT_PASTE);
}

/// WHAT: Credential validation fails when the selected backend has none
/// WHY: Startup must refuse a configuration that can never dictate
#[test]
#[allow(clippy::unwrap_used)]
fn given_selected_backend_without_credentials_when_validating_then_error() {
    // Given: Tencent selected, no credential sets
    let config: Config = toml::from_str("[asr]\nservice = \"tencent\"").unwrap();

    // When/Then: Validation fails
    assert!(config.validate_credentials().is_err());
}

/// WHAT: Credential validation passes with the right credentials present
/// WHY: The happy path must not be blocked by the other backend's absence
#[test]
#[allow(clippy::unwrap_used)]
fn given_credentials_for_selected_backend_when_validating_then_ok() {
    // Given: Volcengine selected and configured, Tencent absent
    let toml = r#"
        [asr]
        service = "volcengine"

        [asr.volcengine]
        app_key = "app"
        access_key = "key"
    "#;
    let config: Config = toml::from_str(toml).unwrap();

    // When/Then: Validation passes
    assert!(config.validate_credentials().is_ok());
}

/// WHAT: A config round-trips through TOML serialization
/// WHY: save() writes what load() must read back
#[test]
#[allow(clippy::unwrap_used)]
fn given_config_when_serialized_then_parses_back_identically() {
    // Given: A non-default config
    let mut config = Config::default();
    config.hotkey.shortcut = "F9".to_string();
    config.hotkey.threshold_ms = 450;
    config.behaviour.save_audio = false;
    config.audio.selected_device = Some("USB Microphone".to_string());

    // When: Serializing and parsing back
    let serialized = toml::to_string_pretty(&config).unwrap();
    let parsed: Config = toml::from_str(&serialized).unwrap();

    // Then: The fields survive
    assert_eq!(parsed.hotkey.shortcut, "F9");
    assert_eq!(parsed.hotkey.threshold_ms, 450);
    assert!(!parsed.behaviour.save_audio);
    assert_eq!(parsed.audio.selected_device.as_deref(), Some("USB Microphone"));
}
