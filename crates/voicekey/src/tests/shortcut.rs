use crate::{AppError, Shortcut};

use global_hotkey::hotkey::Code;

/// WHAT: Named keys parse to their hook codes
/// WHY: The default config ships CapsLock and must register correctly
#[test]
fn given_named_keys_when_parsing_then_codes_match() {
    // Given/When: Parsing the common key names
    let caps = Shortcut::parse("CapsLock");
    let f2 = Shortcut::parse("F2");
    let space = Shortcut::parse("Space");

    // Then: Each maps to its code
    assert!(matches!(caps, Ok(Shortcut { code: Code::CapsLock, .. })));
    assert!(matches!(f2, Ok(Shortcut { code: Code::F2, .. })));
    assert!(matches!(space, Ok(Shortcut { code: Code::Space, .. })));
}

/// WHAT: Single characters parse case-insensitively
/// WHY: Users write "z" or "Z" interchangeably in the config
#[test]
fn given_letter_and_digit_when_parsing_then_codes_match() {
    // Given/When: A letter in both cases and a digit
    let lower = Shortcut::parse("z");
    let upper = Shortcut::parse("Z");
    let digit = Shortcut::parse("7");

    // Then: Both letter spellings map to KeyZ, the digit to Digit7
    assert!(matches!(lower, Ok(Shortcut { code: Code::KeyZ, .. })));
    assert!(matches!(upper, Ok(Shortcut { code: Code::KeyZ, .. })));
    assert!(matches!(digit, Ok(Shortcut { code: Code::Digit7, .. })));
}

/// WHAT: Unknown names and modifier combos are rejected
/// WHY: A silent fallback would register the wrong key
#[test]
fn given_unsupported_shortcuts_when_parsing_then_config_error() {
    // Given/When: Names the gesture machine cannot drive
    let unknown = Shortcut::parse("HyperKey");
    let combo = Shortcut::parse("Ctrl+Space");

    // Then: Both fail with a configuration error
    assert!(matches!(unknown, Err(AppError::ConfigError { .. })));
    assert!(matches!(combo, Err(AppError::ConfigError { .. })));
}
