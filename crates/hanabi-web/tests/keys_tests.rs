// Host-side tests for the keyboard bindings.
// The web crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod keys {
    include!("../src/keys.rs");
}

use keys::*;

#[test]
fn every_documented_key_is_bound() {
    assert_eq!(action_for_key(" "), Some(KeyAction::TogglePlayback));
    assert_eq!(action_for_key("a"), Some(KeyAction::AddRandom));
    assert_eq!(action_for_key("B"), Some(KeyAction::AddStaggeredBurst));
    assert_eq!(action_for_key("Backspace"), Some(KeyAction::DeleteLast));
    assert_eq!(action_for_key("c"), Some(KeyAction::Clear));
    assert_eq!(action_for_key("L"), Some(KeyAction::ToggleLooping));
    assert_eq!(action_for_key("f"), Some(KeyAction::ToggleFreeze));
}

#[test]
fn letters_bind_in_both_cases() {
    for (lower, upper) in [("a", "A"), ("b", "B"), ("c", "C"), ("l", "L"), ("f", "F")] {
        assert_eq!(action_for_key(lower), action_for_key(upper));
    }
}

#[test]
fn unbound_keys_do_nothing() {
    for key in ["", "x", "Enter", "Delete", "Spacebar", "1", "ArrowUp"] {
        assert_eq!(action_for_key(key), None, "{key:?}");
    }
}

#[test]
fn only_browser_shortcuts_suppress_default() {
    assert!(suppresses_default(KeyAction::TogglePlayback));
    assert!(suppresses_default(KeyAction::DeleteLast));
    assert!(!suppresses_default(KeyAction::AddRandom));
    assert!(!suppresses_default(KeyAction::ToggleFreeze));
}
