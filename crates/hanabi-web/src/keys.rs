// Keyboard bindings for the show. Kept free of web APIs so the mapping can be
// tested on the host.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    TogglePlayback,
    AddRandom,
    AddStaggeredBurst,
    DeleteLast,
    Clear,
    ToggleLooping,
    ToggleFreeze,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        " " => Some(KeyAction::TogglePlayback),
        "a" | "A" => Some(KeyAction::AddRandom),
        "b" | "B" => Some(KeyAction::AddStaggeredBurst),
        "Backspace" => Some(KeyAction::DeleteLast),
        "c" | "C" => Some(KeyAction::Clear),
        "l" | "L" => Some(KeyAction::ToggleLooping),
        "f" | "F" => Some(KeyAction::ToggleFreeze),
        _ => None,
    }
}

/// Whether the browser's default handling should be suppressed (page scroll
/// on Space, history navigation on Backspace).
#[inline]
pub fn suppresses_default(action: KeyAction) -> bool {
    matches!(action, KeyAction::TogglePlayback | KeyAction::DeleteLast)
}
