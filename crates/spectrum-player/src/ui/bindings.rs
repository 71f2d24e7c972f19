//! Keyboard and mouse bindings.

use nannou::prelude::*;

/// Actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    CycleStyle,
    TogglePlayback,
}

/// Map a key to an action
pub fn parse_key(key: Key) -> Option<Action> {
    match key {
        Key::Q => Some(Action::Quit),
        Key::Space | Key::V => Some(Action::CycleStyle),
        Key::P => Some(Action::TogglePlayback),
        _ => None,
    }
}

/// Map a mouse press to an action. Left clicks on the
/// style button cycle the style; anywhere else toggles playback.
pub fn parse_click(button: MouseButton, on_style_button: bool) -> Option<Action> {
    match button {
        MouseButton::Left if on_style_button => Some(Action::CycleStyle),
        MouseButton::Left => Some(Action::TogglePlayback),
        _ => None,
    }
}
