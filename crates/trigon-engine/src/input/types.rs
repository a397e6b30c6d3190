/// Keyboard key identifier.
///
/// Only keys the demo reacts to (plus a few navigation keys) have variants.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Digit1, Digit2, Digit3, Digit4, Digit5,
    Digit6, Digit7, Digit8, Digit9,

    /// Platform key code with no variant above.
    Unknown(u32),
}

impl Key {
    /// Zero-based index of a digit key (`Digit1` → 0), if it is one.
    pub fn digit_index(self) -> Option<usize> {
        let i = match self {
            Key::Digit1 => 0,
            Key::Digit2 => 1,
            Key::Digit3 => 2,
            Key::Digit4 => 3,
            Key::Digit5 => 4,
            Key::Digit6 => 5,
            Key::Digit7 => 6,
            Key::Digit8 => 7,
            Key::Digit9 => 8,
            _ => return None,
        };
        Some(i)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Platform-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Focused(bool),

    /// Pointer position in physical pixels, relative to the surface origin.
    PointerMoved { x: f32, y: f32 },

    PointerLeft,

    Key {
        key: Key,
        state: KeyState,
        repeat: bool,
    },
}
