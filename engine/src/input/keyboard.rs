//! Keyboard Input Module
//!
//! Generic key codes and key states, decoupled from any windowing system.
//! Platform glue translates its native events into these before injecting
//! them into the input system; everything downstream (messages, console)
//! only ever sees these codes.
//!
//! Keys travel inside [`crate::message::KeyboardEvent`] payloads as raw
//! `u32` values, so every variant has a stable discriminant and a checked
//! conversion back.

/// Generic key codes for engine input, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Key {
    // Movement keys
    W = 0,
    A = 1,
    S = 2,
    D = 3,
    Space = 4,
    ShiftLeft = 5,

    // Arrow keys
    ArrowUp = 6,
    ArrowDown = 7,
    ArrowLeft = 8,
    ArrowRight = 9,

    // Control keys
    Escape = 10,
    Enter = 11,
    Backspace = 12,
    Backquote = 13,
    Tab = 14,

    Unknown = 15,
}

impl Key {
    /// Human-readable name, used by the console echo.
    pub fn label(self) -> &'static str {
        match self {
            Key::W => "W",
            Key::A => "A",
            Key::S => "S",
            Key::D => "D",
            Key::Space => "Space",
            Key::ShiftLeft => "LShift",
            Key::ArrowUp => "Up",
            Key::ArrowDown => "Down",
            Key::ArrowLeft => "Left",
            Key::ArrowRight => "Right",
            Key::Escape => "Escape",
            Key::Enter => "Enter",
            Key::Backspace => "Backspace",
            Key::Backquote => "`",
            Key::Tab => "Tab",
            Key::Unknown => "?",
        }
    }
}

impl From<Key> for u32 {
    fn from(key: Key) -> u32 {
        key as u32
    }
}

impl From<u32> for Key {
    fn from(raw: u32) -> Key {
        match raw {
            0 => Key::W,
            1 => Key::A,
            2 => Key::S,
            3 => Key::D,
            4 => Key::Space,
            5 => Key::ShiftLeft,
            6 => Key::ArrowUp,
            7 => Key::ArrowDown,
            8 => Key::ArrowLeft,
            9 => Key::ArrowRight,
            10 => Key::Escape,
            11 => Key::Enter,
            12 => Key::Backspace,
            13 => Key::Backquote,
            14 => Key::Tab,
            _ => Key::Unknown,
        }
    }
}

/// Pressed or released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum KeyState {
    Released = 0,
    Pressed = 1,
}

impl From<KeyState> for u32 {
    fn from(state: KeyState) -> u32 {
        state as u32
    }
}

impl From<u32> for KeyState {
    fn from(raw: u32) -> KeyState {
        if raw == 0 {
            KeyState::Released
        } else {
            KeyState::Pressed
        }
    }
}
