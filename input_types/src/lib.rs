//! # Input Types
//!
//! Keyboard event types delivered by an editing surface to a snippet.
//!
//! ## Philosophy
//!
//! - **Events, not bytes**: Input is structured events, not raw scan codes or DOM objects
//! - **Logical keys**: Only the identities the snippet protocol and a plain text
//!   surface care about are named; everything else is `Unknown`
//! - **Testable**: Events are serializable and can be injected for testing
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A keymap or shortcut resolver
//! - An IME/composition pipeline
//! - A complete input subsystem (just the types)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Input event
///
/// Currently keyboard only; pointer input never reaches the snippet core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Keyboard event
    Key(KeyEvent),
}

impl InputEvent {
    /// Creates a key event
    pub fn key(event: KeyEvent) -> Self {
        Self::Key(event)
    }

    /// Returns the key event if this is a key event
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(event) => Some(event),
        }
    }
}

/// Keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The key that changed state
    pub code: KeyCode,
    /// Modifier keys that were active
    pub modifiers: Modifiers,
    /// Event state (pressed, released, repeat)
    pub state: KeyState,
}

impl KeyEvent {
    pub fn new(code: KeyCode, modifiers: Modifiers, state: KeyState) -> Self {
        Self {
            code,
            modifiers,
            state,
        }
    }

    /// Creates a key pressed event
    pub fn pressed(code: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(code, modifiers, KeyState::Pressed)
    }

    /// Creates a key released event
    pub fn released(code: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(code, modifiers, KeyState::Released)
    }

    /// Creates a key repeat event
    pub fn repeat(code: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(code, modifiers, KeyState::Repeat)
    }

    /// Returns true for the states a `keydown` listener observes (press and auto-repeat)
    pub fn is_key_down(&self) -> bool {
        matches!(self.state, KeyState::Pressed | KeyState::Repeat)
    }

    pub fn is_released(&self) -> bool {
        self.state == KeyState::Released
    }
}

/// Key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    /// Key was pressed down
    Pressed,
    /// Key was released
    Released,
    /// Key is auto-repeating
    Repeat,
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed => write!(f, "pressed"),
            Self::Released => write!(f, "released"),
            Self::Repeat => write!(f, "repeat"),
        }
    }
}

/// Key code
///
/// Logical key identities, independent of the widget that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// Printable character
    Char(char),

    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Home,
    End,
    PageUp,
    PageDown,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    /// Unknown/unmapped key
    Unknown,
}

impl KeyCode {
    /// Maps a legacy web `keyCode` value, as reported by browser-hosted
    /// editing widgets, to a logical key.
    pub fn from_web_key_code(code: u16) -> Self {
        match code {
            8 => KeyCode::Backspace,
            9 => KeyCode::Tab,
            13 => KeyCode::Enter,
            27 => KeyCode::Escape,
            32 => KeyCode::Char(' '),
            33 => KeyCode::PageUp,
            34 => KeyCode::PageDown,
            35 => KeyCode::End,
            36 => KeyCode::Home,
            37 => KeyCode::Left,
            38 => KeyCode::Up,
            39 => KeyCode::Right,
            40 => KeyCode::Down,
            46 => KeyCode::Delete,
            48..=57 | 65..=90 => KeyCode::Char((code as u8 as char).to_ascii_lowercase()),
            _ => KeyCode::Unknown,
        }
    }

    /// Returns the character for printable keys
    pub fn as_char(&self) -> Option<char> {
        match self {
            KeyCode::Char(ch) => Some(*ch),
            _ => None,
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(ch) => write!(f, "'{}'", ch),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Modifier keys
///
/// Bitflags representing modifier key states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self { bits: 0 };
    /// Control key
    pub const CTRL: Self = Self { bits: 1 << 0 };
    /// Alt key
    pub const ALT: Self = Self { bits: 1 << 1 };
    /// Shift key
    pub const SHIFT: Self = Self { bits: 1 << 2 };
    /// Meta/Super/Command key
    pub const META: Self = Self { bits: 1 << 3 };

    pub fn none() -> Self {
        Self::NONE
    }

    /// Adds a modifier
    pub fn with(mut self, other: Modifiers) -> Self {
        self.bits |= other.bits;
        self
    }

    /// Checks if a modifier is present
    pub fn contains(&self, other: Modifiers) -> bool {
        (self.bits & other.bits) == other.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let names = [
            (Self::CTRL, "Ctrl"),
            (Self::ALT, "Alt"),
            (Self::SHIFT, "Shift"),
            (Self::META, "Meta"),
        ];
        let parts: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", parts.join("+"))
    }
}
