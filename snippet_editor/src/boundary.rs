//! Boundary detection
//!
//! Decides, from a keystroke and the cursor state observed before the surface
//! moves the caret, whether a snippet should raise a navigation intent.

use input_types::{KeyCode, KeyEvent};
use snippet_ref::SnippetEventName;
use snippet_surface::{EditingSurface, Position};

/// Cursor and content state a keystroke is judged against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryState {
    pub is_empty: bool,
    pub at_top: bool,
    pub at_bottom: bool,
}

impl BoundaryState {
    /// Captures the state of a surface
    pub fn of(surface: &impl EditingSurface) -> Self {
        let position = surface.position();
        let line_count = surface.line_count();
        Self {
            is_empty: surface.value().is_empty(),
            at_top: is_top(position),
            at_bottom: is_bottom(position, line_count),
        }
    }
}

pub fn is_top(position: Position) -> bool {
    position.line == 1
}

pub fn is_bottom(position: Position, line_count: usize) -> bool {
    position.line == line_count
}

/// Maps a key-down to at most one intent.
///
/// Precedence: Backspace on an empty snippet, then Up at the top, then Down
/// at the bottom. Arrow keys with modifiers are left to the surface.
pub fn navigation_intent(event: &KeyEvent, state: BoundaryState) -> Option<SnippetEventName> {
    if event.is_released() {
        return None;
    }

    match event.code {
        KeyCode::Backspace if state.is_empty => Some(SnippetEventName::RemoveThis),
        KeyCode::Up if event.modifiers.is_empty() && state.at_top => {
            Some(SnippetEventName::MoveFocusToPrevious)
        }
        KeyCode::Down if event.modifiers.is_empty() && state.at_bottom => {
            Some(SnippetEventName::MoveFocusToNext)
        }
        _ => None,
    }
}
