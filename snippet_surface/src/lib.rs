//! # Snippet Surface
//!
//! The editing-surface capability a snippet is built on.
//!
//! ## Philosophy
//!
//! - **Contract, not widget**: A snippet only needs value get/set, cursor get/set,
//!   a line count and keystrokes; the widget behind it is someone else's problem
//! - **Total queries**: Cursor and line queries never fail on a well-formed surface
//! - **Deterministic**: [`TextSurface`] is a plain in-memory implementation, so the
//!   same key trace always yields the same value and cursor
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A renderer or syntax highlighter
//! - An undo/redo history

pub mod buffer;
pub mod text_surface;

pub use buffer::{Position, TextBuffer};
pub use text_surface::TextSurface;

use input_types::KeyEvent;

/// Editing surface adapter
///
/// Lines are 1-based, columns 0-based. Implementations clamp positions passed
/// to [`EditingSurface::set_position`] into the document.
pub trait EditingSurface {
    /// Current document text
    fn value(&self) -> String;

    /// Replaces the document text; the cursor returns to the top
    fn set_value(&mut self, value: &str);

    /// Language the surface highlights with, if any
    fn language(&self) -> Option<&str>;

    fn position(&self) -> Position;

    fn set_position(&mut self, position: Position);

    /// Number of lines in the current value (at least 1)
    fn line_count(&self) -> usize;

    /// Default handling of a keystroke nobody intercepted
    fn handle_key(&mut self, event: &KeyEvent);
}
