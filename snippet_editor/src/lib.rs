//! # Snippet Editor
//!
//! One editable snippet of a note, and the boundary rules that let it hand
//! keyboard focus (or itself) back to the note that owns it.
//!
//! ## Philosophy
//!
//! - **Isolated**: A snippet knows its surface, its config and its ref; it never sees
//!   its siblings
//! - **Intent, not action**: Crossing a boundary emits an event; the owner decides
//!   what happens
//! - **At most one intent per keystroke**: Rules are checked in a fixed order and the
//!   first match wins
//! - **Pass-through by default**: Keys that raise no intent go to the surface untouched
//!
//! ## Design
//!
//! - [`boundary`]: pure functions from key + cursor state to an intent
//! - [`SnippetEditor`]: binds a surface, a [`SnippetConfig`] and a ref
//! - [`SnippetView`]: the object-safe face a container drives

pub mod boundary;
pub mod editor;

pub use boundary::{navigation_intent, BoundaryState};
pub use editor::{SnippetConfig, SnippetEditor};

use input_types::KeyEvent;
use note_types::NoteContentSnippetType;
use snippet_ref::{SnippetEventName, SnippetRef};

/// What a snippet did with a key-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The key raised an intent and was not passed to the surface
    Intercepted(SnippetEventName),
    /// The surface handled the key normally
    Forwarded,
}

/// Snippet as seen by its container
pub trait SnippetView {
    fn snippet_ref(&self) -> &SnippetRef;

    fn kind(&self) -> NoteContentSnippetType;

    fn value(&self) -> String;

    fn set_value(&mut self, value: &str);

    /// Highlighting language; always `None` for text snippets
    fn language(&self) -> Option<&str>;

    /// True iff the cursor is on the first line
    fn is_current_position_top(&self) -> bool;

    /// True iff the cursor is on the last line
    fn is_current_position_bottom(&self) -> bool;

    /// Moves the cursor to (line 1, column 0)
    fn set_position_to_top(&mut self);

    /// Moves the cursor to (last line, column 0)
    fn set_position_to_bottom(&mut self);

    /// Runs the boundary rules for a keystroke, then lets the surface handle
    /// it if no rule matched
    fn handle_key_down(&mut self, event: &KeyEvent) -> KeyDisposition;
}
