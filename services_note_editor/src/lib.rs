//! # Note Editor Service
//!
//! The container side of snippet editing: owns the ordered snippets of one
//! open note, routes keystrokes to the focused snippet and turns the
//! snippets' navigation intents into removals and focus moves.
//!
//! ## Philosophy
//!
//! - **Container decides**: Snippets only say what they want; the container changes
//!   the sequence
//! - **Index-based ownership**: The container addresses snippets by position and never
//!   keeps handles into their internals, so removal is a plain sequence edit
//! - **Single-threaded and synchronous**: Every intent raised during a keystroke is
//!   applied before the keystroke returns
//! - **Auditable**: Focus changes are recorded in a [`focus::FocusTrail`]
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A renderer or a finder/listing UI
//! - A persistence layer (file data goes in and out as strings)
//! - An undo/redo manager
//!
//! ## Example
//!
//! ```ignore
//! use services_note_editor::{text_surface_factory, NoteEditor, NoteEditorSettings};
//!
//! let mut editor = NoteEditor::from_content(content, text_surface_factory(), NoteEditorSettings::default());
//! editor.handle_key(&KeyEvent::pressed(KeyCode::Down, Modifiers::none()));
//! let preview = editor.preview();
//! ```

pub mod editor;
pub mod focus;
pub mod settings;

pub use editor::{text_surface_factory, NoteEditor, SnippetFactory};
pub use focus::{FocusEvent, FocusTrail};
pub use settings::{
    deserialize_settings, serialize_settings, EmptyNotePolicy, NoteEditorSettings, SettingsData,
    SettingsError,
};

use note_types::NoteDataError;
use thiserror::Error;

/// Note editor error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NoteEditorError {
    #[error("Note data error: {0}")]
    Data(#[from] NoteDataError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Snippet index {index} out of range for {len} snippets")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Note editor result
pub type NoteEditorResult<T> = Result<T, NoteEditorError>;
