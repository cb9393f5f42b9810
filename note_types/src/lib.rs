//! # Note Types
//!
//! The document model shared by the note editor: note metadata, snippet-based
//! note content, and their on-disk JSON shape.
//!
//! ## Philosophy
//!
//! - **Values, not objects**: Entities are plain values; a patch produces a new value
//!   and never mutates its input
//! - **Fixed file shape**: Persisted JSON carries an explicit field set; transient
//!   fields (`fileName`, `noteFileName`) never reach disk
//! - **Tolerant reads, strict requirements**: Unknown fields are ignored, missing
//!   required fields are a data-validation failure
//! - **Order matters**: Snippet order is the reading and editing order
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A storage layer (no file I/O)
//! - A markdown renderer (the preview projection is one-way and lossy)

pub mod content;
pub mod finder;
pub mod metadata;
pub mod view_mode;

pub use content::{
    NoteContent, NoteContentPatch, NoteContentSnippet, NoteContentSnippetType,
};
pub use finder::{
    sort_metadata, NoteFinderDateFilterType, NoteFinderSortDirection, NoteFinderSortType,
};
pub use metadata::{NoteMetadata, NoteMetadataPatch};
pub use view_mode::NoteEditorViewMode;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Note data error types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NoteDataError {
    #[error("Failed to serialize note data: {0}")]
    Serialize(String),

    #[error("Malformed note data: {0}")]
    Malformed(String),
}

/// Note data result
pub type NoteDataResult<T> = Result<T, NoteDataError>;

/// Deserializes a field that must be present but may be `null`.
///
/// Plain `Option` fields are filled with `None` when missing; this keeps a
/// missing key a hard error.
pub(crate) fn required_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

pub(crate) fn new_entity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
