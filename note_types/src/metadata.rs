//! Note metadata and its file data

use crate::{new_entity_id, required_nullable, NoteDataError, NoteDataResult};
use serde::{Deserialize, Serialize};

/// Metadata describing one note
///
/// `id` and `created_datetime` are fixed at creation. `note_file_name` and
/// `file_name` are transient: they are derived from where the note was found
/// and are neither written to nor read from file data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteMetadata {
    id: String,
    pub title: String,
    pub stacks: Vec<String>,
    created_datetime: i64,
    #[serde(deserialize_with = "required_nullable")]
    pub updated_datetime: Option<i64>,
    #[serde(skip)]
    pub note_file_name: Option<String>,
    #[serde(skip)]
    pub file_name: Option<String>,
}

impl NoteMetadata {
    /// Creates metadata for a brand new note with a fresh id
    pub fn new(title: impl Into<String>, stacks: Vec<String>, created_datetime: i64) -> Self {
        Self::with_id(new_entity_id(), title, stacks, created_datetime)
    }

    /// Creates metadata with a caller-supplied id
    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        stacks: Vec<String>,
        created_datetime: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            stacks,
            created_datetime,
            updated_datetime: None,
            note_file_name: None,
            file_name: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation time in epoch milliseconds
    pub fn created_datetime(&self) -> i64 {
        self.created_datetime
    }

    /// Returns a new value with the patched fields overridden
    pub fn apply_patch(&self, patch: &NoteMetadataPatch) -> NoteMetadata {
        let mut patched = self.clone();

        if let Some(title) = &patch.title {
            patched.title = title.clone();
        }
        if let Some(stacks) = &patch.stacks {
            patched.stacks = stacks.clone();
        }
        if let Some(updated) = patch.updated_datetime {
            patched.updated_datetime = updated;
        }
        if let Some(note_file_name) = &patch.note_file_name {
            patched.note_file_name = note_file_name.clone();
        }
        if let Some(file_name) = &patch.file_name {
            patched.file_name = file_name.clone();
        }

        patched
    }

    /// Serializes the persisted field set to JSON
    pub fn convert_to_file_data(&self) -> NoteDataResult<String> {
        serde_json::to_string(self).map_err(|e| NoteDataError::Serialize(e.to_string()))
    }

    /// Parses file data produced by [`NoteMetadata::convert_to_file_data`]
    pub fn parse_file_data(data: &str) -> NoteDataResult<NoteMetadata> {
        serde_json::from_str(data).map_err(|e| NoteDataError::Malformed(e.to_string()))
    }
}

/// Partial override for [`NoteMetadata`]
///
/// An unset field leaves the original untouched. Nullable fields use a nested
/// `Option` so that "set to null" is distinct from "leave alone".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteMetadataPatch {
    pub title: Option<String>,
    pub stacks: Option<Vec<String>>,
    pub updated_datetime: Option<Option<i64>>,
    pub note_file_name: Option<Option<String>>,
    pub file_name: Option<Option<String>>,
}

impl NoteMetadataPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn stacks(mut self, stacks: Vec<String>) -> Self {
        self.stacks = Some(stacks);
        self
    }

    pub fn updated_datetime(mut self, updated: Option<i64>) -> Self {
        self.updated_datetime = Some(updated);
        self
    }

    pub fn note_file_name(mut self, name: Option<String>) -> Self {
        self.note_file_name = Some(name);
        self
    }

    pub fn file_name(mut self, name: Option<String>) -> Self {
        self.file_name = Some(name);
        self
    }

    /// Returns true if applying this patch is the identity
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
