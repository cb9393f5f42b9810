//! Note editor settings and their persisted form
//!
//! Settings are plain serde values with a default for every field, stored as
//! versioned JSON so older files can be rejected instead of misread.

use note_types::NoteEditorViewMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the editor does when its last snippet is removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmptyNotePolicy {
    /// Leave the note with no snippets and no focus
    KeepEmpty,
    /// Insert one blank text snippet and focus it
    #[default]
    InsertBlankText,
}

/// Behavior knobs of a [`crate::NoteEditor`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteEditorSettings {
    pub empty_note_policy: EmptyNotePolicy,
    pub view_mode: NoteEditorViewMode,
    /// After a removal hands focus to the snippet above, put its cursor on its last line
    pub cursor_to_bottom_on_remove: bool,
}

impl Default for NoteEditorSettings {
    fn default() -> Self {
        Self {
            empty_note_policy: EmptyNotePolicy::default(),
            view_mode: NoteEditorViewMode::default(),
            cursor_to_bottom_on_remove: true,
        }
    }
}

/// Serializable envelope for settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsData {
    /// Version of the settings format
    pub version: u32,
    pub settings: NoteEditorSettings,
}

impl SettingsData {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(settings: NoteEditorSettings) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            settings,
        }
    }
}

/// Settings persistence errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),

    #[error("Failed to deserialize settings: {0}")]
    Deserialize(String),

    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Serializes settings to JSON bytes
pub fn serialize_settings(settings: &NoteEditorSettings) -> SettingsResult<Vec<u8>> {
    serde_json::to_vec_pretty(&SettingsData::new(settings.clone()))
        .map_err(|e| SettingsError::Serialize(e.to_string()))
}

/// Deserializes settings from JSON bytes
pub fn deserialize_settings(bytes: &[u8]) -> SettingsResult<NoteEditorSettings> {
    let data: SettingsData =
        serde_json::from_slice(bytes).map_err(|e| SettingsError::Deserialize(e.to_string()))?;

    if data.version != SettingsData::CURRENT_VERSION {
        return Err(SettingsError::UnsupportedVersion(data.version));
    }

    Ok(data.settings)
}
