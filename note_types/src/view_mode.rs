//! Editor layout modes

use serde::{Deserialize, Serialize};

/// Which panes of the note editor are visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteEditorViewMode {
    #[default]
    ShowBoth,
    EditorOnly,
    PreviewOnly,
}

impl NoteEditorViewMode {
    pub fn shows_editor(&self) -> bool {
        matches!(self, Self::ShowBoth | Self::EditorOnly)
    }

    pub fn shows_preview(&self) -> bool {
        matches!(self, Self::ShowBoth | Self::PreviewOnly)
    }
}
