//! Snippet-based note content

use crate::{new_entity_id, NoteDataError, NoteDataResult};
use serde::{Deserialize, Serialize};
use std::fmt;

const FENCE: &str = "```";

/// Snippet kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteContentSnippetType {
    /// Code block, optionally tagged with a language
    Code,
    /// Free text paragraph
    Text,
}

impl fmt::Display for NoteContentSnippetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code => write!(f, "code"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// One independently editable unit of a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteContentSnippet {
    pub id: String,
    #[serde(rename = "type")]
    pub snippet_type: NoteContentSnippetType,
    pub value: String,
    /// Only meaningful for code snippets; `None` means plain code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl NoteContentSnippet {
    /// Creates a text snippet with a fresh id
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            snippet_type: NoteContentSnippetType::Text,
            value: value.into(),
            language: None,
            file_name: None,
        }
    }

    /// Creates a code snippet with a fresh id
    pub fn code(value: impl Into<String>, language: Option<String>) -> Self {
        Self {
            id: new_entity_id(),
            snippet_type: NoteContentSnippetType::Code,
            value: value.into(),
            language,
            file_name: None,
        }
    }

    /// Language that applies to this snippet; text snippets never have one
    pub fn effective_language(&self) -> Option<&str> {
        match self.snippet_type {
            NoteContentSnippetType::Code => self.language.as_deref(),
            NoteContentSnippetType::Text => None,
        }
    }

    fn write_preview(&self, out: &mut String) {
        match self.snippet_type {
            NoteContentSnippetType::Text => out.push_str(&self.value),
            NoteContentSnippetType::Code => {
                out.push_str(FENCE);
                out.push_str(self.effective_language().unwrap_or(""));
                out.push('\n');
                out.push_str(&self.value);
                out.push('\n');
                out.push_str(FENCE);
            }
        }
        out.push_str("\n\n");
    }
}

/// The ordered snippets of one note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteContent {
    note_id: String,
    pub title: String,
    pub stacks: Vec<String>,
    pub snippets: Vec<NoteContentSnippet>,
    #[serde(skip)]
    pub note_file_name: Option<String>,
    #[serde(skip)]
    pub file_name: Option<String>,
}

impl NoteContent {
    pub fn new(
        note_id: impl Into<String>,
        title: impl Into<String>,
        stacks: Vec<String>,
        snippets: Vec<NoteContentSnippet>,
    ) -> Self {
        Self {
            note_id: note_id.into(),
            title: title.into(),
            stacks,
            snippets,
            note_file_name: None,
            file_name: None,
        }
    }

    /// Id of the [`crate::NoteMetadata`] this content belongs to
    pub fn note_id(&self) -> &str {
        &self.note_id
    }

    /// Returns a new value with the patched fields overridden
    pub fn apply_patch(&self, patch: &NoteContentPatch) -> NoteContent {
        let mut patched = self.clone();

        if let Some(title) = &patch.title {
            patched.title = title.clone();
        }
        if let Some(stacks) = &patch.stacks {
            patched.stacks = stacks.clone();
        }
        if let Some(snippets) = &patch.snippets {
            patched.snippets = snippets.clone();
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

    /// Parses file data produced by [`NoteContent::convert_to_file_data`]
    pub fn parse_file_data(data: &str) -> NoteDataResult<NoteContent> {
        serde_json::from_str(data).map_err(|e| NoteDataError::Malformed(e.to_string()))
    }

    /// Flattens the snippets into a single markdown-like string.
    ///
    /// Text contributes its raw value, code a fenced block; every snippet is
    /// followed by a blank line. There is no inverse.
    pub fn convert_to_preview_string(&self) -> String {
        self.snippets.iter().fold(String::new(), |mut out, snippet| {
            snippet.write_preview(&mut out);
            out
        })
    }
}

/// Partial override for [`NoteContent`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteContentPatch {
    pub title: Option<String>,
    pub stacks: Option<Vec<String>>,
    pub snippets: Option<Vec<NoteContentSnippet>>,
    pub note_file_name: Option<Option<String>>,
    pub file_name: Option<Option<String>>,
}

impl NoteContentPatch {
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

    pub fn snippets(mut self, snippets: Vec<NoteContentSnippet>) -> Self {
        self.snippets = Some(snippets);
        self
    }

    pub fn file_name(mut self, name: Option<String>) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn note_file_name(mut self, name: Option<String>) -> Self {
        self.note_file_name = Some(name);
        self
    }
}
