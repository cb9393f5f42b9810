//! Snippet editor binding a surface to its ref

use crate::boundary::{self, navigation_intent, BoundaryState};
use crate::{KeyDisposition, SnippetView};
use input_types::KeyEvent;
use note_types::NoteContentSnippetType;
use snippet_ref::{SnippetEvent, SnippetRef};
use snippet_surface::{EditingSurface, Position, TextSurface};
use tracing::debug;

/// Construction-time settings of a snippet, fixed for its lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetConfig {
    pub initial_value: String,
    pub language: Option<String>,
}

impl SnippetConfig {
    pub fn new(initial_value: impl Into<String>, language: Option<String>) -> Self {
        Self {
            initial_value: initial_value.into(),
            language,
        }
    }
}

/// A snippet editing its value on a surface `S`
pub struct SnippetEditor<S> {
    kind: NoteContentSnippetType,
    config: SnippetConfig,
    snippet_ref: SnippetRef,
    surface: S,
}

impl<S: EditingSurface> SnippetEditor<S> {
    /// Mounts a snippet on `surface`, loading the config's initial value into it
    pub fn new(
        kind: NoteContentSnippetType,
        config: SnippetConfig,
        snippet_ref: SnippetRef,
        mut surface: S,
    ) -> Self {
        surface.set_value(&config.initial_value);
        Self {
            kind,
            config,
            snippet_ref,
            surface,
        }
    }

    pub fn config(&self) -> &SnippetConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access to the surface, e.g. to place the caret in tests
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl SnippetEditor<TextSurface> {
    /// Text snippet on an in-memory surface
    pub fn text(config: SnippetConfig, snippet_ref: SnippetRef) -> Self {
        Self::new(
            NoteContentSnippetType::Text,
            config,
            snippet_ref,
            TextSurface::default(),
        )
    }

    /// Code snippet on an in-memory surface highlighting the config's language
    pub fn code(config: SnippetConfig, snippet_ref: SnippetRef) -> Self {
        let surface = TextSurface::new("", config.language.clone());
        Self::new(NoteContentSnippetType::Code, config, snippet_ref, surface)
    }
}

impl<S: EditingSurface> SnippetView for SnippetEditor<S> {
    fn snippet_ref(&self) -> &SnippetRef {
        &self.snippet_ref
    }

    fn kind(&self) -> NoteContentSnippetType {
        self.kind
    }

    fn value(&self) -> String {
        self.surface.value()
    }

    fn set_value(&mut self, value: &str) {
        self.surface.set_value(value);
    }

    fn language(&self) -> Option<&str> {
        match self.kind {
            NoteContentSnippetType::Code => self.surface.language(),
            NoteContentSnippetType::Text => None,
        }
    }

    fn is_current_position_top(&self) -> bool {
        boundary::is_top(self.surface.position())
    }

    fn is_current_position_bottom(&self) -> bool {
        boundary::is_bottom(self.surface.position(), self.surface.line_count())
    }

    fn set_position_to_top(&mut self) {
        self.surface.set_position(Position::top());
    }

    fn set_position_to_bottom(&mut self) {
        let last_line = self.surface.line_count();
        self.surface.set_position(Position::new(last_line, 0));
    }

    fn handle_key_down(&mut self, event: &KeyEvent) -> KeyDisposition {
        let state = BoundaryState::of(&self.surface);

        match navigation_intent(event, state) {
            Some(name) => {
                debug!(
                    source = %self.snippet_ref.id(),
                    event = %name,
                    key = %event.code,
                    modifiers = %event.modifiers,
                    "snippet boundary reached"
                );
                self.snippet_ref.emit(SnippetEvent::new(name, &self.snippet_ref));
                KeyDisposition::Intercepted(name)
            }
            None => {
                self.surface.handle_key(event);
                KeyDisposition::Forwarded
            }
        }
    }
}
