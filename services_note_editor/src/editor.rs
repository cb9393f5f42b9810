//! The snippet container of one open note

use crate::focus::{FocusEvent, FocusTrail};
use crate::settings::{deserialize_settings, EmptyNotePolicy, NoteEditorSettings};
use crate::{NoteEditorError, NoteEditorResult};
use input_types::{InputEvent, KeyEvent};
use note_types::{NoteContent, NoteContentPatch, NoteContentSnippet, NoteContentSnippetType};
use snippet_editor::{KeyDisposition, SnippetConfig, SnippetEditor, SnippetView};
use snippet_ref::{SnippetEvent, SnippetEventName, SnippetRef, SnippetRefId, Subscription};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// Builds the view for one snippet from its stored form, config and ref
pub type SnippetFactory =
    Box<dyn Fn(&NoteContentSnippet, SnippetConfig, SnippetRef) -> Box<dyn SnippetView>>;

/// Factory mounting every snippet on an in-memory [`snippet_surface::TextSurface`]
pub fn text_surface_factory() -> SnippetFactory {
    Box::new(
        |snippet: &NoteContentSnippet,
         config: SnippetConfig,
         snippet_ref: SnippetRef|
         -> Box<dyn SnippetView> {
            match snippet.snippet_type {
                NoteContentSnippetType::Text => Box::new(SnippetEditor::text(config, snippet_ref)),
                NoteContentSnippetType::Code => Box::new(SnippetEditor::code(config, snippet_ref)),
            }
        },
    )
}

struct SnippetSlot {
    /// Stored form; `value` is refreshed from the view on [`NoteEditor::to_content`]
    snippet: NoteContentSnippet,
    view: Box<dyn SnippetView>,
    subscription: Subscription,
}

impl SnippetSlot {
    fn ref_id(&self) -> SnippetRefId {
        self.view.snippet_ref().id()
    }
}

/// Owns the ordered snippets of a note and reacts to their navigation intents
///
/// At most one snippet has focus, and exactly one whenever the note has any
/// snippets. Snippets are addressed by position; events are matched back to
/// a position through the ref that raised them.
pub struct NoteEditor {
    header: NoteContent,
    slots: Vec<SnippetSlot>,
    focused: Option<usize>,
    inbox: Rc<RefCell<VecDeque<SnippetEvent>>>,
    factory: SnippetFactory,
    settings: NoteEditorSettings,
    focus_trail: FocusTrail,
}

impl NoteEditor {
    /// Mounts every snippet of `content` and focuses the first one
    pub fn from_content(
        content: NoteContent,
        factory: SnippetFactory,
        settings: NoteEditorSettings,
    ) -> Self {
        let snippets = content.snippets.clone();
        let header = content.apply_patch(&NoteContentPatch::new().snippets(Vec::new()));

        let mut editor = Self {
            header,
            slots: Vec::with_capacity(snippets.len()),
            focused: None,
            inbox: Rc::new(RefCell::new(VecDeque::new())),
            factory,
            settings,
            focus_trail: FocusTrail::new(),
        };

        for snippet in snippets {
            let slot = editor.mount(snippet);
            editor.slots.push(slot);
        }
        if !editor.slots.is_empty() {
            editor.set_focus(0);
        }

        debug!(note_id = editor.header.note_id(), snippets = editor.slots.len(), "note editor opened");
        editor
    }

    /// Opens a note from content file data and settings file data
    pub fn open(content_data: &str, settings_data: &[u8]) -> NoteEditorResult<Self> {
        let content = NoteContent::parse_file_data(content_data)?;
        let settings = deserialize_settings(settings_data)?;
        Ok(Self::from_content(content, text_surface_factory(), settings))
    }

    pub fn settings(&self) -> &NoteEditorSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused(&self) -> Option<&dyn SnippetView> {
        self.focused.and_then(|index| self.snippet(index))
    }

    pub fn snippet(&self, index: usize) -> Option<&dyn SnippetView> {
        self.slots.get(index).map(|slot| slot.view.as_ref())
    }

    pub fn snippet_mut(&mut self, index: usize) -> Option<&mut (dyn SnippetView + 'static)> {
        self.slots.get_mut(index).map(|slot| slot.view.as_mut())
    }

    /// Id of the ref handed to the snippet at `index`
    pub fn ref_at(&self, index: usize) -> Option<SnippetRefId> {
        self.slots.get(index).map(SnippetSlot::ref_id)
    }

    pub fn index_of(&self, ref_id: SnippetRefId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.ref_id() == ref_id)
    }

    pub fn focus_trail(&self) -> &[FocusEvent] {
        self.focus_trail.events()
    }

    pub fn clear_focus_trail(&mut self) {
        self.focus_trail.clear();
    }

    /// Routes an input event to the focused snippet
    pub fn process_input(&mut self, event: &InputEvent) -> Option<KeyDisposition> {
        match event.as_key() {
            Some(key) => self.handle_key(key),
            None => None,
        }
    }

    /// Delivers a keystroke to the focused snippet, then applies whatever it
    /// emitted. Returns `None` when nothing has focus.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<KeyDisposition> {
        let index = self.focused?;
        let disposition = self.slots[index].view.handle_key_down(event);
        self.process_pending_events();
        Some(disposition)
    }

    /// Applies every event the snippets emitted since the last call, in order
    pub fn process_pending_events(&mut self) {
        loop {
            let next = self.inbox.borrow_mut().pop_front();
            match next {
                Some(event) => self.apply_event(&event),
                None => break,
            }
        }
    }

    /// Applies a single snippet event
    pub fn apply_event(&mut self, event: &SnippetEvent) {
        let Some(index) = self.index_of(event.source) else {
            warn!(source = %event.source, event = %event.name, "event from unknown snippet ignored");
            return;
        };

        debug!(index, event = %event.name, "applying snippet event");
        match event.name {
            SnippetEventName::RemoveThis => self.remove_at(index),
            SnippetEventName::MoveFocusToPrevious => {
                if index > 0 {
                    self.set_focus(index - 1);
                    self.slots[index - 1].view.set_position_to_bottom();
                }
            }
            SnippetEventName::MoveFocusToNext => {
                if index + 1 < self.slots.len() {
                    self.set_focus(index + 1);
                    self.slots[index + 1].view.set_position_to_top();
                }
            }
        }
    }

    /// Gives focus to the snippet at `index`
    pub fn focus(&mut self, index: usize) -> NoteEditorResult<()> {
        self.check_index(index, self.slots.len())?;
        self.set_focus(index);
        Ok(())
    }

    /// Removes the snippet at `index`. Removing from an empty note does nothing.
    pub fn remove_snippet(&mut self, index: usize) -> NoteEditorResult<()> {
        if self.slots.is_empty() {
            return Ok(());
        }
        self.check_index(index, self.slots.len())?;
        self.remove_at(index);
        Ok(())
    }

    /// Inserts a blank snippet before `index` and focuses it
    pub fn insert_snippet(
        &mut self,
        index: usize,
        snippet_type: NoteContentSnippetType,
        language: Option<String>,
    ) -> NoteEditorResult<SnippetRefId> {
        self.check_index(index, self.slots.len() + 1)?;

        let snippet = match snippet_type {
            NoteContentSnippetType::Text => NoteContentSnippet::text(""),
            NoteContentSnippetType::Code => NoteContentSnippet::code("", language),
        };
        Ok(self.insert_at(index, snippet))
    }

    /// Appends a blank snippet and focuses it
    pub fn append_snippet(
        &mut self,
        snippet_type: NoteContentSnippetType,
        language: Option<String>,
    ) -> NoteEditorResult<SnippetRefId> {
        self.insert_snippet(self.slots.len(), snippet_type, language)
    }

    /// Current content, with every snippet's value read from its view
    pub fn to_content(&self) -> NoteContent {
        let snippets = self
            .slots
            .iter()
            .map(|slot| NoteContentSnippet {
                value: slot.view.value(),
                ..slot.snippet.clone()
            })
            .collect();
        self.header.apply_patch(&NoteContentPatch::new().snippets(snippets))
    }

    pub fn to_file_data(&self) -> NoteEditorResult<String> {
        Ok(self.to_content().convert_to_file_data()?)
    }

    pub fn preview(&self) -> String {
        self.to_content().convert_to_preview_string()
    }

    fn mount(&self, snippet: NoteContentSnippet) -> SnippetSlot {
        let config = SnippetConfig::new(
            snippet.value.clone(),
            snippet.effective_language().map(str::to_string),
        );
        let snippet_ref = SnippetRef::new();

        let inbox = Rc::clone(&self.inbox);
        let subscription = snippet_ref
            .events()
            .subscribe(move |event: &SnippetEvent| inbox.borrow_mut().push_back(*event));

        let view = (self.factory)(&snippet, config, snippet_ref);
        SnippetSlot {
            snippet,
            view,
            subscription,
        }
    }

    fn insert_at(&mut self, index: usize, snippet: NoteContentSnippet) -> SnippetRefId {
        let slot = self.mount(snippet);
        let ref_id = slot.ref_id();
        debug!(index, snippet_id = %slot.snippet.id, kind = %slot.snippet.snippet_type, "snippet inserted");

        self.slots.insert(index, slot);
        // Positions at and after the insertion point shifted by one
        if let Some(focused) = self.focused {
            if focused >= index {
                self.focused = Some(focused + 1);
            }
        }
        self.set_focus(index);
        self.slots[index].view.set_position_to_top();
        ref_id
    }

    fn remove_at(&mut self, index: usize) {
        let slot = self.slots.remove(index);
        slot.subscription.unsubscribe();
        debug!(index, snippet_id = %slot.snippet.id, remaining = self.slots.len(), "snippet removed");

        match self.focused {
            Some(focused) if focused == index => {}
            Some(focused) if focused > index => {
                self.focused = Some(focused - 1);
                return;
            }
            _ => return,
        }

        let target = if self.slots.is_empty() {
            if self.settings.empty_note_policy == EmptyNotePolicy::KeepEmpty {
                self.focused = None;
                self.focus_trail.released(&slot.snippet.id);
                return;
            }
            let blank = self.mount(NoteContentSnippet::text(""));
            debug!(snippet_id = %blank.snippet.id, "blank snippet inserted into empty note");
            self.slots.push(blank);
            0
        } else {
            index.saturating_sub(1)
        };

        // Focus passes straight from the removed snippet to its successor
        let to_id = self.slots[target].snippet.id.clone();
        self.focus_trail.transferred(&slot.snippet.id, &to_id);
        debug!(index = target, snippet_id = %to_id, "snippet focused");
        self.focused = Some(target);

        if index > 0 && self.settings.cursor_to_bottom_on_remove {
            self.slots[target].view.set_position_to_bottom();
        }
    }

    fn set_focus(&mut self, index: usize) {
        let to_id = self.slots[index].snippet.id.clone();
        match self.focused {
            Some(current) if current == index => return,
            Some(current) => {
                let from_id = &self.slots[current].snippet.id;
                self.focus_trail.transferred(from_id, &to_id);
            }
            None => self.focus_trail.granted(&to_id),
        }

        debug!(index, snippet_id = %to_id, "snippet focused");
        self.focused = Some(index);
    }

    fn check_index(&self, index: usize, len: usize) -> NoteEditorResult<()> {
        if index < len {
            Ok(())
        } else {
            Err(NoteEditorError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            })
        }
    }
}

impl fmt::Debug for NoteEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteEditor")
            .field("note_id", &self.header.note_id())
            .field("snippets", &self.slots.len())
            .field("focused", &self.focused)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::serialize_settings;

    fn content(values: &[&str]) -> NoteContent {
        let snippets = values.iter().map(|v| NoteContentSnippet::text(*v)).collect();
        NoteContent::new("note", "Title", vec!["stack".to_string()], snippets)
    }

    fn editor(values: &[&str]) -> NoteEditor {
        NoteEditor::from_content(
            content(values),
            text_surface_factory(),
            NoteEditorSettings::default(),
        )
    }

    fn event(editor: &NoteEditor, index: usize, name: SnippetEventName) -> SnippetEvent {
        SnippetEvent {
            name,
            source: editor.ref_at(index).unwrap(),
        }
    }

    fn values(editor: &NoteEditor) -> Vec<String> {
        editor.to_content().snippets.into_iter().map(|s| s.value).collect()
    }

    #[test]
    fn test_opens_with_first_snippet_focused() {
        let editor = editor(&["a", "b"]);
        assert_eq!(editor.len(), 2);
        assert_eq!(editor.focused_index(), Some(0));
        assert!(matches!(editor.focus_trail(), [FocusEvent::Granted { .. }]));
    }

    #[test]
    fn test_empty_note_has_no_focus() {
        let editor = editor(&[]);
        assert!(editor.is_empty());
        assert_eq!(editor.focused_index(), None);
        assert!(editor.focused().is_none());
    }

    #[test]
    fn test_remove_moves_focus_to_previous() {
        let mut editor = editor(&["a", "b", "c"]);
        editor.focus(2).unwrap();

        editor.apply_event(&event(&editor, 2, SnippetEventName::RemoveThis));

        assert_eq!(values(&editor), vec!["a", "b"]);
        assert_eq!(editor.focused_index(), Some(1));
    }

    #[test]
    fn test_remove_first_focuses_new_first() {
        let mut editor = editor(&["a", "b"]);
        let second = editor.ref_at(1).unwrap();

        editor.apply_event(&event(&editor, 0, SnippetEventName::RemoveThis));

        assert_eq!(editor.focused_index(), Some(0));
        assert_eq!(editor.ref_at(0), Some(second));
    }

    #[test]
    fn test_remove_places_cursor_at_bottom_of_previous() {
        let mut editor = editor(&["one\ntwo", ""]);
        editor.focus(1).unwrap();

        editor.apply_event(&event(&editor, 1, SnippetEventName::RemoveThis));

        let focused = editor.focused().unwrap();
        assert!(focused.is_current_position_bottom());
        assert!(!focused.is_current_position_top());
    }

    #[test]
    fn test_remove_last_snippet_inserts_blank_text() {
        let mut editor = editor(&[""]);
        let old = editor.ref_at(0).unwrap();

        editor.apply_event(&event(&editor, 0, SnippetEventName::RemoveThis));

        assert_eq!(editor.len(), 1);
        assert_ne!(editor.ref_at(0), Some(old));
        assert_eq!(editor.focused_index(), Some(0));
        assert_eq!(editor.snippet(0).unwrap().kind(), NoteContentSnippetType::Text);
        assert_eq!(editor.snippet(0).unwrap().value(), "");
    }

    #[test]
    fn test_remove_last_snippet_keep_empty() {
        let settings = NoteEditorSettings {
            empty_note_policy: EmptyNotePolicy::KeepEmpty,
            ..NoteEditorSettings::default()
        };
        let mut editor = NoteEditor::from_content(content(&[""]), text_surface_factory(), settings);

        editor.apply_event(&event(&editor, 0, SnippetEventName::RemoveThis));

        assert!(editor.is_empty());
        assert_eq!(editor.focused_index(), None);
        assert!(matches!(editor.focus_trail().last(), Some(FocusEvent::Released { .. })));

        // Removing from an empty note is a no-op
        assert!(editor.remove_snippet(0).is_ok());
        assert!(editor.is_empty());
    }

    #[test]
    fn test_remove_before_focused_keeps_focus() {
        let mut editor = editor(&["a", "b", "c"]);
        editor.focus(2).unwrap();
        let focused_ref = editor.ref_at(2).unwrap();
        editor.clear_focus_trail();

        editor.remove_snippet(0).unwrap();

        assert_eq!(editor.focused_index(), Some(1));
        assert_eq!(editor.ref_at(1), Some(focused_ref));
        assert!(editor.focus_trail().is_empty());
    }

    #[test]
    fn test_remove_after_focused_keeps_focus() {
        let mut editor = editor(&["a", "b", "c"]);
        editor.focus(1).unwrap();
        editor.clear_focus_trail();

        editor.apply_event(&event(&editor, 2, SnippetEventName::RemoveThis));

        assert_eq!(values(&editor), vec!["a", "b"]);
        assert_eq!(editor.focused_index(), Some(1));
        assert!(editor.focus_trail().is_empty());
    }

    #[test]
    fn test_remove_without_cursor_to_bottom() {
        let settings = NoteEditorSettings {
            cursor_to_bottom_on_remove: false,
            ..NoteEditorSettings::default()
        };
        let mut editor =
            NoteEditor::from_content(content(&["one\ntwo", ""]), text_surface_factory(), settings);
        editor.focus(1).unwrap();

        editor.apply_event(&event(&editor, 1, SnippetEventName::RemoveThis));

        assert_eq!(editor.focused_index(), Some(0));
        let focused = editor.focused().unwrap();
        assert!(focused.is_current_position_top());
        assert!(!focused.is_current_position_bottom());
    }

    #[test]
    fn test_remove_focused_records_single_transfer() {
        let mut editor = editor(&["a", "b"]);
        let ids: Vec<String> = editor.to_content().snippets.into_iter().map(|s| s.id).collect();
        editor.focus(1).unwrap();
        editor.clear_focus_trail();

        editor.remove_snippet(1).unwrap();

        match editor.focus_trail() {
            [FocusEvent::Transferred {
                from_snippet_id,
                to_snippet_id,
                ..
            }] => {
                assert_eq!(from_snippet_id, &ids[1]);
                assert_eq!(to_snippet_id, &ids[0]);
            }
            other => panic!("Expected one Transferred event, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_last_snippet_transfers_to_blank() {
        let mut editor = editor(&["x"]);
        let old_id = editor.to_content().snippets[0].id.clone();
        editor.clear_focus_trail();

        editor.remove_snippet(0).unwrap();

        let new_id = editor.to_content().snippets[0].id.clone();
        assert_ne!(new_id, old_id);
        assert_eq!(
            editor.focus_trail(),
            &[FocusEvent::Transferred {
                from_snippet_id: old_id,
                to_snippet_id: new_id,
                timestamp: 1,
            }]
        );
    }

    #[test]
    fn test_move_focus_to_previous() {
        let mut editor = editor(&["one\ntwo", "three"]);
        editor.focus(1).unwrap();

        editor.apply_event(&event(&editor, 1, SnippetEventName::MoveFocusToPrevious));

        assert_eq!(editor.focused_index(), Some(0));
        assert!(editor.focused().unwrap().is_current_position_bottom());
    }

    #[test]
    fn test_move_focus_to_previous_at_first_is_noop() {
        let mut editor = editor(&["a", "b"]);
        editor.clear_focus_trail();

        editor.apply_event(&event(&editor, 0, SnippetEventName::MoveFocusToPrevious));

        assert_eq!(editor.focused_index(), Some(0));
        assert!(editor.focus_trail().is_empty());
    }

    #[test]
    fn test_move_focus_to_next() {
        let mut editor = editor(&["a", "one\ntwo"]);
        editor.snippet_mut(1).unwrap().set_position_to_bottom();

        editor.apply_event(&event(&editor, 0, SnippetEventName::MoveFocusToNext));

        assert_eq!(editor.focused_index(), Some(1));
        assert!(editor.focused().unwrap().is_current_position_top());
    }

    #[test]
    fn test_move_focus_to_next_at_last_is_noop() {
        let mut editor = editor(&["a", "b"]);
        editor.focus(1).unwrap();

        editor.apply_event(&event(&editor, 1, SnippetEventName::MoveFocusToNext));
        assert_eq!(editor.focused_index(), Some(1));
    }

    #[test]
    fn test_event_from_removed_snippet_is_ignored() {
        let mut editor = editor(&["a", "b"]);
        let stale = event(&editor, 1, SnippetEventName::MoveFocusToPrevious);
        editor.remove_snippet(1).unwrap();

        editor.apply_event(&stale);
        assert_eq!(editor.len(), 1);
        assert_eq!(editor.focused_index(), Some(0));
    }

    #[test]
    fn test_insert_snippet_takes_focus() {
        let mut editor = editor(&["a", "b"]);
        let inserted = editor
            .insert_snippet(1, NoteContentSnippetType::Code, Some("rust".to_string()))
            .unwrap();

        assert_eq!(editor.len(), 3);
        assert_eq!(editor.index_of(inserted), Some(1));
        assert_eq!(editor.focused_index(), Some(1));
        assert_eq!(editor.snippet(1).unwrap().language(), Some("rust"));
        assert_eq!(values(&editor), vec!["a", "", "b"]);
    }

    #[test]
    fn test_insert_before_focused_keeps_trail_consistent() {
        let mut editor = editor(&["a", "b"]);
        editor.focus(1).unwrap();
        let focused_id = editor.to_content().snippets[1].id.clone();
        editor.clear_focus_trail();

        editor.insert_snippet(0, NoteContentSnippetType::Text, None).unwrap();

        match editor.focus_trail() {
            [FocusEvent::Transferred {
                from_snippet_id, ..
            }] => assert_eq!(from_snippet_id, &focused_id),
            other => panic!("Expected one Transferred event, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_requests() {
        let mut editor = editor(&["a"]);
        assert_eq!(
            editor.focus(3),
            Err(NoteEditorError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert!(editor.remove_snippet(1).is_err());
        assert!(editor.insert_snippet(2, NoteContentSnippetType::Text, None).is_err());
        assert!(editor.append_snippet(NoteContentSnippetType::Text, None).is_ok());
    }

    #[test]
    fn test_to_content_preserves_header_and_order() {
        let original = content(&["a", "b"]);
        let editor = NoteEditor::from_content(
            original.clone(),
            text_surface_factory(),
            NoteEditorSettings::default(),
        );

        assert_eq!(editor.to_content(), original);
    }

    #[test]
    fn test_open_from_file_data() {
        let data = content(&["hello"]).convert_to_file_data().unwrap();
        let settings = serialize_settings(&NoteEditorSettings::default()).unwrap();

        let editor = NoteEditor::open(&data, &settings).unwrap();
        assert_eq!(editor.preview(), "hello\n\n");
    }

    #[test]
    fn test_open_rejects_malformed_content() {
        let settings = serialize_settings(&NoteEditorSettings::default()).unwrap();
        assert!(matches!(
            NoteEditor::open("{}", &settings),
            Err(NoteEditorError::Data(_))
        ));
        assert!(matches!(
            NoteEditor::open(&content(&[]).convert_to_file_data().unwrap(), b"{}"),
            Err(NoteEditorError::Settings(_))
        ));
    }
}
