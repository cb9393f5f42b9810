//! In-memory editing surface

use crate::buffer::{Position, TextBuffer};
use crate::EditingSurface;
use input_types::{KeyCode, KeyEvent, Modifiers};
use tracing::trace;

/// Plain-text surface backed by a [`TextBuffer`]
///
/// Handles printable input, line splitting, deletion and caret movement.
/// Vertical movement keeps the caret on its line at the document edges.
#[derive(Debug, Clone)]
pub struct TextSurface {
    buffer: TextBuffer,
    cursor: Position,
    language: Option<String>,
}

impl TextSurface {
    pub fn new(value: &str, language: Option<String>) -> Self {
        Self {
            buffer: TextBuffer::from_text(value),
            cursor: Position::top(),
            language,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn set_language(&mut self, language: Option<String>) {
        self.language = language;
    }

    fn move_up(&mut self) {
        if self.cursor.line > 1 {
            self.cursor = self
                .buffer
                .clamp(Position::new(self.cursor.line - 1, self.cursor.column));
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line < self.buffer.line_count() {
            self.cursor = self
                .buffer
                .clamp(Position::new(self.cursor.line + 1, self.cursor.column));
        }
    }

    fn move_left(&mut self) {
        if self.cursor.column > 0 {
            self.cursor.column -= 1;
        } else if self.cursor.line > 1 {
            let line = self.cursor.line - 1;
            self.cursor = Position::new(line, self.buffer.line_length(line));
        }
    }

    fn move_right(&mut self) {
        if self.cursor.column < self.buffer.line_length(self.cursor.line) {
            self.cursor.column += 1;
        } else if self.cursor.line < self.buffer.line_count() {
            self.cursor = Position::new(self.cursor.line + 1, 0);
        }
    }

    fn insert(&mut self, ch: char) {
        if let Some(next) = self.buffer.insert_char(self.cursor, ch) {
            self.cursor = next;
        }
    }
}

impl Default for TextSurface {
    fn default() -> Self {
        Self::new("", None)
    }
}

impl EditingSurface for TextSurface {
    fn value(&self) -> String {
        self.buffer.as_string()
    }

    fn set_value(&mut self, value: &str) {
        self.buffer = TextBuffer::from_text(value);
        self.cursor = Position::top();
    }

    fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    fn position(&self) -> Position {
        self.cursor
    }

    fn set_position(&mut self, position: Position) {
        self.cursor = self.buffer.clamp(position);
    }

    fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if !event.is_key_down() {
            return;
        }

        let shortcut = event.modifiers.contains(Modifiers::CTRL)
            || event.modifiers.contains(Modifiers::META);

        if let Some(ch) = event.code.as_char().filter(|_| !shortcut) {
            self.insert(ch);
            return;
        }

        match event.code {
            KeyCode::Tab => self.insert('\t'),
            KeyCode::Enter => {
                if let Some(next) = self.buffer.insert_newline(self.cursor) {
                    self.cursor = next;
                }
            }
            KeyCode::Backspace => {
                if let Some(next) = self.buffer.backspace(self.cursor) {
                    self.cursor = next;
                }
            }
            KeyCode::Delete => {
                self.buffer.delete_char(self.cursor);
            }
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor.column = 0,
            KeyCode::End => self.cursor.column = self.buffer.line_length(self.cursor.line),
            _ => {
                trace!(key = %event.code, "surface ignored key");
            }
        }
    }
}
