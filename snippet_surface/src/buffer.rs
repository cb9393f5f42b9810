//! Text buffer and position types

/// Cursor position in a surface
///
/// `line` is 1-based, `column` is a 0-based character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// (line 1, column 0)
    pub const fn top() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::top()
    }
}

/// Text buffer with line-based storage
///
/// Always holds at least one line. A trailing newline produces a trailing
/// empty line, so `"a\n"` has two lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    pub fn from_text(content: &str) -> Self {
        Self {
            lines: content.split('\n').map(String::from).collect(),
        }
    }

    pub fn as_string(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line by 1-based number
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|row| self.lines.get(row))
            .map(|s| s.as_str())
    }

    /// Length of a line in characters
    pub fn line_length(&self, line: usize) -> usize {
        self.line(line).map(|s| s.chars().count()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Clamps a position into the buffer
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.clamp(1, self.line_count());
        let column = pos.column.min(self.line_length(line));
        Position::new(line, column)
    }

    /// Insert a character, returning the position after it
    pub fn insert_char(&mut self, pos: Position, ch: char) -> Option<Position> {
        let (row, offset) = self.byte_index(pos)?;
        self.lines[row].insert(offset, ch);
        Some(Position::new(pos.line, pos.column + 1))
    }

    /// Split the line at position, returning the start of the new line
    pub fn insert_newline(&mut self, pos: Position) -> Option<Position> {
        let (row, offset) = self.byte_index(pos)?;
        let rest = self.lines[row].split_off(offset);
        self.lines.insert(row + 1, rest);
        Some(Position::new(pos.line + 1, 0))
    }

    /// Delete the character under position, joining the next line at line end
    pub fn delete_char(&mut self, pos: Position) -> bool {
        let Some((row, offset)) = self.byte_index(pos) else {
            return false;
        };

        if offset < self.lines[row].len() {
            self.lines[row].remove(offset);
            true
        } else if row + 1 < self.lines.len() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
            true
        } else {
            false
        }
    }

    /// Delete character before position (backspace)
    /// Returns new cursor position if successful
    pub fn backspace(&mut self, pos: Position) -> Option<Position> {
        if pos.column > 0 {
            let before = Position::new(pos.line, pos.column - 1);
            let (row, offset) = self.byte_index(before)?;
            self.lines[row].remove(offset);
            Some(before)
        } else if pos.line > 1 && pos.line <= self.line_count() {
            // Join with previous line
            let current_line = self.lines.remove(pos.line - 1);
            let new_column = self.line_length(pos.line - 1);
            self.lines[pos.line - 2].push_str(&current_line);
            Some(Position::new(pos.line - 1, new_column))
        } else {
            None
        }
    }

    /// Converts a position to (row index, byte offset) if it lies in the buffer
    fn byte_index(&self, pos: Position) -> Option<(usize, usize)> {
        let row = pos.line.checked_sub(1)?;
        let line = self.lines.get(row)?;
        let offset = if pos.column == line.chars().count() {
            line.len()
        } else {
            line.char_indices().nth(pos.column)?.0
        };
        Some((row, offset))
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}
