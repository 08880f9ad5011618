//! Training buffer: lines, a character-indexed cursor, and the yank register.
//!
//! The buffer deliberately stores plain `Vec<String>` lines rather than a rope.
//! Training targets are short literary sentences, so the simple representation
//! keeps every operation easy to reason about while the cursor arithmetic stays
//! strictly in unicode scalar values (never bytes). Byte offsets appear only at
//! the serialization boundary.

use std::fmt;

pub mod motion;

/// Vim editing modes recognised by the trainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual,
    VisualLine,
    VisualBlock,
    Command,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Visual => "VISUAL",
            Mode::VisualLine => "V-LINE",
            Mode::VisualBlock => "V-BLOCK",
            Mode::Command => "COMMAND",
        };
        f.write_str(name)
    }
}

/// An in-memory text buffer with a `(column, line)` cursor.
///
/// Invariants (re-established by `clamp_cursor` after every mutation):
/// * `lines` is never empty — an empty buffer holds one empty line;
/// * `cursor_y < lines.len()`;
/// * in Normal mode `cursor_x` rests on a real character of a non-empty line;
///   in Insert mode it may sit one past the end.
#[derive(Debug, Clone)]
pub struct Buffer {
    lines: Vec<String>,
    pub(crate) cursor_x: usize,
    pub(crate) cursor_y: usize,
    mode: Mode,
    register: String,
}

impl Buffer {
    /// Build a buffer from full text, splitting on `\n`. Empty text yields a
    /// single empty line. The cursor starts at the origin in Normal mode.
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            cursor_x: 0,
            cursor_y: 0,
            mode: Mode::Normal,
            register: String::new(),
        }
    }

    /// Full buffer content; round-trips with [`Buffer::new`].
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the entire content, clamping the cursor into the new text.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.clamp_cursor();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    /// The line the cursor is on. The cursor invariant guarantees it exists.
    pub fn current_line(&self) -> &str {
        self.lines
            .get(self.cursor_y)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Character count of a line (not bytes).
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map(|l| l.chars().count()).unwrap_or(0)
    }

    /// Cursor as `(column, line)` in character units.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    /// Place the cursor, clamping to the mode-specific bounds.
    pub fn set_cursor(&mut self, x: usize, y: usize) {
        self.cursor_x = x;
        self.cursor_y = y;
        self.clamp_cursor();
    }

    /// Absolute character index of the cursor: the sum of preceding line
    /// lengths (each newline counting as one character) plus the column.
    pub fn cursor_index(&self) -> usize {
        let mut index = 0;
        for line in self.lines.iter().take(self.cursor_y) {
            index += line.chars().count() + 1;
        }
        index + self.cursor_x
    }

    /// Inverse of [`Buffer::cursor_index`]. Indexes past the end land on the
    /// final character of the final line.
    pub fn set_cursor_index(&mut self, index: usize) {
        let mut pos = 0;
        for (y, line) in self.lines.iter().enumerate() {
            let len = line.chars().count();
            if pos + len >= index {
                self.cursor_y = y;
                self.cursor_x = index - pos;
                self.clamp_cursor();
                return;
            }
            pos += len + 1;
        }
        self.cursor_y = self.lines.len().saturating_sub(1);
        self.cursor_x = self.line_len(self.cursor_y);
        self.clamp_cursor();
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Character at `(x, y)`, or `None` outside the text.
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.lines.get(y).and_then(|line| line.chars().nth(x))
    }

    /// Character under the cursor, if the cursor rests on one.
    pub fn char_under_cursor(&self) -> Option<char> {
        self.char_at(self.cursor_x, self.cursor_y)
    }

    /// Re-apply the cursor invariant for the current mode.
    pub(crate) fn clamp_cursor(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        if self.cursor_y >= self.lines.len() {
            self.cursor_y = self.lines.len() - 1;
        }
        let len = self.line_len(self.cursor_y);
        match self.mode {
            Mode::Normal if len > 0 => {
                if self.cursor_x >= len {
                    self.cursor_x = len - 1;
                }
            }
            Mode::Normal => self.cursor_x = 0,
            _ => {
                if self.cursor_x > len {
                    self.cursor_x = len;
                }
            }
        }
    }

    /// Insert text at the cursor, splitting lines on embedded `\n`. The cursor
    /// advances to the end of the inserted text.
    pub fn insert(&mut self, text: &str) {
        let runes: Vec<char> = self.current_line().chars().collect();
        let split_at = self.cursor_x.min(runes.len());
        let before: String = runes[..split_at].iter().collect();
        let after: String = runes[split_at..].iter().collect();

        let mut parts = text.split('\n');
        let first = parts.next().unwrap_or("");
        let rest: Vec<&str> = parts.collect();

        if rest.is_empty() {
            self.lines[self.cursor_y] = format!("{before}{first}{after}");
            self.cursor_x = split_at + first.chars().count();
        } else {
            self.lines[self.cursor_y] = format!("{before}{first}");
            let last = rest[rest.len() - 1];
            let tail_x = last.chars().count();
            let mut insert_at = self.cursor_y + 1;
            for mid in &rest[..rest.len() - 1] {
                self.lines.insert(insert_at, mid.to_string());
                insert_at += 1;
            }
            self.lines.insert(insert_at, format!("{last}{after}"));
            self.cursor_y = insert_at;
            self.cursor_x = tail_x;
        }
    }

    /// Delete up to `n` characters starting at the cursor; a newline counts as
    /// one character and consuming it joins the next line. Returns the deleted
    /// text.
    pub fn delete(&mut self, n: usize) -> String {
        let mut deleted = String::new();
        let mut remaining = n;

        while remaining > 0 && self.cursor_y < self.lines.len() {
            let len = self.line_len(self.cursor_y);
            if self.cursor_x >= len {
                if self.cursor_y + 1 < self.lines.len() {
                    deleted.push('\n');
                    let next = self.lines.remove(self.cursor_y + 1);
                    self.lines[self.cursor_y].push_str(&next);
                    remaining -= 1;
                } else {
                    break;
                }
            } else {
                let runes: Vec<char> = self.lines[self.cursor_y].chars().collect();
                let take = remaining.min(runes.len() - self.cursor_x);
                deleted.extend(&runes[self.cursor_x..self.cursor_x + take]);
                let mut rebuilt: String = runes[..self.cursor_x].iter().collect();
                rebuilt.extend(&runes[self.cursor_x + take..]);
                self.lines[self.cursor_y] = rebuilt;
                remaining -= take;
            }
        }

        self.clamp_cursor();
        deleted
    }

    /// Remove the current line. The buffer never becomes empty: deleting the
    /// only line leaves a single empty one. Returns the removed content
    /// (without a newline).
    pub fn delete_line(&mut self) -> String {
        let deleted = if self.lines.len() == 1 {
            std::mem::take(&mut self.lines[0])
        } else {
            self.lines.remove(self.cursor_y)
        };
        self.clamp_cursor();
        deleted
    }

    /// Remove from the cursor to the end of the line, returning it.
    pub fn delete_to_eol(&mut self) -> String {
        let runes: Vec<char> = self.current_line().chars().collect();
        if self.cursor_x >= runes.len() {
            return String::new();
        }
        let deleted: String = runes[self.cursor_x..].iter().collect();
        self.lines[self.cursor_y] = runes[..self.cursor_x].iter().collect();
        self.clamp_cursor();
        deleted
    }

    /// Replace the character under the cursor. No-op past the end of the line.
    pub fn replace_char(&mut self, replacement: char) {
        let mut runes: Vec<char> = self.current_line().chars().collect();
        if self.cursor_x < runes.len() {
            runes[self.cursor_x] = replacement;
            self.lines[self.cursor_y] = runes.into_iter().collect();
        }
    }

    pub fn register(&self) -> &str {
        &self.register
    }

    pub fn set_register(&mut self, text: impl Into<String>) {
        self.register = text.into();
    }
}
