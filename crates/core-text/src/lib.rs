//! Rope-based text buffer and the editor collaborator seam.
//!
//! Suggestion sessions only need three things from the host editor: the text
//! of the cursor line, the cursor itself, and a single range replacement. The
//! `TextEditor` trait captures exactly that surface; `Buffer` is the in-process
//! implementation used by the facade and by tests.
//!
//! All offsets here are character offsets (Unicode scalar values) within a
//! line, never bytes.

use ropey::{Rope, RopeSlice};

/// Characters ropey (default `unicode_lines`) treats as line breaks.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Char length of a rope line without its terminator (`\r\n` counts as one).
fn content_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    if len == 0 || !is_line_break(line.char(len - 1)) {
        return len;
    }
    if len >= 2 && line.char(len - 1) == '\n' && line.char(len - 2) == '\r' {
        len - 2
    } else {
        len - 1
    }
}

/// A position inside a buffer expressed as (line index, char offset within that line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }

    pub fn origin() -> Self {
        Self { line: 0, ch: 0 }
    }

    /// Same line, different column.
    pub fn with_ch(self, ch: usize) -> Self {
        Self { line: self.line, ch }
    }

    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.ch = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.ch > max_len {
            self.ch = max_len;
        }
    }
}

/// Host editor surface consumed by the suggestion core.
///
/// Implementors must treat `replace_range` as a single atomic edit. Positions
/// past the end of a line or buffer are clamped, not rejected.
pub trait TextEditor {
    /// Line content without its trailing newline.
    fn line(&self, idx: usize) -> Option<String>;
    fn cursor(&self) -> Position;
    fn set_cursor(&mut self, pos: Position);
    /// Replace `[start, end)` with `text`.
    fn replace_range(&mut self, start: Position, end: Position, text: &str);
}

impl<T: TextEditor + ?Sized> TextEditor for &mut T {
    fn line(&self, idx: usize) -> Option<String> {
        (**self).line(idx)
    }
    fn cursor(&self) -> Position {
        (**self).cursor()
    }
    fn set_cursor(&mut self, pos: Position) {
        (**self).set_cursor(pos)
    }
    fn replace_range(&mut self, start: Position, end: Position, text: &str) {
        (**self).replace_range(start, end, text)
    }
}

/// A text buffer backed by a `ropey::Rope` with a single cursor.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    cursor: Position,
    pub name: String,
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice. The cursor starts at the origin.
    pub fn from_str(name: impl Into<String>, content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            cursor: Position::origin(),
            name: name.into(),
        }
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Char length of a line (excluding any newline) for clamping purposes.
    pub fn line_char_len(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        // ropey lines include their terminator except possibly the last line.
        content_len(self.rope.line(idx))
    }

    fn clamped(&self, mut pos: Position) -> Position {
        pos.clamp_to(self.line_count(), |l| self.line_char_len(l));
        pos
    }

    fn absolute_char_index(&self, pos: Position) -> usize {
        let pos = self.clamped(pos);
        self.rope.line_to_char(pos.line) + pos.ch
    }

    /// Whole buffer contents.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }
}

impl TextEditor for Buffer {
    fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(idx);
        Some(line.slice(..content_len(line)).to_string())
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.clamped(pos);
    }

    fn replace_range(&mut self, start: Position, end: Position, text: &str) {
        let mut a = self.absolute_char_index(start);
        let mut b = self.absolute_char_index(end);
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        if a < b {
            self.rope.remove(a..b);
        }
        self.rope.insert(a, text);
        tracing::trace!(target: "text.buffer", start = a, removed = b - a, inserted = text.chars().count(), "replace_range");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_strips_newline() {
        let b = Buffer::from_str("t", "abc\ndef");
        assert_eq!(b.line(0).as_deref(), Some("abc"));
        assert_eq!(b.line(1).as_deref(), Some("def"));
        assert_eq!(b.line(2), None);
        assert_eq!(b.line_char_len(0), 3);
    }

    #[test]
    fn replace_range_counts_chars_not_bytes() {
        let mut b = Buffer::from_str("t", "é /arr x\nnext");
        b.replace_range(Position::new(0, 2), Position::new(0, 6), "→");
        assert_eq!(b.text(), "é → x\nnext");
    }

    #[test]
    fn replace_range_clamps_past_line_end() {
        let mut b = Buffer::from_str("t", "ab\ncd");
        b.replace_range(Position::new(0, 1), Position::new(0, 99), "Z");
        assert_eq!(b.text(), "aZ\ncd");
    }

    #[test]
    fn crlf_terminator_is_not_part_of_the_line() {
        let mut b = Buffer::from_str("t", "ab /x\r\nnext\rlast");
        assert_eq!(b.line(0).as_deref(), Some("ab /x"));
        assert_eq!(b.line_char_len(0), 5);
        assert_eq!(b.line(1).as_deref(), Some("next"));
        assert_eq!(b.line(2).as_deref(), Some("last"));
        b.set_cursor(Position::new(0, 99));
        assert_eq!(b.cursor(), Position::new(0, 5));
        b.replace_range(Position::new(0, 3), Position::new(0, 99), "Z");
        assert_eq!(b.text(), "ab Z\r\nnext\rlast");
    }

    #[test]
    fn set_cursor_clamps() {
        let mut b = Buffer::from_str("t", "ab\ncd");
        b.set_cursor(Position::new(7, 7));
        assert_eq!(b.cursor(), Position::new(1, 2));
    }
}
