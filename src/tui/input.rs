// Input line for the chat panel
//
// A single-line editor with a character cursor and a history of submitted
// lines (Ctrl+P / Ctrl+N).

use unicode_width::UnicodeWidthStr;

#[derive(Debug, Default)]
pub struct InputLine {
    text: String,
    /// Cursor position in characters, not bytes
    cursor: usize,
    history: Vec<String>,
    /// Position while browsing history; None when editing a fresh line
    history_pos: Option<usize>,
}

impl InputLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Display column of the cursor
    pub fn cursor_column(&self) -> usize {
        self.text[..self.byte_index(self.cursor)].width()
    }

    /// Take the current line, remembering non-blank lines in history
    pub fn submit(&mut self) -> String {
        let line = std::mem::take(&mut self.text);
        self.cursor = 0;
        self.history_pos = None;
        if !line.trim().is_empty() && self.history.last() != Some(&line) {
            self.history.push(line.clone());
        }
        line
    }

    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let pos = match self.history_pos {
            Some(p) => p.saturating_sub(1),
            None => self.history.len() - 1,
        };
        self.load_history(pos);
    }

    pub fn history_next(&mut self) {
        match self.history_pos {
            Some(p) if p + 1 < self.history.len() => self.load_history(p + 1),
            Some(_) => {
                self.history_pos = None;
                self.text.clear();
                self.cursor = 0;
            }
            None => {}
        }
    }

    fn load_history(&mut self, pos: usize) {
        self.history_pos = Some(pos);
        self.text = self.history[pos].clone();
        self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> InputLine {
        let mut input = InputLine::default();
        for c in s.chars() {
            input.insert(c);
        }
        input
    }

    #[test]
    fn test_editing_with_multibyte_chars() {
        let mut input = typed("héllo");
        input.left();
        input.left();
        input.backspace();
        assert_eq!(input.text(), "hélo");
        input.home();
        input.delete();
        assert_eq!(input.text(), "élo");
        assert_eq!(input.cursor_column(), 0);
        input.end();
        assert_eq!(input.cursor_column(), 3);
    }

    #[test]
    fn test_submit_clears_and_records_history() {
        let mut input = typed("first");
        assert_eq!(input.submit(), "first");
        assert_eq!(input.text(), "");

        input.insert('x');
        input.submit();
        input.submit(); // blank lines are not remembered

        input.history_prev();
        assert_eq!(input.text(), "x");
        input.history_prev();
        assert_eq!(input.text(), "first");
        input.history_next();
        assert_eq!(input.text(), "x");
        input.history_next();
        assert_eq!(input.text(), "");
    }
}
