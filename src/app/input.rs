//! Single-line input editor. The cursor is a byte offset that always sits on
//! a char boundary.

use crate::session::history::{InputMode, ModedText};

#[derive(Debug, Default)]
pub struct InputState {
    pub text: String,
    pub cursor: usize,
    pub mode: InputMode,
}

impl InputState {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            let next = self.next_boundary();
            self.text.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .char_indices()
            .nth(1)
            .map_or(self.text.len(), |(i, _)| self.cursor + i)
    }

    pub fn delete_word_back(&mut self) {
        let head = &self.text[..self.cursor];
        let start = head
            .trim_end()
            .trim_end_matches(|c: char| !c.is_whitespace())
            .len();
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn clear_line(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            InputMode::Message => InputMode::Command,
            InputMode::Command => InputMode::Message,
        };
    }

    /// Replace the line, keeping the cursor at its end.
    pub fn set_text(&mut self, text: String) {
        self.text = text;
        self.cursor = self.text.len();
    }

    pub fn peek(&self) -> ModedText {
        ModedText {
            mode: self.mode,
            text: self.text.clone(),
        }
    }

    pub fn load(&mut self, entry: ModedText) {
        self.mode = entry.mode;
        self.set_text(entry.text);
    }

    /// Take the line for submission. The editor returns to message mode.
    pub fn take(&mut self) -> ModedText {
        let entry = ModedText {
            mode: self.mode,
            text: std::mem::take(&mut self.text),
        };
        self.cursor = 0;
        self.mode = InputMode::Message;
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_multibyte() {
        let mut input = InputState::default();
        for c in "héllo".chars() {
            input.insert_char(c);
        }
        input.move_left();
        input.move_left();
        input.move_left();
        input.delete_back();
        assert_eq!(input.text, "hllo");
        input.delete_forward();
        assert_eq!(input.text, "hlo");
        input.move_end();
        assert_eq!(input.cursor, input.text.len());
        input.move_right();
        assert_eq!(input.cursor, input.text.len());
        input.move_home();
        input.move_left();
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_delete_word_back() {
        let mut input = InputState::default();
        input.set_text("hello big world  ".to_string());
        input.delete_word_back();
        assert_eq!(input.text, "hello big ");
        input.delete_word_back();
        assert_eq!(input.text, "hello ");
        input.delete_word_back();
        assert_eq!(input.text, "");
        input.delete_word_back();
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_take_resets_mode() {
        let mut input = InputState::default();
        input.toggle_mode();
        input.set_text("join #rust".to_string());
        let entry = input.take();
        assert_eq!(entry, ModedText::command("join #rust"));
        assert!(input.is_empty());
        assert_eq!(input.mode, InputMode::Message);
    }

    #[test]
    fn test_load_restores_mode() {
        let mut input = InputState::default();
        input.load(ModedText::command("names"));
        assert_eq!(input.mode, InputMode::Command);
        assert_eq!(input.cursor, 5);
        assert_eq!(input.peek(), ModedText::command("names"));
    }
}
