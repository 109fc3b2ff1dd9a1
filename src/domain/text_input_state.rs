//! Editable single-line text buffer shared by the login, search, composer
//! and group-name fields.

/// Maximum accepted length in characters.
const MAX_INPUT_LENGTH: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextInputState {
    text: String,
    /// Character index, not byte index.
    cursor_position: usize,
}

impl TextInputState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns false when the buffer is full.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.text.chars().count() >= MAX_INPUT_LENGTH {
            return false;
        }
        let byte_idx = self.byte_index(self.cursor_position);
        self.text.insert(byte_idx, ch);
        self.cursor_position += 1;
        true
    }

    pub fn delete_char_before(&mut self) -> bool {
        if self.cursor_position == 0 {
            return false;
        }
        self.cursor_position -= 1;
        self.remove_at_cursor();
        true
    }

    pub fn delete_char_at(&mut self) -> bool {
        if self.cursor_position >= self.text.chars().count() {
            return false;
        }
        self.remove_at_cursor();
        true
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor_position = (self.cursor_position + 1).min(self.text.chars().count());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.text.chars().count();
    }

    /// Applies an editing key; returns true when the text changed.
    ///
    /// Cursor movement keys are consumed but report no change.
    pub fn apply_key(&mut self, key: &str) -> Option<bool> {
        match key {
            "backspace" => Some(self.delete_char_before()),
            "delete" => Some(self.delete_char_at()),
            "left" => {
                self.move_cursor_left();
                Some(false)
            }
            "right" => {
                self.move_cursor_right();
                Some(false)
            }
            "home" => {
                self.move_cursor_home();
                Some(false)
            }
            "end" => {
                self.move_cursor_end();
                Some(false)
            }
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_position = 0;
    }

    fn remove_at_cursor(&mut self) {
        let start = self.byte_index(self.cursor_position);
        let end = self.byte_index(self.cursor_position + 1);
        self.text.drain(start..end);
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInputState {
        let mut state = TextInputState::default();
        for ch in text.chars() {
            state.insert_char(ch);
        }
        state
    }

    #[test]
    fn inserts_at_cursor() {
        let mut state = typed("Ho");
        state.move_cursor_left();
        state.insert_char('i');

        assert_eq!(state.text(), "Hio");
        assert_eq!(state.cursor_position(), 2);
    }

    #[test]
    fn backspace_at_start_reports_no_change() {
        let mut state = typed("H");
        state.move_cursor_home();

        assert_eq!(state.apply_key("backspace"), Some(false));
        assert_eq!(state.text(), "H");
    }

    #[test]
    fn delete_removes_char_under_cursor() {
        let mut state = typed("Hi");
        state.move_cursor_home();

        assert_eq!(state.apply_key("delete"), Some(true));
        assert_eq!(state.text(), "i");
    }

    #[test]
    fn cursor_stays_within_bounds() {
        let mut state = typed("abc");

        state.apply_key("right");
        assert_eq!(state.cursor_position(), 3);

        for _ in 0..5 {
            state.apply_key("left");
        }
        assert_eq!(state.cursor_position(), 0);

        state.apply_key("end");
        assert_eq!(state.cursor_position(), 3);
    }

    #[test]
    fn unknown_keys_are_not_consumed() {
        let mut state = typed("abc");

        assert_eq!(state.apply_key("enter"), None);
        assert_eq!(state.apply_key("tab"), None);
    }

    #[test]
    fn clear_empties_text_and_resets_cursor() {
        let mut state = typed("hello");

        state.clear();
        assert!(state.is_empty());
        assert_eq!(state.cursor_position(), 0);
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut state = typed("Привет");

        state.delete_char_before();
        assert_eq!(state.text(), "Приве");

        state.move_cursor_home();
        state.delete_char_at();
        assert_eq!(state.text(), "риве");
    }

    #[test]
    fn rejects_input_beyond_limit() {
        let mut state = typed(&"x".repeat(MAX_INPUT_LENGTH));

        assert!(!state.insert_char('y'));
        assert_eq!(state.text().chars().count(), MAX_INPUT_LENGTH);
    }
}
