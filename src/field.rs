use crate::mask::{MaskState, PatternOptions, Selection};
use crate::text_edit;

/// A single-line text surface that runs every edit through a [`MaskState`]
/// and writes the conformed value and caret back into itself.
#[derive(Debug, Clone, Default)]
pub struct MaskedField {
    value: String,
    selection: Selection,
    placeholder: String,
    state: MaskState,
}

impl MaskedField {
    pub fn new(state: MaskState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    pub fn cursor(&self) -> usize {
        self.selection.end
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Placeholder of the last conformance pass; empty before the first edit.
    pub fn placeholder(&self) -> &str {
        self.placeholder.as_str()
    }

    pub fn placeholder_char(&self) -> char {
        self.state.options().placeholder_char
    }

    pub fn state(&self) -> &MaskState {
        &self.state
    }

    /// Whether the char at `idx` is an unfilled guide glyph rather than input.
    pub fn is_guide_at(&self, idx: usize) -> bool {
        let pc = self.placeholder_char();
        self.value.chars().nth(idx) == Some(pc) && self.placeholder.chars().nth(idx) == Some(pc)
    }

    pub fn select(&mut self, start: usize, end: usize) {
        let len = text_edit::char_count(self.value.as_str());
        self.selection = Selection::new(start.min(len), end.min(len));
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf))
    }

    /// Replaces the selection with `text`, as typing or pasting would.
    pub fn insert_str(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let mut raw = self.value.clone();
        let caret = text_edit::replace_range(&mut raw, self.selection.start, self.selection.end, text);
        self.apply(raw, caret)
    }

    pub fn backspace(&mut self) -> bool {
        if !self.selection.is_empty() {
            return self.delete_selection();
        }
        let mut raw = self.value.clone();
        let mut caret = self.selection.end;
        if !text_edit::backspace_char(&mut raw, &mut caret) {
            return false;
        }
        self.apply(raw, caret)
    }

    pub fn delete_forward(&mut self) -> bool {
        if !self.selection.is_empty() {
            return self.delete_selection();
        }
        let mut raw = self.value.clone();
        let mut caret = self.selection.end;
        if !text_edit::delete_char(&mut raw, &mut caret) {
            return false;
        }
        self.apply(raw, caret)
    }

    pub fn clear(&mut self) -> bool {
        let len = text_edit::char_count(self.value.as_str());
        self.selection = Selection::new(0, len);
        self.delete_selection()
    }

    fn delete_selection(&mut self) -> bool {
        let mut raw = self.value.clone();
        let caret = text_edit::replace_range(&mut raw, self.selection.start, self.selection.end, "");
        self.apply(raw, caret)
    }

    pub fn move_left(&mut self) -> bool {
        let mut cursor = self.selection.end;
        let moved = text_edit::move_left(&mut cursor, self.value.as_str());
        self.selection = Selection::caret(cursor);
        moved
    }

    pub fn move_right(&mut self) -> bool {
        let mut cursor = self.selection.end;
        let moved = text_edit::move_right(&mut cursor, self.value.as_str());
        self.selection = Selection::caret(cursor);
        moved
    }

    pub fn home(&mut self) {
        self.selection = Selection::caret(0);
    }

    pub fn end(&mut self) {
        self.selection = Selection::caret(text_edit::char_count(self.value.as_str()));
    }

    /// Replaces the whole value, e.g. when the host loads a stored one.
    pub fn set_value(&mut self, value: &str) -> bool {
        self.apply(value.to_string(), text_edit::char_count(value))
    }

    /// Re-fits the current value after pattern options change.
    pub fn refresh(&mut self, pattern_options: PatternOptions) {
        if let Some(result) = self.state.refresh(pattern_options) {
            self.value = result.conformed_value;
            self.placeholder = result.placeholder;
            self.selection = Selection::caret(result.caret_pos);
        }
    }

    /// Terminal column of the cursor relative to the start of the value.
    pub fn display_column(&self) -> usize {
        text_edit::display_column(self.value.as_str(), self.selection.end)
    }

    fn apply(&mut self, raw: String, caret: usize) -> bool {
        let before = self.value.clone();
        match self.state.process(raw.as_str(), Selection::caret(caret)) {
            Some(result) => {
                self.value = result.conformed_value;
                self.placeholder = result.placeholder;
                self.selection = Selection::caret(result.caret_pos);
            }
            None => {
                self.value = raw;
                self.selection = Selection::caret(caret);
            }
        }
        self.value != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::{NamedKind, PatternSpec, presets};
    use pretty_assertions::assert_eq;

    fn phone_field() -> MaskedField {
        MaskedField::new(MaskState::new(presets::phone_us()))
    }

    fn type_text(field: &mut MaskedField, text: &str) {
        for ch in text.chars() {
            field.insert_char(ch);
        }
    }

    #[test]
    fn typing_digits_one_by_one() {
        let mut field = phone_field();
        type_text(&mut field, "555");
        assert_eq!(field.value(), "(555) ___-____");
        assert_eq!(field.cursor(), 6);

        type_text(&mut field, "1234567");
        assert_eq!(field.value(), "(555) 123-4567");
        assert_eq!(field.cursor(), 14);
    }

    #[test]
    fn rejected_keys_leave_value_alone() {
        let mut field = phone_field();
        type_text(&mut field, "555");
        assert!(!field.insert_char('x'));
        assert_eq!(field.value(), "(555) ___-____");
        assert_eq!(field.cursor(), 6);
    }

    #[test]
    fn backspace_at_the_end() {
        let mut field = phone_field();
        type_text(&mut field, "5551234567");
        assert!(field.backspace());
        assert_eq!(field.value(), "(555) 123-456_");
        assert_eq!(field.cursor(), 13);
    }

    #[test]
    fn clearing_the_field() {
        let mut field = phone_field();
        type_text(&mut field, "5");
        assert!(field.clear());
        assert_eq!(field.value(), "");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn guide_glyphs_are_told_apart_from_input() {
        let mut field = phone_field();
        type_text(&mut field, "5");
        assert!(!field.is_guide_at(0));
        assert!(!field.is_guide_at(1));
        assert!(field.is_guide_at(2));
    }

    #[test]
    fn set_value_and_navigation() {
        let mut field = phone_field();
        assert!(field.set_value("5551234567"));
        assert_eq!(field.value(), "(555) 123-4567");
        field.home();
        assert_eq!(field.cursor(), 0);
        assert!(field.move_right());
        assert_eq!(field.display_column(), 1);
        field.end();
        assert!(!field.move_right());
        assert!(field.move_left());
        assert_eq!(field.cursor(), 13);
    }

    #[test]
    fn unmasked_fields_edit_plain_text() {
        let mut field = MaskedField::new(MaskState::unmasked());
        type_text(&mut field, "hey");
        field.move_left();
        field.backspace();
        assert_eq!(field.value(), "hy");
        assert_eq!(field.cursor(), 1);
    }

    #[test]
    fn refresh_follows_the_locale() {
        let mut field = MaskedField::new(MaskState::new(NamedKind::Date).with_guide(false));
        field.set_value("12252024");
        assert_eq!(field.value(), "12/25/2024");
        field.refresh(PatternOptions::default().with_locale("de-DE"));
        assert_eq!(field.value(), "12.25.2024");

        let mut field = MaskedField::new(MaskState::new(NamedKind::Number));
        field.set_value("1234.5");
        assert_eq!(field.value(), "1,234.5");
        field.refresh(PatternOptions::default().with_locale("de-DE"));
        assert_eq!(field.value(), "1.234,5");
    }

    #[test]
    fn pasting_into_a_selection() {
        let mut field = MaskedField::new(MaskState::new(PatternSpec::template("###-###")).with_guide(false));
        field.set_value("123456");
        assert_eq!(field.value(), "123-456");
        field.select(0, 7);
        field.insert_str("987654");
        assert_eq!(field.value(), "987-654");
    }
}
