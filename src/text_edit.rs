use unicode_width::UnicodeWidthStr;

pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

pub fn clamp_cursor(cursor: usize, value: &str) -> usize {
    cursor.min(char_count(value))
}

/// Replaces the chars in `start..end` with `text`, returning the caret that
/// lands right after the inserted text.
pub fn replace_range(value: &mut String, start: usize, end: usize, text: &str) -> usize {
    let end = clamp_cursor(end, value);
    let start = start.min(end);
    let start_byte = byte_index_at_char(value, start);
    let end_byte = byte_index_at_char(value, end);
    value.replace_range(start_byte..end_byte, text);
    start + char_count(text)
}

pub fn backspace_char(value: &mut String, cursor: &mut usize) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos == 0 {
        return false;
    }
    let byte_pos = byte_index_at_char(value, pos - 1);
    value.remove(byte_pos);
    *cursor = pos - 1;
    true
}

pub fn delete_char(value: &mut String, cursor: &mut usize) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos >= char_count(value) {
        return false;
    }
    let byte_pos = byte_index_at_char(value, pos);
    value.remove(byte_pos);
    *cursor = pos;
    true
}

pub fn move_left(cursor: &mut usize, value: &str) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos == 0 {
        return false;
    }
    *cursor = pos - 1;
    true
}

pub fn move_right(cursor: &mut usize, value: &str) -> bool {
    let pos = clamp_cursor(*cursor, value);
    let len = char_count(value);
    if pos >= len {
        return false;
    }
    *cursor = pos + 1;
    true
}

/// Terminal column of the char offset `cursor`, accounting for wide glyphs.
pub fn display_column(value: &str, cursor: usize) -> usize {
    let byte_pos = byte_index_at_char(value, clamp_cursor(cursor, value));
    UnicodeWidthStr::width(&value[..byte_pos])
}

pub fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}
