use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the field to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Insert(char),
    Paste(String),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Clear,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Edit(EditCommand),
    Resize { width: u16, height: u16 },
}

pub fn map_key_event(event: KeyEvent) -> Option<EditCommand> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let command = match event.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => EditCommand::Cancel,
        KeyCode::Char('u') if ctrl => EditCommand::Clear,
        KeyCode::Char('a') if ctrl => EditCommand::Home,
        KeyCode::Char('e') if ctrl => EditCommand::End,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(ch) => EditCommand::Insert(ch),
        KeyCode::Backspace => EditCommand::Backspace,
        KeyCode::Delete => EditCommand::Delete,
        KeyCode::Left => EditCommand::Left,
        KeyCode::Right => EditCommand::Right,
        KeyCode::Home => EditCommand::Home,
        KeyCode::End => EditCommand::End,
        KeyCode::Enter => EditCommand::Submit,
        KeyCode::Esc => EditCommand::Cancel,
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn plain_and_shifted_chars_insert() {
        assert_eq!(
            map_key_event(key(KeyCode::Char('7'), KeyModifiers::NONE)),
            Some(EditCommand::Insert('7'))
        );
        assert_eq!(
            map_key_event(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(EditCommand::Insert('A'))
        );
    }

    #[test]
    fn control_chords() {
        assert_eq!(
            map_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(EditCommand::Cancel)
        );
        assert_eq!(
            map_key_event(key(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(EditCommand::Clear)
        );
        assert_eq!(map_key_event(key(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
        assert_eq!(map_key_event(key(KeyCode::F(5), KeyModifiers::NONE)), None);
    }
}
