use super::terminal_event::{TerminalEvent, map_key_event};
use crate::field::MaskedField;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind, poll, read,
};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

/// Raw-mode stdout that edits a single line in place.
pub struct Terminal {
    stdout: Stdout,
    size: Size,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout: io::stdout(),
            size: Size { width, height },
        })
    }

    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.stdout, EnableBracketedPaste)
    }

    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        execute!(self.stdout, DisableBracketedPaste)?;
        terminal::disable_raw_mode()
    }

    pub fn poll(&self, timeout: Duration) -> io::Result<bool> {
        poll(timeout)
    }

    /// Blocks until an event the field cares about arrives.
    pub fn read_event(&mut self) -> io::Result<TerminalEvent> {
        loop {
            match read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if let Some(command) = map_key_event(key) {
                        return Ok(TerminalEvent::Edit(command));
                    }
                }
                Event::Paste(text) => {
                    return Ok(TerminalEvent::Edit(super::EditCommand::Paste(text)));
                }
                Event::Resize(width, height) => {
                    self.size = Size { width, height };
                    return Ok(TerminalEvent::Resize { width, height });
                }
                _ => continue,
            }
        }
    }

    /// Redraws the current line as `prompt` followed by the field, with
    /// guide glyphs dimmed, and parks the cursor at the field caret.
    pub fn draw_field(&mut self, prompt: &str, field: &MaskedField) -> io::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveToColumn(0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            Print(prompt),
        )?;

        for (idx, ch) in field.value().chars().enumerate() {
            if field.is_guide_at(idx) {
                queue!(
                    self.stdout,
                    SetAttribute(Attribute::Dim),
                    Print(ch),
                    SetAttribute(Attribute::Reset),
                )?;
            } else {
                queue!(self.stdout, Print(ch))?;
            }
        }

        let column = prompt.width() + field.display_column();
        let column = u16::try_from(column).unwrap_or(u16::MAX).min(self.size.width.saturating_sub(1));
        queue!(self.stdout, cursor::MoveToColumn(column))?;
        self.stdout.flush()
    }

    /// Moves below the edited line so later output does not overwrite it.
    pub fn finish_line(&mut self) -> io::Result<()> {
        queue!(self.stdout, Print("\r\n"))?;
        self.stdout.flush()
    }
}
