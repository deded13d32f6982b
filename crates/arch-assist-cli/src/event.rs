//! Event handling for keyboard input

use std::time::Duration;

use arch_assist_core::CaptureStep;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

/// An edit to the selected quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityEdit {
    Digit(char),
    Erase,
    Increment,
    Decrement,
    Clear,
}

/// Poll for keyboard events with a timeout
pub fn poll(timeout: Duration) -> std::io::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            // Ignore key release events on Windows
            if key.kind == event::KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}

/// Check if a key event is a quit command
pub fn is_quit(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('q' | 'Q'),
            modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            ..
        } | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
    )
}

/// Check if a key event is an escape/back command
pub fn is_escape(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
}

/// Check if a key event is navigation down
pub fn is_down(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Char('j' | 'J'))
}

/// Check if a key event is navigation up
pub fn is_up(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::Char('k' | 'K'))
}

/// Check if a key event is a specific character (case-insensitive)
pub fn is_key(key: &KeyEvent, c: char) -> bool {
    matches!(key.code, KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&c))
}

/// Check if a key event is page down
pub fn is_page_down(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::PageDown)
}

/// Check if a key event is page up
pub fn is_page_up(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::PageUp)
}

/// The capture step a key triggers (`1` or `2`)
pub fn capture_step(key: &KeyEvent) -> Option<CaptureStep> {
    match key.code {
        KeyCode::Char('1') => Some(CaptureStep::First),
        KeyCode::Char('2') => Some(CaptureStep::Second),
        _ => None,
    }
}

/// The quantity edit a key performs on the form
pub fn quantity_edit(key: &KeyEvent) -> Option<QuantityEdit> {
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() => Some(QuantityEdit::Digit(c)),
        KeyCode::Backspace => Some(QuantityEdit::Erase),
        KeyCode::Char('+' | '=') => Some(QuantityEdit::Increment),
        KeyCode::Char('-') => Some(QuantityEdit::Decrement),
        KeyCode::Delete => Some(QuantityEdit::Clear),
        _ => None,
    }
}

/// Check if a key event opens the quantities form (Enter or f)
pub fn is_open_form(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter | KeyCode::Char('f' | 'F'))
}

/// Check if a key event is a help command (? or h)
pub fn is_help(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('?'),
            modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            ..
        } | KeyEvent {
            code: KeyCode::Char('h' | 'H'),
            modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            ..
        }
    )
}
