//! Footer widget with keyboard hints

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{ACCENT, SUBTLE, TEXT};

/// One key hint; disabled hints stay visible but dimmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub key: &'static str,
    pub action: &'static str,
    pub enabled: bool,
}

impl Hint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self {
            key,
            action,
            enabled: true,
        }
    }

    pub const fn when(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }
}

fn hint_spans(hint: &Hint) -> [Span<'static>; 2] {
    let (key_style, action_style) = if hint.enabled {
        (Style::default().fg(ACCENT), Style::default().fg(TEXT))
    } else {
        let dim = Style::default().fg(SUBTLE).add_modifier(Modifier::DIM);
        (dim, dim)
    };
    [
        Span::styled(format!("[{}]", hint.key), key_style),
        Span::styled(format!(" {}", hint.action), action_style),
    ]
}

/// Render the footer with keyboard hints
pub fn render_footer(frame: &mut Frame, area: Rect, hints: &[Hint]) {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.extend(hint_spans(hint));
    }

    let footer = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(SUBTLE)),
        );

    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_hint_is_dimmed() {
        let [key, _] = hint_spans(&Hint::new("2", "Capture Screen 2").when(false));
        assert_eq!(key.content, "[2]");
        assert!(key.style.add_modifier.contains(Modifier::DIM));

        let [key, _] = hint_spans(&Hint::new("1", "Capture Screen 1"));
        assert_eq!(key.style.fg, Some(ACCENT));
    }
}
