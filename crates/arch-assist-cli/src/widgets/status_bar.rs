//! Status bar widget showing the current status message

use arch_assist_core::{FlowState, Status};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{status_color, ACCENT, SUBTLE, WARNING};

/// Render the status line with flow state and capture backend
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    status: &Status,
    state: FlowState,
    backend: Option<&str>,
) {
    let (backend_text, backend_color) = match backend {
        Some(name) => (name, SUBTLE),
        None => ("no capture host", WARNING),
    };

    let status_line = Line::from(vec![
        Span::styled(" \u{25C6} ", Style::default().fg(ACCENT)),
        Span::styled(status.text.clone(), Style::default().fg(status_color(status.level))),
        Span::styled("  \u{2502} ", Style::default().fg(SUBTLE)), // Separator
        Span::styled(state.to_string(), Style::default().fg(SUBTLE)),
        Span::styled(" \u{2502} ", Style::default().fg(SUBTLE)),
        Span::styled(backend_text, Style::default().fg(backend_color)),
    ]);

    let bar = Paragraph::new(status_line).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(SUBTLE)),
    );

    frame.render_widget(bar, area);
}
