//! Header widget

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{ACCENT, SUBTLE, TEXT};

/// Render the application header
pub fn render_header(frame: &mut Frame, area: Rect, app_name: &str) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled("\u{25C6}", Style::default().fg(ACCENT)), // Diamond
        Span::styled(format!(" {} ", app_name), Style::default().fg(TEXT).bold()),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled("\u{2502} ", Style::default().fg(Color::DarkGray)), // Separator
        Span::styled("Material Storage Transcriber", Style::default().fg(SUBTLE).italic()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .border_type(ratatui::widgets::BorderType::Rounded),
    );

    frame.render_widget(title, area);
}
