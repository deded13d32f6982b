//! Informational screen shown when no capture host is present

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{ACCENT, SUBTLE, TEXT};

pub fn render(frame: &mut Frame, area: Rect, notice: &str) {
    let mut lines = notice.lines();
    let title = lines.next().unwrap_or_default();

    let mut content = vec![
        Line::from(Span::styled(title.to_string(), Style::default().fg(ACCENT).bold())),
        Line::from(""),
    ];
    content.extend(
        lines
            .filter(|line| !line.is_empty())
            .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(TEXT)))),
    );
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "Configure capture.command or capture.screenshot_dir, then restart.",
        Style::default().fg(SUBTLE).italic(),
    )));

    let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(SUBTLE)),
        );

    frame.render_widget(paragraph, area);
}
