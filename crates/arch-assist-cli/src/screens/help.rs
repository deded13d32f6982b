//! Help screen showing keyboard shortcuts

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{ACCENT, SUBTLE, TEXT};

pub fn render(frame: &mut Frame, area: Rect) {
    // Calculate modal size and position (centered)
    let width = 48;
    let height = 22;
    let modal_area = centered_rect(width, height, area);

    // Clear the background
    frame.render_widget(Clear, modal_area);

    // Modal block
    let block = Block::default()
        .title(Span::styled(
            " Keyboard Shortcuts ",
            Style::default().fg(ACCENT).bold(),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let lines = vec![
        Line::from(Span::styled("Capture", Style::default().fg(ACCENT).bold())),
        shortcut_line("s", "Start (or restart) capturing"),
        shortcut_line("1", "Capture Screen 1 (pre-scroll)"),
        shortcut_line("2", "Capture Screen 2 (post-scroll)"),
        shortcut_line("Enter", "Open the quantities form"),
        Line::from(""),
        Line::from(Span::styled("Quantities", Style::default().fg(ACCENT).bold())),
        shortcut_line("0-9 / Bksp", "Type or erase digits"),
        shortcut_line("+ / -", "Adjust by one"),
        shortcut_line("Del", "Clear to zero"),
        shortcut_line("\u{2191}/\u{2193} or j/k", "Move selection"),
        shortcut_line("e", "Export CSV file"),
        shortcut_line("c", "Copy CSV to clipboard"),
        shortcut_line("Esc", "Back to capture"),
        Line::from(""),
        Line::from(Span::styled("General", Style::default().fg(ACCENT).bold())),
        shortcut_line("?/h", "This help screen"),
        shortcut_line("q", "Quit application"),
    ];

    let help_text = Paragraph::new(lines);

    // Layout inside modal: help content + footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Help content
            Constraint::Length(2), // Footer
        ])
        .split(inner);

    frame.render_widget(help_text, chunks[0]);

    let footer = Paragraph::new(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(SUBTLE).italic(),
    )))
    .alignment(Alignment::Center);

    // Render separator line and footer
    let separator = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(ACCENT));
    frame.render_widget(separator, chunks[1]);

    let footer_inner = Rect::new(chunks[1].x, chunks[1].y + 1, chunks[1].width, 1);
    frame.render_widget(footer, footer_inner);
}

/// Create a formatted shortcut line with key and description
fn shortcut_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<14}", key), Style::default().fg(TEXT)),
        Span::styled(description.to_string(), Style::default().fg(SUBTLE)),
    ])
}

fn centered_rect(width: u16, height: u16, parent: Rect) -> Rect {
    let x = parent.x + (parent.width.saturating_sub(width)) / 2;
    let y = parent.y + (parent.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(parent.width), height.min(parent.height))
}
