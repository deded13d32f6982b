//! Quantity transcription form

use arch_assist_core::CatalogStatus;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use crate::app::{App, ACCENT, ERROR, SELECTION_BG, SUBTLE, TEXT};
use crate::widgets::get_spinner_frame;

pub fn render(frame: &mut Frame, area: Rect, app: &App, selected: usize) {
    let block = Block::default()
        .title(Span::styled(
            " Material Quantities ",
            Style::default().fg(ACCENT).bold(),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SUBTLE));

    let Some(form) = app.form.as_ref() else {
        let message = match &app.catalog {
            CatalogStatus::Failed(reason) => Line::from(Span::styled(
                format!("Materials list unavailable: {}", reason),
                Style::default().fg(ERROR),
            )),
            _ => Line::from(vec![
                Span::styled(get_spinner_frame(), Style::default().fg(ACCENT)),
                Span::styled(" Loading materials...", Style::default().fg(TEXT)),
            ]),
        };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    if form.is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            "The materials list is empty.",
            Style::default().fg(SUBTLE),
        ))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let rows: Vec<Row> = form
        .rows()
        .into_iter()
        .map(|row| {
            let quantity_style = if row.quantity > 0 {
                Style::default().fg(ACCENT)
            } else {
                Style::default().fg(SUBTLE)
            };
            Row::new(vec![
                Cell::from(Span::styled(row.entry.category, Style::default().fg(SUBTLE))),
                Cell::from(Span::styled(row.entry.name, Style::default().fg(TEXT))),
                Cell::from(Span::styled(row.quantity.to_string(), quantity_style)),
            ])
        })
        .collect();

    let header = Row::new(vec!["Category", "Material", "Quantity"])
        .style(Style::default().fg(ACCENT).bold())
        .bottom_margin(1);

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Min(20),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(SELECTION_BG).bold())
    .highlight_symbol("\u{25B6} ");

    let mut state = TableState::default().with_selected(Some(selected.min(form.len() - 1)));
    frame.render_stateful_widget(table, area, &mut state);
}
