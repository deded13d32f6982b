//! Two-step capture screen

use arch_assist_core::{Capture, CaptureStep, FlowState};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, ACCENT, SUBTLE, SUCCESS, TEXT};
use crate::widgets::get_spinner_frame;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(Span::styled(
            " Material Storage Capture ",
            Style::default().fg(ACCENT).bold(),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SUBTLE));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Instructions
            Constraint::Length(3), // Screen 1
            Constraint::Length(3), // Screen 2
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let instructions = Paragraph::new(vec![
        Line::from(Span::styled(
            "1. Open your Material Storage via the Journal and do not scroll.",
            Style::default().fg(TEXT),
        )),
        Line::from(Span::styled(
            "2. Capture Screen 1, scroll to the end, then capture Screen 2.",
            Style::default().fg(TEXT),
        )),
        Line::from(Span::styled(
            "3. Type the quantities you see into the form and export.",
            Style::default().fg(TEXT),
        )),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(instructions, chunks[0]);

    let in_flight = app.flow.in_flight().map(|ticket| ticket.step());
    render_step(
        frame,
        chunks[1],
        CaptureStep::First,
        app.flow.first(),
        in_flight == Some(CaptureStep::First),
        app.flow.state() == FlowState::AwaitingFirst,
    );
    render_step(
        frame,
        chunks[2],
        CaptureStep::Second,
        app.flow.second(),
        in_flight == Some(CaptureStep::Second),
        app.flow.state() == FlowState::AwaitingSecond,
    );

    if app.form.is_some() {
        let ready = Paragraph::new(Line::from(vec![
            Span::styled("Quantities form ready. Press ", Style::default().fg(SUBTLE)),
            Span::styled("[Enter]", Style::default().fg(ACCENT)),
            Span::styled(" to continue.", Style::default().fg(SUBTLE)),
        ]));
        frame.render_widget(ready, chunks[3]);
    }
}

fn render_step(
    frame: &mut Frame,
    area: Rect,
    step: CaptureStep,
    capture: Option<&Capture>,
    capturing: bool,
    awaiting: bool,
) {
    let detail = match capture {
        Some(capture) => Line::from(vec![
            Span::styled("\u{2714} ", Style::default().fg(SUCCESS)),
            Span::styled(
                format!(
                    "{}x{} at {} via {}",
                    capture.preview().width,
                    capture.preview().height,
                    capture.captured_at().format("%H:%M:%S"),
                    capture.backend()
                ),
                Style::default().fg(TEXT),
            ),
        ]),
        None if capturing => Line::from(vec![
            Span::styled(get_spinner_frame(), Style::default().fg(ACCENT)),
            Span::styled(" capturing...", Style::default().fg(TEXT)),
        ]),
        None if awaiting => Line::from(vec![
            Span::styled("\u{2022} ", Style::default().fg(ACCENT)),
            Span::styled(
                format!("press [{}] to capture", step.number()),
                Style::default().fg(TEXT),
            ),
        ]),
        None => Line::from(Span::styled("\u{2022} not captured", Style::default().fg(SUBTLE))),
    };

    let hint = match step {
        CaptureStep::First => "pre-scroll",
        CaptureStep::Second => "post-scroll",
    };
    let title = Line::from(vec![
        Span::styled(step.label(), Style::default().fg(ACCENT).bold()),
        Span::styled(format!(" ({})", hint), Style::default().fg(SUBTLE)),
    ]);

    frame.render_widget(Paragraph::new(vec![title, detail]), area);
}
