//! Screen rendering and routing

mod capture;
mod form;
mod help;
mod standalone;

use crate::app::{App, Screen};
use crate::widgets::{self, Hint};
use arch_assist_core::FlowState;
use ratatui::prelude::*;

/// Render the current screen based on app state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Create main layout with header, status and footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(2), // Status
            Constraint::Length(3), // Footer
        ])
        .split(area);

    widgets::render_header(frame, chunks[0], &app.manifest.app_name);
    widgets::render_status_bar(frame, chunks[2], &app.status, app.flow.state(), app.backend_name);

    let hints = get_hints(app, &app.screen);
    widgets::render_footer(frame, chunks[3], &hints);

    match &app.screen {
        Screen::Help { previous } => {
            render_screen(frame, chunks[1], previous, app);
            help::render(frame, chunks[1]);
        }
        screen => render_screen(frame, chunks[1], screen, app),
    }
}

/// Render a specific screen (used for rendering the previous screen behind help)
fn render_screen(frame: &mut Frame, area: Rect, screen: &Screen, app: &App) {
    match screen {
        Screen::Standalone => standalone::render(frame, area, &app.standalone_notice),
        Screen::Capture => capture::render(frame, area, app),
        Screen::Form { selected } => form::render(frame, area, app, *selected),
        Screen::Help { previous } => render_screen(frame, area, previous, app),
    }
}

/// Get keyboard hints for the current screen
fn get_hints(app: &App, screen: &Screen) -> Vec<Hint> {
    match screen {
        Screen::Standalone => vec![Hint::new("?", "Help"), Hint::new("q", "Quit")],
        Screen::Capture => {
            let controls = app.flow.controls();
            let mut hints = vec![
                Hint::new("s", "Start").when(controls.start),
                Hint::new("1", "Capture Screen 1").when(controls.capture_first),
                Hint::new("2", "Capture Screen 2").when(controls.capture_second),
            ];
            if app.form.is_some() || app.flow.state() == FlowState::Done {
                hints.push(Hint::new("Enter", "Quantities"));
            }
            hints.push(Hint::new("?", "Help"));
            hints.push(Hint::new("q", "Quit"));
            hints
        }
        Screen::Form { .. } => vec![
            Hint::new("0-9", "Type"),
            Hint::new("+/-", "Adjust"),
            Hint::new("j/k", "Navigate"),
            Hint::new("e", "Export"),
            Hint::new("c", "Copy"),
            Hint::new("Esc", "Back"),
        ],
        Screen::Help { .. } => vec![Hint::new("Any key", "Close")],
    }
}
