//! Application state and logic

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use arch_assist_core::{
    copy_to_clipboard, AppManifest, Capture, CaptureError, CaptureFlow, CaptureStep,
    CaptureTicket, Catalog, CatalogStatus, ClipboardBackend, Config, CsvDocument, FlowState,
    FlowUpdate, HostSession, Status, StatusLevel, SystemClipboard, TerminalClipboard,
    TranscriptionForm,
};
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use tracing::{info, warn};

use crate::event::{self, QuantityEdit};
use crate::screens;

/// Excavation amber accent
pub const ACCENT: Color = Color::Rgb(230, 170, 60);
/// Main text color
pub const TEXT: Color = Color::Rgb(225, 220, 205);
/// Subtle/dimmed text color
pub const SUBTLE: Color = Color::Rgb(150, 145, 130);
/// Success indicator color
pub const SUCCESS: Color = Color::Green;
/// Warning indicator color
pub const WARNING: Color = Color::Yellow;
/// Error indicator color
pub const ERROR: Color = Color::Red;
/// Background for the selected form row
pub const SELECTION_BG: Color = Color::Rgb(70, 60, 45);

/// Color for a status message of the given level
pub fn status_color(level: StatusLevel) -> Color {
    match level {
        StatusLevel::Info => TEXT,
        StatusLevel::Success => SUCCESS,
        StatusLevel::Warning => WARNING,
        StatusLevel::Error => ERROR,
    }
}

/// Messages sent from the UI to the worker
#[derive(Debug)]
pub enum WorkerMessage {
    Capture(CaptureTicket),
    LoadCatalog(PathBuf),
    Shutdown,
}

/// Messages sent from the worker to the UI
#[derive(Debug)]
pub enum AppMessage {
    CaptureFinished {
        ticket: CaptureTicket,
        result: Result<Capture, CaptureError>,
    },
    CatalogLoaded(arch_assist_core::Result<Catalog>),
}

/// Which screen is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// No capture host; informational notice only
    Standalone,
    /// The two-step capture flow
    Capture,
    /// Quantity transcription
    Form { selected: usize },
    Help {
        /// The screen to return to when help is closed
        previous: Box<Screen>,
    },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standalone => "Standalone",
            Self::Capture => "Capture",
            Self::Form { .. } => "Form",
            Self::Help { .. } => "Help",
        }
    }
}

/// Main application state
pub struct App {
    pub screen: Screen,
    pub should_quit: bool,

    pub manifest: AppManifest,
    pub backend_name: Option<&'static str>,
    pub standalone_notice: String,

    pub flow: CaptureFlow,
    pub status: Status,
    pub catalog: CatalogStatus,
    pub form: Option<TranscriptionForm>,
    pub last_export: Option<PathBuf>,

    catalog_path: PathBuf,
    export_dir: PathBuf,
    /// The form is waiting on a catalog load
    form_pending: bool,

    clipboard: Box<dyn ClipboardBackend>,
    clipboard_fallback: Box<dyn ClipboardBackend>,

    // Worker communication
    pub worker_tx: Sender<WorkerMessage>,
    pub worker_rx: Receiver<AppMessage>,
}

impl App {
    /// Create a new application instance
    pub fn new(session: &HostSession, config: &Config) -> Self {
        let (worker_tx, _worker_rx) = mpsc::channel::<WorkerMessage>();
        let (_app_tx, worker_rx) = mpsc::channel::<AppMessage>();

        let adapter = session.mode.adapter();
        let screen = if session.mode.is_attached() {
            Screen::Capture
        } else {
            Screen::Standalone
        };

        Self {
            screen,
            should_quit: false,
            manifest: session.manifest.clone(),
            backend_name: adapter.backend_name(),
            standalone_notice: session.standalone_notice(),
            flow: CaptureFlow::new(config.liveness_timeout()),
            status: Status::default(),
            catalog: CatalogStatus::default(),
            form: None,
            last_export: None,
            catalog_path: config.catalog_path.clone(),
            export_dir: config.export_dir.clone(),
            form_pending: false,
            clipboard: Box::new(SystemClipboard::detect()),
            clipboard_fallback: Box::new(TerminalClipboard::stdout()),
            worker_tx,
            worker_rx,
        }
    }

    /// Set up worker communication channels
    pub fn with_channels(
        mut self,
        worker_tx: Sender<WorkerMessage>,
        worker_rx: Receiver<AppMessage>,
    ) -> Self {
        self.worker_tx = worker_tx;
        self.worker_rx = worker_rx;
        self
    }

    /// Replace the clipboard sinks
    pub fn with_clipboards(
        mut self,
        primary: Box<dyn ClipboardBackend>,
        fallback: Box<dyn ClipboardBackend>,
    ) -> Self {
        self.clipboard = primary;
        self.clipboard_fallback = fallback;
        self
    }

    fn host_available(&self) -> bool {
        self.backend_name.is_some()
    }

    /// Handle a keyboard event
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Handle help screen - any key closes it
        if let Screen::Help { previous } = &self.screen {
            self.screen = (**previous).clone();
            return;
        }

        if event::is_quit(&key) {
            self.should_quit = true;
            return;
        }

        if event::is_help(&key) {
            let previous = Box::new(self.screen.clone());
            self.screen = Screen::Help { previous };
            return;
        }

        match self.screen.clone() {
            Screen::Standalone => self.handle_standalone_key(key),
            Screen::Capture => self.handle_capture_key(key),
            Screen::Form { selected } => self.handle_form_key(key, selected),
            Screen::Help { .. } => {}
        }
    }

    fn handle_standalone_key(&mut self, key: KeyEvent) {
        if event::is_key(&key, 's') {
            self.start_flow();
        }
    }

    fn handle_capture_key(&mut self, key: KeyEvent) {
        if let Some(step) = event::capture_step(&key) {
            self.request_capture(step);
        } else if event::is_key(&key, 's') {
            self.start_flow();
        } else if event::is_open_form(&key) {
            if self.form.is_some() {
                self.screen = Screen::Form { selected: 0 };
            } else if self.flow.state() == FlowState::Done {
                self.populate_form();
            }
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, selected: usize) {
        let Some(form) = self.form.as_mut() else {
            self.screen = Screen::Capture;
            return;
        };
        let last = form.len().saturating_sub(1);

        if let Some(edit) = event::quantity_edit(&key) {
            let result = match edit {
                QuantityEdit::Digit(c) => form.push_digit(selected, c),
                QuantityEdit::Erase => form.pop_digit(selected),
                QuantityEdit::Increment => form.increment(selected),
                QuantityEdit::Decrement => form.decrement(selected),
                QuantityEdit::Clear => form.set_quantity(selected, 0).map(|_| 0),
            };
            if let Err(e) = result {
                self.status = Status::warning(format!("Quantity not changed: {}", e));
            }
            return;
        }

        if event::is_down(&key) {
            self.screen = Screen::Form {
                selected: (selected + 1).min(last),
            };
        } else if event::is_up(&key) {
            self.screen = Screen::Form {
                selected: selected.saturating_sub(1),
            };
        } else if event::is_page_down(&key) {
            self.screen = Screen::Form {
                selected: (selected + 10).min(last),
            };
        } else if event::is_page_up(&key) {
            self.screen = Screen::Form {
                selected: selected.saturating_sub(10),
            };
        } else if event::is_key(&key, 'e') {
            self.export_to_file();
        } else if event::is_key(&key, 'c') {
            self.copy_to_clipboard();
        } else if event::is_key(&key, 's') {
            self.screen = Screen::Capture;
            self.start_flow();
        } else if event::is_escape(&key) {
            self.screen = Screen::Capture;
        }
    }

    /// Begin (or restart) the capture flow
    pub fn start_flow(&mut self) {
        self.status = self.flow.start(self.host_available(), Instant::now());
        self.form = None;
        self.form_pending = false;
    }

    /// Dispatch a capture to the worker if the flow allows it
    pub fn request_capture(&mut self, step: CaptureStep) {
        let ticket = match self.flow.begin_capture(step) {
            Ok(ticket) => ticket,
            Err(rejection) => {
                self.status = Status::warning(format!("{}.", capitalize(&rejection.to_string())));
                return;
            }
        };

        self.status = step.capturing_status();
        if self.worker_tx.send(WorkerMessage::Capture(ticket)).is_err() {
            warn!("capture worker is not running");
            let update = self.flow.complete_capture(
                ticket,
                Err(CaptureError::CaptureFailed("capture worker stopped".to_string())),
            );
            self.apply_flow_update(update);
        }
    }

    fn apply_flow_update(&mut self, update: FlowUpdate) {
        match update {
            FlowUpdate::Stale => {}
            FlowUpdate::Retry(status) | FlowUpdate::Advanced(status) => self.status = status,
            FlowUpdate::Completed(status) => {
                self.status = status;
                self.populate_form();
            }
        }
    }

    /// Build the form from the catalog, loading it first if needed
    fn populate_form(&mut self) {
        if let Some(catalog) = self.catalog.catalog() {
            self.form = Some(TranscriptionForm::new(catalog));
            self.form_pending = false;
            self.screen = Screen::Form { selected: 0 };
            return;
        }

        self.form_pending = true;
        if self.catalog.needs_load() {
            self.catalog = CatalogStatus::Loading;
            if self
                .worker_tx
                .send(WorkerMessage::LoadCatalog(self.catalog_path.clone()))
                .is_err()
            {
                self.catalog = CatalogStatus::Failed("catalog worker stopped".to_string());
                self.status = Status::error("Could not load the materials list: worker stopped.");
            }
        }
    }

    /// Process messages from the worker thread
    pub fn process_worker_messages(&mut self) {
        while let Ok(msg) = self.worker_rx.try_recv() {
            self.apply_message(msg);
        }
    }

    pub fn apply_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::CaptureFinished { ticket, result } => {
                let update = self.flow.complete_capture(ticket, result);
                self.apply_flow_update(update);
            }
            AppMessage::CatalogLoaded(result) => {
                self.catalog.finish(result);
                if let CatalogStatus::Failed(reason) = &self.catalog {
                    self.form_pending = false;
                    self.status =
                        Status::error(format!("Could not load the materials list: {}", reason));
                } else if let Some(catalog) = self.catalog.catalog() {
                    info!("materials catalog ready ({} entries)", catalog.len());
                    if self.form_pending {
                        self.populate_form();
                    }
                }
            }
        }
    }

    /// Periodic housekeeping between input events
    pub fn tick(&mut self, now: Instant) {
        if let Some(status) = self.flow.poll_liveness(now) {
            self.status = status;
        }
    }

    fn build_document(&mut self) -> Option<CsvDocument> {
        let form = self.form.as_ref()?;
        match CsvDocument::from_rows(&form.rows()) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("building CSV failed: {}", e);
                self.status = Status::error(format!("Could not build CSV: {}", e));
                None
            }
        }
    }

    /// Save the CSV to the export folder
    pub fn export_to_file(&mut self) {
        let Some(doc) = self.build_document() else {
            return;
        };
        match doc.save(&self.export_dir) {
            Ok(path) => {
                self.status = Status::success(format!(
                    "Saved {} rows to {}",
                    doc.row_count(),
                    path.display()
                ));
                self.last_export = Some(path);
            }
            Err(e) => {
                warn!("saving CSV failed: {}", e);
                self.status = Status::error(format!("Could not save CSV: {}", e));
            }
        }
    }

    /// Copy the CSV text to the clipboard
    pub fn copy_to_clipboard(&mut self) {
        let Some(doc) = self.build_document() else {
            return;
        };
        self.status = match copy_to_clipboard(
            &doc.text,
            self.clipboard.as_ref(),
            self.clipboard_fallback.as_ref(),
        ) {
            Ok(outcome) if outcome.used_fallback() => Status::success(format!(
                "CSV copied via {} (system clipboard unavailable).",
                outcome.backend()
            )),
            Ok(_) => Status::success("CSV copied to clipboard."),
            Err(e) => Status::error(format!("{}. Press [E] to save the CSV instead.", e)),
        };
    }

    /// Render the application
    pub fn render(&self, frame: &mut Frame) {
        screens::render(frame, self);
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
