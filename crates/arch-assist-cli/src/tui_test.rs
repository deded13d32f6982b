//! TUI Test Harness
//!
//! Provides programmatic control over the TUI for automated testing.
//! Uses ratatui's TestBackend to capture rendered output and stands in for
//! the background worker: requests the app sends are queued for inspection
//! and replies are injected through the same channel the worker uses.

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use arch_assist_core::capture::RgbaFrame;
use arch_assist_core::{
    AppManifest, Capture, CaptureAdapter, CaptureBackend, CaptureError, CaptureTicket, Catalog,
    ClipboardBackend, Config, HostImage, HostMode, HostReply, HostSession,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tempfile::TempDir;

use crate::app::{App, AppMessage, WorkerMessage};

#[derive(Debug)]
struct TestImage;

impl HostImage for TestImage {
    fn rgba_frame(&self) -> Option<RgbaFrame> {
        Some(RgbaFrame {
            width: 2,
            height: 2,
            pixels: vec![90; 16],
        })
    }
}

/// A backend that is always present; captures are answered by the harness
struct PresentBackend;

impl CaptureBackend for PresentBackend {
    fn name(&self) -> &'static str {
        "test-host"
    }

    fn is_present(&self) -> bool {
        true
    }

    fn capture(&self) -> anyhow::Result<HostReply> {
        anyhow::bail!("captures are answered by the harness")
    }
}

/// Clipboard that remembers what it was given
#[derive(Clone, Default)]
pub struct RecordingClipboard {
    pub texts: Rc<RefCell<Vec<String>>>,
    pub fail: bool,
}

impl ClipboardBackend for RecordingClipboard {
    fn name(&self) -> &str {
        "recording"
    }

    fn set_text(&self, text: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("clipboard denied");
        }
        self.texts.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// A capture as the worker would deliver it
pub fn test_capture() -> Capture {
    Capture::from_image(Arc::new(TestImage), "test-host").unwrap()
}

/// Test harness for the TUI application
pub struct TuiTestHarness {
    app: App,
    terminal: Terminal<TestBackend>,
    requests: Receiver<WorkerMessage>,
    replies: Sender<AppMessage>,
    clipboard: RecordingClipboard,
    temp_dir: TempDir,
}

impl TuiTestHarness {
    /// Harness with a capture host present
    pub fn attached(width: u16, height: u16) -> io::Result<Self> {
        let adapter = CaptureAdapter::probe(vec![Box::new(PresentBackend)]);
        Self::with_mode(HostMode::Attached(adapter), width, height)
    }

    /// Harness without any capture host
    pub fn standalone(width: u16, height: u16) -> io::Result<Self> {
        Self::with_mode(HostMode::Standalone, width, height)
    }

    /// Attached, default size (100x32)
    pub fn default_size() -> io::Result<Self> {
        Self::attached(100, 32)
    }

    fn with_mode(mode: HostMode, width: u16, height: u16) -> io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let config = Config {
            catalog_path: temp_dir.path().join("materials.json"),
            export_dir: temp_dir.path().join("exports"),
            ..Config::default()
        };
        let session = HostSession {
            manifest: AppManifest::default(),
            mode,
        };

        let (worker_tx, requests) = mpsc::channel();
        let (replies, app_rx) = mpsc::channel();
        let clipboard = RecordingClipboard::default();
        let failing = RecordingClipboard {
            fail: true,
            ..RecordingClipboard::default()
        };

        let app = App::new(&session, &config)
            .with_channels(worker_tx, app_rx)
            .with_clipboards(Box::new(failing), Box::new(clipboard.clone()));

        let terminal = Terminal::new(TestBackend::new(width, height))?;

        Ok(Self {
            app,
            terminal,
            requests,
            replies,
            clipboard,
            temp_dir,
        })
    }

    /// Get a reference to the app
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the app
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn screen_name(&self) -> &'static str {
        self.app.screen.name()
    }

    pub fn status_text(&self) -> &str {
        &self.app.status.text
    }

    pub fn export_dir(&self) -> PathBuf {
        self.temp_dir.path().join("exports")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.temp_dir.path().join("materials.json")
    }

    /// Texts that reached the fallback clipboard
    pub fn copied(&self) -> Vec<String> {
        self.clipboard.texts.borrow().clone()
    }

    /// Render the current frame and return the buffer contents as a string
    pub fn render(&mut self) -> io::Result<String> {
        self.terminal.draw(|frame| {
            self.app.render(frame);
        })?;

        let buffer = self.terminal.backend().buffer();
        let mut output = String::new();

        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                let cell = &buffer[(x, y)];
                output.push_str(cell.symbol());
            }
            output.push('\n');
        }

        Ok(output)
    }

    /// Send a key press to the app
    pub fn press_key(&mut self, code: KeyCode) {
        let event = KeyEvent::new(code, KeyModifiers::NONE);
        self.app.handle_key(event);
    }

    /// Press a character key
    pub fn char(&mut self, c: char) {
        self.press_key(KeyCode::Char(c));
    }

    pub fn enter(&mut self) {
        self.press_key(KeyCode::Enter);
    }

    pub fn escape(&mut self) {
        self.press_key(KeyCode::Esc);
    }

    pub fn up(&mut self) {
        self.press_key(KeyCode::Up);
    }

    pub fn down(&mut self) {
        self.press_key(KeyCode::Down);
    }

    pub fn backspace(&mut self) {
        self.press_key(KeyCode::Backspace);
    }

    /// Next request the app sent to the worker, if any
    pub fn next_request(&self) -> Option<WorkerMessage> {
        self.requests.try_recv().ok()
    }

    /// The capture ticket of the next request, panicking if it is not a capture
    pub fn expect_capture_request(&self) -> CaptureTicket {
        match self.next_request() {
            Some(WorkerMessage::Capture(ticket)) => ticket,
            other => panic!("expected a capture request, got {:?}", other),
        }
    }

    /// Deliver a worker reply and let the app process it
    pub fn reply(&mut self, msg: AppMessage) {
        self.replies.send(msg).unwrap();
        self.app.process_worker_messages();
    }

    pub fn finish_capture(&mut self, ticket: CaptureTicket, result: Result<Capture, CaptureError>) {
        self.reply(AppMessage::CaptureFinished { ticket, result });
    }

    /// Run both captures through to completion
    pub fn capture_both(&mut self) {
        self.char('s');
        self.char('1');
        let ticket = self.expect_capture_request();
        self.finish_capture(ticket, Ok(test_capture()));
        self.char('2');
        let ticket = self.expect_capture_request();
        self.finish_capture(ticket, Ok(test_capture()));
    }

    /// Answer a pending catalog load with the given document
    pub fn load_catalog(&mut self, json: &str) {
        match self.next_request() {
            Some(WorkerMessage::LoadCatalog(path)) => assert_eq!(path, self.catalog_path()),
            other => panic!("expected a catalog request, got {:?}", other),
        }
        let catalog = Catalog::from_json_str(json).map_err(arch_assist_core::Error::from);
        self.reply(AppMessage::CatalogLoaded(catalog));
    }

    pub fn exported_file(&self) -> Option<String> {
        let path = self.export_dir().join(arch_assist_core::EXPORT_FILE_NAME);
        std::fs::read_to_string(path).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_assist_core::{CatalogStatus, Error, FlowState, StatusLevel};
    use std::time::{Duration, Instant};

    const METALS: &str = r#"{"Metals": ["Iron", "Gold"]}"#;

    #[test]
    fn test_initial_screen_is_capture() {
        let mut harness = TuiTestHarness::default_size().unwrap();
        assert_eq!(harness.screen_name(), "Capture");

        let output = harness.render().unwrap();
        assert!(output.contains("Archaeology Assistant"));
        assert!(output.contains("Press [S] to start"));
        assert!(output.contains("test-host"));
    }

    #[test]
    fn test_standalone_shows_notice_and_host_error() {
        let mut harness = TuiTestHarness::standalone(100, 32).unwrap();
        assert_eq!(harness.screen_name(), "Standalone");
        assert!(harness.render().unwrap().contains("Note: this app needs a capture host"));

        harness.char('s');
        assert!(harness.status_text().contains("Capture host not detected"));
        assert_eq!(harness.app().status.level, StatusLevel::Error);
        assert_eq!(harness.app().flow.state(), FlowState::Idle);
        assert!(harness.next_request().is_none());
    }

    #[test]
    fn test_full_flow_to_export() {
        let mut harness = TuiTestHarness::default_size().unwrap();

        harness.char('s');
        assert!(harness.status_text().contains("Material Storage"));

        // Screen 2 is refused before Screen 1
        harness.char('2');
        assert!(harness.next_request().is_none());
        assert_eq!(harness.app().status.level, StatusLevel::Warning);

        harness.char('1');
        let ticket = harness.expect_capture_request();
        assert!(harness.render().unwrap().contains("capturing..."));

        // A second press while in flight dispatches nothing
        harness.char('1');
        assert!(harness.next_request().is_none());

        harness.finish_capture(ticket, Ok(test_capture()));
        assert_eq!(harness.app().flow.state(), FlowState::AwaitingSecond);
        assert!(harness.status_text().contains("Screen 1 captured"));

        harness.char('2');
        let ticket = harness.expect_capture_request();
        harness.finish_capture(ticket, Ok(test_capture()));
        assert_eq!(harness.app().flow.state(), FlowState::Done);
        assert!(matches!(harness.app().catalog, CatalogStatus::Loading));

        harness.load_catalog(METALS);
        assert_eq!(harness.screen_name(), "Form");
        let output = harness.render().unwrap();
        assert!(output.contains("Iron"));
        assert!(output.contains("Gold"));

        harness.char('3');
        harness.char('e');
        assert_eq!(
            harness.exported_file().as_deref(),
            Some("Category,Material,Quantity\nMetals,Iron,3\nMetals,Gold,0")
        );
        assert_eq!(harness.app().status.level, StatusLevel::Success);
    }

    #[test]
    fn test_copy_falls_back_when_clipboard_denied() {
        let mut harness = TuiTestHarness::default_size().unwrap();
        harness.capture_both();
        harness.load_catalog(METALS);

        harness.down();
        harness.char('7');
        harness.char('c');

        assert_eq!(
            harness.copied(),
            vec!["Category,Material,Quantity\nMetals,Iron,0\nMetals,Gold,7".to_string()]
        );
        assert!(harness.status_text().contains("via recording"));
    }

    #[test]
    fn test_failed_first_capture_can_be_retried() {
        let mut harness = TuiTestHarness::default_size().unwrap();
        harness.char('s');
        harness.char('1');
        let ticket = harness.expect_capture_request();

        harness.finish_capture(ticket, Err(CaptureError::CaptureFailed("boom".into())));
        assert!(harness.status_text().contains("boom"));
        assert_eq!(harness.app().flow.state(), FlowState::AwaitingFirst);
        assert!(harness.app().flow.controls().capture_first);

        harness.char('1');
        assert!(matches!(harness.next_request(), Some(WorkerMessage::Capture(_))));
    }

    #[test]
    fn test_restart_ignores_in_flight_result() {
        let mut harness = TuiTestHarness::default_size().unwrap();
        harness.char('s');
        harness.char('1');
        let stale = harness.expect_capture_request();

        harness.char('s');
        harness.finish_capture(stale, Ok(test_capture()));

        assert_eq!(harness.app().flow.state(), FlowState::AwaitingFirst);
        assert!(harness.app().flow.first().is_none());
    }

    #[test]
    fn test_catalog_failure_is_reported_and_retryable() {
        let mut harness = TuiTestHarness::default_size().unwrap();
        harness.capture_both();
        assert!(matches!(harness.next_request(), Some(WorkerMessage::LoadCatalog(_))));

        harness.reply(AppMessage::CatalogLoaded(Err(Error::CatalogLoad {
            path: harness.catalog_path(),
            reason: "missing".into(),
        })));
        assert_eq!(harness.screen_name(), "Capture");
        assert!(harness.status_text().contains("Could not load the materials list"));

        harness.enter();
        harness.load_catalog(METALS);
        assert_eq!(harness.screen_name(), "Form");
    }

    #[test]
    fn test_form_editing_keys() {
        let mut harness = TuiTestHarness::default_size().unwrap();
        harness.capture_both();
        harness.load_catalog(METALS);

        harness.char('-');
        harness.char('+');
        harness.char('+');
        harness.char('5');
        assert_eq!(harness.app().form.as_ref().unwrap().row(0).unwrap().quantity, 25);
        harness.backspace();
        assert_eq!(harness.app().form.as_ref().unwrap().row(0).unwrap().quantity, 2);

        harness.up();
        harness.down();
        harness.down();
        harness.down();
        assert_eq!(harness.app().screen, crate::app::Screen::Form { selected: 1 });

        harness.escape();
        assert_eq!(harness.screen_name(), "Capture");
        harness.enter();
        assert_eq!(harness.screen_name(), "Form");
    }

    #[test]
    fn test_liveness_hint_after_timeout() {
        let mut harness = TuiTestHarness::default_size().unwrap();
        harness.char('s');

        harness.app_mut().tick(Instant::now());
        assert_eq!(harness.app().status.level, StatusLevel::Info);

        harness
            .app_mut()
            .tick(Instant::now() + Duration::from_secs(30));
        assert_eq!(harness.app().status.level, StatusLevel::Warning);
        assert!(harness.status_text().contains("failing to capture"));
    }

    #[test]
    fn test_help_opens_and_closes() {
        let mut harness = TuiTestHarness::default_size().unwrap();
        harness.char('?');
        assert_eq!(harness.screen_name(), "Help");
        assert!(harness.render().unwrap().contains("Keyboard Shortcuts"));

        harness.char('x');
        assert_eq!(harness.screen_name(), "Capture");
    }

    #[test]
    fn test_quit() {
        let mut harness = TuiTestHarness::default_size().unwrap();
        harness.char('q');
        assert!(harness.app().should_quit);
    }
}
