//! Clipboard sink: a system clipboard tool, with a terminal escape fallback

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Mutex;

use anyhow::Context;
use base64::Engine;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::utils::find_program;

/// Clipboard tools tried in order, with the arguments that make them read stdin
const CLIPBOARD_TOOLS: &[&[&str]] = &[
    &["pbcopy"],
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
    &["clip.exe"],
];

/// Something that can place text on a clipboard
pub trait ClipboardBackend {
    fn name(&self) -> &str;

    fn set_text(&self, text: &str) -> anyhow::Result<()>;
}

/// Which mechanism ended up holding the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Primary(String),
    Fallback(String),
}

impl CopyOutcome {
    pub fn backend(&self) -> &str {
        match self {
            Self::Primary(name) | Self::Fallback(name) => name,
        }
    }

    pub fn used_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// The platform clipboard, reached through an installed command-line tool
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    program: Option<(PathBuf, Vec<String>)>,
}

impl SystemClipboard {
    /// Find the first installed clipboard tool
    pub fn detect() -> Self {
        let program = CLIPBOARD_TOOLS.iter().find_map(|argv| {
            find_program(argv[0]).map(|path| {
                debug!(tool = argv[0], "Found clipboard tool");
                (path, argv[1..].iter().map(|s| s.to_string()).collect())
            })
        });
        Self { program }
    }

    /// Use a specific tool, e.g. from tests
    pub fn with_program(path: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: Some((path.into(), args)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.program.is_some()
    }
}

impl ClipboardBackend for SystemClipboard {
    fn name(&self) -> &str {
        "system clipboard"
    }

    fn set_text(&self, text: &str) -> anyhow::Result<()> {
        let (program, args) = self
            .program
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no clipboard tool installed"))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // stdin is closed at the end of the arm so the tool sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        let status = child.wait()?;
        written.with_context(|| format!("failed to write to {}", program.display()))?;
        if !status.success() {
            anyhow::bail!("{} exited with {}", program.display(), status);
        }
        Ok(())
    }
}

/// Terminal selection via the OSC 52 escape sequence
pub struct TerminalClipboard<W: Write> {
    out: Mutex<W>,
}

impl TerminalClipboard<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalClipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// The escape sequence that asks the terminal to set its clipboard
    pub fn escape_sequence(text: &str) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
        format!("\x1b]52;c;{}\x07", encoded)
    }
}

impl<W: Write> ClipboardBackend for TerminalClipboard<W> {
    fn name(&self) -> &str {
        "terminal selection"
    }

    fn set_text(&self, text: &str) -> anyhow::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("terminal writer poisoned"))?;
        out.write_all(Self::escape_sequence(text).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Copy already-built text, trying `primary` then `fallback`.
///
/// When both fail the text is untouched and still available to save.
pub fn copy_to_clipboard(
    text: &str,
    primary: &dyn ClipboardBackend,
    fallback: &dyn ClipboardBackend,
) -> Result<CopyOutcome> {
    let primary_err = match primary.set_text(text) {
        Ok(()) => {
            info!(backend = primary.name(), "Copied CSV to clipboard");
            return Ok(CopyOutcome::Primary(primary.name().to_string()));
        }
        Err(e) => e,
    };
    warn!(backend = primary.name(), error = %primary_err, "Clipboard copy failed, trying fallback");

    match fallback.set_text(text) {
        Ok(()) => {
            info!(backend = fallback.name(), "Copied CSV via fallback");
            Ok(CopyOutcome::Fallback(fallback.name().to_string()))
        }
        Err(fallback_err) => {
            warn!(error = %fallback_err, "Fallback copy failed");
            Err(Error::ClipboardDenied {
                primary: primary_err.to_string(),
                fallback: fallback_err.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        fail: bool,
        seen: RefCell<Vec<String>>,
    }

    impl Recorder {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl ClipboardBackend for Recorder {
        fn name(&self) -> &str {
            if self.fail {
                "broken"
            } else {
                "recorder"
            }
        }

        fn set_text(&self, text: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("permission denied");
            }
            self.seen.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_primary_used_when_it_works() {
        let primary = Recorder::new(false);
        let fallback = Recorder::new(false);

        let outcome = copy_to_clipboard("a,b", &primary, &fallback).unwrap();

        assert_eq!(outcome, CopyOutcome::Primary("recorder".into()));
        assert_eq!(primary.seen.borrow().as_slice(), ["a,b"]);
        assert!(fallback.seen.borrow().is_empty());
    }

    #[test]
    fn test_fallback_after_primary_denied() {
        let primary = Recorder::new(true);
        let fallback = TerminalClipboard::new(Vec::new());

        let outcome = copy_to_clipboard("hi", &primary, &fallback).unwrap();

        assert!(outcome.used_fallback());
        assert_eq!(outcome.backend(), "terminal selection");
        assert_eq!(fallback.into_inner(), b"\x1b]52;c;aGk=\x07".to_vec());
    }

    #[test]
    fn test_both_failing_reports_denied() {
        let err = copy_to_clipboard("x", &Recorder::new(true), &Recorder::new(true)).unwrap_err();
        match err {
            Error::ClipboardDenied { primary, fallback } => {
                assert_eq!(primary, "permission denied");
                assert_eq!(fallback, "permission denied");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_system_clipboard_without_tool_fails() {
        let clipboard = SystemClipboard { program: None };
        assert!(!clipboard.is_available());
        assert!(clipboard.set_text("x").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_clipboard_pipes_text_to_tool() {
        let dir = tempfile::tempdir().unwrap();
        let sink = dir.path().join("clip.txt");
        let clipboard = SystemClipboard::with_program(
            "sh",
            vec!["-c".into(), format!("cat > '{}'", sink.display())],
        );

        clipboard.set_text("Category,Material,Quantity").unwrap();

        assert_eq!(
            std::fs::read_to_string(&sink).unwrap(),
            "Category,Material,Quantity"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_system_clipboard_reports_tool_failure() {
        let clipboard = SystemClipboard::with_program("sh", vec!["-c".into(), "exit 3".into()]);
        assert!(clipboard.set_text("x").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_exiting_before_reading_is_reaped() {
        let clipboard = SystemClipboard::with_program("sh", vec!["-c".into(), "exit 0".into()]);
        let text = "Agnostic,Vellum,1\n".repeat(64 * 1024);

        let err = clipboard.set_text(&text).unwrap_err();
        assert!(err.to_string().starts_with("failed to write to"), "{err:#}");
    }
}
