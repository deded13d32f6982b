//! CSV export of transcribed quantities and its output sinks

mod clipboard;
mod document;

pub use clipboard::{
    copy_to_clipboard, ClipboardBackend, CopyOutcome, SystemClipboard, TerminalClipboard,
};
pub use document::{build_csv, save_csv, CsvDocument, EXPORT_FILE_NAME, EXPORT_MIME};
