//! # arch-assist-core
//!
//! Core library for the Archaeology Assistant: capture the Material Storage
//! panel in two screens, transcribe material counts, export them as CSV.
//!
//! This crate provides the foundational functionality for:
//! - Loading the ordered materials catalog
//! - Capturing screens through whichever host capture API is present
//! - Driving the two-step capture flow as a pure state machine
//! - Editing transcribed quantities and exporting them as CSV
//!
//! ## Modules
//!
//! - [`capture`] - Capture backends and the capture adapter
//! - [`catalog`] - Materials catalog and its loader
//! - [`config`] - Configuration and path detection
//! - [`error`] - Error types and Result alias
//! - [`export`] - CSV building, file and clipboard sinks
//! - [`flow`] - Two-step capture flow controller
//! - [`form`] - Transcription form
//! - [`host`] - App manifest and host identification
//!
//! ## Example
//!
//! ```no_run
//! use arch_assist_core::{build_csv, Catalog, Config, TranscriptionForm};
//!
//! # async fn run() -> arch_assist_core::Result<()> {
//! let config = Config::load();
//! let catalog = Catalog::load(&config.catalog_path).await?;
//!
//! let mut form = TranscriptionForm::new(&catalog);
//! form.apply_input(0, "12").ok();
//! println!("{}", build_csv(&form.rows())?);
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod capture;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod flow;
pub mod form;
pub mod host;
pub mod utils;

// Re-export key types for convenience

// Error types
pub use error::{CaptureError, Error, Result};

// Catalog
pub use catalog::{Catalog, CatalogEntry, CatalogStatus, Category};

// Configuration
pub use config::{CaptureConfig, Config, DEFAULT_LIVENESS_TIMEOUT_SECS};

// Capture
pub use capture::{
    default_backends, Capture, CaptureAdapter, CaptureBackend, HostImage, HostReply, Preview,
    SharedImage,
};

// Capture flow
pub use flow::{
    CaptureFlow, CaptureStep, CaptureTicket, Controls, FlowRejection, FlowState, FlowUpdate,
    Status, StatusLevel,
};

// Transcription form
pub use form::{parse_quantity, QuantityInputError, QuantityRow, TranscriptionForm};

// Export
pub use export::{
    build_csv, copy_to_clipboard, save_csv, ClipboardBackend, CopyOutcome, CsvDocument,
    SystemClipboard, TerminalClipboard, EXPORT_FILE_NAME, EXPORT_MIME,
};

// Host identification
pub use host::{identify, AppManifest, HostMode, HostSession};
