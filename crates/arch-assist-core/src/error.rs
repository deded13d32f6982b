//! Error types for arch-assist-core

use std::path::PathBuf;
use thiserror::Error;

/// Why a capture attempt produced no usable image.
///
/// The kinds are kept apart because the remediation differs: install or run
/// alongside a capture host, retry the same step, or report a bug.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No capture backend is present in this environment
    #[error("capture host not available")]
    HostUnavailable,

    /// A backend exists but the call failed or returned no image
    #[error("capture failed: {0}")]
    CaptureFailed(String),

    /// An image came back but none of the known accessors could render it
    #[error("captured image returned in unknown format: {0}")]
    UnknownImageFormat(String),
}

impl CaptureError {
    /// Whether pressing the same control again may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CaptureFailed(_))
    }

    /// Short advice shown next to the failure
    pub fn remediation(&self) -> &'static str {
        match self {
            Self::HostUnavailable => {
                "Run alongside a supported capture host (see the log for probed backends)."
            }
            Self::CaptureFailed(_) => "Check capture permissions and game focus, then try again.",
            Self::UnknownImageFormat(_) => "Check the log for details and report this as a bug.",
        }
    }
}

/// Main error type for arch-assist operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to load material catalog {path}: {reason}")]
    CatalogLoad { path: PathBuf, reason: String },

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("Clipboard unavailable ({primary}); fallback copy also failed ({fallback})")]
    ClipboardDenied { primary: String, fallback: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for arch-assist operations
pub type Result<T> = std::result::Result<T, Error>;
