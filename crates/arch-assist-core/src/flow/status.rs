//! Status messages and control enablement reported by the flow

use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// The single human-readable line shown in the status area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub level: StatusLevel,
    pub text: String,
}

impl Status {
    pub fn new(level: StatusLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(StatusLevel::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(StatusLevel::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(StatusLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(StatusLevel::Error, text)
    }

    /// Status for a failed capture of the given step
    pub fn for_capture_error(step: super::CaptureStep, err: &CaptureError) -> Self {
        match err {
            CaptureError::HostUnavailable => Self::error(format!(
                "Capture host not detected. {}",
                err.remediation()
            )),
            CaptureError::CaptureFailed(detail) => Self::error(format!(
                "Failed to capture {}: {}. {}",
                step.label(),
                detail,
                err.remediation()
            )),
            CaptureError::UnknownImageFormat(_) => Self::error(format!(
                "{} returned an image in an unknown format. {}",
                step.label(),
                err.remediation()
            )),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::info("Press [S] to start capturing your Material Storage.")
    }
}

/// Which controls may be pressed right now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub capture_first: bool,
    pub capture_second: bool,
}
