//! Uniform asynchronous capture over whichever backend is present

use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use super::backend::{CaptureBackend, HostReply};
use super::host_image::{derive_preview, Preview, SharedImage};
use crate::error::CaptureError;

/// One captured screen
#[derive(Debug, Clone)]
pub struct Capture {
    raw: SharedImage,
    preview: Preview,
    captured_at: DateTime<Local>,
    backend: &'static str,
}

impl Capture {
    /// Wrap an image handle, deriving its preview
    pub fn from_image(raw: SharedImage, backend: &'static str) -> Result<Self, CaptureError> {
        let preview = derive_preview(raw.as_ref())?;
        Ok(Self {
            raw,
            preview,
            captured_at: Local::now(),
            backend,
        })
    }

    /// The host's image handle, as returned
    pub fn raw(&self) -> &SharedImage {
        &self.raw
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    /// Name of the backend that produced this capture
    pub fn backend(&self) -> &'static str {
        self.backend
    }
}

/// Capture entry point selected once at startup
#[derive(Clone, Default)]
pub struct CaptureAdapter {
    backend: Option<Arc<dyn CaptureBackend>>,
}

impl std::fmt::Debug for CaptureAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureAdapter")
            .field("backend", &self.backend_name())
            .finish()
    }
}

impl CaptureAdapter {
    /// Select the first present backend, in the order given
    pub fn probe(candidates: Vec<Box<dyn CaptureBackend>>) -> Self {
        for candidate in candidates {
            if candidate.is_present() {
                info!("using capture backend {}", candidate.name());
                return Self {
                    backend: Some(Arc::from(candidate)),
                };
            }
            debug!("capture backend {} not present", candidate.name());
        }

        warn!("no capture backend present");
        Self::unavailable()
    }

    /// An adapter with no backend; every request fails with `HostUnavailable`
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.name())
    }

    /// Capture one screen.
    ///
    /// Synchronous and asynchronous hosts are awaited alike; the returned
    /// image must yield a preview through one of the known accessors.
    pub async fn request_capture(&self) -> Result<Capture, CaptureError> {
        let backend = self.backend.as_ref().ok_or(CaptureError::HostUnavailable)?;
        let name = backend.name();

        let reply = backend.capture().map_err(|e| {
            warn!("{} capture call failed: {:#}", name, e);
            CaptureError::CaptureFailed(format!("{:#}", e))
        })?;

        let image = match reply {
            HostReply::Ready(image) => image,
            HostReply::Pending(pending) => pending.await.map_err(|e| {
                warn!("{} capture rejected: {:#}", name, e);
                CaptureError::CaptureFailed(format!("{:#}", e))
            })?,
        };

        let raw = image.ok_or_else(|| {
            warn!("{} returned no image", name);
            CaptureError::CaptureFailed(format!("{} returned no image", name))
        })?;

        let capture = Capture::from_image(raw, name)?;
        debug!(
            "{} captured {}x{} ({} bytes)",
            name,
            capture.preview.width,
            capture.preview.height,
            capture.preview.png_bytes().len()
        );
        Ok(capture)
    }
}
