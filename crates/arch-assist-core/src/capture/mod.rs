//! Screen capture through whichever host capture API is available.
//!
//! ## Features
//!
//! - [`CaptureBackend`] - one known host API shape (window capture,
//!   screenshot command, screenshot folder)
//! - [`CaptureAdapter`] - probes backends once and exposes a single
//!   `async` [`CaptureAdapter::request_capture`]
//! - [`HostImage`] - image handle with optional accessors from which a
//!   [`Preview`] is derived
//!
//! ## Usage
//!
//! ```ignore
//! use arch_assist_core::capture::{default_backends, CaptureAdapter};
//!
//! let adapter = CaptureAdapter::probe(default_backends(&config.capture));
//! let capture = adapter.request_capture().await?;
//! capture.preview().save_to_file(std::path::Path::new("screen1.png"))?;
//! ```

mod adapter;
mod backend;
pub mod backends;
mod host_image;

pub use adapter::{Capture, CaptureAdapter};
pub use backend::{CaptureBackend, HostReply, PendingImage};
pub use backends::default_backends;
pub use host_image::{derive_preview, EncodedImage, HostImage, Preview, RgbaFrame, SharedImage};
