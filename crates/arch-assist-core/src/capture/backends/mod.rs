//! Concrete capture backends, one per known host API shape

mod command;
mod screenshot_dir;
#[cfg(all(windows, feature = "vision"))]
mod window;

pub use command::CommandBackend;
pub use screenshot_dir::ScreenshotDirBackend;
#[cfg(all(windows, feature = "vision"))]
pub use window::WindowBackend;

use super::backend::CaptureBackend;
use crate::config::CaptureConfig;

/// Candidate backends in probe priority order
pub fn default_backends(config: &CaptureConfig) -> Vec<Box<dyn CaptureBackend>> {
    let mut backends: Vec<Box<dyn CaptureBackend>> = Vec::new();

    #[cfg(all(windows, feature = "vision"))]
    backends.push(Box::new(WindowBackend::new(config.window_title.clone())));

    if let Some(command) = config.command.as_deref().and_then(CommandBackend::from_argv) {
        backends.push(Box::new(command));
    }

    if let Some(dir) = &config.screenshot_dir {
        backends.push(Box::new(ScreenshotDirBackend::new(dir.clone())));
    }

    backends
}
