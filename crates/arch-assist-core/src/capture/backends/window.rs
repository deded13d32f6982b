//! Game window capture using the Windows Graphics Capture API.
//!
//! Only compiled on Windows with the `vision` feature. Captures a single
//! frame of the first visible window whose title contains the configured
//! text (the RuneScape client by default).

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use tracing::debug;
use windows_capture::{
    capture::{Context as CaptureContext, GraphicsCaptureApiHandler},
    frame::{Frame, ImageFormat},
    graphics_capture_api::InternalCaptureControl,
    settings::{
        ColorFormat, CursorCaptureSettings, DirtyRegionSettings, DrawBorderSettings,
        MinimumUpdateIntervalSettings, SecondaryWindowSettings, Settings,
    },
    window::Window,
};

use crate::capture::backend::{CaptureBackend, HostReply};
use crate::capture::host_image::EncodedImage;

struct FrameSlot {
    png: Option<Vec<u8>>,
    temp_path: std::path::PathBuf,
}

struct SingleFrameCapture {
    slot: Arc<Mutex<FrameSlot>>,
}

impl GraphicsCaptureApiHandler for SingleFrameCapture {
    type Flags = Arc<Mutex<FrameSlot>>;
    type Error = Box<dyn std::error::Error + Send + Sync>;

    fn new(ctx: CaptureContext<Self::Flags>) -> Result<Self, Self::Error> {
        Ok(Self { slot: ctx.flags })
    }

    fn on_frame_arrived(
        &mut self,
        frame: &mut Frame,
        capture_control: InternalCaptureControl,
    ) -> Result<(), Self::Error> {
        let temp_path = self
            .slot
            .lock()
            .map_err(|e| format!("Lock error: {}", e))?
            .temp_path
            .clone();

        let mut buffer = frame.buffer()?;
        buffer.save_as_image(&temp_path, ImageFormat::Png)?;
        let png = std::fs::read(&temp_path)?;
        let _ = std::fs::remove_file(&temp_path);

        if let Ok(mut slot) = self.slot.lock() {
            slot.png = Some(png);
        }

        capture_control.stop();
        Ok(())
    }

    fn on_closed(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Captures the game client window
#[derive(Debug, Clone)]
pub struct WindowBackend {
    title_hint: String,
}

impl WindowBackend {
    pub fn new(title_hint: impl Into<String>) -> Self {
        Self {
            title_hint: title_hint.into(),
        }
    }

    fn find_window(&self) -> anyhow::Result<Window> {
        let needle = self.title_hint.to_lowercase();
        Window::enumerate()
            .map_err(|e| anyhow!("Failed to enumerate windows: {}", e))?
            .into_iter()
            .filter(|window| window.is_valid())
            .find(|window| {
                window
                    .title()
                    .map(|title| title.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .ok_or_else(|| anyhow!("No {} window found. Make sure the game is running.", self.title_hint))
    }
}

impl CaptureBackend for WindowBackend {
    fn name(&self) -> &'static str {
        "windows-graphics-capture"
    }

    fn is_present(&self) -> bool {
        self.find_window().is_ok()
    }

    fn capture(&self) -> anyhow::Result<HostReply> {
        let window = self.find_window()?;
        let title = window.title().unwrap_or_default();
        debug!("capturing window {:?}", title);

        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let slot = Arc::new(Mutex::new(FrameSlot {
            png: None,
            temp_path: std::env::temp_dir().join(format!("arch_assist_capture_{}.png", stamp)),
        }));

        let settings = Settings::new(
            window,
            CursorCaptureSettings::WithoutCursor,
            DrawBorderSettings::WithoutBorder,
            SecondaryWindowSettings::Default,
            MinimumUpdateIntervalSettings::Default,
            DirtyRegionSettings::Default,
            ColorFormat::Rgba8,
            Arc::clone(&slot),
        );

        // blocks until the first frame arrives
        SingleFrameCapture::start(settings).map_err(|e| anyhow!("Capture failed: {}", e))?;

        let png = slot
            .lock()
            .map_err(|_| anyhow!("Failed to lock capture result"))?
            .png
            .take()
            .context("No frame captured")?;

        Ok(HostReply::image(Arc::new(EncodedImage::new(png, title))))
    }
}
