//! Host image handles and preview derivation

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::{debug, warn};

use crate::error::{CaptureError, Error, Result};

/// Raw RGBA pixel data, row-major, 4 bytes per pixel
#[derive(Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl fmt::Debug for RgbaFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RgbaFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// An image handle returned by a capture backend.
///
/// Backends expose whichever representation they naturally have; every
/// accessor is optional and they are tried in declaration order when
/// deriving a preview.
pub trait HostImage: Send + Sync + fmt::Debug {
    /// Already-encoded PNG bytes
    fn encoded_png(&self) -> Option<Vec<u8>> {
        None
    }

    /// Decoded RGBA pixels
    fn rgba_frame(&self) -> Option<RgbaFrame> {
        None
    }

    /// Description used in diagnostic logs
    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

/// Shared handle to a host image
pub type SharedImage = Arc<dyn HostImage>;

/// Image bytes of a format decided at read time (PNG, JPEG, BMP, ...)
#[derive(Clone)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    origin: String,
}

impl EncodedImage {
    pub fn new(bytes: Vec<u8>, origin: impl Into<String>) -> Self {
        Self {
            bytes,
            origin: origin.into(),
        }
    }

    fn format(&self) -> Option<ImageFormat> {
        image::guess_format(&self.bytes).ok()
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("origin", &self.origin)
            .field("bytes", &self.bytes.len())
            .field("format", &self.format())
            .finish()
    }
}

impl HostImage for EncodedImage {
    fn encoded_png(&self) -> Option<Vec<u8>> {
        (self.format() == Some(ImageFormat::Png)).then(|| self.bytes.clone())
    }

    fn rgba_frame(&self) -> Option<RgbaFrame> {
        let decoded = image::load_from_memory(&self.bytes).ok()?.to_rgba8();
        Some(RgbaFrame {
            width: decoded.width(),
            height: decoded.height(),
            pixels: decoded.into_raw(),
        })
    }
}

/// Displayable form of a capture: a PNG encoding plus its dimensions
#[derive(Clone, PartialEq, Eq)]
pub struct Preview {
    png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl fmt::Debug for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preview")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

impl Preview {
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,...` URL for embedding the preview
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }

    /// Save the preview as a PNG file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.png)
            .map_err(|e| Error::Other(format!("Failed to save capture: {}", e)))
    }
}

fn preview_from_png(png: Vec<u8>) -> Option<Preview> {
    match image::load_from_memory_with_format(&png, ImageFormat::Png) {
        Ok(decoded) => Some(Preview {
            width: decoded.width(),
            height: decoded.height(),
            png,
        }),
        Err(e) => {
            debug!("png accessor returned undecodable data: {}", e);
            None
        }
    }
}

fn preview_from_rgba(frame: RgbaFrame) -> Option<Preview> {
    let RgbaFrame {
        width,
        height,
        pixels,
    } = frame;
    let Some(buffer) = RgbaImage::from_raw(width, height, pixels) else {
        debug!("rgba accessor returned a buffer that does not match {}x{}", width, height);
        return None;
    };

    let mut png = Vec::new();
    if let Err(e) = DynamicImage::ImageRgba8(buffer).write_to(&mut Cursor::new(&mut png), ImageFormat::Png) {
        debug!("failed to encode rgba frame: {}", e);
        return None;
    }
    Some(Preview { png, width, height })
}

/// Derive a preview by trying each accessor convention in order
pub fn derive_preview(image: &dyn HostImage) -> std::result::Result<Preview, CaptureError> {
    if let Some(preview) = image.encoded_png().and_then(preview_from_png) {
        return Ok(preview);
    }
    if let Some(preview) = image.rgba_frame().and_then(preview_from_rgba) {
        return Ok(preview);
    }

    let description = image.describe();
    warn!("unknown host image object: {}", description);
    Err(CaptureError::UnknownImageFormat(description))
}
