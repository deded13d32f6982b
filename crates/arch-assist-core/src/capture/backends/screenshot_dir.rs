//! Capture by picking up the newest screenshot the game client saved to disk

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use anyhow::Context;
use tracing::debug;

use crate::capture::backend::{CaptureBackend, HostReply};
use crate::capture::host_image::EncodedImage;

/// Watches a screenshot folder; each capture returns an image saved after
/// the previous one (or after the backend was created)
#[derive(Debug)]
pub struct ScreenshotDirBackend {
    dir: PathBuf,
    cursor: Mutex<Cursor>,
}

/// Newest image already handed out; only files at or after `since` qualify
#[derive(Debug)]
struct Cursor {
    since: SystemTime,
    last_taken: Option<PathBuf>,
}

impl ScreenshotDirBackend {
    /// Screenshots already in the folder are never returned
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::since(dir, SystemTime::now())
    }

    /// Only screenshots modified at or after `baseline` are returned
    pub fn since(dir: impl Into<PathBuf>, baseline: SystemTime) -> Self {
        Self {
            dir: dir.into(),
            cursor: Mutex::new(Cursor {
                since: baseline,
                last_taken: None,
            }),
        }
    }
}

/// Files whose extension names an image format the preview can decode
fn is_image_file(path: &Path) -> bool {
    image::ImageFormat::from_path(path).is_ok()
}

fn newest_image(dir: &Path, cursor: &Cursor) -> anyhow::Result<Option<(SystemTime, PathBuf)>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read screenshot folder {}", dir.display()))?;

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let path = entry.path();
        if !metadata.is_file() || !is_image_file(&path) {
            continue;
        }
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        if modified < cursor.since || cursor.last_taken.as_ref() == Some(&path) {
            continue;
        }
        // ties broken by name so the choice is stable
        let is_newer = match &newest {
            Some((time, best)) => modified > *time || (modified == *time && path > *best),
            None => true,
        };
        if is_newer {
            newest = Some((modified, path));
        }
    }
    Ok(newest)
}

impl CaptureBackend for ScreenshotDirBackend {
    fn name(&self) -> &'static str {
        "screenshot-folder"
    }

    fn is_present(&self) -> bool {
        self.dir.is_dir()
    }

    fn capture(&self) -> anyhow::Result<HostReply> {
        let mut cursor = self
            .cursor
            .lock()
            .map_err(|_| anyhow::anyhow!("screenshot folder state poisoned"))?;

        let Some((modified, path)) = newest_image(&self.dir, &cursor)? else {
            debug!("no new screenshot in {}", self.dir.display());
            return Ok(HostReply::Ready(None));
        };

        let bytes =
            std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        cursor.since = modified;
        cursor.last_taken = Some(path.clone());

        Ok(HostReply::image(Arc::new(EncodedImage::new(
            bytes,
            path.display().to_string(),
        ))))
    }
}
