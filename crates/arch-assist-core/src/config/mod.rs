//! Configuration and path detection

mod paths;

pub use paths::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Default delay before the "nothing captured yet" hint
pub const DEFAULT_LIVENESS_TIMEOUT_SECS: u64 = 6;

/// Configuration for arch-assist
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Materials catalog document
    pub catalog_path: PathBuf,
    /// Application manifest used to identify with the capture host
    pub manifest_path: PathBuf,
    /// Folder exported CSV files are written to
    pub export_dir: PathBuf,
    /// Seconds before the capture flow shows a "still waiting" hint
    pub liveness_timeout_secs: u64,
    /// Capture backend settings
    pub capture: CaptureConfig,
}

/// Capture backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Text the game window title must contain (window capture)
    pub window_title: String,
    /// Screenshot command writing an image to stdout
    pub command: Option<Vec<String>>,
    /// Folder the game client saves screenshots to
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            window_title: "RuneScape".to_string(),
            command: detect_screenshot_command(),
            screenshot_dir: detect_screenshot_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/materials.json"),
            manifest_path: PathBuf::from("appconfig.json"),
            export_dir: default_export_dir(),
            liveness_timeout_secs: DEFAULT_LIVENESS_TIMEOUT_SECS,
            capture: CaptureConfig::default(),
        }
    }
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("arch-assist").join("config.json"))
    }

    /// Load config from disk, falling back to auto-detection if not found
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load a config file; a missing file is silent, an unreadable one is logged
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("Could not read config {}: {}; using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Malformed config {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse a config document; missing fields take their defaults
    pub fn from_json_str(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Save config to disk
    pub fn save(&self) -> std::io::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            std::fs::write(&path, content)?;
        }
        Ok(())
    }

    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_secs(self.liveness_timeout_secs)
    }
}
