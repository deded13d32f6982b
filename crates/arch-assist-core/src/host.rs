//! Identifying the app with its capture host

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::capture::{CaptureAdapter, CaptureBackend};

/// The application manifest (`appconfig.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppManifest {
    pub app_name: String,
    pub description: String,
    pub app_url: String,
    pub config_url: String,
    pub icon_url: String,
    pub default_width: u32,
    pub default_height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
    /// Comma-separated capability list
    pub permissions: String,
}

impl Default for AppManifest {
    fn default() -> Self {
        Self {
            app_name: "Archaeology Assistant".to_string(),
            description: String::new(),
            app_url: "./index.html".to_string(),
            config_url: "./appconfig.json".to_string(),
            icon_url: String::new(),
            default_width: 420,
            default_height: 560,
            min_width: 300,
            min_height: 300,
            max_width: 800,
            max_height: 1000,
            permissions: "pixel".to_string(),
        }
    }
}

impl AppManifest {
    /// Read the manifest, using defaults when it is missing or malformed
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("manifest {} unreadable, using defaults: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("manifest {} malformed, using defaults: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn permissions(&self) -> impl Iterator<Item = &str> {
        self.permissions
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions().any(|p| p.eq_ignore_ascii_case(name))
    }
}

/// How the app runs, decided once at startup
#[derive(Debug, Clone)]
pub enum HostMode {
    /// A capture backend is present; show the capture UI
    Attached(CaptureAdapter),
    /// No capture backend; show the informational screen only
    Standalone,
}

impl HostMode {
    pub fn adapter(&self) -> CaptureAdapter {
        match self {
            Self::Attached(adapter) => adapter.clone(),
            Self::Standalone => CaptureAdapter::unavailable(),
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached(_))
    }
}

/// Result of identifying with the host
#[derive(Debug, Clone)]
pub struct HostSession {
    pub manifest: AppManifest,
    pub mode: HostMode,
}

impl HostSession {
    /// Message shown in place of the capture UI when running standalone
    pub fn standalone_notice(&self) -> String {
        format!(
            "{}\n\nNote: this app needs a capture host (a game window capture, \
             a screenshot command or the game's screenshot folder). None was found.",
            self.manifest.app_name
        )
    }
}

/// Read the manifest and probe the capture backends
pub fn identify(manifest_path: &Path, backends: Vec<Box<dyn CaptureBackend>>) -> HostSession {
    let manifest = AppManifest::load(manifest_path);
    let adapter = CaptureAdapter::probe(backends);

    let mode = if adapter.is_available() {
        info!(
            backend = adapter.backend_name().unwrap_or_default(),
            "{} loaded successfully", manifest.app_name
        );
        HostMode::Attached(adapter)
    } else {
        info!("{} running standalone, no capture host", manifest.app_name);
        HostMode::Standalone
    };

    HostSession { manifest, mode }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::HostReply;

    struct Present(bool);

    impl CaptureBackend for Present {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn is_present(&self) -> bool {
            self.0
        }

        fn capture(&self) -> anyhow::Result<HostReply> {
            anyhow::bail!("not used")
        }
    }

    #[test]
    fn test_manifest_parses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appconfig.json");
        std::fs::write(
            &path,
            r#"{"appName": "Digs", "defaultWidth": 500, "permissions": "pixel, overlay"}"#,
        )
        .unwrap();

        let manifest = AppManifest::load(&path);
        assert_eq!(manifest.app_name, "Digs");
        assert_eq!(manifest.default_width, 500);
        assert_eq!(manifest.default_height, 560);
        assert!(manifest.has_permission("overlay"));
        assert!(!manifest.has_permission("gamestate"));
    }

    #[test]
    fn test_missing_or_malformed_manifest_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            AppManifest::load(&dir.path().join("missing.json")),
            AppManifest::default()
        );

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert_eq!(AppManifest::load(&bad), AppManifest::default());
    }

    #[test]
    fn test_identify_attached_with_present_backend() {
        let dir = tempfile::tempdir().unwrap();
        let session = identify(
            &dir.path().join("appconfig.json"),
            vec![Box::new(Present(false)), Box::new(Present(true))],
        );

        assert!(session.mode.is_attached());
        assert!(session.mode.adapter().is_available());
    }

    #[test]
    fn test_identify_standalone_without_backend() {
        let dir = tempfile::tempdir().unwrap();
        let session = identify(&dir.path().join("appconfig.json"), vec![Box::new(Present(false))]);

        assert!(!session.mode.is_attached());
        assert!(!session.mode.adapter().is_available());
        assert!(session.standalone_notice().starts_with("Archaeology Assistant"));
    }

    #[test]
    fn test_bundled_manifest_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../appconfig.json");
        let manifest = AppManifest::load(&path);
        assert_eq!(manifest.app_name, "Archaeology Assistant");
        assert!(manifest.has_permission("pixel"));
    }
}
