//! Platform-specific detection of capture sources and output folders

use std::path::PathBuf;

use crate::utils::find_program;

/// Screenshot tools known to write a PNG to stdout, per platform
#[cfg(target_os = "linux")]
const SCREENSHOT_COMMANDS: &[&[&str]] = &[
    &["grim", "-"],
    &["maim"],
    &["import", "-window", "root", "png:-"],
];

#[cfg(target_os = "macos")]
const SCREENSHOT_COMMANDS: &[&[&str]] = &[&["screencapture", "-x", "-t", "png", "/dev/stdout"]];

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
const SCREENSHOT_COMMANDS: &[&[&str]] = &[];

/// Check if a path looks like the game client's screenshot folder
fn is_screenshot_dir(path: &PathBuf) -> bool {
    path.exists() && path.is_dir()
}

/// Detect an installed screenshot command
pub fn detect_screenshot_command() -> Option<Vec<String>> {
    SCREENSHOT_COMMANDS
        .iter()
        .find(|argv| find_program(argv[0]).is_some())
        .map(|argv| argv.iter().map(|s| s.to_string()).collect())
}

/// Detect the folder the RuneScape client saves screenshots to
pub fn detect_screenshot_dir() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(pictures) = dirs::picture_dir() {
        candidates.push(pictures.join("RuneScape"));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join("Jagex").join("RuneScape").join("screenshots"));
    }

    candidates.into_iter().find(is_screenshot_dir)
}

/// Default folder for exported CSV files
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from("."))
}
