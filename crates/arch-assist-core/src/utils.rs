//! Utility functions shared across modules.

use std::path::{Path, PathBuf};

/// Resolve an executable the way a shell would.
///
/// Names containing a path separator are checked as-is; bare names are
/// searched for in each `PATH` entry (with `.exe` appended on Windows).
///
/// # Examples
///
/// ```
/// use arch_assist_core::utils::find_program;
///
/// assert!(find_program("definitely-not-a-real-program-name").is_none());
/// ```
pub fn find_program(name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    let direct = Path::new(name);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{}.exe", name));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}
