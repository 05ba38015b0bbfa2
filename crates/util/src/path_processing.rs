use std::path::PathBuf;

use dirs_next::{cache_dir, home_dir};

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Resolve a file under the platform cache directory (`~/.cache/flowdeck/<name>`
/// on Linux), honoring an override environment variable when it is set.
pub fn default_cache_path(override_env: &str, file_name: &str) -> PathBuf {
    if let Ok(path) = std::env::var(override_env) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }
    cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flowdeck")
        .join(file_name)
}
