//! User preference persistence for the Flowdeck CLI/TUI.
//!
//! This module provides a tiny JSON-backed store that records lightweight
//! configuration such as the status filter the console opens with and how
//! often it refreshes. The file is written to the standard configuration
//! directory (`~/.config/flowdeck/preferences.json` on most platforms) and is
//! safe to read/write from multiple threads thanks to the internal `Mutex`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use dirs_next::config_dir;
use flowdeck_types::StatusFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "FLOWDECK_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Refresh cadence used when the preferences file does not specify one.
pub const DEFAULT_AUTO_REFRESH_SECONDS: u64 = 15;

/// Error surfaced when reading or writing preferences fails.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted preference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesPayload {
    /// Filter applied when the console starts.
    pub default_status_filter: StatusFilter,
    /// Seconds between automatic refreshes of the execution list; `0` disables.
    pub auto_refresh_seconds: u64,
}

impl Default for PreferencesPayload {
    fn default() -> Self {
        Self {
            default_status_filter: StatusFilter::All,
            auto_refresh_seconds: DEFAULT_AUTO_REFRESH_SECONDS,
        }
    }
}

/// Thread-safe preferences store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: Mutex<PreferencesPayload>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Load preferences from the default location (or `FLOWDECK_PREFERENCES_PATH`).
    pub fn new() -> Result<Self, PreferencesError> {
        Self::load_from(default_preferences_path())
    }

    /// Load preferences from an explicit path.
    pub fn load_from(path: PathBuf) -> Result<Self, PreferencesError> {
        let payload = load_payload(&path)?;
        Ok(Self {
            path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_status_filter(&self) -> StatusFilter {
        self.payload.lock().expect("preferences lock poisoned").default_status_filter
    }

    /// Interval between automatic refreshes, or `None` when disabled.
    pub fn auto_refresh_interval(&self) -> Option<Duration> {
        let seconds = self.payload.lock().expect("preferences lock poisoned").auto_refresh_seconds;
        (seconds > 0).then(|| Duration::from_secs(seconds))
    }

    /// Persist the filter the console should open with next time.
    pub fn set_default_status_filter(&self, filter: StatusFilter) -> Result<(), PreferencesError> {
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        payload.default_status_filter = filter;
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }

    /// Persist a new refresh cadence; `0` disables automatic refreshes.
    pub fn set_auto_refresh_seconds(&self, seconds: u64) -> Result<(), PreferencesError> {
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        payload.auto_refresh_seconds = seconds;
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }

    /// Build an in-memory store used as a fallback when the config directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(PreferencesPayload::default()),
            persist_to_disk: false,
        }
    }

    fn save_locked(&self, payload: &PreferencesPayload) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn default_preferences_path() -> PathBuf {
    if let Ok(path) = env::var(PREFERENCES_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flowdeck")
        .join(PREFERENCES_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<PreferencesPayload, PreferencesError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(PreferencesPayload::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(PreferencesPayload::default()),
        Err(error) => Err(PreferencesError::Io(error)),
    }
}
