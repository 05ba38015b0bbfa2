//! Utility helpers shared by the Flowdeck CLI and TUI.
//!
//! - [`preferences`]: JSON-backed user preferences (default filter, refresh cadence)
//! - [`text_processing`]: secret redaction for logs and error messages
//! - [`date_handling`]: timestamp formatting for tables and detail panes
//! - [`path_processing`]: `~` expansion and default file locations

pub mod date_handling;
pub mod path_processing;
pub mod preferences;
pub mod text_processing;

pub use date_handling::{format_relative_age, format_timestamp};
pub use path_processing::{default_cache_path, expand_tilde};
pub use preferences::{PreferencesError, PreferencesPayload, UserPreferences};
pub use text_processing::redact_sensitive;
