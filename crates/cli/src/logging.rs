//! Tracing setup. One-shot commands log to stderr; the console logs to a file
//! so log lines never tear the alternate screen.

use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::{Context, Result};
use flowdeck_util::{default_cache_path, redact_sensitive};
use tracing_subscriber::EnvFilter;

/// Environment variable used to override the console log file path.
pub const TUI_LOG_PATH_ENV: &str = "FLOWDECK_TUI_LOG_PATH";

/// Writer that masks tokens and credentials before they reach the sink.
struct RedactingWriter<W> {
    inner: W,
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.inner.write_all(redact_sensitive(&text).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_tracing(interactive: bool) -> Result<()> {
    if !interactive {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(|| RedactingWriter { inner: io::stderr() })
            .try_init();
        return Ok(());
    }

    let path = default_cache_path(TUI_LOG_PATH_ENV, "tui.log");
    if let Some(parent) = path.parent() {
        create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(RedactingWriter { inner: file }))
        .try_init();
    Ok(())
}
