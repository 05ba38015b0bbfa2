//! Shared type definitions for Flowdeck.
//!
//! These types are used by the API client, the controller engine, the TUI and
//! the CLI. They carry no I/O of their own.

pub mod execution;
pub mod notification;

pub use execution::{
    ExecutionRecord, ExecutionStatus, ParseStatusError, RecordInvariantError, StatusFilter, format_duration,
};
pub use notification::{Notification, Severity};
