//! Execution records as observed by the client.
//!
//! An [`ExecutionRecord`] is one run of a workflow definition. The backend owns
//! the lifecycle; the client only reads records and forwards retry/cancel
//! requests, so the helpers here describe what a record *permits* rather than
//! how it changes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl ExecutionStatus {
    /// Every status in lifecycle order.
    pub const ALL: [ExecutionStatus; 5] = [
        ExecutionStatus::Pending,
        ExecutionStatus::Running,
        ExecutionStatus::Completed,
        ExecutionStatus::Failed,
        ExecutionStatus::Cancelled,
    ];

    /// Returns `true` once the execution has left `Running` for good.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Only failed or cancelled executions can be re-run.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }

    /// Only running executions can be stopped.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Lowercase wire name (`"running"`, `"failed"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Title-cased label for tables and notifications.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown execution status '{0}'; expected one of pending, running, completed, failed, cancelled")]
pub struct ParseStatusError(pub String);

impl FromStr for ExecutionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            // The backend has shipped both spellings.
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// One workflow run as reported by the execution-tracking service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// Opaque identifier assigned by the backend.
    pub id: String,
    /// Display name of the workflow definition that was run.
    pub workflow_name: String,
    pub status: ExecutionStatus,
    /// Set once the backend moves the record to `Running`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Defined only after the record leaves `Running`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub steps_completed: u32,
    #[serde(default)]
    pub total_steps: u32,
}

/// Violations detected when a record does not satisfy the client-side invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordInvariantError {
    #[error("execution '{id}' reports {steps_completed} completed steps out of {total_steps}")]
    StepsExceedTotal {
        id: String,
        steps_completed: u32,
        total_steps: u32,
    },
    #[error("execution '{id}' is {status} but reports a duration")]
    DurationBeforeTerminal { id: String, status: ExecutionStatus },
    #[error("execution '{id}' reports a negative or non-finite duration")]
    InvalidDuration { id: String },
    #[error("execution record is missing an id")]
    MissingId,
}

impl ExecutionRecord {
    /// Check the invariants every record in local state must satisfy.
    pub fn validate(&self) -> Result<(), RecordInvariantError> {
        if self.id.trim().is_empty() {
            return Err(RecordInvariantError::MissingId);
        }
        if self.steps_completed > self.total_steps {
            return Err(RecordInvariantError::StepsExceedTotal {
                id: self.id.clone(),
                steps_completed: self.steps_completed,
                total_steps: self.total_steps,
            });
        }
        if let Some(duration) = self.duration_seconds {
            if !self.status.is_terminal() {
                return Err(RecordInvariantError::DurationBeforeTerminal {
                    id: self.id.clone(),
                    status: self.status,
                });
            }
            if !duration.is_finite() || duration < 0.0 {
                return Err(RecordInvariantError::InvalidDuration { id: self.id.clone() });
            }
        }
        Ok(())
    }

    pub fn can_retry(&self) -> bool {
        self.status.is_retryable()
    }

    pub fn can_cancel(&self) -> bool {
        self.status.is_cancellable()
    }

    /// Fraction of steps completed in `0.0..=1.0`. Zero-step workflows report `0.0`.
    pub fn progress_ratio(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        f64::from(self.steps_completed.min(self.total_steps)) / f64::from(self.total_steps)
    }

    /// Compact `3/7` progress label.
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.steps_completed, self.total_steps)
    }

    /// Human readable duration, or `None` while the execution is still open.
    pub fn duration_label(&self) -> Option<String> {
        self.duration_seconds.map(format_duration)
    }
}

/// Format seconds as `1h 02m 03s`, `2m 05s` or `4.2s`.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{seconds:.1}s");
    }
    let total = seconds.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m {secs:02}s")
    } else {
        format!("{minutes}m {secs:02}s")
    }
}

/// Server-side status filter for listing executions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(ExecutionStatus),
}

impl StatusFilter {
    /// Status to send as the `status` query parameter, if any.
    pub fn status(self) -> Option<ExecutionStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status),
        }
    }

    pub fn matches(self, record: &ExecutionRecord) -> bool {
        self.status().is_none_or(|status| status == record.status)
    }

    /// Cycle forward through `All` and each status.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Only(ExecutionStatus::ALL[0]),
            Self::Only(status) => {
                let index = ExecutionStatus::ALL.iter().position(|s| *s == status).unwrap_or(0);
                ExecutionStatus::ALL.get(index + 1).map_or(Self::All, |s| Self::Only(*s))
            }
        }
    }

    /// Cycle backward through `All` and each status.
    pub fn prev(self) -> Self {
        match self {
            Self::All => Self::Only(ExecutionStatus::ALL[ExecutionStatus::ALL.len() - 1]),
            Self::Only(status) => {
                let index = ExecutionStatus::ALL.iter().position(|s| *s == status).unwrap_or(0);
                if index == 0 {
                    Self::All
                } else {
                    Self::Only(ExecutionStatus::ALL[index - 1])
                }
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(status) => status.label(),
        }
    }
}

impl From<Option<ExecutionStatus>> for StatusFilter {
    fn from(value: Option<ExecutionStatus>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<ExecutionStatus>().map(Self::Only)
    }
}

impl From<StatusFilter> for String {
    fn from(value: StatusFilter) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
