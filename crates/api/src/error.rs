use thiserror::Error;

/// Failures reported by an [`ExecutionService`](crate::ExecutionService).
///
/// Every variant is recoverable at the UI boundary; none of them should tear
/// down the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionServiceError {
    #[error("execution '{id}' was not found")]
    NotFound { id: String },
    #[error("execution '{id}' cannot be retried: {reason}")]
    NotRetryable { id: String, reason: String },
    #[error("execution '{id}' cannot be cancelled: {reason}")]
    NotCancellable { id: String, reason: String },
    #[error("execution service unavailable: {0}")]
    TransientNetworkFailure(String),
    #[error("execution service returned an invalid response: {0}")]
    InvalidResponse(String),
    #[error("execution service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl ExecutionServiceError {
    /// Whether re-issuing the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientNetworkFailure(_))
    }
}

/// Logical operation against the execution service, used for error mapping and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Retry,
    Cancel,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Retry => "retry",
            Self::Cancel => "cancel",
        }
    }
}
