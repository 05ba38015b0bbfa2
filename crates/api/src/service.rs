use async_trait::async_trait;
use flowdeck_types::{ExecutionRecord, StatusFilter};

use crate::ExecutionServiceError;

/// Contract of the remote execution-tracking service.
///
/// The service owns the execution lifecycle. Implementations must report
/// precondition failures (`NotRetryable`, `NotCancellable`) and unknown ids
/// (`NotFound`) as typed errors rather than generic rejections so the UI can
/// word its notifications.
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Current records matching `filter`, most recent first.
    async fn list(&self, filter: StatusFilter) -> Result<Vec<ExecutionRecord>, ExecutionServiceError>;

    /// A single record by id.
    async fn get(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError>;

    /// Ask the backend to re-run a failed or cancelled execution.
    async fn retry(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError>;

    /// Ask the backend to stop a running execution.
    async fn cancel(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError>;
}
