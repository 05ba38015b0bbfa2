use async_trait::async_trait;

/// Text of a blocking yes/no prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub title: String,
    pub message: String,
    pub record_id: String,
}

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Resolve to `true` only on an explicit yes.
    async fn confirm(&self, request: &ConfirmationRequest) -> bool;
}

/// Prompt that always agrees; used for `--yes` style invocations.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

#[async_trait]
impl ConfirmationPrompt for AlwaysConfirm {
    async fn confirm(&self, _request: &ConfirmationRequest) -> bool {
        true
    }
}

/// Prompt that always refuses; used where no interactive input is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysDecline;

#[async_trait]
impl ConfirmationPrompt for AlwaysDecline {
    async fn confirm(&self, _request: &ConfirmationRequest) -> bool {
        false
    }
}
