//! Execution list controller.
//!
//! The controller is a thin read/act/refresh loop over an
//! [`ExecutionService`]. It owns the displayed records, the per-record
//! in-flight guard and the notification queue. The backend stays
//! authoritative: local state only changes with data the service returned.
//!
//! Every operation comes in two shapes:
//!
//! - a synchronous `begin_*` / `complete_*` pair, for callers that run the
//!   service call elsewhere (the TUI spawns it and feeds the result back as a
//!   message so rendering never waits on the network);
//! - an async helper (`load_filtered`, `request_retry`, `request_cancel`) that
//!   composes the pair around an awaited call.

use std::sync::Arc;

use flowdeck_api::{ExecutionService, ExecutionServiceError};
use flowdeck_types::{ExecutionRecord, ExecutionStatus, Severity, StatusFilter};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::confirm::{ConfirmationPrompt, ConfirmationRequest};
use crate::in_flight::{ActionKind, InFlightActions};
use crate::notifications::NotificationCenter;
use crate::store::{ExecutionStore, MergeOutcome};

/// Reasons an action is refused before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionRejected {
    #[error("execution '{id}' is {status} and cannot be retried")]
    NotRetryable { id: String, status: ExecutionStatus },
    #[error("execution '{id}' is {status} and cannot be cancelled")]
    NotCancellable { id: String, status: ExecutionStatus },
    #[error("execution '{id}' is not in the current list")]
    UnknownRecord { id: String },
    #[error("a {} request for execution '{id}' is already in progress", .pending.verb())]
    ActionInFlight { id: String, pending: ActionKind },
    #[error("cancellation of execution '{id}' was not confirmed")]
    ConfirmationDeclined { id: String },
}

/// Failure of a full retry/cancel round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Rejected(#[from] ActionRejected),
    #[error(transparent)]
    Service(#[from] ExecutionServiceError),
}

/// Proof that a record was reserved for an action. Must be handed back to
/// [`ExecutionListController::complete_action`] or
/// [`ExecutionListController::abandon_action`] to release the reservation.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct ActionTicket {
    kind: ActionKind,
    record_id: String,
    workflow_name: String,
}

impl ActionTicket {
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn workflow_name(&self) -> &str {
        &self.workflow_name
    }

    /// Prompt shown before a cancel is sent.
    pub fn confirmation_request(&self) -> ConfirmationRequest {
        ConfirmationRequest {
            title: "Cancel execution".to_string(),
            message: format!(
                "Stop execution {} of '{}'? Steps already running may not roll back.",
                self.record_id, self.workflow_name
            ),
            record_id: self.record_id.clone(),
        }
    }
}

/// Identifies one issued load so late responses can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
    filter: StatusFilter,
}

impl LoadTicket {
    pub fn filter(&self) -> StatusFilter {
        self.filter
    }
}

/// Result of folding a `list` response into local state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    /// A newer load was issued after this one; the response was dropped.
    Stale,
    /// The previous record set stays displayed.
    Failed(ExecutionServiceError),
}

pub struct ExecutionListController {
    service: Arc<dyn ExecutionService>,
    store: ExecutionStore,
    in_flight: InFlightActions,
    notifications: NotificationCenter,
    load_generation: u64,
    loading: Option<LoadTicket>,
}

/// Suffix for failure toasts; only transient failures are worth repeating.
fn retry_hint(error: &ExecutionServiceError) -> &'static str {
    if error.is_transient() { ". Try again shortly." } else { "" }
}

impl ExecutionListController {
    pub fn new(service: Arc<dyn ExecutionService>, filter: StatusFilter) -> Self {
        Self {
            service,
            store: ExecutionStore::new(filter),
            in_flight: InFlightActions::default(),
            notifications: NotificationCenter::default(),
            load_generation: 0,
            loading: None,
        }
    }

    /// Shared handle to the service, for callers that run requests themselves.
    pub fn service(&self) -> Arc<dyn ExecutionService> {
        Arc::clone(&self.service)
    }

    pub fn records(&self) -> &[ExecutionRecord] {
        self.store.records()
    }

    pub fn record(&self, id: &str) -> Option<&ExecutionRecord> {
        self.store.get(id)
    }

    pub fn filter(&self) -> StatusFilter {
        self.store.filter()
    }

    pub fn selected(&self) -> Option<&ExecutionRecord> {
        self.store.selected()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.store.selected_index()
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.store.select(id)
    }

    pub fn move_selection(&mut self, delta: isize) {
        self.store.move_selection(delta);
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// Action currently outstanding for `id`, if any.
    pub fn pending_action(&self, id: &str) -> Option<ActionKind> {
        self.in_flight.pending(id)
    }

    pub fn has_pending_actions(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Whether a retry button for `id` should be enabled.
    pub fn can_retry(&self, id: &str) -> bool {
        self.in_flight.pending(id).is_none() && self.store.get(id).is_some_and(ExecutionRecord::can_retry)
    }

    /// Whether a cancel button for `id` should be enabled.
    pub fn can_cancel(&self, id: &str) -> bool {
        self.in_flight.pending(id).is_none() && self.store.get(id).is_some_and(ExecutionRecord::can_cancel)
    }

    /// Start loading `filter`. Any earlier load still outstanding becomes stale.
    pub fn begin_load(&mut self, filter: StatusFilter) -> LoadTicket {
        self.load_generation += 1;
        let ticket = LoadTicket {
            generation: self.load_generation,
            filter,
        };
        self.loading = Some(ticket);
        debug!(filter = %filter, generation = ticket.generation, "loading executions");
        ticket
    }

    /// Fold a `list` response into local state.
    ///
    /// Success replaces the record set; failure keeps what is displayed and
    /// raises an error notification.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<ExecutionRecord>, ExecutionServiceError>,
    ) -> LoadOutcome {
        if ticket.generation != self.load_generation {
            debug!(
                generation = ticket.generation,
                latest = self.load_generation,
                "discarding stale execution listing"
            );
            return LoadOutcome::Stale;
        }
        self.loading = None;

        let result = result.and_then(|records| {
            for record in &records {
                record
                    .validate()
                    .map_err(|error| ExecutionServiceError::InvalidResponse(error.to_string()))?;
            }
            Ok(records)
        });

        match result {
            Ok(records) => {
                let count = records.len();
                self.store.replace_all(ticket.filter, records);
                info!(filter = %ticket.filter, count, "execution list refreshed");
                LoadOutcome::Applied { count }
            }
            Err(error) => {
                warn!(filter = %ticket.filter, error = %error, "execution list refresh failed");
                self.notifications.push(
                    Severity::Error,
                    format!("Could not refresh executions: {error}{}", retry_hint(&error)),
                );
                LoadOutcome::Failed(error)
            }
        }
    }

    /// Load `filter` from the service, keeping the previous set on failure.
    pub async fn load_filtered(&mut self, filter: StatusFilter) -> LoadOutcome {
        let ticket = self.begin_load(filter);
        let result = self.service.list(filter).await;
        self.complete_load(ticket, result)
    }

    /// Reload the current filter.
    pub async fn refresh(&mut self) -> LoadOutcome {
        self.load_filtered(self.filter()).await
    }

    /// Check retry preconditions and reserve the record.
    pub fn begin_retry(&mut self, id: &str) -> Result<ActionTicket, ActionRejected> {
        self.begin_action(id, ActionKind::Retry)
    }

    /// Check cancel preconditions and reserve the record. The caller must
    /// obtain confirmation before sending the request.
    pub fn begin_cancel(&mut self, id: &str) -> Result<ActionTicket, ActionRejected> {
        self.begin_action(id, ActionKind::Cancel)
    }

    fn begin_action(&mut self, id: &str, kind: ActionKind) -> Result<ActionTicket, ActionRejected> {
        let result = self.check_action(id, kind);
        match &result {
            Ok(_) => debug!(execution_id = %id, action = kind.verb(), "action reserved"),
            Err(rejection) => {
                warn!(execution_id = %id, action = kind.verb(), reason = %rejection, "action rejected");
                self.notifications.push(Severity::Warning, rejection.to_string());
            }
        }
        result
    }

    fn check_action(&mut self, id: &str, kind: ActionKind) -> Result<ActionTicket, ActionRejected> {
        let record = self
            .store
            .get(id)
            .ok_or_else(|| ActionRejected::UnknownRecord { id: id.to_string() })?;

        match kind {
            ActionKind::Retry if !record.can_retry() => {
                return Err(ActionRejected::NotRetryable {
                    id: id.to_string(),
                    status: record.status,
                });
            }
            ActionKind::Cancel if !record.can_cancel() => {
                return Err(ActionRejected::NotCancellable {
                    id: id.to_string(),
                    status: record.status,
                });
            }
            _ => {}
        }

        let workflow_name = record.workflow_name.clone();
        self.in_flight
            .try_reserve(id, kind)
            .map_err(|pending| ActionRejected::ActionInFlight {
                id: id.to_string(),
                pending,
            })?;

        Ok(ActionTicket {
            kind,
            record_id: id.to_string(),
            workflow_name,
        })
    }

    /// Release a reservation without sending anything (for example, a declined confirmation).
    pub fn abandon_action(&mut self, ticket: ActionTicket) {
        self.in_flight.release(&ticket.record_id);
        debug!(execution_id = %ticket.record_id, action = ticket.kind.verb(), "action abandoned");
    }

    /// Apply the service's answer to a reserved action and release the reservation.
    ///
    /// On success exactly one record is merged; on failure local state is untouched.
    pub fn complete_action(
        &mut self,
        ticket: ActionTicket,
        result: Result<ExecutionRecord, ExecutionServiceError>,
    ) -> Result<ExecutionRecord, ExecutionServiceError> {
        self.in_flight.release(&ticket.record_id);

        let result = result.and_then(|record| {
            record
                .validate()
                .map_err(|error| ExecutionServiceError::InvalidResponse(error.to_string()))?;
            Ok(record)
        });

        match result {
            Ok(record) => {
                let merged = self.store.merge(record.clone());
                if merged == MergeOutcome::Inserted {
                    self.store.select(&record.id);
                }
                info!(
                    execution_id = %ticket.record_id,
                    action = ticket.kind.verb(),
                    returned_id = %record.id,
                    status = %record.status,
                    "action accepted"
                );
                let message = match ticket.kind {
                    ActionKind::Retry => format!(
                        "Retry requested for '{}' ({}); now {}",
                        ticket.workflow_name, record.id, record.status
                    ),
                    ActionKind::Cancel => format!(
                        "Cancel requested for '{}' ({}); now {}",
                        ticket.workflow_name, record.id, record.status
                    ),
                };
                self.notifications.push(Severity::Success, message);
                Ok(record)
            }
            Err(error) => {
                warn!(
                    execution_id = %ticket.record_id,
                    action = ticket.kind.verb(),
                    error = %error,
                    "action failed"
                );
                self.notifications.push(
                    Severity::Error,
                    format!(
                        "Could not {} '{}': {error}{}",
                        ticket.kind.verb(),
                        ticket.workflow_name,
                        retry_hint(&error)
                    ),
                );
                Err(error)
            }
        }
    }

    /// Retry a failed or cancelled execution.
    pub async fn request_retry(&mut self, id: &str) -> Result<ExecutionRecord, ActionError> {
        let ticket = self.begin_retry(id)?;
        let result = self.service.retry(id).await;
        Ok(self.complete_action(ticket, result)?)
    }

    /// Cancel a running execution after `prompt` confirms it.
    pub async fn request_cancel(
        &mut self,
        id: &str,
        prompt: &dyn ConfirmationPrompt,
    ) -> Result<ExecutionRecord, ActionError> {
        let ticket = self.begin_cancel(id)?;
        if !prompt.confirm(&ticket.confirmation_request()).await {
            self.abandon_action(ticket);
            return Err(ActionRejected::ConfirmationDeclined { id: id.to_string() }.into());
        }
        let result = self.service.cancel(id).await;
        Ok(self.complete_action(ticket, result)?)
    }

    /// Fetch one record and fold it into local state, e.g. before acting on an
    /// id that is not part of the current listing.
    pub async fn fetch_record(&mut self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError> {
        match self.service.get(id).await.and_then(|record| {
            record
                .validate()
                .map_err(|error| ExecutionServiceError::InvalidResponse(error.to_string()))?;
            Ok(record)
        }) {
            Ok(record) => {
                self.store.merge(record.clone());
                Ok(record)
            }
            Err(error) => {
                self.notifications.push(
                    Severity::Error,
                    format!("Could not load execution '{id}': {error}{}", retry_hint(&error)),
                );
                Err(error)
            }
        }
    }

    /// Fold a detail response into local state if the record is listed.
    pub fn apply_detail(&mut self, record: ExecutionRecord) {
        if record.validate().is_ok() && self.store.get(&record.id).is_some() {
            self.store.merge(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AlwaysConfirm, AlwaysDecline};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory service that records every call it receives.
    #[derive(Default)]
    struct FakeService {
        list_response: Mutex<Option<Result<Vec<ExecutionRecord>, ExecutionServiceError>>>,
        action_responses: Mutex<HashMap<String, Result<ExecutionRecord, ExecutionServiceError>>>,
        calls: AtomicUsize,
    }

    impl FakeService {
        fn with_list(records: Vec<ExecutionRecord>) -> Self {
            let service = Self::default();
            *service.list_response.lock().unwrap() = Some(Ok(records));
            service
        }

        fn set_list(&self, result: Result<Vec<ExecutionRecord>, ExecutionServiceError>) {
            *self.list_response.lock().unwrap() = Some(result);
        }

        fn set_action(&self, id: &str, result: Result<ExecutionRecord, ExecutionServiceError>) {
            self.action_responses.lock().unwrap().insert(id.to_string(), result);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn action(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.action_responses
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .unwrap_or_else(|| Err(ExecutionServiceError::NotFound { id: id.to_string() }))
        }
    }

    #[async_trait]
    impl ExecutionService for FakeService {
        async fn list(&self, _filter: StatusFilter) -> Result<Vec<ExecutionRecord>, ExecutionServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.list_response.lock().unwrap().clone().unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn get(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError> {
            self.action(id)
        }

        async fn retry(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError> {
            self.action(id)
        }

        async fn cancel(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError> {
            self.action(id)
        }
    }

    fn record(id: &str, status: ExecutionStatus) -> ExecutionRecord {
        ExecutionRecord {
            id: id.into(),
            workflow_name: format!("wf-{id}"),
            status,
            started_at: None,
            duration_seconds: status.is_terminal().then_some(10.0),
            steps_completed: 1,
            total_steps: 3,
        }
    }

    async fn loaded(service: Arc<FakeService>) -> ExecutionListController {
        let mut controller = ExecutionListController::new(service, StatusFilter::All);
        let outcome = controller.load_filtered(StatusFilter::All).await;
        assert!(matches!(outcome, LoadOutcome::Applied { .. }), "{outcome:?}");
        controller
    }

    fn statuses(controller: &ExecutionListController) -> Vec<(&str, ExecutionStatus)> {
        controller
            .records()
            .iter()
            .map(|r| (r.id.as_str(), r.status))
            .collect()
    }

    #[tokio::test]
    async fn retry_merges_returned_record_and_notifies() {
        let service = Arc::new(FakeService::with_list(vec![
            record("a", ExecutionStatus::Failed),
            record("b", ExecutionStatus::Running),
        ]));
        service.set_action("a", Ok(record("a", ExecutionStatus::Pending)));
        let mut controller = loaded(service.clone()).await;

        let updated = controller.request_retry("a").await.expect("retry");
        assert_eq!(updated.status, ExecutionStatus::Pending);
        assert_eq!(
            statuses(&controller),
            vec![("a", ExecutionStatus::Pending), ("b", ExecutionStatus::Running)]
        );
        let latest = controller.notifications().latest().expect("notification");
        assert_eq!(latest.severity, Severity::Success);
        assert!(controller.pending_action("a").is_none());
    }

    #[tokio::test]
    async fn cancel_on_failed_record_is_rejected_before_network() {
        let service = Arc::new(FakeService::with_list(vec![
            record("a", ExecutionStatus::Failed),
            record("b", ExecutionStatus::Running),
        ]));
        let mut controller = loaded(service.clone()).await;
        let calls_after_load = service.calls();

        let err = controller.request_cancel("a", &AlwaysConfirm).await.unwrap_err();
        assert_eq!(
            err,
            ActionError::Rejected(ActionRejected::NotCancellable {
                id: "a".into(),
                status: ExecutionStatus::Failed
            })
        );
        assert_eq!(service.calls(), calls_after_load);
        assert_eq!(
            controller.notifications().latest().map(|n| n.severity),
            Some(Severity::Warning)
        );
    }

    #[tokio::test]
    async fn retry_on_running_or_completed_is_rejected_before_network() {
        let service = Arc::new(FakeService::with_list(vec![
            record("r", ExecutionStatus::Running),
            record("c", ExecutionStatus::Completed),
        ]));
        let mut controller = loaded(service.clone()).await;
        let calls_after_load = service.calls();

        for id in ["r", "c"] {
            let err = controller.request_retry(id).await.unwrap_err();
            assert!(
                matches!(err, ActionError::Rejected(ActionRejected::NotRetryable { .. })),
                "{err:?}"
            );
            assert!(!controller.can_retry(id));
        }
        assert_eq!(service.calls(), calls_after_load);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_records() {
        let service = Arc::new(FakeService::with_list(vec![record("a", ExecutionStatus::Failed)]));
        let mut controller = loaded(service.clone()).await;

        service.set_list(Err(ExecutionServiceError::TransientNetworkFailure("timeout".into())));
        let outcome = controller.refresh().await;
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(statuses(&controller), vec![("a", ExecutionStatus::Failed)]);
        let latest = controller.notifications().latest().expect("notification");
        assert_eq!(latest.severity, Severity::Error);
        assert!(latest.message.ends_with("Try again shortly."), "{}", latest.message);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn listing_with_broken_invariant_is_treated_as_failure() {
        let service = Arc::new(FakeService::with_list(vec![record("a", ExecutionStatus::Failed)]));
        let mut controller = loaded(service.clone()).await;

        let mut broken = record("z", ExecutionStatus::Running);
        broken.steps_completed = 7;
        service.set_list(Ok(vec![broken]));
        let outcome = controller.refresh().await;
        assert!(matches!(
            outcome,
            LoadOutcome::Failed(ExecutionServiceError::InvalidResponse(_))
        ));
        assert!(
            controller
                .records()
                .iter()
                .all(|r| r.steps_completed <= r.total_steps)
        );
        assert_eq!(controller.records().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_retry_is_rejected_while_first_is_outstanding() {
        let service = Arc::new(FakeService::with_list(vec![record("a", ExecutionStatus::Failed)]));
        let mut controller = loaded(service.clone()).await;

        let first = controller.begin_retry("a").expect("first retry reserved");
        assert!(!controller.can_retry("a"));
        let second = controller.begin_retry("a").unwrap_err();
        assert_eq!(
            second,
            ActionRejected::ActionInFlight {
                id: "a".into(),
                pending: ActionKind::Retry
            }
        );

        let result = controller.complete_action(first, Ok(record("a", ExecutionStatus::Pending)));
        assert!(result.is_ok());
        assert!(controller.pending_action("a").is_none());
    }

    #[tokio::test]
    async fn service_failure_leaves_state_untouched() {
        let service = Arc::new(FakeService::with_list(vec![
            record("a", ExecutionStatus::Failed),
            record("b", ExecutionStatus::Running),
        ]));
        service.set_action(
            "b",
            Err(ExecutionServiceError::NotCancellable {
                id: "b".into(),
                reason: "already finishing".into(),
            }),
        );
        let mut controller = loaded(service.clone()).await;
        let before = controller.records().to_vec();

        let err = controller.request_cancel("b", &AlwaysConfirm).await.unwrap_err();
        assert!(matches!(
            err,
            ActionError::Service(ExecutionServiceError::NotCancellable { .. })
        ));
        assert_eq!(controller.records(), before.as_slice());
        assert!(controller.can_cancel("b"));
        let latest = controller.notifications().latest().expect("notification");
        assert_eq!(latest.severity, Severity::Error);
        assert!(latest.message.contains("already finishing"), "{}", latest.message);
        assert!(!latest.message.contains("Try again"), "a refused cancel will be refused again");
    }

    #[tokio::test]
    async fn declined_confirmation_sends_nothing() {
        let service = Arc::new(FakeService::with_list(vec![record("b", ExecutionStatus::Running)]));
        service.set_action("b", Ok(record("b", ExecutionStatus::Cancelled)));
        let mut controller = loaded(service.clone()).await;
        let calls_after_load = service.calls();

        let err = controller.request_cancel("b", &AlwaysDecline).await.unwrap_err();
        assert_eq!(
            err,
            ActionError::Rejected(ActionRejected::ConfirmationDeclined { id: "b".into() })
        );
        assert_eq!(service.calls(), calls_after_load);
        assert!(controller.can_cancel("b"));

        let cancelled = controller.request_cancel("b", &AlwaysConfirm).await.expect("cancel");
        assert_eq!(cancelled.status, ExecutionStatus::Cancelled);
        assert_eq!(statuses(&controller), vec![("b", ExecutionStatus::Cancelled)]);
    }

    #[tokio::test]
    async fn stale_load_is_discarded() {
        let service = Arc::new(FakeService::default());
        let mut controller = ExecutionListController::new(service, StatusFilter::All);

        let old = controller.begin_load(StatusFilter::All);
        let newer = controller.begin_load(StatusFilter::Only(ExecutionStatus::Failed));

        let applied = controller.complete_load(newer, Ok(vec![record("f", ExecutionStatus::Failed)]));
        assert_eq!(applied, LoadOutcome::Applied { count: 1 });
        let stale = controller.complete_load(old, Ok(vec![record("x", ExecutionStatus::Running)]));
        assert_eq!(stale, LoadOutcome::Stale);

        assert_eq!(controller.filter(), StatusFilter::Only(ExecutionStatus::Failed));
        assert_eq!(statuses(&controller), vec![("f", ExecutionStatus::Failed)]);
    }

    #[tokio::test]
    async fn unknown_record_is_rejected() {
        let service = Arc::new(FakeService::default());
        let mut controller = ExecutionListController::new(service.clone(), StatusFilter::All);
        let err = controller.request_retry("ghost").await.unwrap_err();
        assert_eq!(
            err,
            ActionError::Rejected(ActionRejected::UnknownRecord { id: "ghost".into() })
        );
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn retry_producing_new_run_inserts_and_selects_it() {
        let service = Arc::new(FakeService::with_list(vec![
            record("a", ExecutionStatus::Failed),
            record("b", ExecutionStatus::Running),
        ]));
        service.set_action("a", Ok(record("a-2", ExecutionStatus::Pending)));
        let mut controller = loaded(service).await;

        controller.request_retry("a").await.expect("retry");
        assert_eq!(
            statuses(&controller),
            vec![
                ("a-2", ExecutionStatus::Pending),
                ("a", ExecutionStatus::Failed),
                ("b", ExecutionStatus::Running)
            ]
        );
        assert_eq!(controller.selected().map(|r| r.id.as_str()), Some("a-2"));
    }

    #[tokio::test]
    async fn fetch_record_adds_unlisted_execution() {
        let service = Arc::new(FakeService::default());
        service.set_action("solo", Ok(record("solo", ExecutionStatus::Failed)));
        let mut controller = ExecutionListController::new(service, StatusFilter::All);

        let fetched = controller.fetch_record("solo").await.expect("fetch");
        assert_eq!(fetched.id, "solo");
        assert!(controller.can_retry("solo"));

        let missing = controller.fetch_record("nope").await.unwrap_err();
        assert_eq!(missing, ExecutionServiceError::NotFound { id: "nope".into() });
    }
}
