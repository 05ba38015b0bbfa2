//! Application state and message handling for the executions console.
//!
//! `App` owns the controller (and therefore the record store) and is the only
//! writer to it. Input handlers translate keys into [`Msg`]s; [`App::update`]
//! applies a message and returns the [`Effect`]s the runtime must carry out.
//! Effects are the only place network calls originate.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use flowdeck_api::ExecutionServiceError;
use flowdeck_engine::{ActionKind, ActionTicket, ExecutionListController, LoadOutcome, LoadTicket};
use flowdeck_types::{ExecutionRecord, Severity, StatusFilter};
use flowdeck_util::UserPreferences;
use tracing::{debug, warn};

use crate::ui::components::common::ConfirmationModalState;
use crate::ui::theme::{self, Theme};

/// Frames for the loading indicator in the header.
pub const THROBBER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Messages that can be sent to update the application state.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (throbber, toast expiry)
    Tick,
    /// Terminal resized; only forces a redraw
    Resize,
    /// Reload the current filter because the auto-refresh interval elapsed
    AutoRefresh,
    /// Reload the current filter on user request
    Refresh,
    /// Move the table selection by the given offset
    MoveSelection(isize),
    NextFilter,
    PrevFilter,
    RetrySelected,
    /// Ask for confirmation before cancelling the selected execution
    CancelSelected,
    ToggleDetail,
    /// The confirmation modal closed; `true` only when the user confirmed
    ConfirmationResolved(bool),
    LoadCompleted {
        ticket: LoadTicket,
        result: Result<Vec<ExecutionRecord>, ExecutionServiceError>,
    },
    ActionCompleted {
        record_id: String,
        result: Result<ExecutionRecord, ExecutionServiceError>,
    },
    DetailLoaded {
        record_id: String,
        result: Result<ExecutionRecord, ExecutionServiceError>,
    },
    Quit,
}

/// Side effects the runtime performs on behalf of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call `list` for the ticket's filter and report back with `Msg::LoadCompleted`
    LoadExecutions(LoadTicket),
    /// Call `retry`/`cancel` and report back with `Msg::ActionCompleted`
    SendAction { kind: ActionKind, record_id: String },
    /// Call `get` and report back with `Msg::DetailLoaded`
    FetchDetail(String),
}

impl Effect {
    /// The completion message for an effect whose service task died before
    /// reporting back. Controllers only release their reservations on a
    /// completion, so every effect must produce one.
    pub fn into_failure(self, reason: impl Into<String>) -> Msg {
        let error = ExecutionServiceError::TransientNetworkFailure(reason.into());
        match self {
            Effect::LoadExecutions(ticket) => Msg::LoadCompleted {
                ticket,
                result: Err(error),
            },
            Effect::SendAction { record_id, .. } => Msg::ActionCompleted {
                record_id,
                result: Err(error),
            },
            Effect::FetchDetail(record_id) => Msg::DetailLoaded {
                record_id,
                result: Err(error),
            },
        }
    }
}

/// Modal overlays that capture input while shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Confirmation,
}

pub struct App {
    pub controller: ExecutionListController,
    pub preferences: Arc<UserPreferences>,
    pub theme: Box<dyn Theme>,
    pub confirmation_modal_state: ConfirmationModalState,
    pub modal: Option<Modal>,
    pub show_detail: bool,
    pub throbber_idx: usize,
    pub should_quit: bool,
    /// Cancel reserved in the controller while the confirmation modal is open.
    awaiting_confirmation: Option<ActionTicket>,
    /// Actions sent to the service, keyed by record id.
    outstanding: HashMap<String, ActionTicket>,
    dirty: bool,
}

impl App {
    pub fn new(controller: ExecutionListController, preferences: Arc<UserPreferences>) -> Self {
        Self::with_theme(controller, preferences, theme::load_from_env())
    }

    pub fn with_theme(
        controller: ExecutionListController,
        preferences: Arc<UserPreferences>,
        theme: Box<dyn Theme>,
    ) -> Self {
        Self {
            controller,
            preferences,
            theme,
            confirmation_modal_state: ConfirmationModalState::default(),
            modal: None,
            show_detail: false,
            throbber_idx: 0,
            should_quit: false,
            awaiting_confirmation: None,
            outstanding: HashMap::new(),
            dirty: true,
        }
    }

    /// Effects to run once when the console starts.
    pub fn startup_effects(&mut self) -> Vec<Effect> {
        let ticket = self.controller.begin_load(self.controller.filter());
        vec![Effect::LoadExecutions(ticket)]
    }

    /// Whether anything is animating (drives the fast tick interval).
    pub fn is_busy(&self) -> bool {
        self.controller.is_loading() || self.controller.has_pending_actions()
    }

    pub fn throbber(&self) -> &'static str {
        THROBBER_FRAMES[self.throbber_idx % THROBBER_FRAMES.len()]
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns and clears the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        let mut effects = Vec::new();
        match msg {
            Msg::Tick => {
                if self.is_busy() {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER_FRAMES.len();
                    self.dirty = true;
                }
                if self.controller.notifications_mut().prune(Utc::now()) {
                    self.dirty = true;
                }
                return effects;
            }
            Msg::Resize => {}
            Msg::AutoRefresh => {
                if self.controller.is_loading() {
                    debug!("skipping auto-refresh; a load is already outstanding");
                    return effects;
                }
                effects.push(self.load(self.controller.filter()));
            }
            Msg::Refresh => effects.push(self.load(self.controller.filter())),
            Msg::MoveSelection(delta) => self.controller.move_selection(delta),
            Msg::NextFilter => effects.push(self.change_filter(self.controller.filter().next())),
            Msg::PrevFilter => effects.push(self.change_filter(self.controller.filter().prev())),
            Msg::RetrySelected => {
                if let Some(id) = self.selected_id()
                    && let Ok(ticket) = self.controller.begin_retry(&id)
                {
                    effects.push(self.dispatch(ticket));
                }
            }
            Msg::CancelSelected => {
                if let Some(id) = self.selected_id()
                    && let Ok(ticket) = self.controller.begin_cancel(&id)
                {
                    self.confirmation_modal_state
                        .open_for(&ticket.confirmation_request(), "Cancel run", "Keep running");
                    self.awaiting_confirmation = Some(ticket);
                    self.modal = Some(Modal::Confirmation);
                }
            }
            Msg::ConfirmationResolved(confirmed) => {
                self.modal = None;
                if let Some(ticket) = self.awaiting_confirmation.take() {
                    if confirmed {
                        effects.push(self.dispatch(ticket));
                    } else {
                        self.controller.abandon_action(ticket);
                    }
                }
            }
            Msg::ToggleDetail => {
                self.show_detail = !self.show_detail;
                if self.show_detail
                    && let Some(id) = self.selected_id()
                {
                    effects.push(Effect::FetchDetail(id));
                }
            }
            Msg::LoadCompleted { ticket, result } => {
                if self.controller.complete_load(ticket, result) == LoadOutcome::Stale {
                    return effects;
                }
            }
            Msg::ActionCompleted { record_id, result } => match self.outstanding.remove(&record_id) {
                Some(ticket) => match self.controller.complete_action(ticket, result) {
                    Ok(record) => debug!(execution_id = %record.id, status = %record.status, "action completed"),
                    Err(error) => debug!(execution_id = %record_id, error = %error, "action failed"),
                },
                None => warn!(execution_id = %record_id, "completion for an action that is not outstanding"),
            },
            Msg::DetailLoaded { record_id, result } => match result {
                Ok(record) => self.controller.apply_detail(record),
                Err(error) => {
                    self.controller
                        .notifications_mut()
                        .push(Severity::Error, format!("Could not load execution '{record_id}': {error}"));
                }
            },
            Msg::Quit => self.should_quit = true,
        }
        self.dirty = true;
        effects
    }

    fn selected_id(&self) -> Option<String> {
        self.controller.selected().map(|record| record.id.clone())
    }

    fn load(&mut self, filter: StatusFilter) -> Effect {
        Effect::LoadExecutions(self.controller.begin_load(filter))
    }

    fn change_filter(&mut self, filter: StatusFilter) -> Effect {
        if let Err(error) = self.preferences.set_default_status_filter(filter) {
            warn!(error = %error, "failed to persist status filter preference");
        }
        self.load(filter)
    }

    fn dispatch(&mut self, ticket: ActionTicket) -> Effect {
        let effect = Effect::SendAction {
            kind: ticket.kind(),
            record_id: ticket.record_id().to_string(),
        };
        self.outstanding.insert(ticket.record_id().to_string(), ticket);
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::DraculaTheme;
    use async_trait::async_trait;
    use flowdeck_api::ExecutionService;
    use flowdeck_types::ExecutionStatus;

    struct StaticService;

    #[async_trait]
    impl ExecutionService for StaticService {
        async fn list(&self, _filter: StatusFilter) -> Result<Vec<ExecutionRecord>, ExecutionServiceError> {
            Ok(Vec::new())
        }
        async fn get(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError> {
            Err(ExecutionServiceError::NotFound { id: id.to_string() })
        }
        async fn retry(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError> {
            Err(ExecutionServiceError::NotFound { id: id.to_string() })
        }
        async fn cancel(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError> {
            Err(ExecutionServiceError::NotFound { id: id.to_string() })
        }
    }

    fn record(id: &str, status: ExecutionStatus) -> ExecutionRecord {
        ExecutionRecord {
            id: id.into(),
            workflow_name: format!("wf-{id}"),
            status,
            started_at: None,
            duration_seconds: None,
            steps_completed: 0,
            total_steps: 1,
        }
    }

    fn app_with(records: Vec<ExecutionRecord>) -> App {
        let controller = ExecutionListController::new(Arc::new(StaticService), StatusFilter::All);
        let mut app = App::with_theme(
            controller,
            Arc::new(UserPreferences::ephemeral()),
            Box::new(DraculaTheme::new()),
        );
        let Effect::LoadExecutions(ticket) = app.startup_effects().remove(0) else {
            panic!("expected startup load");
        };
        app.update(Msg::LoadCompleted {
            ticket,
            result: Ok(records),
        });
        app
    }

    #[test]
    fn retry_dispatches_once_until_completion() {
        let mut app = app_with(vec![record("a", ExecutionStatus::Failed)]);

        let effects = app.update(Msg::RetrySelected);
        assert_eq!(
            effects,
            vec![Effect::SendAction {
                kind: ActionKind::Retry,
                record_id: "a".into()
            }]
        );
        assert!(app.update(Msg::RetrySelected).is_empty(), "duplicate retry must not dispatch");

        app.update(Msg::ActionCompleted {
            record_id: "a".into(),
            result: Ok(record("a", ExecutionStatus::Pending)),
        });
        assert_eq!(app.controller.records()[0].status, ExecutionStatus::Pending);
        assert!(!app.is_busy());
    }

    #[test]
    fn cancel_waits_for_confirmation() {
        let mut app = app_with(vec![record("b", ExecutionStatus::Running)]);

        assert!(app.update(Msg::CancelSelected).is_empty());
        assert_eq!(app.modal, Some(Modal::Confirmation));
        assert!(!app.controller.can_cancel("b"), "cancel stays disabled while the prompt is open");

        let effects = app.update(Msg::ConfirmationResolved(true));
        assert_eq!(
            effects,
            vec![Effect::SendAction {
                kind: ActionKind::Cancel,
                record_id: "b".into()
            }]
        );
        assert_eq!(app.modal, None);
    }

    #[test]
    fn declined_confirmation_releases_the_record() {
        let mut app = app_with(vec![record("b", ExecutionStatus::Running)]);
        app.update(Msg::CancelSelected);
        assert!(app.update(Msg::ConfirmationResolved(false)).is_empty());
        assert!(app.controller.can_cancel("b"));
    }

    #[test]
    fn cancel_on_failed_record_never_opens_prompt() {
        let mut app = app_with(vec![record("a", ExecutionStatus::Failed)]);
        assert!(app.update(Msg::CancelSelected).is_empty());
        assert_eq!(app.modal, None);
        assert_eq!(
            app.controller.notifications().latest().map(|n| n.severity),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn filter_change_issues_a_new_load() {
        let mut app = app_with(vec![record("a", ExecutionStatus::Failed)]);
        let effects = app.update(Msg::NextFilter);
        match effects.as_slice() {
            [Effect::LoadExecutions(ticket)] => {
                assert_eq!(ticket.filter(), StatusFilter::Only(ExecutionStatus::Pending));
            }
            other => panic!("unexpected effects {other:?}"),
        }
        assert!(app.update(Msg::AutoRefresh).is_empty(), "auto-refresh skips while loading");
        assert_eq!(
            app.preferences.default_status_filter(),
            StatusFilter::Only(ExecutionStatus::Pending)
        );
    }

    #[test]
    fn failed_refresh_keeps_rows() {
        let mut app = app_with(vec![record("a", ExecutionStatus::Failed)]);
        let Effect::LoadExecutions(ticket) = app.update(Msg::Refresh).remove(0) else {
            panic!("expected load");
        };
        app.update(Msg::LoadCompleted {
            ticket,
            result: Err(ExecutionServiceError::TransientNetworkFailure("offline".into())),
        });
        assert_eq!(app.controller.records().len(), 1);
    }

    #[test]
    fn dead_action_task_releases_the_record() {
        let mut app = app_with(vec![record("a", ExecutionStatus::Failed)]);
        let effect = app.update(Msg::RetrySelected).remove(0);
        assert!(!app.controller.can_retry("a"));

        app.update(effect.into_failure("task aborted"));
        assert!(app.controller.can_retry("a"), "retry is enabled again after the task died");
        assert!(!app.is_busy());
        assert_eq!(app.controller.records()[0].status, ExecutionStatus::Failed);
        assert_eq!(
            app.controller.notifications().latest().map(|n| n.severity),
            Some(Severity::Error)
        );
    }

    #[test]
    fn dead_load_task_clears_loading() {
        let mut app = app_with(vec![record("a", ExecutionStatus::Failed)]);
        let effect = app.update(Msg::Refresh).remove(0);
        assert!(app.controller.is_loading());

        app.update(effect.into_failure("task aborted"));
        assert!(!app.controller.is_loading());
        assert!(!app.update(Msg::AutoRefresh).is_empty(), "auto-refresh resumes");
    }

    #[test]
    fn resize_only_requests_a_redraw() {
        let mut app = app_with(vec![record("a", ExecutionStatus::Failed)]);
        app.take_dirty();
        assert!(app.update(Msg::Resize).is_empty());
        assert!(app.take_dirty());
    }
}
