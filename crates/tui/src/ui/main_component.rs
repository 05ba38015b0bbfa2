//! Top-level view: header, execution table, optional detail pane, hint bar,
//! toasts and the confirmation modal.
//!
//! Key events go to the modal while it is open and to the execution table
//! otherwise.

use crossterm::event::KeyEvent;
use flowdeck_types::{ExecutionStatus, StatusFilter};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};

use crate::app::{App, Effect, Modal, Msg};
use crate::ui::components::common::ConfirmationModal;
use crate::ui::components::{
    Component, DetailComponent, ExecutionsComponent, HintBarComponent, ToastsComponent,
};
use crate::ui::utils::centered_fixed;

const DETAIL_WIDTH: u16 = 44;

#[derive(Debug, Default)]
pub struct MainView {
    executions: ExecutionsComponent,
    detail: DetailComponent,
    toasts: ToastsComponent,
    hint_bar: HintBarComponent,
    confirmation: ConfirmationModal,
}

fn filter_tabs() -> Vec<StatusFilter> {
    std::iter::once(StatusFilter::All)
        .chain(ExecutionStatus::ALL.into_iter().map(StatusFilter::Only))
        .collect()
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match app.modal {
            Some(Modal::Confirmation) => self.confirmation.handle_key_events(app, key),
            None => self.executions.handle_key_events(app, key),
        }
    }

    pub fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(msg)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let [header_area, body_area, hint_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)]).areas(area);

        self.render_header(frame, header_area, app);

        if app.show_detail && body_area.width > DETAIL_WIDTH * 2 {
            let [table_area, detail_area] =
                Layout::horizontal([Constraint::Min(20), Constraint::Length(DETAIL_WIDTH)]).areas(body_area);
            self.executions.render(frame, table_area, app);
            self.detail.render(frame, detail_area, app);
        } else if app.show_detail {
            self.detail.render(frame, body_area, app);
        } else {
            self.executions.render(frame, body_area, app);
        }

        let spans = match app.modal {
            Some(Modal::Confirmation) => self.confirmation.get_hint_spans(app),
            None => self.executions.get_hint_spans(app),
        };
        self.hint_bar.render_spans(frame, hint_area, &*app.theme, spans);

        self.toasts.render(frame, body_area, app);

        if app.modal == Some(Modal::Confirmation) {
            let modal_area = centered_fixed(64, 10, area);
            self.confirmation.render(frame, modal_area, app);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.theme;
        let [title_area, tabs_area, status_area] = Layout::horizontal([
            Constraint::Length(11),
            Constraint::Min(10),
            Constraint::Length(14),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(" flowdeck ", theme.accent_emphasis_style())),
            title_area,
        );

        let tabs = filter_tabs();
        let current = app.controller.filter();
        let selected = tabs.iter().position(|filter| *filter == current);
        let widget = Tabs::new(tabs.iter().map(|filter| Line::from(filter.label())))
            .select(selected)
            .style(theme.text_muted_style())
            .highlight_style(theme.selection_style())
            .divider("|");
        frame.render_widget(widget, tabs_area);

        let status = if app.controller.is_loading() {
            format!("{} loading", app.throbber())
        } else if app.controller.has_pending_actions() {
            format!("{} working", app.throbber())
        } else {
            String::new()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(status, theme.text_secondary_style())),
            status_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use flowdeck_api::{ExecutionService, ExecutionServiceError};
    use flowdeck_engine::ExecutionListController;
    use flowdeck_types::ExecutionRecord;
    use flowdeck_util::UserPreferences;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::app::Effect;
    use crate::ui::theme::DraculaTheme;

    struct EmptyService;

    #[async_trait]
    impl ExecutionService for EmptyService {
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
            workflow_name: "nightly-backup".into(),
            status,
            started_at: None,
            duration_seconds: None,
            steps_completed: 2,
            total_steps: 5,
        }
    }

    fn app_with(filter: StatusFilter, records: Vec<ExecutionRecord>) -> App {
        let controller = ExecutionListController::new(Arc::new(EmptyService), filter);
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

    fn loaded_app() -> App {
        app_with(StatusFilter::All, vec![record("exec-7", ExecutionStatus::Running)])
    }

    fn draw(app: &mut App, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut view = MainView::new();
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal
            .draw(|frame| view.render(frame, frame.area(), app))
            .expect("draw");
        terminal
    }

    /// Buffer cell holding the first character of `needle` on screen.
    fn first_cell_of<'a>(terminal: &'a Terminal<TestBackend>, needle: &str) -> &'a ratatui::buffer::Cell {
        let buffer = terminal.backend().buffer();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                let found = needle
                    .chars()
                    .enumerate()
                    .all(|(offset, ch)| {
                        let column = x + offset as u16;
                        column < buffer.area.width && buffer[(column, y)].symbol() == ch.to_string()
                    });
                if found {
                    return &buffer[(x, y)];
                }
            }
        }
        panic!("{needle} not on screen");
    }

    fn hint_line(terminal: &Terminal<TestBackend>) -> String {
        screen_text(terminal)
            .lines()
            .find(|line| line.contains("Hints:"))
            .expect("hint bar rendered")
            .to_string()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn renders_rows_and_hints() {
        let mut app = loaded_app();
        let terminal = draw(&mut app, 120, 20);
        let text = screen_text(&terminal);
        assert!(text.contains("nightly-backup"));
        assert!(text.contains("2/5"));
        let hints = hint_line(&terminal);
        assert!(hints.contains("Cancel"), "{hints}");
        assert!(!hints.contains("Retry"), "running executions cannot be retried: {hints}");
    }

    #[test]
    fn hints_follow_the_selected_record() {
        let mut completed = app_with(StatusFilter::All, vec![record("exec-1", ExecutionStatus::Completed)]);
        let hints = hint_line(&draw(&mut completed, 120, 20));
        assert!(!hints.contains("Retry") && !hints.contains("Cancel"), "{hints}");

        let mut failed = app_with(StatusFilter::All, vec![record("exec-2", ExecutionStatus::Failed)]);
        let hints = hint_line(&draw(&mut failed, 120, 20));
        assert!(hints.contains("Retry") && !hints.contains("Cancel"), "{hints}");

        failed.update(Msg::RetrySelected);
        let hints = hint_line(&draw(&mut failed, 120, 20));
        assert!(!hints.contains("Retry"), "no retry hint while one is in flight: {hints}");

        let mut empty = app_with(StatusFilter::All, Vec::new());
        let hints = hint_line(&draw(&mut empty, 120, 20));
        assert!(!hints.contains("Retry") && !hints.contains("Details"), "{hints}");
        assert!(hints.contains("Refresh"), "{hints}");
    }

    #[test]
    fn merged_row_outside_the_filter_is_muted() {
        let mut app = app_with(
            StatusFilter::Only(ExecutionStatus::Failed),
            vec![record("exec-1", ExecutionStatus::Failed), record("exec-2", ExecutionStatus::Failed)],
        );
        app.update(Msg::MoveSelection(1));
        app.update(Msg::RetrySelected);
        app.update(Msg::ActionCompleted {
            record_id: "exec-2".into(),
            result: Ok(record("exec-2", ExecutionStatus::Pending)),
        });
        app.update(Msg::MoveSelection(-1));
        app.controller.notifications_mut().drain();
        assert_eq!(app.controller.records().len(), 2);

        let terminal = draw(&mut app, 120, 20);
        let muted = app.theme.text_muted_style().fg;
        assert_eq!(Some(first_cell_of(&terminal, "exec-2").fg), muted);
        assert_ne!(Some(first_cell_of(&terminal, "exec-1").fg), muted);
    }

    #[test]
    fn renders_confirmation_modal_over_table() {
        let mut app = loaded_app();
        app.update(Msg::CancelSelected);
        let text = screen_text(&draw(&mut app, 120, 24));
        assert!(text.contains("Cancel execution"));
        assert!(text.contains("Keep running"));
    }
}
