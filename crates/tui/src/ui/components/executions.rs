//! Execution table: the main view of the console.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use flowdeck_engine::ActionKind;
use flowdeck_types::ExecutionRecord;
use flowdeck_util::format_relative_age;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::{App, Effect, Msg};
use crate::ui::components::{Component, build_hint_spans};
use crate::ui::theme::Theme;
use crate::ui::utils::truncate_to_width;

const COLUMN_WIDTHS: [Constraint; 6] = [
    Constraint::Length(14),
    Constraint::Min(16),
    Constraint::Length(14),
    Constraint::Length(9),
    Constraint::Length(10),
    Constraint::Length(11),
];

#[derive(Debug, Default)]
pub struct ExecutionsComponent {
    table_state: TableState,
}

impl ExecutionsComponent {
    /// Maps a key press to the message it triggers, if any.
    pub fn message_for_key(key: KeyEvent) -> Option<Msg> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Msg::Quit),
                _ => None,
            };
        }
        let msg = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Msg::MoveSelection(-1),
            KeyCode::Down | KeyCode::Char('j') => Msg::MoveSelection(1),
            KeyCode::PageUp => Msg::MoveSelection(-10),
            KeyCode::PageDown => Msg::MoveSelection(10),
            KeyCode::Char('f') => Msg::NextFilter,
            KeyCode::Char('F') => Msg::PrevFilter,
            KeyCode::Char('r') => Msg::RetrySelected,
            KeyCode::Char('c') => Msg::CancelSelected,
            KeyCode::Char('g') => Msg::Refresh,
            KeyCode::Enter => Msg::ToggleDetail,
            KeyCode::Char('q') => Msg::Quit,
            _ => return None,
        };
        Some(msg)
    }
}

fn status_cell<'a>(theme: &dyn Theme, record: &ExecutionRecord, pending: Option<ActionKind>) -> Cell<'a> {
    let text = match pending {
        Some(ActionKind::Retry) => "retrying…".to_string(),
        Some(ActionKind::Cancel) => "cancelling…".to_string(),
        None => record.status.label().to_string(),
    };
    let style = match pending {
        Some(_) => theme.text_muted_style(),
        None => theme.execution_status_style(record.status),
    };
    Cell::from(Span::styled(text, style))
}

impl Component for ExecutionsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match Self::message_for_key(key) {
            Some(msg) => app.update(msg),
            None => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let controller = &app.controller;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border_style(app.modal.is_none()))
            .title(Span::styled(
                format!(" Executions ({}) ", controller.records().len()),
                theme.accent_emphasis_style(),
            ));

        if controller.records().is_empty() {
            let text = if controller.is_loading() {
                "Loading executions…"
            } else {
                "No executions match this filter."
            };
            let empty = Paragraph::new(Line::from(Span::styled(text, theme.text_muted_style()))).block(block);
            frame.render_widget(empty, rect);
            return;
        }

        let now = Utc::now();
        let workflow_width = rect.width.saturating_sub(14 + 14 + 9 + 10 + 11 + 8) as usize;
        let rows: Vec<Row> = controller
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let started = record
                    .started_at
                    .as_ref()
                    .map(|ts| format_relative_age(ts, now))
                    .unwrap_or_else(|| "-".to_string());
                let duration = record.duration_label().unwrap_or_else(|| "-".to_string());
                // Merged rows outside the filter stay until the next reload.
                let style = if controller.filter().matches(record) {
                    theme.table_row_style(index)
                } else {
                    theme.table_row_style(index).patch(theme.text_muted_style())
                };
                Row::new(vec![
                    Cell::from(truncate_to_width(&record.id, 14)),
                    Cell::from(truncate_to_width(&record.workflow_name, workflow_width.max(8))),
                    status_cell(theme, record, controller.pending_action(&record.id)),
                    Cell::from(record.progress_label()),
                    Cell::from(started),
                    Cell::from(duration),
                ])
                .style(style)
            })
            .collect();

        let header = Row::new(["ID", "Workflow", "Status", "Steps", "Started", "Duration"])
            .style(theme.text_secondary_style())
            .bottom_margin(0);

        let table = Table::new(rows, COLUMN_WIDTHS)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(theme.selection_style())
            .highlight_symbol("▶ ");

        self.table_state.select(controller.selected_index());
        frame.render_stateful_widget(table, rect, &mut self.table_state);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let controller = &app.controller;
        let selected = controller.selected().map(|record| record.id.as_str());
        let mut hints = vec![("↑/↓", " Select  "), ("f/F", " Filter  ")];
        if selected.is_some_and(|id| controller.can_retry(id)) {
            hints.push(("r", " Retry  "));
        }
        if selected.is_some_and(|id| controller.can_cancel(id)) {
            hints.push(("c", " Cancel  "));
        }
        if selected.is_some() {
            hints.push(("Enter", " Details  "));
        }
        hints.extend([("g", " Refresh  "), ("q", " Quit")]);
        build_hint_spans(&*app.theme, &hints)
    }
}
