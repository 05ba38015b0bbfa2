//! Detail pane for the selected execution.

use flowdeck_util::format_timestamp;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::app::App;
use crate::ui::components::Component;

#[derive(Debug, Default)]
pub struct DetailComponent;

impl Component for DetailComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border_style(false))
            .title(Span::styled(" Details ", theme.accent_emphasis_style()));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let Some(record) = app.controller.selected() else {
            frame.render_widget(
                Paragraph::new(Span::styled("Nothing selected.", theme.text_muted_style())),
                inner,
            );
            return;
        };

        let label = |text: &'static str| Span::styled(format!("{text:<10}"), theme.text_secondary_style());
        let mut lines = vec![
            Line::from(vec![label("ID"), Span::styled(record.id.clone(), theme.text_primary_style())]),
            Line::from(vec![
                label("Workflow"),
                Span::styled(record.workflow_name.clone(), theme.text_primary_style()),
            ]),
            Line::from(vec![
                label("Status"),
                Span::styled(record.status.label(), theme.execution_status_style(record.status)),
            ]),
            Line::from(vec![
                label("Started"),
                Span::styled(
                    record.started_at.as_ref().map(format_timestamp).unwrap_or_else(|| "-".into()),
                    theme.text_primary_style(),
                ),
            ]),
            Line::from(vec![
                label("Duration"),
                Span::styled(record.duration_label().unwrap_or_else(|| "-".into()), theme.text_primary_style()),
            ]),
        ];
        if let Some(kind) = app.controller.pending_action(&record.id) {
            lines.push(Line::from(Span::styled(
                format!("A {} request is in progress.", kind.verb()),
                theme.text_muted_style(),
            )));
        }

        let [text_area, gauge_area] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
        frame.render_widget(Paragraph::new(lines), text_area);

        let gauge = Gauge::default()
            .ratio(record.progress_ratio())
            .label(format!("{} steps", record.progress_label()))
            .gauge_style(theme.accent_primary_style());
        frame.render_widget(gauge, gauge_area);
    }
}
