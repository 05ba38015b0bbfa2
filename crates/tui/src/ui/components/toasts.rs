//! Stacked toast notifications in the top-right corner.

use chrono::Utc;
use flowdeck_types::Severity;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::ui::components::Component;

const TOAST_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 4;
const MAX_VISIBLE: usize = 3;

fn severity_title(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => " Info ",
        Severity::Success => " Done ",
        Severity::Warning => " Not allowed ",
        Severity::Error => " Error ",
    }
}

#[derive(Debug, Default)]
pub struct ToastsComponent;

impl Component for ToastsComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let active = app.controller.notifications().active(Utc::now());
        let width = TOAST_WIDTH.min(rect.width);
        let x = rect.x + rect.width - width;

        // Newest on top.
        for (slot, notification) in active.iter().rev().take(MAX_VISIBLE).enumerate() {
            let y = rect.y + slot as u16 * TOAST_HEIGHT;
            if y + TOAST_HEIGHT > rect.y + rect.height {
                break;
            }
            let area = Rect::new(x, y, width, TOAST_HEIGHT);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme.severity_style(notification.severity))
                .title(Span::styled(
                    severity_title(notification.severity),
                    theme.severity_style(notification.severity),
                ))
                .style(theme.modal_background_style());
            let body = Paragraph::new(Line::from(Span::styled(
                notification.message.clone(),
                theme.text_primary_style(),
            )))
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(Clear, area);
            frame.render_widget(body, area);
        }
    }
}
