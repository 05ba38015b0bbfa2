use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use super::state::ModalButton;
use crate::app::{App, Effect, Msg};
use crate::ui::components::{Component, build_hint_spans};

const BUTTON_WIDTH: u16 = 16;
const BUTTON_SPACER: u16 = 2;

/// Blocking yes/no prompt. While open it captures all input.
#[derive(Default, Debug, Clone)]
pub struct ConfirmationModal;

impl Component for ConfirmationModal {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Left => app.confirmation_modal_state.focus(ModalButton::Confirm),
            KeyCode::Right => app.confirmation_modal_state.focus(ModalButton::Dismiss),
            KeyCode::Tab | KeyCode::BackTab => app.confirmation_modal_state.toggle_focus(),
            KeyCode::Enter => {
                let confirmed = app.confirmation_modal_state.is_button_focused(ModalButton::Confirm);
                return app.update(Msg::ConfirmationResolved(confirmed));
            }
            KeyCode::Esc => return app.update(Msg::ConfirmationResolved(false)),
            _ => {}
        }
        app.mark_dirty();
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let state = &app.confirmation_modal_state;
        let title = state.title().unwrap_or_default();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.severity_style(state.severity()))
            .title(Span::styled(format!(" {title} "), theme.accent_emphasis_style()))
            .style(theme.modal_background_style());
        let inner = block.inner(rect);

        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);

        let [message_rect, _, button_rect] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1), Constraint::Length(3)]).areas(inner);

        if let Some(message) = state.message() {
            let lines: Vec<Line> = message
                .lines()
                .map(|line| Line::from(Span::styled(line.to_string(), theme.text_primary_style())))
                .collect();
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), message_rect);
        }

        for (index, (button, label)) in state.buttons().into_iter().enumerate() {
            let offset = index as u16 * (BUTTON_WIDTH + BUTTON_SPACER);
            if offset >= button_rect.width {
                break;
            }
            let area = Rect::new(
                button_rect.x + offset,
                button_rect.y,
                BUTTON_WIDTH.min(button_rect.width - offset),
                button_rect.height,
            );
            let focused = state.is_button_focused(button);
            let mut style = if button == ModalButton::Confirm {
                theme.severity_style(flowdeck_types::Severity::Error)
            } else {
                theme.text_primary_style()
            };
            if focused {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            let button_block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme.border_style(focused));
            let widget = Paragraph::new(Span::styled(label.to_string(), style))
                .alignment(Alignment::Center)
                .block(button_block);
            frame.render_widget(widget, area);
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        build_hint_spans(
            &*app.theme,
            &[("←/→/Tab", " Choose  "), ("Enter", " Select  "), ("Esc", " Keep running")],
        )
    }
}
