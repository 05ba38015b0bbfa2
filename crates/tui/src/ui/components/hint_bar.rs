//! Hint bar component for keyboard shortcuts.
//!
//! Renders the single-line strip at the bottom of the screen. The hints come
//! from whichever component currently owns input.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ui::theme::Theme;

/// Builds alternating key/description spans.
pub fn build_hint_spans(theme: &dyn Theme, hints: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(*key, theme.accent_emphasis_style()));
        spans.push(Span::styled(*description, theme.text_muted_style()));
    }
    spans
}

#[derive(Debug, Default)]
pub struct HintBarComponent;

impl HintBarComponent {
    pub fn render_spans(&self, frame: &mut Frame, rect: Rect, theme: &dyn Theme, spans: Vec<Span<'_>>) {
        let mut line = vec![Span::styled("Hints: ", theme.text_muted_style())];
        line.extend(spans);
        frame.render_widget(Paragraph::new(Line::from(line)).style(theme.text_muted_style()), rect);
    }
}
