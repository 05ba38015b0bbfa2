//! Component system for the Flowdeck console.
//!
//! Components are self-contained UI elements that render a slice of [`App`]
//! state and translate key presses into messages. Every state change still
//! goes through [`App::update`], so components hold only view-local state
//! (table scroll offsets, button hit areas).

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::app::{App, Effect};

pub(crate) trait Component {
    /// Handle a key press while this component owns input.
    ///
    /// Returns the effects produced by whatever messages the key triggered.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should be side-effect free except for frame drawing
    /// and caching layout needed for later input handling.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the hint bar while this component owns input.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }
}
