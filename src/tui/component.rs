use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// A screen region that draws itself into a [`Frame`].
///
/// `render` takes `&mut self` so regions can keep presentation state (scroll
/// offsets, page sizes) in sync with what was actually drawn, the same way
/// ratatui's `StatefulWidget` does.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A region that reacts to [`TuiEvent`]s forwarded by the screen.
pub trait EventHandler {
    /// Follow-up the region reports back to the screen.
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
