use ratatui::Frame;
use ratatui::layout::Rect;

/// A UI component rendered into a `Frame`.
///
/// Components receive their data as struct fields and may hold `&mut`
/// references to persistent state, which `render` is free to update
/// (layout caches, scroll offsets). This mirrors ratatui's
/// `StatefulWidget`.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
