use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the screen.
///
/// Components get their data as props (struct fields) and may keep
/// presentation state of their own (scroll offsets, input buffers).
/// `render` takes `&mut self` so that state can be updated during the
/// render pass, the same way Ratatui's `StatefulWidget` works.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal input.
pub trait EventHandler {
    /// The higher-level event this component reports to its parent.
    type Event;

    /// Returns `Some` when the parent has something to act on.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
