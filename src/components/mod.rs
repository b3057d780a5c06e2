use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod canvas;
pub mod event_log;
pub mod pack_panel;
pub mod tree_list;

pub use canvas::{BufferSurface, DrawSurface, PackCanvasComponent, render_regions};
pub use event_log::{EventLogComponent, EventLogHandle};
pub use pack_panel::PackPanelComponent;
pub use tree_list::{LineRole, LineStyle, TreeListPresenter};

pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool);

    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

    struct DummyComp;
    impl Component for DummyComp {
        fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _focused: bool) {}
    }

    #[test]
    fn default_handle_event_returns_false() {
        let mut d = DummyComp;
        assert!(!d.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('a'),
            KeyModifiers::NONE
        ))));
    }
}
