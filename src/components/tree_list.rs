use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::components::Component;
use crate::config::Palette;
use crate::keybindings::{Action, KeyBindings};
use crate::ui::UiFrame;
use crate::widget::{WidgetId, WidgetTree, format_tree};

const PAGE_STEP: isize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineRole {
    #[default]
    Normal,
    Active,
    Parent,
}

/// Colour coding of one list line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineStyle {
    pub role: LineRole,
    /// Widget needs packing but the packer reported nothing.
    pub warning: bool,
}

/// The widget tree as a navigable, colour-coded list.
///
/// Line `i` always shows the widget at `widget_at(i)`. Moving the cursor with
/// keys or the mouse queues a selection change for the owner to pick up with
/// `take_selection_change`; `set_cursor` and `recolor` never do.
pub struct TreeListPresenter {
    title: String,
    palette: Palette,
    lines: Vec<String>,
    widgets: Vec<WidgetId>,
    styles: Vec<LineStyle>,
    cursor: usize,
    offset: usize,
    inner: Rect,
    pending: Option<usize>,
    bindings: KeyBindings,
}

impl TreeListPresenter {
    pub fn new<T: Into<String>>(title: T, palette: Palette) -> Self {
        Self {
            title: title.into(),
            palette,
            lines: Vec::new(),
            widgets: Vec::new(),
            styles: Vec::new(),
            cursor: 0,
            offset: 0,
            inner: Rect::default(),
            pending: None,
            bindings: KeyBindings::default(),
        }
    }

    /// Replace the listing with the lines of `tree`, dropping any colouring.
    pub fn render_tree(&mut self, tree: &WidgetTree) -> &[String] {
        self.lines = format_tree(tree);
        self.widgets = tree.preorder();
        debug_assert_eq!(self.lines.len(), self.widgets.len());
        self.styles = vec![LineStyle::default(); self.lines.len()];
        self.recolor(tree, None);
        self.cursor = self.cursor.min(self.lines.len().saturating_sub(1));
        self.pending = None;
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.widgets.clear();
        self.styles.clear();
        self.cursor = 0;
        self.offset = 0;
        self.pending = None;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn styles(&self) -> &[LineStyle] {
        &self.styles
    }

    pub fn widget_at(&self, line: usize) -> Option<WidgetId> {
        self.widgets.get(line).copied()
    }

    pub fn line_of(&self, id: WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| *w == id)
    }

    /// Restyle every line for `active`. Text and order are left untouched.
    pub fn recolor(&mut self, tree: &WidgetTree, active: Option<WidgetId>) {
        let parent = active.and_then(|id| tree.get(id)).and_then(|n| n.parent());
        for (style, id) in self.styles.iter_mut().zip(&self.widgets) {
            style.role = if Some(*id) == active {
                LineRole::Active
            } else if Some(*id) == parent {
                LineRole::Parent
            } else {
                LineRole::Normal
            };
            style.warning = tree.get(*id).is_some_and(|n| n.is_unpacked_warning());
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor without queuing a selection change.
    pub fn set_cursor(&mut self, line: usize) {
        self.cursor = line.min(self.lines.len().saturating_sub(1));
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.lines.is_empty() {
            self.cursor = 0;
            return;
        }
        let next = if delta.is_negative() {
            self.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            (self.cursor + delta as usize).min(self.lines.len() - 1)
        };
        self.jump_to(next);
    }

    fn jump_to(&mut self, line: usize) {
        if line >= self.lines.len() {
            return;
        }
        self.cursor = line;
        self.pending = Some(line);
    }

    /// Line index the user picked since the last call, if any.
    pub fn take_selection_change(&mut self) -> Option<usize> {
        self.pending.take()
    }

    fn line_style(&self, style: LineStyle) -> Style {
        let fg = match style.role {
            LineRole::Active => self.palette.active,
            LineRole::Parent => self.palette.parent,
            LineRole::Normal => self.palette.text,
        };
        let mut out = Style::default().fg(fg);
        if style.warning {
            out = out.bg(self.palette.warning);
        }
        if style.role == LineRole::Active {
            out = out.add_modifier(Modifier::BOLD);
        }
        out
    }

    fn keep_cursor_in_view(&mut self, view: usize) {
        if view == 0 || self.lines.is_empty() {
            self.offset = 0;
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + view {
            self.offset = self.cursor + 1 - view;
        }
    }

    fn handle_mouse(&mut self, event: &Event) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        let inner = self.inner;
        let inside = mouse.column >= inner.x
            && mouse.column < inner.x.saturating_add(inner.width)
            && mouse.row >= inner.y
            && mouse.row < inner.y.saturating_add(inner.height);
        if !inside {
            return false;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let line = self.offset + (mouse.row - inner.y) as usize;
                self.jump_to(line);
                true
            }
            MouseEventKind::ScrollUp => {
                self.move_cursor(-1);
                true
            }
            MouseEventKind::ScrollDown => {
                self.move_cursor(1);
                true
            }
            _ => false,
        }
    }
}

impl Component for TreeListPresenter {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool) {
        let block = if focused {
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} (focus)", self.title))
                .border_style(Style::default().fg(self.palette.active))
        } else {
            Block::default()
                .borders(Borders::ALL)
                .title(self.title.as_str())
        };
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.inner = inner;
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let view = inner.height as usize;
        self.keep_cursor_in_view(view);

        let items = self
            .lines
            .iter()
            .zip(&self.styles)
            .skip(self.offset)
            .take(view)
            .map(|(line, style)| ListItem::new(line.clone()).style(self.line_style(*style)))
            .collect::<Vec<_>>();

        let mut state = ListState::default();
        if !self.lines.is_empty() && self.cursor >= self.offset {
            state.select(Some(self.cursor - self.offset));
        }

        let list =
            List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, inner, &mut state);
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => match self.bindings.action_for_key(key) {
                Some(Action::MoveUp) => {
                    self.move_cursor(-1);
                    true
                }
                Some(Action::MoveDown) => {
                    self.move_cursor(1);
                    true
                }
                Some(Action::PageUp) => {
                    self.move_cursor(-PAGE_STEP);
                    true
                }
                Some(Action::PageDown) => {
                    self.move_cursor(PAGE_STEP);
                    true
                }
                Some(Action::Home) => {
                    self.jump_to(0);
                    true
                }
                Some(Action::End) => {
                    self.jump_to(self.lines.len().saturating_sub(1));
                    true
                }
                _ => false,
            },
            Event::Mouse(_) => self.handle_mouse(event),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::scene::demo_scene;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    fn key_event(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn tree() -> WidgetTree {
        let scene = demo_scene();
        WidgetTree::build(scene.root().unwrap(), scene.descendants()).unwrap()
    }

    #[test]
    fn lines_map_back_to_widgets() {
        let tree = tree();
        let mut list = TreeListPresenter::new("Widgets", Palette::default());
        let lines = list.render_tree(&tree).to_vec();
        assert_eq!(lines.len(), tree.len());
        assert_eq!(lines[0], "Toplevel .vis");
        assert_eq!(list.widget_at(0), Some(WidgetId(1)));
        assert_eq!(list.widget_at(2), Some(WidgetId(3)));
        assert!(lines[2].ends_with("Listbox .vis.left.widgets"));
        assert_eq!(list.line_of(WidgetId(3)), Some(2));
        assert_eq!(list.widget_at(99), None);
    }

    #[test]
    fn recolor_marks_active_parent_and_warning() {
        let tree = tree();
        let mut list = TreeListPresenter::new("Widgets", Palette::default());
        list.render_tree(&tree);
        let before = list.lines().to_vec();

        let label = list.line_of(WidgetId(13)).unwrap();
        assert!(list.styles()[label].warning);

        list.recolor(&tree, Some(WidgetId(3)));
        let active = list.line_of(WidgetId(3)).unwrap();
        let parent = list.line_of(WidgetId(2)).unwrap();
        assert_eq!(list.styles()[active].role, LineRole::Active);
        assert_eq!(list.styles()[parent].role, LineRole::Parent);
        assert_eq!(list.styles()[0].role, LineRole::Normal);
        assert!(list.styles()[label].warning);
        assert_eq!(list.lines(), before.as_slice());

        list.recolor(&tree, None);
        assert!(list.styles().iter().all(|s| s.role == LineRole::Normal));
        assert!(list.styles()[label].warning);
    }

    #[test]
    fn keys_queue_selection_changes() {
        let mut list = TreeListPresenter::new("t", Palette::default());
        list.render_tree(&tree());
        assert!(list.handle_event(&key_event(KeyCode::Down)));
        assert_eq!(list.take_selection_change(), Some(1));
        assert_eq!(list.take_selection_change(), None);
        list.handle_event(&key_event(KeyCode::End));
        assert_eq!(list.cursor(), 12);
        list.handle_event(&key_event(KeyCode::Char('k')));
        assert_eq!(list.take_selection_change(), Some(11));
        list.handle_event(&key_event(KeyCode::Home));
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn set_cursor_is_silent() {
        let mut list = TreeListPresenter::new("t", Palette::default());
        list.render_tree(&tree());
        list.set_cursor(4);
        assert_eq!(list.cursor(), 4);
        assert_eq!(list.take_selection_change(), None);
        list.set_cursor(500);
        assert_eq!(list.cursor(), 12);
    }

    #[test]
    fn click_selects_row_under_pointer() {
        let mut list = TreeListPresenter::new("t", Palette::default());
        list.render_tree(&tree());
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        list.render(&mut UiFrame::from_parts(area, &mut buf), area, true);
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });
        assert!(list.handle_event(&click));
        // one border row above the first line
        assert_eq!(list.take_selection_change(), Some(2));
    }

    #[test]
    fn render_paints_warning_background() {
        let palette = Palette::default();
        let mut list = TreeListPresenter::new("t", palette);
        list.render_tree(&tree());
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        list.render(&mut UiFrame::from_parts(area, &mut buf), area, false);
        let row = 1 + list.line_of(WidgetId(13)).unwrap() as u16;
        assert_eq!(buf[(1, row)].bg, palette.warning);
    }
}
