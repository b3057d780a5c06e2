//! Active widget / parent-in-focus tracking.
//!
//! At most two widgets carry a highlight at any time: the active one and its
//! parent. Every transition clears the old pair before styling the new one,
//! so highlight and clear calls stay balanced even when the same widget is
//! selected again.

use std::rc::Rc;

use crate::error::InspectError;
use crate::widget::{WidgetHandle, WidgetId, WidgetTree};

/// Styles widgets in the inspected program.
///
/// Both calls must tolerate handles that were never styled or that have been
/// destroyed since the token was taken.
pub trait HighlightService {
    /// Whatever is needed to undo one `highlight` call.
    type Token;

    fn highlight(&mut self, handle: &dyn WidgetHandle, as_parent: bool) -> Self::Token;

    fn clear_highlight(&mut self, handle: &dyn WidgetHandle, token: Self::Token);
}

impl<T: HighlightService + ?Sized> HighlightService for &mut T {
    type Token = T::Token;

    fn highlight(&mut self, handle: &dyn WidgetHandle, as_parent: bool) -> Self::Token {
        (**self).highlight(handle, as_parent)
    }

    fn clear_highlight(&mut self, handle: &dyn WidgetHandle, token: Self::Token) {
        (**self).clear_highlight(handle, token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected {
        node: WidgetId,
        parent: Option<WidgetId>,
    },
}

impl SelectionState {
    pub fn active(&self) -> Option<WidgetId> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected { node, .. } => Some(*node),
        }
    }

    pub fn parent(&self) -> Option<WidgetId> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected { parent, .. } => *parent,
        }
    }
}

struct Highlighted<T> {
    handle: Rc<dyn WidgetHandle>,
    token: T,
}

pub struct SelectionMachine<H: HighlightService> {
    service: H,
    state: SelectionState,
    active: Option<Highlighted<H::Token>>,
    parent: Option<Highlighted<H::Token>>,
}

impl<H: HighlightService> SelectionMachine<H> {
    pub fn new(service: H) -> Self {
        Self {
            service,
            state: SelectionState::Idle,
            active: None,
            parent: None,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn service(&self) -> &H {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut H {
        &mut self.service
    }

    /// Make `id` the active widget and its parent the parent-in-focus.
    pub fn select_node(
        &mut self,
        tree: &WidgetTree,
        id: WidgetId,
    ) -> Result<SelectionState, InspectError> {
        let node = tree.node(id)?;
        self.release();

        let handle = node.handle_rc();
        let token = self.service.highlight(handle.as_ref(), false);
        self.active = Some(Highlighted { handle, token });

        let parent = tree.parent_of(id).map(|p| {
            let handle = p.handle_rc();
            let token = self.service.highlight(handle.as_ref(), true);
            self.parent = Some(Highlighted { handle, token });
            p.id()
        });

        self.state = SelectionState::Selected { node: id, parent };
        tracing::debug!(widget = %id, parent = ?parent, "selected widget");
        Ok(self.state)
    }

    /// Drop the current highlight pair and go back to `Idle`.
    pub fn clear_selection(&mut self) {
        if self.state == SelectionState::Idle {
            return;
        }
        self.release();
        self.state = SelectionState::Idle;
        tracing::debug!("cleared selection");
    }

    fn release(&mut self) {
        if let Some(Highlighted { handle, token }) = self.active.take() {
            self.service.clear_highlight(handle.as_ref(), token);
        }
        if let Some(Highlighted { handle, token }) = self.parent.take() {
            self.service.clear_highlight(handle.as_ref(), token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::scene::StaticWidget;
    use std::collections::HashMap;

    /// Counts outstanding highlights per widget.
    #[derive(Default)]
    struct Recorder {
        live: HashMap<WidgetId, i32>,
        calls: Vec<String>,
    }

    impl HighlightService for Recorder {
        type Token = WidgetId;

        fn highlight(&mut self, handle: &dyn WidgetHandle, as_parent: bool) -> WidgetId {
            *self.live.entry(handle.id()).or_default() += 1;
            let kind = if as_parent { "parent" } else { "active" };
            self.calls.push(format!("{kind} {}", handle.id()));
            handle.id()
        }

        fn clear_highlight(&mut self, handle: &dyn WidgetHandle, token: WidgetId) {
            assert_eq!(handle.id(), token);
            if let Some(n) = self.live.get_mut(&token) {
                *n -= 1;
            }
            self.calls.push(format!("clear {token}"));
        }
    }

    fn tree() -> WidgetTree {
        let root = StaticWidget::toplevel(1, ".", (0, 0, 100, 100)).into_handle();
        let a = StaticWidget::new(2, "Frame", ".a", 1, (0, 0, 100, 50)).into_handle();
        let b = StaticWidget::new(3, "Button", ".a.b", 2, (0, 0, 20, 10)).into_handle();
        WidgetTree::build(root, vec![a, b]).unwrap()
    }

    #[test]
    fn select_highlights_node_and_parent() {
        let tree = tree();
        let mut sel = SelectionMachine::new(Recorder::default());
        let state = sel.select_node(&tree, WidgetId(3)).unwrap();
        assert_eq!(
            state,
            SelectionState::Selected {
                node: WidgetId(3),
                parent: Some(WidgetId(2))
            }
        );
        assert_eq!(sel.service().calls, vec!["active #3", "parent #2"]);
    }

    #[test]
    fn reselecting_keeps_highlights_balanced() {
        let tree = tree();
        let mut sel = SelectionMachine::new(Recorder::default());
        sel.select_node(&tree, WidgetId(3)).unwrap();
        sel.select_node(&tree, WidgetId(3)).unwrap();
        assert_eq!(sel.service().live[&WidgetId(3)], 1);
        assert_eq!(sel.service().live[&WidgetId(2)], 1);
    }

    #[test]
    fn moving_selection_clears_previous_pair_first() {
        let tree = tree();
        let mut sel = SelectionMachine::new(Recorder::default());
        sel.select_node(&tree, WidgetId(3)).unwrap();
        sel.select_node(&tree, WidgetId(2)).unwrap();
        assert_eq!(
            sel.service().calls,
            vec![
                "active #3",
                "parent #2",
                "clear #3",
                "clear #2",
                "active #2",
                "parent #1"
            ]
        );
        assert_eq!(sel.service().live[&WidgetId(3)], 0);
        assert_eq!(sel.service().live[&WidgetId(2)], 1);
        assert_eq!(sel.service().live[&WidgetId(1)], 1);
    }

    #[test]
    fn root_has_no_parent_in_focus() {
        let tree = tree();
        let mut sel = SelectionMachine::new(Recorder::default());
        let state = sel.select_node(&tree, WidgetId(1)).unwrap();
        assert_eq!(state.parent(), None);
        assert_eq!(sel.service().calls, vec!["active #1"]);
    }

    #[test]
    fn clear_on_idle_is_noop() {
        let mut sel = SelectionMachine::new(Recorder::default());
        sel.clear_selection();
        sel.clear_selection();
        assert_eq!(sel.state(), SelectionState::Idle);
        assert!(sel.service().calls.is_empty());
    }

    #[test]
    fn clear_releases_everything() {
        let tree = tree();
        let mut sel = SelectionMachine::new(Recorder::default());
        sel.select_node(&tree, WidgetId(3)).unwrap();
        sel.clear_selection();
        assert_eq!(sel.state(), SelectionState::Idle);
        assert!(sel.service().live.values().all(|n| *n == 0));
    }

    #[test]
    fn unknown_widget_leaves_state_alone() {
        let tree = tree();
        let mut sel = SelectionMachine::new(Recorder::default());
        sel.select_node(&tree, WidgetId(2)).unwrap();
        let err = sel.select_node(&tree, WidgetId(99)).unwrap_err();
        assert_eq!(err, InspectError::UnknownWidget(WidgetId(99)));
        assert_eq!(sel.state().active(), Some(WidgetId(2)));
    }
}
