//! The visualiser window: widget list, pack options and geometry canvas
//! driven by one selection.
//!
//! Every selection runs the same synchronous sequence: highlight in the
//! inspected program, recolour the list, show the pack options, recompute
//! and store the regions. Recolouring moves the list cursor silently, so
//! that step never queues another selection.

use std::rc::Rc;

use crossterm::event::Event;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};

use crate::components::{
    Component, EventLogComponent, PackCanvasComponent, PackPanelComponent, TreeListPresenter,
};
use crate::config::InspectorConfig;
use crate::error::InspectError;
use crate::geometry::{PackGeometry, RegionSet};
use crate::keybindings::{Action, KeyBindings};
use crate::selection::{HighlightService, SelectionMachine, SelectionState};
use crate::ui::UiFrame;
use crate::widget::{WidgetHandle, WidgetId, WidgetTree};

const PANEL_HEIGHT: u16 = 9;
const LOG_HEIGHT: u16 = 6;

const HINT_ACTIONS: &[Action] = &[
    Action::MoveDown,
    Action::MoveUp,
    Action::SelectParent,
    Action::ClearSelection,
    Action::Rescan,
    Action::DestroyWidget,
    Action::Quit,
];

pub struct Inspector<H: HighlightService> {
    config: InspectorConfig,
    tree: Option<WidgetTree>,
    selection: SelectionMachine<H>,
    geometry: PackGeometry,
    list: TreeListPresenter,
    panel: PackPanelComponent,
    canvas: PackCanvasComponent,
    log: Option<EventLogComponent>,
    bindings: KeyBindings,
}

impl<H: HighlightService> Inspector<H> {
    pub fn new(config: InspectorConfig, service: H) -> Self {
        let palette = config.palette;
        let geometry = PackGeometry::new(config.pack_defaults);
        Self {
            config,
            tree: None,
            selection: SelectionMachine::new(service),
            geometry,
            list: TreeListPresenter::new("Widgets", palette),
            panel: PackPanelComponent::new(palette),
            canvas: PackCanvasComponent::new("Geometry", palette),
            log: None,
            bindings: KeyBindings::default(),
        }
    }

    /// Show `log` in a strip along the bottom of the window.
    pub fn with_event_log(mut self, log: EventLogComponent) -> Self {
        self.log = Some(log);
        self
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn tree(&self) -> Option<&WidgetTree> {
        self.tree.as_ref()
    }

    pub fn selection(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn list(&self) -> &TreeListPresenter {
        &self.list
    }

    pub fn panel(&self) -> &PackPanelComponent {
        &self.panel
    }

    /// Regions of the current selection, as last handed to the canvas.
    pub fn regions(&self) -> Option<&RegionSet> {
        self.canvas.regions()
    }

    /// Key summary shown in the row above the event log.
    pub fn key_hints(&self) -> String {
        self.bindings.hint_line(HINT_ACTIONS)
    }

    pub fn service(&self) -> &H {
        self.selection.service()
    }

    pub fn service_mut(&mut self) -> &mut H {
        self.selection.service_mut()
    }

    /// Replace the inspected tree. Any selection is released first.
    ///
    /// When the new tree fails to build the previous one stays loaded.
    pub fn set_object_tree<I>(
        &mut self,
        root: Rc<dyn WidgetHandle>,
        descendants: I,
    ) -> Result<(), InspectError>
    where
        I: IntoIterator<Item = Rc<dyn WidgetHandle>>,
    {
        self.clear_selection();
        let tree = WidgetTree::build(root, descendants)?;
        self.list.render_tree(&tree);
        self.list.set_cursor(0);
        tracing::info!(widgets = tree.len(), root = %tree.root_id(), "loaded widget tree");
        self.tree = Some(tree);
        Ok(())
    }

    pub fn select_line(&mut self, line: usize) -> Result<SelectionState, InspectError> {
        if self.tree.is_none() {
            return Err(InspectError::NoTree);
        }
        let id = self
            .list
            .widget_at(line)
            .ok_or(InspectError::UnknownLine(line))?;
        self.select_node(id)
    }

    /// Select `id` and refresh every view.
    ///
    /// A widget or parent that turns out to be destroyed clears the
    /// selection instead of failing.
    pub fn select_node(&mut self, id: WidgetId) -> Result<SelectionState, InspectError> {
        let Some(tree) = self.tree.as_ref() else {
            return Err(InspectError::NoTree);
        };
        let state = self.selection.select_node(tree, id)?;

        match self.refresh(id, state.parent()) {
            Ok(()) => Ok(state),
            Err(err) if err.is_stale() => {
                tracing::warn!(widget = %id, error = %err, "selected widget went away");
                self.clear_selection();
                Ok(self.selection.state())
            }
            Err(err) => Err(err),
        }
    }

    fn refresh(&mut self, id: WidgetId, parent: Option<WidgetId>) -> Result<(), InspectError> {
        let Some(tree) = self.tree.as_ref() else {
            return Err(InspectError::NoTree);
        };
        self.list.recolor(tree, Some(id));
        if let Some(line) = self.list.line_of(id) {
            self.list.set_cursor(line);
        }

        let node = tree.node(id)?;
        self.panel.show(node, self.geometry.resolve(tree, id)?);

        let regions = self.geometry.compute_regions(tree, id)?;
        if let Some(parent) = parent
            && regions.skipped.contains(&parent)
        {
            return Err(InspectError::StaleHandle(parent));
        }
        tracing::debug!(widget = %id, regions = regions.regions.len(), "recomputed geometry");
        self.canvas.set_regions(regions);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
        if let Some(tree) = self.tree.as_ref() {
            self.list.recolor(tree, None);
        }
        self.panel.clear();
        self.canvas.clear();
    }

    fn select_parent(&mut self) -> Result<SelectionState, InspectError> {
        match self.selection.state().parent() {
            Some(parent) => self.select_node(parent),
            None => Ok(self.selection.state()),
        }
    }

    fn drain_list_selection(&mut self) {
        let Some(line) = self.list.take_selection_change() else {
            return;
        };
        if let Err(err) = self.select_line(line) {
            tracing::warn!(line, error = %err, "could not select list line");
        }
    }
}

impl<H: HighlightService> Component for Inspector<H> {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool) {
        let log_height = if self.log.is_some() { LOG_HEIGHT } else { 0 };
        let [main, hints, bottom] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(log_height),
        ])
        .areas(area);
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(main);
        let [list_area, panel_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(PANEL_HEIGHT)]).areas(left);

        self.list.render(frame, list_area, focused);
        self.panel.render(frame, panel_area, false);
        self.canvas.render(frame, right, false);
        frame.set_string(
            hints,
            hints.x,
            hints.y,
            &self.key_hints(),
            Style::default().add_modifier(Modifier::DIM),
        );
        if let Some(log) = self.log.as_mut() {
            log.render(frame, bottom, false);
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if let Event::Key(key) = event {
            match self.bindings.action_for_key(key) {
                Some(Action::ClearSelection) => {
                    self.clear_selection();
                    return true;
                }
                Some(Action::SelectParent) => {
                    if let Err(err) = self.select_parent() {
                        tracing::warn!(error = %err, "could not select parent");
                    }
                    return true;
                }
                _ => {}
            }
        }
        let handled = self.list.handle_event(event);
        self.drain_list_selection();
        handled
    }
}
