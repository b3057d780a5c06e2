//! A static widget scene standing in for an inspected program.
//!
//! `StaticWidget` answers the same queries a live toolkit widget would, but
//! from fixed pixel geometry that can be moved, resized or destroyed from the
//! outside. `Scene` is the widget registry and `SceneHighlighter` applies
//! highlight styles to it.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use ratatui::style::Color;

use crate::config::Palette;
use crate::selection::HighlightService;

use super::{Point, Size, WidgetHandle, WidgetId};

/// Widget kinds that manage their own window and are never packed.
const UNPACKED_KINDS: [&str; 3] = ["Tk", "Toplevel", "Menu"];

#[derive(Debug)]
pub struct StaticWidget {
    id: WidgetId,
    class_name: String,
    path: String,
    parent: Option<WidgetId>,
    origin: Cell<Point>,
    size: Cell<Size>,
    pack_info: RefCell<BTreeMap<String, String>>,
    alive: Cell<bool>,
    background: Cell<Option<Color>>,
}

impl StaticWidget {
    /// A widget at screen rectangle `(x, y, width, height)` inside `parent`.
    pub fn new(
        id: u64,
        class_name: &str,
        path: &str,
        parent: u64,
        (x, y, width, height): (i32, i32, i32, i32),
    ) -> Self {
        Self {
            id: WidgetId(id),
            class_name: class_name.to_string(),
            path: path.to_string(),
            parent: Some(WidgetId(parent)),
            origin: Cell::new(Point { x, y }),
            size: Cell::new(Size { width, height }),
            pack_info: RefCell::new(BTreeMap::new()),
            alive: Cell::new(true),
            background: Cell::new(None),
        }
    }

    pub fn toplevel(id: u64, path: &str, rect: (i32, i32, i32, i32)) -> Self {
        let mut widget = Self::new(id, "Toplevel", path, 0, rect);
        widget.parent = None;
        widget
    }

    /// Attach pack options, as `pack configure` would report them.
    pub fn packed(self, options: &[(&str, &str)]) -> Self {
        self.set_pack_info(options);
        self
    }

    pub fn set_pack_info(&self, options: &[(&str, &str)]) {
        *self.pack_info.borrow_mut() = options
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
    }

    pub fn into_handle(self) -> Rc<dyn WidgetHandle> {
        Rc::new(self)
    }

    pub fn move_to(&self, x: i32, y: i32) {
        self.origin.set(Point { x, y });
    }

    pub fn resize(&self, width: i32, height: i32) {
        self.size.set(Size { width, height });
    }

    pub fn destroy(&self) {
        self.alive.set(false);
    }

    pub fn background(&self) -> Option<Color> {
        self.background.get()
    }

    /// Swap the background style, returning the previous one.
    pub fn set_background(&self, color: Option<Color>) -> Option<Color> {
        self.background.replace(color)
    }
}

impl WidgetHandle for StaticWidget {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn parent_id(&self) -> Option<WidgetId> {
        self.parent
    }

    fn exists(&self) -> bool {
        self.alive.get()
    }

    fn screen_origin(&self) -> Point {
        self.origin.get()
    }

    fn size(&self) -> Size {
        self.size.get()
    }

    fn pack_info(&self) -> BTreeMap<String, String> {
        self.pack_info.borrow().clone()
    }

    fn needs_packing(&self) -> bool {
        !UNPACKED_KINDS.contains(&self.class_name.as_str())
    }
}

/// Registry of widgets, root first, in creation order.
#[derive(Debug, Default)]
pub struct Scene {
    widgets: Vec<Rc<StaticWidget>>,
}

impl Scene {
    pub fn new(root: StaticWidget) -> Self {
        Self {
            widgets: vec![Rc::new(root)],
        }
    }

    pub fn add(&mut self, widget: StaticWidget) -> Rc<StaticWidget> {
        let widget = Rc::new(widget);
        self.widgets.push(widget.clone());
        widget
    }

    pub fn get(&self, id: WidgetId) -> Option<&Rc<StaticWidget>> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn widgets(&self) -> &[Rc<StaticWidget>] {
        &self.widgets
    }

    pub fn root(&self) -> Option<Rc<dyn WidgetHandle>> {
        self.widgets
            .first()
            .map(|w| w.clone() as Rc<dyn WidgetHandle>)
    }

    /// Live descendants of the root, in creation order.
    pub fn descendants(&self) -> Vec<Rc<dyn WidgetHandle>> {
        self.widgets
            .iter()
            .skip(1)
            .filter(|w| w.exists())
            .map(|w| w.clone() as Rc<dyn WidgetHandle>)
            .collect()
    }

    /// Destroy `id` and everything below it, like the toolkit does.
    pub fn destroy(&self, id: WidgetId) -> usize {
        let mut doomed = vec![id];
        let mut count = 0;
        while let Some(next) = doomed.pop() {
            for widget in &self.widgets {
                if widget.id == next && widget.exists() {
                    widget.destroy();
                    count += 1;
                }
                if widget.parent == Some(next) {
                    doomed.push(widget.id);
                }
            }
        }
        tracing::info!(widget = %id, destroyed = count, "destroyed widget subtree");
        count
    }
}

/// Highlights scene widgets by swapping their background colour.
///
/// The token is the background the widget had before, so clearing restores
/// exactly what was there.
#[derive(Debug, Clone)]
pub struct SceneHighlighter {
    scene: Rc<RefCell<Scene>>,
    active: Color,
    parent: Color,
}

impl SceneHighlighter {
    pub fn new(scene: Rc<RefCell<Scene>>, palette: &Palette) -> Self {
        Self {
            scene,
            active: palette.active,
            parent: palette.parent,
        }
    }

    fn widget(&self, handle: &dyn WidgetHandle) -> Option<Rc<StaticWidget>> {
        let scene = self.scene.borrow();
        scene.get(handle.id()).filter(|w| w.exists()).cloned()
    }
}

impl HighlightService for SceneHighlighter {
    type Token = Option<Color>;

    fn highlight(&mut self, handle: &dyn WidgetHandle, as_parent: bool) -> Self::Token {
        let color = if as_parent { self.parent } else { self.active };
        match self.widget(handle) {
            Some(widget) => widget.set_background(Some(color)),
            None => None,
        }
    }

    fn clear_highlight(&mut self, handle: &dyn WidgetHandle, token: Self::Token) {
        if let Some(widget) = self.widget(handle) {
            widget.set_background(token);
        }
    }
}

/// A scene laid out like the inspector's own window: a widget list and the
/// four pack option frames on the left, the geometry canvas on the right, and
/// a status label that was created but never packed.
pub fn demo_scene() -> Scene {
    let mut scene = Scene::new(StaticWidget::toplevel(1, ".vis", (200, 120, 640, 400)));
    let widgets = [
        StaticWidget::new(2, "Frame", ".vis.left", 1, (200, 120, 300, 400)).packed(&[
            ("side", "left"),
            ("expand", "1"),
            ("fill", "both"),
        ]),
        StaticWidget::new(3, "Listbox", ".vis.left.widgets", 2, (200, 120, 300, 230)).packed(&[
            ("side", "top"),
            ("expand", "1"),
            ("fill", "both"),
        ]),
        StaticWidget::new(4, "Frame", ".vis.left.packargs", 2, (215, 350, 270, 170))
            .packed(&[("side", "top")]),
        StaticWidget::new(5, "Frame", ".vis.left.packargs.top", 4, (215, 350, 270, 85))
            .packed(&[("side", "top")]),
        StaticWidget::new(6, "Frame", ".vis.left.packargs.top.side", 5, (225, 360, 115, 65))
            .packed(&[("side", "left"), ("padx", "10"), ("pady", "10")]),
        StaticWidget::new(7, "Frame", ".vis.left.packargs.top.anchor", 5, (360, 360, 115, 65))
            .packed(&[("side", "left"), ("padx", "10"), ("pady", "10")]),
        StaticWidget::new(8, "Frame", ".vis.left.packargs.bottom", 4, (215, 435, 270, 85))
            .packed(&[("side", "top")]),
        StaticWidget::new(9, "Frame", ".vis.left.packargs.bottom.fill", 8, (225, 445, 115, 65))
            .packed(&[("side", "left"), ("padx", "10"), ("pady", "10")]),
        StaticWidget::new(10, "Frame", ".vis.left.packargs.bottom.expand", 8, (360, 445, 115, 65))
            .packed(&[("side", "left"), ("padx", "10"), ("pady", "10")]),
        StaticWidget::new(11, "Frame", ".vis.right", 1, (500, 190, 300, 260))
            .packed(&[("side", "left")]),
        StaticWidget::new(12, "Canvas", ".vis.right.canvas", 11, (500, 190, 300, 260))
            .packed(&[("side", "top")]),
        StaticWidget::new(13, "Label", ".vis.right.status", 11, (200, 120, 1, 1)),
    ];
    for widget in widgets {
        scene.add(widget);
    }
    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_reports_live_geometry() {
        let w = StaticWidget::new(2, "Frame", ".f", 1, (10, 20, 30, 40));
        assert_eq!(w.screen_origin(), Point { x: 10, y: 20 });
        w.move_to(5, 6);
        w.resize(7, 8);
        assert_eq!(w.screen_origin(), Point { x: 5, y: 6 });
        assert_eq!(w.size(), Size { width: 7, height: 8 });
        assert!(w.needs_packing());
        assert!(!StaticWidget::toplevel(1, ".", (0, 0, 1, 1)).needs_packing());
    }

    #[test]
    fn destroy_takes_descendants_along() {
        let scene = demo_scene();
        let before = scene.descendants().len();
        let destroyed = scene.destroy(WidgetId(4));
        assert_eq!(destroyed, 7);
        assert_eq!(scene.descendants().len(), before - 7);
        assert!(!scene.get(WidgetId(10)).unwrap().exists());
        assert!(scene.get(WidgetId(3)).unwrap().exists());
    }

    #[test]
    fn highlighter_restores_previous_background() {
        let scene = Rc::new(RefCell::new(demo_scene()));
        let palette = Palette::default();
        let mut hl = SceneHighlighter::new(scene.clone(), &palette);
        let widget = scene.borrow().get(WidgetId(3)).cloned().unwrap();
        widget.set_background(Some(Color::Magenta));

        let token = hl.highlight(&*widget, false);
        assert_eq!(widget.background(), Some(palette.active));
        hl.clear_highlight(&*widget, token);
        assert_eq!(widget.background(), Some(Color::Magenta));
    }

    #[test]
    fn highlighter_ignores_destroyed_widgets() {
        let scene = Rc::new(RefCell::new(demo_scene()));
        let mut hl = SceneHighlighter::new(scene.clone(), &Palette::default());
        let widget = scene.borrow().get(WidgetId(12)).cloned().unwrap();
        widget.destroy();
        let token = hl.highlight(&*widget, true);
        assert_eq!(token, None);
        hl.clear_highlight(&*widget, token);
        assert_eq!(widget.background(), None);
    }
}
