use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use pack_inspector::components::{Component, LineRole};
use pack_inspector::widget::scene::{Scene, SceneHighlighter, demo_scene};
use pack_inspector::{Inspector, InspectorConfig, Palette, SelectionState, WidgetId};

fn inspector() -> (Rc<RefCell<Scene>>, Inspector<SceneHighlighter>) {
    let scene = Rc::new(RefCell::new(demo_scene()));
    let config = InspectorConfig::default();
    let highlighter = SceneHighlighter::new(Rc::clone(&scene), &config.palette);
    let mut inspector = Inspector::new(config, highlighter);
    let (root, rest) = {
        let scene = scene.borrow();
        (scene.root().unwrap(), scene.descendants())
    };
    inspector.set_object_tree(root, rest).unwrap();
    (scene, inspector)
}

fn background(scene: &Rc<RefCell<Scene>>, id: u64) -> Option<ratatui::style::Color> {
    scene.borrow().get(WidgetId(id)).unwrap().background()
}

#[test]
fn selecting_twice_leaves_one_highlight() {
    let (scene, mut inspector) = inspector();
    let palette = Palette::default();

    inspector.select_node(WidgetId(3)).unwrap();
    inspector.select_node(WidgetId(3)).unwrap();
    assert_eq!(background(&scene, 3), Some(palette.active));
    assert_eq!(background(&scene, 2), Some(palette.parent));

    inspector.clear_selection();
    assert_eq!(background(&scene, 3), None);
    assert_eq!(background(&scene, 2), None);
}

#[test]
fn moving_selection_restores_previous_styles() {
    let (scene, mut inspector) = inspector();
    let palette = Palette::default();

    inspector.select_node(WidgetId(6)).unwrap();
    inspector.select_node(WidgetId(12)).unwrap();
    assert_eq!(background(&scene, 6), None);
    assert_eq!(background(&scene, 5), None);
    assert_eq!(background(&scene, 12), Some(palette.active));
    assert_eq!(background(&scene, 11), Some(palette.parent));
}

#[test]
fn clear_on_idle_is_a_no_op() {
    let (_scene, mut inspector) = inspector();
    inspector.clear_selection();
    inspector.clear_selection();
    assert_eq!(inspector.selection(), SelectionState::Idle);
}

#[test]
fn list_colours_track_selection_and_warnings() {
    let (_scene, mut inspector) = inspector();
    let status = inspector.list().line_of(WidgetId(13)).unwrap();
    assert!(inspector.list().styles()[status].warning);

    let text_before = inspector.list().lines().to_vec();
    inspector.select_line(11).unwrap();
    let list = inspector.list();
    assert_eq!(list.styles()[11].role, LineRole::Active);
    assert_eq!(list.styles()[10].role, LineRole::Parent);
    assert!(list.styles()[status].warning);
    assert_eq!(list.lines(), text_before.as_slice());
}

#[test]
fn destroyed_selection_clears_without_error() {
    let (scene, mut inspector) = inspector();
    inspector.select_node(WidgetId(4)).unwrap();
    scene.borrow().destroy(WidgetId(4));

    // .vis.left.packargs.top went down with its parent
    assert_eq!(inspector.select_node(WidgetId(5)), Ok(SelectionState::Idle));
    assert!(inspector.regions().is_none());
    assert_eq!(background(&scene, 2), None);
}

#[test]
fn keyboard_walks_the_tree() {
    let (_scene, mut inspector) = inspector();
    let press = |code| Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
    for _ in 0..3 {
        inspector.handle_event(&press(KeyCode::Char('j')));
    }
    assert_eq!(inspector.selection().active(), Some(WidgetId(4)));
    inspector.handle_event(&press(KeyCode::End));
    assert_eq!(inspector.selection().active(), Some(WidgetId(13)));
    let regions = inspector.regions().unwrap();
    assert_eq!(regions.extent, (640, 400));
}

#[test]
fn rescan_drops_destroyed_widgets() {
    let (scene, mut inspector) = inspector();
    scene.borrow().destroy(WidgetId(8));
    let (root, rest) = {
        let scene = scene.borrow();
        (scene.root().unwrap(), scene.descendants())
    };
    inspector.set_object_tree(root, rest).unwrap();
    assert_eq!(inspector.tree().unwrap().len(), 10);
    assert!(inspector.list().line_of(WidgetId(9)).is_none());
}
