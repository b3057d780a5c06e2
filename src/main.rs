use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::event::Event;
use ratatui::style::Color;
use tracing::Level;

use pack_inspector::components::Component;
use pack_inspector::components::EventLogComponent;
use pack_inspector::components::event_log::set_global_event_log;
use pack_inspector::config::{InspectorConfig, PackDefaults, Palette};
use pack_inspector::drivers::OutputDriver;
use pack_inspector::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use pack_inspector::inspector::Inspector;
use pack_inspector::keybindings::{Action, KeyBindings};
use pack_inspector::pack::{Anchor, Fill, Side};
use pack_inspector::runner::run_app;
use pack_inspector::tracing_sub;
use pack_inspector::widget::scene::{Scene, SceneHighlighter, demo_scene};

#[derive(Parser, Debug)]
#[command(
    name = "pack-inspector",
    version = env!("CARGO_PKG_VERSION"),
    about = "Explains where the packer put each widget of a window"
)]
struct Cli {
    /// Colour of the active widget (name or #rrggbb).
    #[arg(long, value_name = "COLOR", default_value = "lightgreen")]
    active_color: Color,

    /// Colour of the active widget's parent.
    #[arg(long, value_name = "COLOR", default_value = "lightblue")]
    parent_color: Color,

    /// Colour of the parent space reserved for the active widget.
    #[arg(long = "packed-color", value_name = "COLOR", default_value = "yellow")]
    packed_color: Color,

    /// Background of widgets that need packing but were never packed.
    #[arg(long, value_name = "COLOR", default_value = "red")]
    warning_color: Color,

    /// Canvas background.
    #[arg(long, value_name = "COLOR", default_value = "darkgray")]
    background_color: Color,

    /// Side assumed when a widget reports none.
    #[arg(long, value_name = "SIDE", default_value_t = Side::Top)]
    default_side: Side,

    #[arg(long, value_name = "ANCHOR", default_value_t = Anchor::Center)]
    default_anchor: Anchor,

    #[arg(long, value_name = "FILL", default_value_t = Fill::None)]
    default_fill: Fill,

    /// Treat widgets that report no expand option as expanding.
    #[arg(long)]
    default_expand: bool,

    /// Input poll interval in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 50)]
    poll_ms: u64,

    #[arg(long, value_name = "LEVEL", default_value_t = Level::INFO)]
    log_level: Level,
}

impl From<&Cli> for InspectorConfig {
    fn from(cli: &Cli) -> Self {
        let palette = Palette {
            active: cli.active_color,
            parent: cli.parent_color,
            packed_space: cli.packed_color,
            warning: cli.warning_color,
            background: cli.background_color,
            ..Palette::default()
        };
        let pack_defaults = PackDefaults {
            side: cli.default_side,
            anchor: cli.default_anchor,
            fill: cli.default_fill,
            expand: cli.default_expand,
        };
        InspectorConfig::default()
            .with_palette(palette)
            .with_pack_defaults(pack_defaults)
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = InspectorConfig::from(&cli);

    let (log, log_handle) = EventLogComponent::new_default();
    set_global_event_log(log_handle);
    tracing_sub::init_default(cli.log_level);

    let scene = Rc::new(RefCell::new(demo_scene()));
    let highlighter = SceneHighlighter::new(Rc::clone(&scene), &config.palette);
    let mut app = App {
        inspector: Inspector::new(config, highlighter).with_event_log(log),
        scene,
        bindings: KeyBindings::default(),
    };
    app.rescan();

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut driver = ConsoleInputDriver::new();

    let result = run_app(
        &mut output,
        &mut driver,
        &mut app,
        Duration::from_millis(cli.poll_ms),
        |frame, app| {
            let area = frame.area();
            app.inspector.render(frame, area, true);
        },
        |event, app| app.dispatch(event),
        |event, app| app.should_quit(event),
    );

    output.exit()?;
    result
}

struct App {
    inspector: Inspector<SceneHighlighter>,
    scene: Rc<RefCell<Scene>>,
    bindings: KeyBindings,
}

impl App {
    fn rescan(&mut self) {
        let (root, descendants) = {
            let scene = self.scene.borrow();
            (scene.root(), scene.descendants())
        };
        let Some(root) = root else {
            tracing::warn!("inspected window is gone, nothing to scan");
            return;
        };
        if let Err(err) = self.inspector.set_object_tree(root, descendants) {
            tracing::error!(error = %err, "could not build widget tree");
        }
    }

    /// Destroy the active widget in the inspected program without rescanning,
    /// leaving stale entries in the list.
    fn destroy_active(&mut self) {
        let Some(id) = self.inspector.selection().active() else {
            return;
        };
        self.inspector.clear_selection();
        self.scene.borrow().destroy(id);
    }

    fn dispatch(&mut self, event: &Event) -> bool {
        if let Event::Key(key) = event {
            match self.bindings.action_for_key(key) {
                Some(Action::Rescan) => {
                    self.rescan();
                    return true;
                }
                Some(Action::DestroyWidget) => {
                    self.destroy_active();
                    return true;
                }
                _ => {}
            }
        }
        self.inspector.handle_event(event)
    }

    fn should_quit(&self, event: Option<&Event>) -> bool {
        matches!(
            event,
            Some(Event::Key(key)) if self.bindings.matches(Action::Quit, key)
        )
    }
}
