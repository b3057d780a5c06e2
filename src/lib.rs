//! Terminal inspector for pack-managed widget trees.
//!
//! Select a widget in the tree list and the inspector highlights it and its
//! parent in the inspected program, shows its pack options, and paints the
//! strips of parent space that the packer handed out up to and including it.

pub mod components;
pub mod config;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod inspector;
pub mod keybindings;
pub mod pack;
pub mod runner;
pub mod selection;
pub mod tracing_sub;
pub mod ui;
pub mod widget;

pub use config::{InspectorConfig, PackDefaults, Palette};
pub use error::{InspectError, PackOptionError};
pub use geometry::{ColorRole, PackGeometry, Region, RegionSet};
pub use inspector::Inspector;
pub use selection::{HighlightService, SelectionMachine, SelectionState};
pub use widget::{WidgetHandle, WidgetId, WidgetTree};
