use ratatui::style::Color;

use crate::geometry::ColorRole;
use crate::pack::{Anchor, Fill, Side};

// Centralized colors for the inspector. The palette is passed around
// explicitly so the list and the canvas always agree on what "active" and
// "parent" look like.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub active: Color,
    pub parent: Color,
    pub packed_space: Color,
    pub warning: Color,
    /// Canvas fill behind everything else.
    pub background: Color,
    /// Foreground of list rows that are neither active nor parent.
    pub text: Color,
}

impl Palette {
    pub fn color_for(&self, role: ColorRole) -> Color {
        match role {
            ColorRole::Background => self.background,
            ColorRole::ParentView => self.parent,
            ColorRole::PackedSpace => self.packed_space,
            ColorRole::ActiveView => self.active,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            active: Color::LightGreen,
            parent: Color::LightBlue,
            packed_space: Color::Yellow,
            warning: Color::Red,
            background: Color::DarkGray,
            text: Color::Reset,
        }
    }
}

/// Values the packer assumes when an option was never given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackDefaults {
    pub side: Side,
    pub anchor: Anchor,
    pub fill: Fill,
    pub expand: bool,
}

impl Default for PackDefaults {
    fn default() -> Self {
        Self {
            side: Side::Top,
            anchor: Anchor::Center,
            fill: Fill::None,
            expand: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InspectorConfig {
    pub palette: Palette,
    pub pack_defaults: PackDefaults,
}

impl InspectorConfig {
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_pack_defaults(mut self, pack_defaults: PackDefaults) -> Self {
        self.pack_defaults = pack_defaults;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_map_to_distinct_colors() {
        let palette = Palette::default();
        let colors = [
            palette.color_for(ColorRole::Background),
            palette.color_for(ColorRole::ParentView),
            palette.color_for(ColorRole::PackedSpace),
            palette.color_for(ColorRole::ActiveView),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn builder_replaces_sections() {
        let defaults = PackDefaults {
            side: Side::Left,
            ..PackDefaults::default()
        };
        let config = InspectorConfig::default().with_pack_defaults(defaults);
        assert_eq!(config.pack_defaults.side, Side::Left);
        assert_eq!(config.palette, Palette::default());
    }
}
