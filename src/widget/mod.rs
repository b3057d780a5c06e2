pub mod scene;
pub mod tree;

use std::collections::BTreeMap;
use std::fmt;

pub use tree::{WidgetNode, WidgetTree, format_tree};

/// Stable identity of an inspected widget for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Signed position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Widget rectangle as origin plus size, relative to the root widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WidgetRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WidgetRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.x,
            self.y,
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }
}

/// Corner form `(x0, y0)..(x1, y1)` used for everything the canvas draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Bounds {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> i32 {
        self.x1.saturating_sub(self.x0).max(0)
    }

    pub fn height(&self) -> i32 {
        self.y1.saturating_sub(self.y0).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

impl From<(i32, i32, i32, i32)> for Bounds {
    fn from((x0, y0, x1, y1): (i32, i32, i32, i32)) -> Self {
        Self::new(x0, y0, x1, y1)
    }
}

/// Read-only view of a widget owned by the inspected program.
///
/// Geometry is read live on every call; implementations must not cache it
/// because the inspected program may move or resize widgets at any time.
/// Once `exists` reports `false` the other queries may return anything.
pub trait WidgetHandle: fmt::Debug {
    fn id(&self) -> WidgetId;

    /// Widget kind, e.g. `Frame` or `Listbox`.
    fn class_name(&self) -> &str;

    /// Toolkit path name, e.g. `.left.widgets`.
    fn path(&self) -> &str;

    /// Parent as declared by the toolkit, `None` for a toplevel.
    fn parent_id(&self) -> Option<WidgetId>;

    fn exists(&self) -> bool;

    /// Top-left corner in screen coordinates.
    fn screen_origin(&self) -> Point;

    fn size(&self) -> Size;

    /// Options reported by the packer; empty when the widget is not packed.
    fn pack_info(&self) -> BTreeMap<String, String>;

    /// Whether this kind of widget is expected to be managed by the packer.
    fn needs_packing(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_to_bounds() {
        let rect = WidgetRect::new(10, 20, 30, 40);
        assert_eq!(rect.bounds(), Bounds::new(10, 20, 40, 60));
        assert_eq!(rect.bounds().width(), 30);
        assert_eq!(rect.bounds().height(), 40);
    }

    #[test]
    fn inverted_bounds_are_empty() {
        let b = Bounds::from((10, 10, 5, 20));
        assert_eq!(b.width(), 0);
        assert!(b.is_empty());
    }

    #[test]
    fn far_edges_saturate() {
        let rect = WidgetRect::new(i32::MAX - 1, 0, 10, i32::MAX);
        let b = rect.bounds();
        assert_eq!(b.x1, i32::MAX);
        assert_eq!(b.width(), 1);
        assert_eq!(b.y1, i32::MAX);
        assert_eq!(Bounds::new(i32::MIN, 0, i32::MAX, 1).width(), i32::MAX);
    }

    #[test]
    fn id_display() {
        assert_eq!(WidgetId(42).to_string(), "#42");
    }
}
