//! Packed-space regions that explain a widget's final placement.
//!
//! The packer hands out parent space in attachment order. Each child claims a
//! full-width strip (top/bottom) or full-height strip (left/right) of what is
//! left, even when the child itself is drawn smaller. `PackGeometry` turns the
//! live rectangles of a widget, its parent and its earlier siblings into an
//! ordered list of regions; later entries are drawn on top of earlier ones.

use crate::config::PackDefaults;
use crate::error::InspectError;
use crate::pack::ResolvedPack;
use crate::widget::{Bounds, WidgetId, WidgetTree};

/// What a region stands for, and therefore how it is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Background,
    ParentView,
    PackedSpace,
    ActiveView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub bounds: Bounds,
    pub role: ColorRole,
    /// Widget the region was derived from; `None` for the background.
    pub source: Option<WidgetId>,
}

impl Region {
    fn new(bounds: Bounds, role: ColorRole, source: Option<WidgetId>) -> Self {
        Self {
            bounds,
            role,
            source,
        }
    }
}

/// Regions in draw order, plus widgets skipped because they went stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    pub skipped: Vec<WidgetId>,
    /// Root size, which is also the canvas size.
    pub extent: (i32, i32),
}

impl RegionSet {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PackGeometry {
    defaults: PackDefaults,
}

impl PackGeometry {
    pub fn new(defaults: PackDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &PackDefaults {
        &self.defaults
    }

    pub fn resolve(&self, tree: &WidgetTree, id: WidgetId) -> Result<ResolvedPack, InspectError> {
        Ok(tree.node(id)?.pack_args().resolve(&self.defaults))
    }

    /// The strip of the parent reserved for `id` along its packing axis.
    ///
    /// Returns `Ok(None)` for the root, which has no parent to pack into.
    pub fn packed_space(
        &self,
        tree: &WidgetTree,
        id: WidgetId,
    ) -> Result<Option<Bounds>, InspectError> {
        let node = tree.node(id)?;
        let Some(parent) = node.parent() else {
            return Ok(None);
        };
        let view = tree.rect_of(id)?;
        let outer = tree.rect_of(parent)?;
        let side = node.pack_args().side(&self.defaults);

        let (view, outer) = (view.bounds(), outer.bounds());
        let bounds = if side.is_horizontal() {
            Bounds::new(view.x0, outer.y0, view.x1, outer.y1)
        } else {
            Bounds::new(outer.x0, view.y0, outer.x1, view.y1)
        };
        Ok(Some(bounds))
    }

    /// All regions explaining the placement of `active`, in draw order:
    /// background, parent, the active packed space, packed space of siblings
    /// attached before `active`, and finally `active` itself.
    ///
    /// Fails with `StaleHandle` when the root or `active` no longer exists.
    /// A stale parent or sibling is left out and reported in `skipped`.
    pub fn compute_regions(
        &self,
        tree: &WidgetTree,
        active: WidgetId,
    ) -> Result<RegionSet, InspectError> {
        let node = tree.node(active)?;
        let root = tree.rect_of(tree.root_id())?;
        let own = tree.rect_of(active)?;

        let mut set = RegionSet {
            extent: (root.width, root.height),
            ..RegionSet::default()
        };
        set.regions.push(Region::new(
            Bounds::new(0, 0, root.width, root.height),
            ColorRole::Background,
            None,
        ));

        if let Some(parent) = node.parent() {
            match tree.rect_of(parent) {
                Ok(rect) => {
                    set.regions
                        .push(Region::new(rect.bounds(), ColorRole::ParentView, Some(parent)));
                }
                Err(InspectError::StaleHandle(id)) => set.skipped.push(id),
                Err(err) => return Err(err),
            }

            self.push_packed_space(tree, active, ColorRole::PackedSpace, &mut set)?;
            for sibling in tree.preceding_siblings(active) {
                self.push_packed_space(tree, sibling, ColorRole::ParentView, &mut set)?;
            }
        }

        set.regions
            .push(Region::new(own.bounds(), ColorRole::ActiveView, Some(active)));

        if !set.skipped.is_empty() {
            tracing::warn!(widget = %active, skipped = ?set.skipped, "skipped stale widgets");
        }
        Ok(set)
    }

    fn push_packed_space(
        &self,
        tree: &WidgetTree,
        id: WidgetId,
        role: ColorRole,
        set: &mut RegionSet,
    ) -> Result<(), InspectError> {
        match self.packed_space(tree, id) {
            Ok(Some(bounds)) => set.regions.push(Region::new(bounds, role, Some(id))),
            Ok(None) => {}
            Err(InspectError::StaleHandle(stale)) => {
                if !set.skipped.contains(&stale) {
                    set.skipped.push(stale);
                }
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }
}
