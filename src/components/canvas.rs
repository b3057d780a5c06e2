use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};

use crate::components::Component;
use crate::config::Palette;
use crate::geometry::RegionSet;
use crate::ui::UiFrame;
use crate::widget::Bounds;

/// Something rectangles can be painted on.
pub trait DrawSurface {
    fn clear(&mut self);

    fn draw_filled_rect(&mut self, bounds: Bounds, color: Color);
}

/// Clear `surface` and paint every region in order, so later regions cover
/// earlier ones.
pub fn render_regions<S: DrawSurface + ?Sized>(surface: &mut S, set: &RegionSet, palette: &Palette) {
    surface.clear();
    for region in &set.regions {
        surface.draw_filled_rect(region.bounds, palette.color_for(region.role));
    }
}

/// Draws root-relative pixel rectangles onto a block of terminal cells,
/// scaling the root extent to fill `area`.
pub struct BufferSurface<'f, 'a> {
    frame: &'f mut UiFrame<'a>,
    area: Rect,
    extent: (i32, i32),
}

impl<'f, 'a> BufferSurface<'f, 'a> {
    pub fn new(frame: &'f mut UiFrame<'a>, area: Rect, extent: (i32, i32)) -> Self {
        Self {
            frame,
            area,
            extent: (extent.0.max(1), extent.1.max(1)),
        }
    }

    /// Map a pixel span onto `cells` cells. Non-empty spans always cover at
    /// least one cell.
    fn scale(lo: i32, hi: i32, extent: i32, cells: u16) -> (u16, u16) {
        let cells_i = i64::from(cells);
        let extent = i64::from(extent);
        let lo = i64::from(lo.clamp(0, extent as i32));
        let hi = i64::from(hi.clamp(0, extent as i32));
        let start = lo * cells_i / extent;
        let mut end = (hi * cells_i + extent - 1) / extent;
        if hi > lo && end <= start {
            end = start + 1;
        }
        let start = start.clamp(0, cells_i) as u16;
        let end = end.clamp(0, cells_i) as u16;
        (start, end.saturating_sub(start))
    }

    pub fn cell_rect(&self, bounds: Bounds) -> Rect {
        let (x, width) = Self::scale(bounds.x0, bounds.x1, self.extent.0, self.area.width);
        let (y, height) = Self::scale(bounds.y0, bounds.y1, self.extent.1, self.area.height);
        Rect::new(
            self.area.x.saturating_add(x),
            self.area.y.saturating_add(y),
            width,
            height,
        )
    }
}

impl DrawSurface for BufferSurface<'_, '_> {
    fn clear(&mut self) {
        self.frame.fill_rect(self.area, Color::Reset);
    }

    fn draw_filled_rect(&mut self, bounds: Bounds, color: Color) {
        if bounds.is_empty() {
            return;
        }
        let rect = self.cell_rect(bounds);
        self.frame.fill_rect(rect, color);
    }
}

/// Panel showing the regions of the current selection.
pub struct PackCanvasComponent {
    title: String,
    palette: Palette,
    regions: Option<RegionSet>,
}

impl PackCanvasComponent {
    pub fn new<T: Into<String>>(title: T, palette: Palette) -> Self {
        Self {
            title: title.into(),
            palette,
            regions: None,
        }
    }

    pub fn set_regions(&mut self, regions: RegionSet) {
        self.regions = Some(regions);
    }

    pub fn clear(&mut self) {
        self.regions = None;
    }

    pub fn regions(&self) -> Option<&RegionSet> {
        self.regions.as_ref()
    }
}

impl Component for PackCanvasComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _focused: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title.as_str());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        match &self.regions {
            Some(set) => {
                let mut surface = BufferSurface::new(frame, inner, set.extent);
                render_regions(&mut surface, set, &self.palette);
            }
            None => {
                frame.fill_rect(inner, Color::Reset);
                frame.set_string(
                    inner,
                    inner.x,
                    inner.y,
                    "No widget selected",
                    Style::default().fg(self.palette.text),
                );
            }
        }
    }
}
