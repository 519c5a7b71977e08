use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_circle, draw_line, draw_ring};
use crate::map::heat::{HeatGrid, HeatRaster};
use crate::map::markers::{MapPoint, MarkerStyle};
use crate::map::projection::Viewport;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Below this zoom the heat map samples the 1° grid instead of raw points
const HEAT_GRID_MAX_ZOOM: f64 = 3.0;

/// Extra dots between a marker and its highlight ring
const HIGHLIGHT_GAP: i32 = 2;

/// Level of detail for base map data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - world view
    Medium, // 50m - continental
    High,   // 10m - regional
}

impl Lod {
    /// Select LOD based on zoom level
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 2.0 {
            Lod::Low
        } else if zoom < 8.0 {
            Lod::Medium
        } else {
            Lod::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lod::Low => "110m",
            Lod::Medium => "50m",
            Lod::High => "10m",
        }
    }
}

/// Base map layer toggles
#[derive(Clone, Debug)]
pub struct DisplaySettings {
    pub show_coastlines: bool,
    pub show_borders: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_coastlines: true,
            show_borders: true,
        }
    }
}

/// Base map canvases shared by both map modes
pub struct BaseLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
}

/// Output of point mode
pub struct PointLayers {
    pub base: BaseLayers,
    pub markers: BrailleCanvas,
    pub highlight: BrailleCanvas,
}

/// Output of heat mode
pub struct HeatLayers {
    pub base: BaseLayers,
    pub heat: HeatRaster,
}

/// Draws the base map plus event markers or event density
pub struct MapRenderer {
    coastlines_low: Vec<LineString>,
    coastlines_medium: Vec<LineString>,
    coastlines_high: Vec<LineString>,
    borders_medium: Vec<LineString>,
    borders_high: Vec<LineString>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            coastlines_low: Vec::new(),
            coastlines_medium: Vec::new(),
            coastlines_high: Vec::new(),
            borders_medium: Vec::new(),
            borders_high: Vec::new(),
            settings: DisplaySettings::default(),
        }
    }

    /// Coastlines for the given LOD, falling back to whatever else is loaded
    fn get_coastlines(&self, lod: Lod) -> &[LineString] {
        let preference = match lod {
            Lod::High => [&self.coastlines_high, &self.coastlines_medium, &self.coastlines_low],
            Lod::Medium => [&self.coastlines_medium, &self.coastlines_low, &self.coastlines_high],
            Lod::Low => [&self.coastlines_low, &self.coastlines_medium, &self.coastlines_high],
        };
        preference
            .into_iter()
            .find(|lines| !lines.is_empty())
            .map(|lines| lines.as_slice())
            .unwrap_or(&[])
    }

    /// Borders for the given LOD
    fn get_borders(&self, lod: Lod) -> &[LineString] {
        match lod {
            Lod::High if !self.borders_high.is_empty() => &self.borders_high,
            _ => &self.borders_medium,
        }
    }

    /// Draw coastlines and borders onto fresh canvases
    pub fn render_base(&self, cols: usize, rows: usize, viewport: &Viewport) -> BaseLayers {
        let lod = Lod::from_zoom(viewport.zoom);
        let mut coastlines = BrailleCanvas::new(cols, rows);
        let mut borders = BrailleCanvas::new(cols, rows);

        if self.settings.show_coastlines {
            for line in self.get_coastlines(lod) {
                draw_linestring(&mut coastlines, line, viewport);
            }
        }

        if self.settings.show_borders {
            for line in self.get_borders(lod) {
                draw_linestring(&mut borders, line, viewport);
            }
        }

        BaseLayers {
            coastlines,
            borders,
        }
    }

    /// Point mode: one marker per point, plus a ring around `highlight`
    pub fn render_points(
        &self,
        cols: usize,
        rows: usize,
        viewport: &Viewport,
        points: &[MapPoint],
        highlight: Option<usize>,
    ) -> PointLayers {
        let base = self.render_base(cols, rows, viewport);
        let mut markers = BrailleCanvas::new(cols, rows);
        let mut ring = BrailleCanvas::new(cols, rows);

        for point in points {
            if !point.longitude.is_finite() || !point.latitude.is_finite() {
                continue;
            }
            let (px, py) = viewport.project(point.longitude, point.latitude);
            if !viewport.is_visible(px, py) {
                continue;
            }

            let radius = marker_radius(point.style, viewport.zoom);
            if point.style.filled {
                draw_circle(&mut markers, px, py, radius);
            } else {
                draw_ring(&mut markers, px, py, radius);
            }

            if highlight == Some(point.id) {
                draw_ring(&mut ring, px, py, radius + HIGHLIGHT_GAP);
            }
        }

        PointLayers {
            base,
            markers,
            highlight: ring,
        }
    }

    /// Heat mode: event density over the given (lon, lat) coordinates
    pub fn render_heat(
        &self,
        cols: usize,
        rows: usize,
        viewport: &Viewport,
        coords: &[(f64, f64)],
    ) -> HeatLayers {
        let base = self.render_base(cols, rows, viewport);

        let heat = if viewport.zoom < HEAT_GRID_MAX_ZOOM {
            let grid = HeatGrid::build(coords);
            HeatRaster::from_weighted(
                grid.iter_cells().map(|(lon, lat, n)| (lon, lat, n as f32)),
                viewport,
                cols,
                rows,
            )
        } else {
            HeatRaster::from_weighted(
                coords.iter().map(|&(lon, lat)| (lon, lat, 1.0)),
                viewport,
                cols,
                rows,
            )
        };

        HeatLayers { base, heat }
    }

    /// Add coastline data at a specific LOD
    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::Medium => self.coastlines_medium.push(line),
            Lod::High => self.coastlines_high.push(line),
        }
    }

    /// Add border data at a specific LOD
    pub fn add_border(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::High => self.borders_high.push(line),
            Lod::Low | Lod::Medium => self.borders_medium.push(line),
        }
    }

    /// Check if any coastline data is loaded
    pub fn has_data(&self) -> bool {
        !self.coastlines_low.is_empty()
            || !self.coastlines_medium.is_empty()
            || !self.coastlines_high.is_empty()
    }

    pub fn toggle_borders(&mut self) {
        self.settings.show_borders = !self.settings.show_borders;
    }

    pub fn toggle_coastlines(&mut self) {
        self.settings.show_coastlines = !self.settings.show_coastlines;
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Markers shrink when zoomed out so dense regions stay readable
fn marker_radius(style: MarkerStyle, zoom: f64) -> i32 {
    let cap = if zoom > 10.0 {
        style.radius
    } else if zoom > 4.0 {
        2
    } else {
        1
    };
    style.radius.min(cap).max(0)
}

/// Draw a linestring with viewport culling
fn draw_linestring(canvas: &mut BrailleCanvas, line: &[(f64, f64)], viewport: &Viewport) {
    if line.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let (px, py) = viewport.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            // Long jumps are antimeridian wraps, not real segments
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }

        prev = Some((px, py));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: usize, lon: f64, lat: f64) -> MapPoint {
        MapPoint {
            id,
            latitude: lat,
            longitude: lon,
            label: vec![format!("#{id}")],
            style: MarkerStyle::default(),
        }
    }

    #[test]
    fn test_lod_thresholds() {
        assert_eq!(Lod::from_zoom(1.0), Lod::Low);
        assert_eq!(Lod::from_zoom(4.0), Lod::Medium);
        assert_eq!(Lod::from_zoom(20.0), Lod::High);
    }

    #[test]
    fn test_coastline_fallback_to_coarser_lod() {
        let mut renderer = MapRenderer::new();
        renderer.add_coastline(vec![(-10.0, 0.0), (10.0, 0.0)], Lod::Low);
        assert_eq!(renderer.get_coastlines(Lod::High).len(), 1);

        let vp = Viewport::world(80, 40);
        let base = renderer.render_base(40, 10, &vp);
        assert!(base.coastlines.glyphs().count() > 0);
        assert_eq!(base.borders.glyphs().count(), 0);
    }

    #[test]
    fn test_markers_drawn_and_highlighted() {
        let renderer = MapRenderer::new();
        let vp = Viewport::world(80, 40);
        let points = vec![point(7, 0.0, 0.0), point(9, 90.0, 0.0)];
        let layers = renderer.render_points(40, 10, &vp, &points, Some(9));

        // (0,0) -> dot (40, 20) -> cell (20, 5)
        assert!(layers.markers.glyph(20, 5).is_some());
        // (90,0) -> dot (60, 20) -> cell (30, 5)
        assert!(layers.markers.glyph(30, 5).is_some());
        assert!(layers.highlight.glyphs().count() > 0);
        assert!(layers.highlight.glyphs().all(|(col, _, _)| col >= 27));
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let renderer = MapRenderer::new();
        let vp = Viewport::world(80, 40);
        let points = vec![point(0, f64::NAN, 0.0), point(1, 0.0, f64::INFINITY)];
        let layers = renderer.render_points(40, 10, &vp, &points, None);
        assert_eq!(layers.markers.glyphs().count(), 0);
    }

    #[test]
    fn test_heat_uses_grid_and_raw_paths() {
        let renderer = MapRenderer::new();
        let coords = vec![(0.2, 0.2), (0.3, 0.1), (60.0, 10.0)];

        let world = Viewport::world(80, 40);
        let zoomed_out = renderer.render_heat(40, 10, &world, &coords);
        let (px, py) = world.project(0.5, 0.5);
        assert!(zoomed_out.heat.level(px as usize / 2, py as usize / 4) > 0);

        let mut close = Viewport::world(80, 40);
        close.zoom = 5.0;
        let zoomed_in = renderer.render_heat(40, 10, &close, &coords);
        let (px, py) = close.project(0.2, 0.2);
        assert!(zoomed_in.heat.level(px as usize / 2, py as usize / 4) > 0);
    }
}
