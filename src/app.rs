use ratatui::layout::{Position, Rect};

use crate::catalog::Catalog;
use crate::country::ALL_COUNTRIES;
use crate::i18n::Lang;
use crate::map::{nearest_point, point_descriptors, Lod, MapRenderer, Viewport};
use crate::query::{DashboardView, YearRange};
use crate::ui::{map_inner, Regions};

/// Dots around the cursor searched when clicking a marker
const PICK_RADIUS: i32 = 4;

/// Rows skipped by PageUp/PageDown
const PAGE_ROWS: usize = 10;

/// Which list the arrow keys move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Countries,
    Table,
}

/// Application state. The catalog is fixed for the session; everything else
/// here is UI selection and viewport state.
pub struct App {
    pub catalog: Catalog,
    pub map_renderer: MapRenderer,
    pub lang: Lang,
    pub range: YearRange,
    pub viewport: Viewport,
    pub focus: Focus,
    /// Record id whose popup is open
    pub popup: Option<usize>,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Whether the held button has moved since it was pressed
    dragged: bool,
    /// Terminal area the layout is computed from
    screen: Rect,
    selected_country: usize,
    table_row: usize,
}

impl App {
    pub fn new(catalog: Catalog, map_renderer: MapRenderer, lang: Lang, width: u16, height: u16) -> Self {
        let screen = Rect::new(0, 0, width, height);
        let (dot_w, dot_h) = map_dots(screen);
        Self {
            catalog,
            map_renderer,
            lang,
            range: YearRange::DASHBOARD,
            viewport: Viewport::world(dot_w, dot_h),
            focus: Focus::Countries,
            popup: None,
            should_quit: false,
            last_mouse: None,
            dragged: false,
            screen,
            selected_country: 0,
            table_row: 0,
        }
    }

    /// Update layout and viewport size when the terminal resizes
    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = Rect::new(0, 0, width, height);
        let (dot_w, dot_h) = map_dots(self.screen);
        self.viewport.width = dot_w;
        self.viewport.height = dot_h;
    }

    pub fn regions(&self) -> Regions {
        Regions::compute(self.screen)
    }

    /// Currently selected country or the sentinel
    pub fn selected_country(&self) -> &str {
        self.catalog
            .countries()
            .get(self.selected_country)
            .unwrap_or(ALL_COUNTRIES)
    }

    pub fn selected_index(&self) -> usize {
        self.selected_country
    }

    pub fn table_row(&self) -> usize {
        self.table_row
    }

    /// Recompute the derived outputs for the current selection
    pub fn view(&self) -> DashboardView<'_> {
        self.catalog.view(self.selected_country(), self.range)
    }

    /// Select a country by index; resets the table and closes the popup
    pub fn select_country(&mut self, idx: usize) {
        let last = self.catalog.countries().len().saturating_sub(1);
        let idx = idx.min(last);
        if idx != self.selected_country {
            self.selected_country = idx;
            self.table_row = 0;
            self.popup = None;
        }
    }

    /// Move the selection in the focused pane
    pub fn move_selection(&mut self, delta: isize) {
        match self.focus {
            Focus::Countries => {
                let idx = self.selected_country.saturating_add_signed(delta);
                self.select_country(idx);
            }
            Focus::Table => {
                let count = self.view().count();
                if count > 0 {
                    self.table_row = self.table_row.saturating_add_signed(delta).min(count - 1);
                }
            }
        }
    }

    pub fn page_down(&mut self) {
        self.move_selection(PAGE_ROWS as isize);
    }

    pub fn page_up(&mut self) {
        self.move_selection(-(PAGE_ROWS as isize));
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Countries => Focus::Table,
            Focus::Table => Focus::Countries,
        };
    }

    /// Open the popup for the selected table row and center the maps on it
    pub fn pin_selected_row(&mut self) {
        let target = self
            .view()
            .table_records
            .get(self.table_row)
            .map(|r| (r.id, r.has_position(), r.longitude, r.latitude));

        if let Some((id, has_position, lon, lat)) = target {
            self.popup = Some(id);
            if has_position {
                self.viewport.center_on(lon, lat);
            }
        }
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    /// Back to the startup view and selection; the catalog is not reloaded
    pub fn reset_view(&mut self) {
        let (dot_w, dot_h) = map_dots(self.screen);
        self.viewport = Viewport::world(dot_w, dot_h);
        self.focus = Focus::Countries;
        self.selected_country = 0;
        self.table_row = 0;
        self.popup = None;
    }

    /// Pan the maps
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom in towards a terminal cell, if it is over a map
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_dot(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    /// Zoom out from a terminal cell, if it is over a map
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_dot(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    /// Convert a terminal cell over either map pane to Braille dot coords
    pub fn map_dot(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let regions = self.regions();
        [regions.point_map, regions.heat_map]
            .into_iter()
            .map(map_inner)
            .find(|inner| inner.contains(Position::new(col, row)))
            .map(|inner| {
                let px = (col - inner.x) as i32 * 2;
                let py = (row - inner.y) as i32 * 4;
                (px, py)
            })
    }

    /// Left click: open the popup of the nearest marker on the point map
    pub fn click(&mut self, col: u16, row: u16) {
        let inner = map_inner(self.regions().point_map);
        if !inner.contains(Position::new(col, row)) {
            return;
        }
        let px = (col - inner.x) as i32 * 2;
        let py = (row - inner.y) as i32 * 4;

        let picked = {
            let view = self.view();
            let points = point_descriptors(&view.map_records, self.lang);
            nearest_point(&points, &self.viewport, px, py, PICK_RADIUS).map(|p| p.id)
        };
        self.popup = picked;
    }

    /// Left button down: start tracking if the press is over a map
    pub fn press(&mut self, x: u16, y: u16) {
        if self.map_dot(x, y).is_some() {
            self.last_mouse = Some((x, y));
            self.dragged = false;
        }
    }

    /// Handle mouse drag over a map
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        let Some((last_x, last_y)) = self.last_mouse else {
            return;
        };
        if (last_x, last_y) != (x, y) {
            let dx = last_x as i32 - x as i32;
            let dy = last_y as i32 - y as i32;
            // Terminal cells are 2x4 dots
            self.pan(dx * 2, dy * 4);
            self.dragged = true;
        }
        self.last_mouse = Some((x, y));
    }

    /// Left button up: a press without movement is a click
    pub fn release(&mut self, x: u16, y: u16) {
        if self.last_mouse.is_some() && !self.dragged {
            self.click(x, y);
        }
        self.end_drag();
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
        self.dragged = false;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    /// Get current base map LOD as a string
    pub fn lod_level(&self) -> &'static str {
        Lod::from_zoom(self.viewport.zoom).label()
    }
}

/// Braille dot size of one map pane for the given screen
fn map_dots(screen: Rect) -> (usize, usize) {
    let inner = map_inner(Regions::compute(screen).point_map);
    (inner.width as usize * 2, inner.height as usize * 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{parse_timestamp, EarthquakeRecord};

    fn record(id: usize, place: &str, lon: f64, lat: f64, time: &str) -> EarthquakeRecord {
        EarthquakeRecord::new(id, Some(place.into()), lat, lon, 5.0, 10.0, parse_timestamp(time).unwrap())
    }

    fn app() -> App {
        let catalog = Catalog::from_records(vec![
            record(0, "10km N of Tokyo, Japan", 139.7, 35.7, "2019-05-01"),
            record(1, "offshore Chile", -71.6, -33.4, "2020-03-01"),
            record(2, "Kyoto, Japan", 135.8, 35.0, "2021-08-08"),
            record(3, "Nara, Japan", 135.8, 34.7, "2016-01-01"),
        ]);
        App::new(catalog, MapRenderer::new(), Lang::En, 160, 50)
    }

    #[test]
    fn test_defaults_to_sentinel_and_world_view() {
        let app = app();
        assert_eq!(app.selected_country(), ALL_COUNTRIES);
        assert_eq!(app.view().count(), 3);
        assert_eq!((app.viewport.center_lon, app.viewport.center_lat), (0.0, 0.0));
        assert!(app.viewport.width > 0 && app.viewport.height > 0);
    }

    #[test]
    fn test_country_selection_resets_table_and_popup() {
        let mut app = app();
        app.focus = Focus::Table;
        app.move_selection(1);
        app.popup = Some(1);
        assert_eq!(app.table_row(), 1);

        app.select_country(1);
        assert_eq!(app.selected_country(), "Japan");
        assert_eq!(app.table_row(), 0);
        assert_eq!(app.popup, None);
        assert_eq!(app.view().count(), 2);
        assert_eq!(app.view().map_records.len(), 3);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = app();
        app.move_selection(-5);
        assert_eq!(app.selected_index(), 0);
        app.move_selection(50);
        assert_eq!(app.selected_country(), "offshore Chile");

        app.toggle_focus();
        app.page_down();
        assert_eq!(app.table_row(), 0);
    }

    #[test]
    fn test_pin_row_opens_popup_and_centers() {
        let mut app = app();
        app.select_country(1);
        app.focus = Focus::Table;
        app.move_selection(1);
        app.pin_selected_row();
        assert_eq!(app.popup, Some(2));
        assert!((app.viewport.center_lon - 135.8).abs() < 1e-9);
    }

    #[test]
    fn test_click_on_marker_opens_popup() {
        let mut app = app();
        let inner = map_inner(app.regions().point_map);
        let (px, py) = app.viewport.project(-71.6, -33.4);
        let col = inner.x + (px / 2) as u16;
        let row = inner.y + (py / 4) as u16;

        app.click(col, row);
        assert_eq!(app.popup, Some(1));

        app.click(inner.x, inner.y);
        assert_eq!(app.popup, None);
    }

    #[test]
    fn test_drag_keeps_popup_and_click_picks_on_release() {
        let mut app = app();
        let inner = map_inner(app.regions().point_map);
        let (px, py) = app.viewport.project(-71.6, -33.4);
        let (col, row) = (inner.x + (px / 2) as u16, inner.y + (py / 4) as u16);

        app.press(col, row);
        assert_eq!(app.popup, None);
        app.release(col, row);
        assert_eq!(app.popup, Some(1));

        // Drag starting from an empty corner pans without touching the popup
        let center = app.viewport.center_lon;
        app.press(inner.x, inner.y);
        app.handle_drag(inner.x + 3, inner.y);
        app.release(inner.x + 3, inner.y);
        assert_eq!(app.popup, Some(1));
        assert!(app.viewport.center_lon < center);
        assert!(app.last_mouse.is_none());
    }

    #[test]
    fn test_reset_restores_startup_state() {
        let mut app = app();
        app.select_country(2);
        app.zoom_in();
        app.pan(20, 5);
        app.popup = Some(1);
        app.reset_view();
        assert_eq!(app.viewport.zoom, 1.0);
        assert_eq!(app.selected_country(), ALL_COUNTRIES);
        assert_eq!(app.popup, None);
        assert_eq!(app.catalog.records().len(), 4);
    }
}
