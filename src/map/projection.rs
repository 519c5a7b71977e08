use std::f64::consts::PI;

/// Zoom bounds shared by every zoom path
const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 100.0;
const ZOOM_STEP: f64 = 1.5;

/// Latitude limit for the Mercator center
const MAX_CENTER_LAT: f64 = 85.0;

/// Web Mercator viewport: what part of the world is visible, at what zoom,
/// on a canvas of `width` x `height` Braille dots.
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// Zoom level (1.0 = whole world spans the canvas width)
    pub zoom: f64,
    /// Canvas dot width
    pub width: usize,
    /// Canvas dot height
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Default dashboard view: centered on (0, 0) at zoom 1
    pub fn world(width: usize, height: usize) -> Self {
        Self::new(0.0, 0.0, 1.0, width, height)
    }

    /// Same view on a canvas of a different size
    pub fn with_size(&self, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    /// Move the center to a geographic point
    pub fn center_on(&mut self, lon: f64, lat: f64) {
        self.center_lon = wrap_lon(lon);
        self.center_lat = lat.clamp(-MAX_CENTER_LAT, MAX_CENTER_LAT);
    }

    /// Pan by a dot delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = self.zoom * self.width.max(1) as f64;
        let (center_x, center_y) = self.center_xy();
        let x = center_x + dx as f64 / scale;
        let y = center_y + dy as f64 / scale;

        self.center_lon = wrap_lon(x * 360.0 - 180.0);
        self.center_lat = inverse_mercator_y(y).clamp(-MAX_CENTER_LAT, MAX_CENTER_LAT);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Zoom in keeping the point under (px, py) fixed
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    /// Zoom out keeping the point under (px, py) fixed
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        // Pan so the same point lands back under the cursor
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Longitude degrees covered by one dot
    pub fn degrees_per_pixel(&self) -> f64 {
        360.0 / (self.zoom * self.width.max(1) as f64)
    }

    /// Geographic (lon, lat) to dot coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon + 180.0) / 360.0;
        let y = mercator_y(lat);
        let (center_x, center_y) = self.center_xy();
        let scale = self.zoom * self.width as f64;

        let px = ((x - center_x) * scale + self.width as f64 / 2.0) as i32;
        let py = ((y - center_y) * scale + self.height as f64 / 2.0) as i32;
        (px, py)
    }

    /// Dot coordinates back to geographic (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let (center_x, center_y) = self.center_xy();
        let scale = self.zoom * self.width.max(1) as f64;

        let x = (px as f64 - self.width as f64 / 2.0) / scale + center_x;
        let y = (py as f64 - self.height as f64 / 2.0) / scale + center_y;

        (x * 360.0 - 180.0, inverse_mercator_y(y))
    }

    fn center_xy(&self) -> (f64, f64) {
        ((self.center_lon + 180.0) / 360.0, mercator_y(self.center_lat))
    }

    /// Whether a projected point is on (or just off) the canvas
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }

    /// Rough bounding-box test for a line segment
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}

/// Normalized Web Mercator y (0 at the north edge, 1 at the south edge)
#[inline]
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

/// Latitude for a normalized Web Mercator y
#[inline]
fn inverse_mercator_y(y: f64) -> f64 {
    (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees()
}

#[inline]
fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
