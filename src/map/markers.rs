use crate::i18n::Lang;
use crate::map::projection::Viewport;
use crate::map::spatial::SpatialGrid;
use crate::record::EarthquakeRecord;

/// How a marker is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Radius in Braille dots at full zoom
    pub radius: i32,
    pub filled: bool,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 3,
            filled: true,
        }
    }
}

/// One point on the point map
#[derive(Clone, Debug, PartialEq)]
pub struct MapPoint {
    /// Record id this marker stands for
    pub id: usize,
    pub latitude: f64,
    pub longitude: f64,
    /// Popup lines
    pub label: Vec<String>,
    pub style: MarkerStyle,
}

impl MapPoint {
    pub fn from_record(record: &EarthquakeRecord, lang: Lang) -> Self {
        Self {
            id: record.id,
            latitude: record.latitude,
            longitude: record.longitude,
            label: record.popup_lines(lang),
            style: MarkerStyle::default(),
        }
    }
}

/// Marker descriptors for the point map, in record order
pub fn point_descriptors(records: &[&EarthquakeRecord], lang: Lang) -> Vec<MapPoint> {
    records
        .iter()
        .map(|r| MapPoint::from_record(r, lang))
        .collect()
}

/// Plain coordinate pairs for the heat map, as (lon, lat)
pub fn heat_coordinates(records: &[EarthquakeRecord]) -> Vec<(f64, f64)> {
    records.iter().map(|r| (r.longitude, r.latitude)).collect()
}

/// The marker closest to dot position (px, py), if one lies within
/// `max_dist` dots.
pub fn nearest_point<'a>(
    points: &'a [MapPoint],
    viewport: &Viewport,
    px: i32,
    py: i32,
    max_dist: i32,
) -> Option<&'a MapPoint> {
    let radius_degrees = viewport.degrees_per_pixel() * max_dist.max(1) as f64;
    let mut grid = SpatialGrid::new(radius_degrees);
    for point in points
        .iter()
        .filter(|p| p.longitude.is_finite() && p.latitude.is_finite())
    {
        grid.insert(point.longitude, point.latitude, point);
    }

    let (lon, lat) = viewport.unproject(px, py);
    grid.query_radius(lon, lat, radius_degrees)
        .into_iter()
        .filter_map(|idx| grid.get(idx).copied())
        .filter_map(|point| {
            let (x, y) = viewport.project(point.longitude, point.latitude);
            let (dx, dy) = (x as i64 - px as i64, y as i64 - py as i64);
            let dist2 = dx * dx + dy * dy;
            (dist2 <= (max_dist as i64).pow(2)).then_some((dist2, point))
        })
        .min_by_key(|(dist2, _)| *dist2)
        .map(|(_, point)| point)
}
