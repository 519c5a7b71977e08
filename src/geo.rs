/// Width and height of a one-degree world grid
pub const DEGREE_GRID_WIDTH: usize = 360;
pub const DEGREE_GRID_HEIGHT: usize = 180;

/// Normalize longitude from [-180, 180] to [0, 360) for grid indexing
#[inline(always)]
pub fn normalize_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0)
}

/// Normalize latitude from [-90, 90] to [0, 180) for grid indexing
#[inline(always)]
pub fn normalize_lat(lat: f64) -> f64 {
    (lat + 90.0).clamp(0.0, 179.999)
}

/// Row-major index of the one-degree cell containing (lon, lat)
#[inline(always)]
pub fn degree_cell(lon: f64, lat: f64) -> usize {
    let lon_idx = (normalize_lon(lon) as usize).min(DEGREE_GRID_WIDTH - 1);
    let lat_idx = normalize_lat(lat) as usize;
    lat_idx * DEGREE_GRID_WIDTH + lon_idx
}

/// Center (lon, lat) of a one-degree cell
#[inline(always)]
pub fn degree_cell_center(idx: usize) -> (f64, f64) {
    let lat_idx = idx / DEGREE_GRID_WIDTH;
    let lon_idx = idx % DEGREE_GRID_WIDTH;
    (lon_idx as f64 - 180.0 + 0.5, lat_idx as f64 - 90.0 + 0.5)
}
