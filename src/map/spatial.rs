use std::collections::HashMap;

/// Spatial hash grid for region queries: the world is cut into square
/// cells of `cell_size` degrees, each holding indices into `items`.
pub struct SpatialGrid<T> {
    cells: HashMap<(i32, i32), Vec<usize>>,
    items: Vec<T>,
    cell_size: f64,
}

impl<T> SpatialGrid<T> {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            items: Vec::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon / self.cell_size).floor() as i32;
        let y = (lat / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Insert an item at a geographic position
    pub fn insert(&mut self, lon: f64, lat: f64, item: T) {
        let idx = self.items.len();
        self.items.push(item);

        let cell = self.to_cell(lon, lat);
        self.cells.entry(cell).or_default().push(idx);
    }

    /// Indices of items in every cell touching the square of
    /// `radius_degrees` around (lon, lat). May include items slightly
    /// outside the radius; callers refine by exact distance.
    pub fn query_radius(&self, lon: f64, lat: f64, radius_degrees: f64) -> Vec<usize> {
        let center = self.to_cell(lon, lat);
        let reach = (radius_degrees / self.cell_size).ceil() as i32;

        let mut results = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if let Some(indices) = self.cells.get(&(center.0 + dx, center.1 + dy)) {
                    results.extend_from_slice(indices);
                }
            }
        }
        results
    }

    #[inline(always)]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }
}
