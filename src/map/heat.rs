use rayon::prelude::*;

use crate::geo::{degree_cell, degree_cell_center, DEGREE_GRID_HEIGHT, DEGREE_GRID_WIDTH};
use crate::map::projection::Viewport;

/// Number of visible intensity levels (0 means "no heat")
pub const HEAT_LEVELS: u8 = 5;

/// Normalized intensity below which a cell stays blank
const MIN_INTENSITY: f32 = 0.04;

/// 3x3 smoothing kernel, sums to 16
const KERNEL: [[f32; 3]; 3] = [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];

/// Event counts binned into 1° cells (360×180). Lets the zoomed-out heat
/// map touch at most 64,800 cells however large the catalog is.
pub struct HeatGrid {
    cells: Vec<u32>,
}

impl HeatGrid {
    const LEN: usize = DEGREE_GRID_WIDTH * DEGREE_GRID_HEIGHT;

    /// Bin (lon, lat) pairs; non-finite coordinates are skipped
    pub fn build(coords: &[(f64, f64)]) -> Self {
        let cells = coords
            .par_iter()
            .filter(|(lon, lat)| lon.is_finite() && lat.is_finite())
            .fold(
                || vec![0u32; Self::LEN],
                |mut acc, &(lon, lat)| {
                    acc[degree_cell(lon, lat)] += 1;
                    acc
                },
            )
            .reduce(
                || vec![0u32; Self::LEN],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            );
        Self { cells }
    }

    /// Non-empty cells as (center lon, center lat, count)
    pub fn iter_cells(&self) -> impl Iterator<Item = (f64, f64, u32)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, &count)| {
            (count > 0).then(|| {
                let (lon, lat) = degree_cell_center(idx);
                (lon, lat, count)
            })
        })
    }
}

/// Per-character-cell heat intensity for one map pane, normalized to 0..1
pub struct HeatRaster {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl HeatRaster {
    /// Accumulate weighted (lon, lat, weight) samples into a `cols` x `rows`
    /// raster under `viewport`, then smooth and normalize.
    pub fn from_weighted(
        samples: impl Iterator<Item = (f64, f64, f32)>,
        viewport: &Viewport,
        cols: usize,
        rows: usize,
    ) -> Self {
        let mut raw = vec![0f32; cols * rows];
        for (lon, lat, weight) in samples {
            if !lon.is_finite() || !lat.is_finite() {
                continue;
            }
            let (px, py) = viewport.project(lon, lat);
            if px < 0 || py < 0 {
                continue;
            }
            // Braille dots to character cells
            let (col, row) = (px as usize / 2, py as usize / 4);
            if col < cols && row < rows {
                raw[row * cols + col] += weight;
            }
        }

        let mut values = blur(&raw, cols, rows);
        let max = values.iter().copied().fold(0f32, f32::max);
        if max > 0.0 {
            for v in &mut values {
                // sqrt lifts sparse areas next to dense clusters
                *v = (*v / max).sqrt();
            }
        }

        Self {
            width: cols,
            height: rows,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Normalized intensity at a cell (0 outside the raster)
    pub fn intensity(&self, col: usize, row: usize) -> f32 {
        if col >= self.width || row >= self.height {
            return 0.0;
        }
        self.values[row * self.width + col]
    }

    /// Bucketed level 0..=HEAT_LEVELS
    pub fn level(&self, col: usize, row: usize) -> u8 {
        let v = self.intensity(col, row);
        if v < MIN_INTENSITY {
            return 0;
        }
        ((v * HEAT_LEVELS as f32).ceil() as u8).clamp(1, HEAT_LEVELS)
    }
}

fn blur(raw: &[f32], cols: usize, rows: usize) -> Vec<f32> {
    let mut out = vec![0f32; raw.len()];
    for row in 0..rows {
        for col in 0..cols {
            let v = raw[row * cols + col];
            if v == 0.0 {
                continue;
            }
            for (ky, kernel_row) in KERNEL.iter().enumerate() {
                for (kx, k) in kernel_row.iter().enumerate() {
                    let (Some(x), Some(y)) = ((col + kx).checked_sub(1), (row + ky).checked_sub(1)) else {
                        continue;
                    };
                    if x < cols && y < rows {
                        out[y * cols + x] += v * k / 16.0;
                    }
                }
            }
        }
    }
    out
}
