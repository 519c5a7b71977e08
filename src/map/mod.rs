mod geometry;
mod heat;
mod markers;
mod projection;
mod renderer;
mod spatial;

pub use heat::{HeatGrid, HeatRaster, HEAT_LEVELS};
pub use markers::{heat_coordinates, nearest_point, point_descriptors, MapPoint, MarkerStyle};
pub use projection::Viewport;
pub use renderer::{BaseLayers, HeatLayers, Lod, MapRenderer, PointLayers};
pub use spatial::SpatialGrid;
