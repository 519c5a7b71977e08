mod basemap;
mod loader;

pub use basemap::{generate_simple_world, load_basemap};
pub use loader::{decode_text, load_records};
