use std::path::PathBuf;

use clap::Parser;

use crate::i18n::Lang;

/// Terminal dashboard for an earthquake catalog: filter by country or
/// region, browse events, and see them on point and heat maps.
#[derive(Debug, Parser)]
#[command(name = "quake-dash", version, about)]
pub struct Args {
    /// Earthquake catalog CSV (needs place, latitude, longitude, mag, depth, time)
    #[arg(long, default_value = "data/query.csv", value_name = "PATH")]
    pub data: PathBuf,

    /// Directory holding Natural Earth coastline/border GeoJSON
    #[arg(long, default_value = "data", value_name = "DIR")]
    pub basemap_dir: PathBuf,

    /// UI language
    #[arg(long, value_enum, default_value_t = Lang::En)]
    pub lang: Lang,

    /// Write logs to this file (level from QUAKE_DASH_LOG, default info)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
