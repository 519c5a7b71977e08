//! Terminal dashboard over an earthquake catalog: a country selector,
//! per-year counts, a point map, a heat map and a data table.

pub mod app;
pub mod braille;
pub mod catalog;
pub mod cli;
pub mod country;
pub mod data;
pub mod error;
pub mod geo;
pub mod i18n;
pub mod logging;
pub mod map;
pub mod query;
pub mod record;
pub mod ui;
