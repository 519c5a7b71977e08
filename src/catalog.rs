use std::path::Path;

use tracing::info;

use crate::country::CountryIndex;
use crate::data::load_records;
use crate::error::LoadError;
use crate::map::heat_coordinates;
use crate::query::{DashboardView, YearRange};
use crate::record::EarthquakeRecord;

/// The loaded earthquake table and its country index. Built once per
/// session and read-only afterwards; every render pass borrows it.
pub struct Catalog {
    records: Vec<EarthquakeRecord>,
    countries: CountryIndex,
    /// Heat map input; independent of any selection
    heat: Vec<(f64, f64)>,
}

impl Catalog {
    /// Load a CSV catalog and derive the country index
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let catalog = Self::from_records(load_records(path)?);
        info!(
            path = %path.display(),
            records = catalog.records.len(),
            countries = catalog.countries.len() - 1,
            "loaded earthquake catalog"
        );
        Ok(catalog)
    }

    pub fn from_records(records: Vec<EarthquakeRecord>) -> Self {
        let countries = CountryIndex::from_records(&records);
        let heat = heat_coordinates(&records);
        Self {
            records,
            countries,
            heat,
        }
    }

    pub fn records(&self) -> &[EarthquakeRecord] {
        &self.records
    }

    pub fn countries(&self) -> &CountryIndex {
        &self.countries
    }

    /// (lon, lat) of every record, for the heat map
    pub fn heat_coordinates(&self) -> &[(f64, f64)] {
        &self.heat
    }

    /// Derived outputs for one selection
    pub fn view<'a>(&'a self, selected: &'a str, range: YearRange) -> DashboardView<'a> {
        DashboardView::build(&self.records, selected, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::ALL_COUNTRIES;
    use crate::record::parse_timestamp;

    fn record(id: usize, place: &str, time: &str) -> EarthquakeRecord {
        EarthquakeRecord::new(
            id,
            Some(place.into()),
            0.0,
            0.0,
            4.0,
            10.0,
            parse_timestamp(time).unwrap(),
        )
    }

    #[test]
    fn test_tokyo_chile_example() {
        let catalog = Catalog::from_records(vec![
            record(0, "10km N of Tokyo, Japan", "2019-05-01"),
            record(1, "offshore Chile", "2020-03-01"),
        ]);

        let japan = catalog.view("Japan", YearRange::DASHBOARD);
        assert_eq!(japan.table_records.len(), 1);
        assert_eq!(japan.table_records[0].id, 0);

        let all = catalog.view(ALL_COUNTRIES, YearRange::DASHBOARD);
        assert_eq!(all.count(), 2);
        let yearly: Vec<(i32, usize)> = all.yearly.into_iter().collect();
        assert_eq!(yearly, vec![(2019, 1), (2020, 1)]);
    }

    #[test]
    fn test_heat_covers_every_record_whatever_the_selection() {
        let catalog = Catalog::from_records(vec![
            record(0, "a", "2016-05-01"),
            record(1, "b", "2020-03-01"),
        ]);
        assert_eq!(catalog.heat_coordinates().len(), 2);
        assert_eq!(catalog.view("b", YearRange::DASHBOARD).count(), 1);
        assert_eq!(catalog.countries().len(), 3);
    }
}
