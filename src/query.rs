use std::collections::BTreeMap;

use crate::country::is_sentinel;
use crate::record::EarthquakeRecord;

/// Inclusive range of calendar years
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// Fixed range used by the dashboard table, count and chart
    pub const DASHBOARD: YearRange = YearRange {
        min: 2018,
        max: 2023,
    };

    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/// Records whose country equals `selected` exactly. The sentinel selects
/// everything, in input order.
pub fn filter_by_country<'a, I>(records: I, selected: &str) -> Vec<&'a EarthquakeRecord>
where
    I: IntoIterator<Item = &'a EarthquakeRecord>,
{
    if is_sentinel(selected) {
        return records.into_iter().collect();
    }
    records
        .into_iter()
        .filter(|r| r.country() == selected)
        .collect()
}

/// Records dated within `range`
pub fn filter_by_year_range<'a, I>(records: I, range: YearRange) -> Vec<&'a EarthquakeRecord>
where
    I: IntoIterator<Item = &'a EarthquakeRecord>,
{
    records
        .into_iter()
        .filter(|r| range.contains(r.year()))
        .collect()
}

/// Event count per calendar year, ascending. Years without events are absent.
pub fn count_by_year<'a, I>(records: I) -> BTreeMap<i32, usize>
where
    I: IntoIterator<Item = &'a EarthquakeRecord>,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.year()).or_insert(0) += 1;
    }
    counts
}

/// Everything one render pass needs for a single selection.
pub struct DashboardView<'a> {
    pub selected: &'a str,
    pub range: YearRange,
    /// Country filter only; the point map spans all years
    pub map_records: Vec<&'a EarthquakeRecord>,
    /// Country and year range
    pub table_records: Vec<&'a EarthquakeRecord>,
    pub yearly: BTreeMap<i32, usize>,
}

impl<'a> DashboardView<'a> {
    pub fn build(records: &'a [EarthquakeRecord], selected: &'a str, range: YearRange) -> Self {
        let map_records = filter_by_country(records, selected);
        let table_records = filter_by_year_range(map_records.iter().copied(), range);
        let yearly = count_by_year(table_records.iter().copied());
        Self {
            selected,
            range,
            map_records,
            table_records,
            yearly,
        }
    }

    /// Number of records in the table
    pub fn count(&self) -> usize {
        self.table_records.len()
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
            Some(place.to_string()),
            0.0,
            0.0,
            4.0,
            10.0,
            parse_timestamp(time).unwrap(),
        )
    }

    fn sample() -> Vec<EarthquakeRecord> {
        vec![
            record(0, "10km N of Tokyo, Japan", "2019-05-01"),
            record(1, "offshore Chile", "2020-03-01"),
            record(2, "Kyoto, Japan", "2017-06-30T12:00:00Z"),
            record(3, "Osaka, Japan", "2019-11-11T00:00:00Z"),
            record(4, "Sendai, japan", "2022-01-01"),
        ]
    }

    #[test]
    fn test_sentinel_returns_everything_in_order() {
        let records = sample();
        let all = filter_by_country(&records, ALL_COUNTRIES);
        assert_eq!(all.len(), records.len());
        for (got, want) in all.iter().zip(&records) {
            assert!(std::ptr::eq(*got, want));
        }
    }

    #[test]
    fn test_country_filter_is_exact_and_case_sensitive() {
        let records = sample();
        let ids: Vec<usize> = filter_by_country(&records, "Japan").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 2, 3]);

        let lower: Vec<usize> = filter_by_country(&records, "japan").iter().map(|r| r.id).collect();
        assert_eq!(lower, vec![4]);

        assert!(filter_by_country(&records, "Atlantis").is_empty());
    }

    #[test]
    fn test_year_range_boundaries() {
        let records = vec![
            record(0, "a", "2017-12-31T23:59:59Z"),
            record(1, "a", "2018-01-01"),
            record(2, "a", "2023-12-31"),
            record(3, "a", "2023-12-31T23:59:59Z"),
            record(4, "a", "2024-01-01"),
        ];
        let ids: Vec<usize> = filter_by_year_range(&records, YearRange::DASHBOARD)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_count_by_year_sorted_and_sums() {
        let records = vec![
            record(0, "a", "2021-01-01"),
            record(1, "a", "2018-05-05"),
            record(2, "a", "2021-07-07"),
            record(3, "a", "2023-02-02"),
        ];
        let counts = count_by_year(&records);
        let entries: Vec<(i32, usize)> = counts.iter().map(|(y, c)| (*y, *c)).collect();
        assert_eq!(entries, vec![(2018, 1), (2021, 2), (2023, 1)]);
        assert_eq!(counts.values().sum::<usize>(), records.len());
        assert!(!counts.contains_key(&2019));
    }

    #[test]
    fn test_view_combines_filters() {
        let records = sample();
        let view = DashboardView::build(&records, "Japan", YearRange::DASHBOARD);

        let table: Vec<usize> = view.table_records.iter().map(|r| r.id).collect();
        assert_eq!(table, vec![0, 3]);
        assert_eq!(view.count(), 2);
        assert_eq!(view.yearly.get(&2019), Some(&2));
        assert_eq!(view.yearly.len(), 1);
    }

    #[test]
    fn test_point_map_is_not_year_filtered() {
        // The point map keeps out-of-range years that the table drops.
        let records = sample();
        let view = DashboardView::build(&records, "Japan", YearRange::DASHBOARD);

        let map: Vec<usize> = view.map_records.iter().map(|r| r.id).collect();
        assert_eq!(map, vec![0, 2, 3]);
        assert!(view.map_records.iter().any(|r| r.year() == 2017));
        assert!(view.table_records.iter().all(|r| r.year() != 2017));
    }
}
