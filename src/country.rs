use std::collections::HashSet;

use crate::record::EarthquakeRecord;

/// Selector value meaning "no country filter"
pub const ALL_COUNTRIES: &str = "All countries or regions";

/// Stand-in for a missing place, as missing values stringify
pub const MISSING_PLACE: &str = "nan";

/// Country or region label for a free-text place: the last comma-separated
/// segment, trimmed. Missing or empty input yields "nan".
pub fn extract_country(place: Option<&str>) -> String {
    let place = match place {
        Some(p) if !p.is_empty() => p,
        _ => MISSING_PLACE,
    };
    place
        .rsplit_once(',')
        .map_or(place, |(_, last)| last)
        .trim()
        .to_string()
}

/// Selector entries: the "all" sentinel followed by every distinct country
/// in first-seen order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryIndex {
    entries: Vec<String>,
}

impl CountryIndex {
    pub fn from_records(records: &[EarthquakeRecord]) -> Self {
        let mut seen = HashSet::new();
        let mut entries = vec![ALL_COUNTRIES.to_string()];
        for record in records {
            if seen.insert(record.country()) {
                entries.push(record.country().to_string());
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: the sentinel is always present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e == name)
    }
}

pub fn is_sentinel(selected: &str) -> bool {
    selected == ALL_COUNTRIES
}
