use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::country::extract_country;
use crate::i18n::Lang;

/// Naive layouts accepted after RFC 3339, all read as UTC
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One row of the earthquake catalog
#[derive(Clone, Debug, PartialEq)]
pub struct EarthquakeRecord {
    /// Load ordinal (0-based data row)
    pub id: usize,
    pub place: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub magnitude: f64,
    /// Kilometers
    pub depth: f64,
    pub time: DateTime<Utc>,
    country: String,
}

impl EarthquakeRecord {
    /// Build a record, deriving its country from `place`.
    pub fn new(
        id: usize,
        place: Option<String>,
        latitude: f64,
        longitude: f64,
        magnitude: f64,
        depth: f64,
        time: DateTime<Utc>,
    ) -> Self {
        let country = extract_country(place.as_deref());
        Self {
            id,
            place,
            latitude,
            longitude,
            magnitude,
            depth,
            time,
            country,
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn year(&self) -> i32 {
        self.time.year()
    }

    /// Place text as displayed; missing values show as "nan"
    pub fn place_text(&self) -> &str {
        match self.place.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => "nan",
        }
    }

    pub fn time_text(&self) -> String {
        self.time.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn has_position(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Popup content for this event's map marker.
    pub fn popup_lines(&self, lang: Lang) -> Vec<String> {
        let [place, mag, depth, time] = lang.popup_labels();
        vec![
            format!("{place}: {}", self.place_text()),
            format!("{mag}: {}", self.magnitude),
            format!("{depth}: {} km", self.depth),
            format!("{time}: {}", self.time_text()),
        ]
    }
}

/// Parse an ISO-8601-like timestamp. Offsets are honoured, naive values are
/// taken as UTC, and a bare date means midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_usgs_timestamp() {
        let t = parse_timestamp("2018-01-03T04:22:10.000Z").unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2018, 1, 3));
        assert_eq!((t.hour(), t.minute(), t.second()), (4, 22, 10));
    }

    #[test]
    fn test_parse_offset_is_converted_to_utc() {
        let t = parse_timestamp("2020-12-31T23:30:00-02:00").unwrap();
        assert_eq!(t.year(), 2021);
        assert_eq!(t.hour(), 1);
    }

    #[test]
    fn test_parse_naive_and_bare_date() {
        let t = parse_timestamp("2019-05-01 08:15:00").unwrap();
        assert_eq!(t.hour(), 8);

        let d = parse_timestamp("2019-05-01").unwrap();
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (2019, 5, 1, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2019-13-01").is_none());
    }

    #[test]
    fn test_country_is_derived_on_construction() {
        let time = parse_timestamp("2019-05-01").unwrap();
        let rec = EarthquakeRecord::new(
            0,
            Some("10km N of Tokyo, Japan".into()),
            35.7,
            139.7,
            4.5,
            10.0,
            time,
        );
        assert_eq!(rec.country(), "Japan");
        assert_eq!(rec.year(), 2019);
    }

    #[test]
    fn test_popup_lines_show_missing_place_as_nan() {
        let time = parse_timestamp("2021-02-03T04:05:06Z").unwrap();
        let rec = EarthquakeRecord::new(3, None, 1.0, 2.0, 5.5, 33.0, time);
        let lines = rec.popup_lines(Lang::En);
        assert_eq!(lines[0], "Place: nan");
        assert_eq!(lines[1], "Magnitude: 5.5");
        assert_eq!(lines[2], "Depth: 33 km");
        assert_eq!(lines[3], "Time: 2021-02-03 04:05:06");
    }
}
