use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{LoadError, ParseError};
use crate::record::{parse_timestamp, EarthquakeRecord};

/// Columns every catalog file must carry
const REQUIRED_COLUMNS: [&str; 6] = ["place", "latitude", "longitude", "mag", "depth", "time"];

/// Positions of the required columns within a row
struct Columns {
    place: usize,
    latitude: usize,
    longitude: usize,
    mag: usize,
    depth: usize,
    time: usize,
}

impl Columns {
    /// Locate the required columns, or name the first one missing
    fn locate(headers: &ByteRecord) -> Result<Self, &'static str> {
        let names: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let name = decode_text(h);
                let name = if i == 0 {
                    name.trim_start_matches('\u{feff}').to_string()
                } else {
                    name
                };
                name.trim().to_string()
            })
            .collect();

        let find = |column: &'static str| {
            names.iter().position(|n| n == column).ok_or(column)
        };

        Ok(Self {
            place: find(REQUIRED_COLUMNS[0])?,
            latitude: find(REQUIRED_COLUMNS[1])?,
            longitude: find(REQUIRED_COLUMNS[2])?,
            mag: find(REQUIRED_COLUMNS[3])?,
            depth: find(REQUIRED_COLUMNS[4])?,
            time: find(REQUIRED_COLUMNS[5])?,
        })
    }

    fn parse(&self, id: usize, line: u64, row: &ByteRecord) -> Result<EarthquakeRecord, ParseError> {
        let field = |idx: usize| row.get(idx).map(decode_text).unwrap_or_default();

        let place = field(self.place);
        let place = (!place.is_empty()).then_some(place);

        let raw_time = field(self.time);
        let time = parse_timestamp(&raw_time).ok_or_else(|| ParseError::Time {
            line,
            value: raw_time.clone(),
        })?;

        Ok(EarthquakeRecord::new(
            id,
            place,
            parse_number(&field(self.latitude), "latitude", line)?,
            parse_number(&field(self.longitude), "longitude", line)?,
            parse_number(&field(self.mag), "mag", line)?,
            parse_number(&field(self.depth), "depth", line)?,
            time,
        ))
    }
}

/// Load every record from a CSV catalog, in file order.
pub fn load_records(path: &Path) -> Result<Vec<EarthquakeRecord>, LoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let csv_error = |source: csv::Error| classify_csv_error(path, source);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let headers = reader.byte_headers().map_err(csv_error)?.clone();
    let columns = Columns::locate(&headers).map_err(|column| LoadError::MissingColumn {
        path: path.to_path_buf(),
        column,
    })?;

    let rows: Vec<ByteRecord> = reader
        .byte_records()
        .collect::<Result<_, _>>()
        .map_err(csv_error)?;
    debug!(rows = rows.len(), path = %path.display(), "read catalog rows");

    // Header is line 1
    let records = rows
        .par_iter()
        .enumerate()
        .map(|(id, row)| {
            let line = row.position().map(|p| p.line()).unwrap_or(id as u64 + 2);
            columns.parse(id, line, row)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

/// Read failures surfaced by the CSV reader (a directory, a vanished
/// file) are I/O errors; everything else is malformed content.
fn classify_csv_error(path: &Path, source: csv::Error) -> LoadError {
    let io_kind = match source.kind() {
        csv::ErrorKind::Io(err) => Some(err.kind()),
        _ => None,
    };
    match io_kind {
        Some(kind) => LoadError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(kind, source),
        },
        None => LoadError::Csv {
            path: path.to_path_buf(),
            source,
        },
    }
}

/// Decode a field as UTF-8, falling back to Latin-1 byte-for-byte.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Empty cells are missing values (NaN); anything else must parse.
fn parse_number(raw: &str, column: &'static str, line: u64) -> Result<f64, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(f64::NAN);
    }
    raw.parse().map_err(|_| ParseError::Number {
        line,
        column,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "time,latitude,longitude,depth,mag,magType,place,type\n";

    fn write_csv(body: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_loads_rows_in_order() {
        let file = write_csv(
            format!(
                "{HEADER}\
                 2019-05-01T10:00:00.000Z,35.6,139.7,10,4.5,mb,\"10km N of Tokyo, Japan\",earthquake\n\
                 2020-03-01T00:00:00.000Z,-33.4,-71.6,25.3,5.1,mww,offshore Chile,earthquake\n"
            )
            .as_bytes(),
        );

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 0);
        assert_eq!(records[0].country(), "Japan");
        assert_eq!(records[0].magnitude, 4.5);
        assert_eq!(records[1].id, 1);
        assert_eq!(records[1].country(), "offshore Chile");
        assert_eq!(records[1].depth, 25.3);
    }

    #[test]
    fn test_loading_twice_is_identical() {
        let file = write_csv(
            format!("{HEADER}2021-01-01T00:00:00Z,1,2,3,4,ml,\"a, B\",earthquake\n").as_bytes(),
        );
        let first = load_records(file.path()).unwrap();
        let second = load_records(file.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_latin1_place_is_decoded() {
        let mut body = HEADER.as_bytes().to_vec();
        body.extend_from_slice(b"2021-01-01T00:00:00Z,1,2,3,4,ml,\"Bogot\xe1, Colombia\",earthquake\n");
        let file = write_csv(&body);

        let records = load_records(file.path()).unwrap();
        assert_eq!(records[0].place.as_deref(), Some("Bogotá, Colombia"));
        assert_eq!(records[0].country(), "Colombia");
    }

    #[test]
    fn test_empty_place_and_number() {
        let file = write_csv(format!("{HEADER}2021-01-01T00:00:00Z,1,2,,4,ml,,earthquake\n").as_bytes());
        let records = load_records(file.path()).unwrap();
        assert_eq!(records[0].place, None);
        assert_eq!(records[0].country(), "nan");
        assert!(records[0].depth.is_nan());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(&dir.path().join("query.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }), "got {err}");
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let file = write_csv(
            format!(
                "{HEADER}2021-01-01T00:00:00Z,1,2,3,4,ml,a,earthquake\n\
                 2021-01-02T00:00:00Z,1,2,3,4,ml,b\n"
            )
            .as_bytes(),
        );
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }), "got {err}");
    }

    #[test]
    fn test_missing_column() {
        let file = write_csv(b"time,latitude,longitude,depth,place\n2021-01-01,1,2,3,x\n");
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "mag", .. }));
    }

    #[test]
    fn test_bad_time_fails_whole_load() {
        let file = write_csv(
            format!(
                "{HEADER}2021-01-01T00:00:00Z,1,2,3,4,ml,a,earthquake\n\
                 not-a-date,1,2,3,4,ml,b,earthquake\n"
            )
            .as_bytes(),
        );
        let err = load_records(file.path()).unwrap_err();
        match err {
            LoadError::Parse(ParseError::Time { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_number_is_reported() {
        let file = write_csv(format!("{HEADER}2021-01-01T00:00:00Z,north,2,3,4,ml,a,earthquake\n").as_bytes());
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse(ParseError::Number { column: "latitude", .. })
        ));
    }

    #[test]
    fn test_bom_on_first_header() {
        let file = write_csv(
            "\u{feff}place,latitude,longitude,mag,depth,time\nx,1,2,3,4,2022-02-02\n".as_bytes(),
        );
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year(), 2022);
    }
}
