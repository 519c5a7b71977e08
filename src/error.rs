use std::path::PathBuf;
use thiserror::Error;

/// Fatal failure while loading the earthquake catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("catalog file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is missing required column `{column}`", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A single field that could not be converted. Loading is strict: any of
/// these aborts the whole load so every record carries a valid timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: `time` value {value:?} is not a recognised date-time")]
    Time { line: u64, value: String },

    #[error("line {line}: `{column}` value {value:?} is not a number")]
    Number {
        line: u64,
        column: &'static str,
        value: String,
    },
}
