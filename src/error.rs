//! Error type shared by the loaders, the engines and the solver.

use std::fmt;

/// Everything that can make a solve call fail.
///
/// Unreachable city pairs are not errors: they are encoded as `+inf`
/// distances and simply propagate into the tour length.
#[derive(Debug)]
pub enum Error {
    /// The matrix has no rows
    EmptyGraph,

    /// A row does not have one entry per city
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// NaN or negative distance between two distinct cities
    InvalidDistance { from: usize, to: usize, value: f64 },

    /// More cities than the configured limit allows
    TooManyCities { cities: usize, limit: usize },

    /// The subset table or the shared memory region could not be reserved
    Allocation { bytes: usize },

    /// Malformed matrix or configuration file
    Parse(String),

    /// I/O failure while reading or writing files
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyGraph => write!(f, "Distance matrix must contain at least one city"),
            Error::NotSquare { row, len, expected } => {
                write!(f, "Row {row} has {len} entries, expected {expected}")
            }
            Error::InvalidDistance { from, to, value } => {
                write!(f, "Invalid distance {value} from city {from} to city {to}")
            }
            Error::TooManyCities { cities, limit } => {
                write!(f, "{cities} cities exceeds the limit of {limit}")
            }
            Error::Allocation { bytes } => {
                write!(f, "Could not allocate {bytes} bytes for the subset table")
            }
            Error::Parse(msg) => write!(f, "Parse error: {msg}"),
            Error::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
