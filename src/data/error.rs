use std::fmt;

use thiserror::Error;

use super::model::ColumnType;

/// Failure to turn an upload into a [`Table`](super::model::Table).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("the file has no header row")]
    NoColumns,
    #[error("line {line}: expected {expected} fields, saw {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// A cleaning or chart option that does not fit the table.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("column `{0}` does not exist")]
    UnknownColumn(String),
    #[error("cannot fill `{column}` with the {method}: the column is {kind}, not numeric")]
    NonNumericFill {
        column: String,
        method: &'static str,
        kind: ColumnType,
    },
    #[error("column `{0}` is not numeric and cannot be plotted")]
    NotPlottable(String),
    #[error("a scatter plot needs two different numeric columns")]
    InvalidScatter,
}

/// The table could not be written as a spreadsheet.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("spreadsheet writer failed: {0}")]
    Writer(#[from] rust_xlsxwriter::XlsxError),
    #[error("spreadsheet reader failed: {0}")]
    Reader(#[from] calamine::XlsxError),
    #[error("the workbook has no worksheet")]
    NoWorksheet,
    #[error("worksheet columns have different lengths")]
    RaggedSheet,
    #[error("row {row}, column `{column}`: {value} cannot be stored exactly in a spreadsheet")]
    Unrepresentable {
        row: usize,
        column: String,
        value: String,
    },
    #[error("{0} does not fit in a worksheet")]
    TooLarge(&'static str),
}

/// Any hard failure of a pipeline stage.
#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

// ---------------------------------------------------------------------------
// Degraded-but-successful results
// ---------------------------------------------------------------------------

/// Why an analysis could not be produced. Not an error: the session carries on
/// and the reason is shown as a notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsufficientData {
    NoNumericColumns,
    TooFewNumericColumns { found: usize, required: usize },
    EmptyColumn(String),
}

impl fmt::Display for InsufficientData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsufficientData::NoNumericColumns => {
                write!(f, "No numeric columns available for plotting.")
            }
            InsufficientData::TooFewNumericColumns { found, required } => write!(
                f,
                "Not enough numeric columns: {found} found, {required} required."
            ),
            InsufficientData::EmptyColumn(col) => {
                write!(f, "Column `{col}` has no values to plot.")
            }
        }
    }
}

/// Result of an analysis that may legitimately have nothing to show.
#[derive(Debug, Clone, PartialEq)]
pub enum Availability<T> {
    Ready(T),
    Unavailable(InsufficientData),
}

impl<T> Availability<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Availability::Ready(v) => Some(v),
            Availability::Unavailable(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Availability::Ready(_))
    }
}
