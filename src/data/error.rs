//! Error types for the data pipeline.
//!
//! One enum per stage so callers can tell a skipped file from a skipped
//! column or a blocked chart. None of these is fatal; the session turns each
//! into a notice and carries on.

use thiserror::Error;

/// Errors raised while turning an uploaded file into a [`Table`](super::model::Table).
#[derive(Error, Debug)]
pub enum IngestError {
    /// The file name carries an extension we do not read.
    #[error("Unsupported file type: .{0}")]
    UnsupportedFormat(String),

    /// The content could not be parsed by the underlying reader.
    #[error("Could not parse file: {0}")]
    ParseFailure(String),
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::ParseFailure(err.to_string())
    }
}

impl From<calamine::XlsxError> for IngestError {
    fn from(err: calamine::XlsxError) -> Self {
        IngestError::ParseFailure(err.to_string())
    }
}

/// Per-column failures of the cleaning operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CleanError {
    /// Column has missing cells but no values to average.
    #[error("Column '{column}' has no values; mean is undefined")]
    UndefinedMean { column: String },
}

/// Reasons a chart request produces no chart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Visualization needs at least two numeric columns (found {found})")]
    TooFewNumericColumns { found: usize },

    #[error("X-axis and Y-axis cannot be the same! Please select different columns.")]
    IdenticalAxes,

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("Too many unique values for a pie chart ({count} > {max})! Select a categorical column.")]
    TooManyCategories { count: usize, max: usize },

    #[error("Pie slice '{0}' has a negative total")]
    NegativeSlice(String),

    #[error("Nothing to draw: every pie slice is zero")]
    EmptyPie,
}

/// Failures while serializing a table for download.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The in-memory CSV buffer could not be flushed.
    #[error("I/O error while writing: {0}")]
    Io(#[from] std::io::Error),

    /// Table does not fit in a single worksheet.
    #[error("Table too large for a worksheet: {rows} rows x {columns} columns")]
    TooLarge { rows: usize, columns: usize },
}
