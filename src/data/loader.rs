use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, DataType, Reader, Xlsx};

use super::error::IngestError;
use super::model::{Column, FileFormat, Table};

// ---------------------------------------------------------------------------
// UploadedFile – raw bytes as handed over by the file picker
// ---------------------------------------------------------------------------

/// A file as received from the user. Immutable once constructed.
#[derive(Clone)]
pub struct UploadedFile {
    name: String,
    bytes: Vec<u8>,
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadedFile {
            name: name.into(),
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Lower-cased extension without the dot, empty when there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Resolve the format from the file name, then parse.
pub fn ingest(file: &UploadedFile) -> Result<(FileFormat, Table), IngestError> {
    let ext = file.extension();
    let format =
        FileFormat::from_extension(&ext).ok_or(IngestError::UnsupportedFormat(ext))?;
    let table = parse(file.bytes(), format)?;
    Ok((format, table))
}

/// Parse raw bytes into a [`Table`].
///
/// * `Csv`  – first record is the header, column types inferred from values
/// * `Xlsx` – first worksheet, first row is the header
pub fn parse(bytes: &[u8], format: FileFormat) -> Result<Table, IngestError> {
    match format {
        FileFormat::Csv => parse_csv(bytes),
        FileFormat::Xlsx => parse_xlsx(bytes),
    }
}

// ---------------------------------------------------------------------------
// Raw cells and type inference
// ---------------------------------------------------------------------------

/// Tokens read as a missing value.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A cell before its column's type is known.
#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Missing,
    Number(f64),
    /// Text that may still turn out to be a number.
    Text(String),
    /// Text that never counts as numeric (dates, booleans from a workbook).
    Opaque(String),
}

impl RawCell {
    fn from_text(s: &str) -> Self {
        if NA_TOKENS.contains(&s) {
            return RawCell::Missing;
        }
        match parse_number(s) {
            Some(v) if v.is_nan() => RawCell::Missing,
            _ => RawCell::Text(s.to_string()),
        }
    }

    fn from_data(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => RawCell::Missing,
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Float(f) if f.is_nan() => RawCell::Missing,
            Data::Float(f) => RawCell::Number(*f),
            Data::String(s) => RawCell::from_text(s),
            Data::DateTime(_) => match cell.as_datetime() {
                Some(dt) => RawCell::Opaque(dt.to_string()),
                None => RawCell::Opaque(cell.to_string()),
            },
            other => RawCell::Opaque(other.to_string()),
        }
    }

    fn parses_as_number(&self) -> bool {
        match self {
            RawCell::Missing | RawCell::Number(_) => true,
            RawCell::Text(s) => parse_number(s).is_some(),
            RawCell::Opaque(_) => false,
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// A column is numeric when every non-missing cell is a number. A column
/// with no values at all is numeric as well.
fn infer_column(name: String, cells: Vec<RawCell>) -> Column {
    if cells.iter().all(RawCell::parses_as_number) {
        let values = cells
            .into_iter()
            .map(|c| match c {
                RawCell::Number(v) => Some(v),
                RawCell::Text(s) => parse_number(&s),
                RawCell::Missing | RawCell::Opaque(_) => None,
            })
            .collect();
        Column::numeric(name, values)
    } else {
        let values = cells
            .into_iter()
            .map(|c| match c {
                RawCell::Missing => None,
                RawCell::Number(v) => Some(v.to_string()),
                RawCell::Text(s) | RawCell::Opaque(s) => Some(s),
            })
            .collect();
        Column::text(name, values)
    }
}

/// Blank headers become `Unnamed: {i}`, repeats become `name.1`, `name.2`, …
fn normalize_headers<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for (i, name) in raw.into_iter().enumerate() {
        let mut name = if name.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        };
        let mut count = counts.get(&name).copied().unwrap_or(0);
        while count > 0 {
            counts.insert(name.clone(), count + 1);
            name = format!("{name}.{count}");
            count = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), count + 1);
        out.push(name);
    }
    out
}

fn build_table(headers: Vec<String>, columns: Vec<Vec<RawCell>>) -> Table {
    Table::new(
        headers
            .into_iter()
            .zip(columns)
            .map(|(name, cells)| infer_column(name, cells))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Short records are padded with missing cells; a record with more fields
/// than the header is an error.
fn parse_csv(bytes: &[u8]) -> Result<Table, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = normalize_headers(reader.headers()?.iter().map(str::to_string));
    if headers.is_empty() {
        return Err(IngestError::ParseFailure(
            "No columns to parse from file".into(),
        ));
    }

    let mut columns: Vec<Vec<RawCell>> = vec![Vec::new(); headers.len()];
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(IngestError::ParseFailure(format!(
                "Expected {} fields in line {}, saw {}",
                headers.len(),
                record.position().map_or(i as u64 + 2, |p| p.line()),
                record.len()
            )));
        }
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(record.get(idx).map_or(RawCell::Missing, RawCell::from_text));
        }
    }

    Ok(build_table(headers, columns))
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

fn parse_xlsx(bytes: &[u8]) -> Result<Table, IngestError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::ParseFailure("Workbook has no worksheets".into()))??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(IngestError::ParseFailure(
            "No columns to parse from file".into(),
        ));
    };
    let headers = normalize_headers(header_row.iter().map(|c| c.to_string()));

    let mut columns: Vec<Vec<RawCell>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (i, column) in columns.iter_mut().enumerate() {
            column.push(row.get(i).map_or(RawCell::Missing, RawCell::from_data));
        }
    }

    Ok(build_table(headers, columns))
}
