use std::fmt;

// ---------------------------------------------------------------------------
// FileFormat – the two tabular formats we read and write
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileFormat {
    #[default]
    Csv,
    Xlsx,
}

impl FileFormat {
    pub const ALL: [FileFormat; 2] = [FileFormat::Csv, FileFormat::Xlsx];

    /// Match a bare, case-insensitive extension (`"CSV"`, `"xlsx"`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "xlsx" => Some(FileFormat::Xlsx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
        }
    }

    /// Human-facing name used in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            FileFormat::Csv => "CSV",
            FileFormat::Xlsx => "Excel",
        }
    }
}

// ---------------------------------------------------------------------------
// Cell – a borrowed view of one value
// ---------------------------------------------------------------------------

/// A single cell as seen through a [`Table`].
///
/// Missing values are an explicit variant rather than a NaN sentinel, so
/// numeric and text columns share the same notion of "empty".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
}

impl Cell<'_> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

/// Writes the value the way it goes into a CSV file: missing is empty,
/// numbers use the shortest representation that parses back to the same
/// `f64` (`10`, `2.5`).
impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – name plus typed storage
// ---------------------------------------------------------------------------

/// Typed column storage. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn cell(&self, row: usize) -> Cell<'_> {
        match self {
            ColumnData::Numeric(v) => match v.get(row) {
                Some(Some(x)) => Cell::Number(*x),
                _ => Cell::Missing,
            },
            ColumnData::Text(v) => match v.get(row) {
                Some(Some(s)) => Cell::Text(s),
                _ => Cell::Missing,
            },
        }
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Keep only the rows whose flag in `keep` is true.
    fn retain(&mut self, keep: &[bool]) {
        fn retain_vec<T>(values: &mut Vec<T>, keep: &[bool]) {
            let mut flags = keep.iter();
            values.retain(|_| flags.next().copied().unwrap_or(true));
        }
        match self {
            ColumnData::Numeric(v) => retain_vec(v, keep),
            ColumnData::Text(v) => retain_vec(v, keep),
        }
    }
}

/// A named column of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    /// Numeric values, or `None` for a text column.
    pub fn numbers(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete parsed file
// ---------------------------------------------------------------------------

/// An ordered collection of equally long, named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table from columns of equal length.
    pub fn new(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns.windows(2).all(|w| w[0].data.len() == w[1].data.len()),
            "columns must have equal length"
        );
        Table { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Names of numeric columns, in table order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, column: usize) -> Cell<'_> {
        self.columns
            .get(column)
            .map_or(Cell::Missing, |c| c.data.cell(row))
    }

    /// Iterate over the cells of one row, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Cell<'_>> {
        self.columns.iter().map(move |c| c.data.cell(row))
    }

    /// Drop every row whose flag is false. `keep` has one flag per row.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.row_count());
        for column in &mut self.columns {
            column.data.retain(keep);
        }
    }
}
