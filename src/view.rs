use crate::data::chart::Chart;
use crate::data::error::ChartError;
use crate::data::export::Export;
use crate::data::model::{Cell, Table};
use crate::state::{FileSelection, Session};

// ---------------------------------------------------------------------------
// View model – what the UI draws, derived from the session
// ---------------------------------------------------------------------------

/// One line of the "Uploaded Files" listing.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRow {
    pub name: String,
    pub file_type: String,
    pub size: String,
}

/// The first rows of a table, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl Preview {
    pub fn of(table: &Table, max_rows: usize) -> Self {
        let shown = table.row_count().min(max_rows);
        Preview {
            headers: table.column_names().map(str::to_string).collect(),
            rows: (0..shown)
                .map(|row| table.row(row).map(preview_cell).collect())
                .collect(),
            total_rows: table.row_count(),
        }
    }
}

fn preview_cell(cell: Cell<'_>) -> String {
    if cell.is_missing() {
        "<null>".to_string()
    } else {
        cell.to_string()
    }
}

/// Everything shown for the selected file.
#[derive(Debug, Clone)]
pub struct SelectedView<'a> {
    pub name: &'a str,
    pub preview: Preview,
    pub numeric_columns: Vec<String>,
    pub selection: FileSelection,
    pub chart: Option<&'a Chart>,
    pub download: Option<&'a Export>,
}

impl SelectedView<'_> {
    /// Visualization needs two numeric columns to choose from.
    pub fn can_visualize(&self) -> bool {
        self.numeric_columns.len() >= 2
    }

    /// Both axes chosen and different: chart buttons may be offered.
    pub fn can_chart(&self) -> bool {
        self.can_visualize() && self.axis_hint().is_none()
    }

    /// Warning to show under the axis selectors, if any.
    pub fn axis_hint(&self) -> Option<String> {
        match (&self.selection.x_axis, &self.selection.y_axis) {
            (Some(x), Some(y)) if x == y => Some(ChartError::IdenticalAxes.to_string()),
            (Some(_), Some(_)) => None,
            _ => Some("Please select both X and Y axes to proceed with visualization.".into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionView<'a> {
    pub files: Vec<FileRow>,
    pub selected: Option<SelectedView<'a>>,
}

impl<'a> SessionView<'a> {
    pub fn build(session: &'a Session, preview_rows: usize) -> Self {
        let files = session
            .store()
            .iter()
            .map(|entry| FileRow {
                name: entry.name.clone(),
                file_type: format!(".{}", entry.format.extension()),
                size: format!("{:.2} KB", entry.size_kb()),
            })
            .collect();

        let selected = session.selected_entry().map(|entry| SelectedView {
            name: entry.name.as_str(),
            preview: Preview::of(&entry.table, preview_rows),
            numeric_columns: entry.table.numeric_column_names(),
            selection: session.selection(),
            chart: session.chart(),
            download: session.download(),
        });

        SessionView { files, selected }
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.name.as_str())
    }
}
