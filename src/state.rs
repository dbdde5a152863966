use std::collections::HashMap;

use crate::data::chart::{Chart, ChartAdapter, ChartKind};
use crate::data::clean::{fill_missing, remove_duplicates};
use crate::data::export::{export, Export};
use crate::data::loader::{ingest, UploadedFile};
use crate::data::model::{FileFormat, Table};
use crate::data::store::{StoredTable, TableStore};

// ---------------------------------------------------------------------------
// Actions and notices
// ---------------------------------------------------------------------------

/// One user interaction, produced by the UI and consumed by [`Session::dispatch`].
#[derive(Debug, Clone)]
pub enum Action {
    Upload(Vec<UploadedFile>),
    SelectFile(String),
    RemoveFile(String),
    RemoveDuplicates,
    FillMissing,
    SelectXAxis(Option<String>),
    SelectYAxis(Option<String>),
    RenderChart(ChartKind),
    SelectExportFormat(FileFormat),
    Convert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// An inline message shown to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Choices the user made for one file. Kept per file so switching back and
/// forth restores them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileSelection {
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub export_format: FileFormat,
}

/// Everything one user session holds. Created when the app starts and
/// dropped with it; nothing is persisted.
pub struct Session {
    store: TableStore,
    selected: Option<String>,
    selections: HashMap<String, FileSelection>,
    /// Last rendered chart for the selected file.
    chart: Option<Chart>,
    /// Last conversion result for the selected file.
    download: Option<Export>,
    charts: ChartAdapter,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ChartAdapter::default())
    }
}

impl Session {
    pub fn new(charts: ChartAdapter) -> Self {
        Self {
            store: TableStore::default(),
            selected: None,
            selections: HashMap::new(),
            chart: None,
            download: None,
            charts,
        }
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    #[cfg(test)]
    pub fn selected_name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_entry(&self) -> Option<&StoredTable> {
        self.store.get(self.selected.as_deref()?)
    }

    pub fn selected_table(&self) -> Option<&Table> {
        self.selected_entry().map(|e| &e.table)
    }

    /// Selections of the selected file (defaults when nothing was chosen yet).
    pub fn selection(&self) -> FileSelection {
        self.selected
            .as_ref()
            .and_then(|name| self.selections.get(name))
            .cloned()
            .unwrap_or_default()
    }

    pub fn chart(&self) -> Option<&Chart> {
        self.chart.as_ref()
    }

    pub fn download(&self) -> Option<&Export> {
        self.download.as_ref()
    }

    /// Apply one action and report what happened.
    pub fn dispatch(&mut self, action: Action) -> Vec<Notice> {
        match action {
            Action::Upload(files) => self.upload(files),
            Action::SelectFile(name) => self.select_file(name),
            Action::RemoveFile(name) => self.remove_file(&name),
            Action::RemoveDuplicates => self.remove_duplicates(),
            Action::FillMissing => self.fill_missing(),
            Action::SelectXAxis(col) => self.select_axis(Axis::X, col),
            Action::SelectYAxis(col) => self.select_axis(Axis::Y, col),
            Action::RenderChart(kind) => self.render_chart(kind),
            Action::SelectExportFormat(format) => {
                if let Some(sel) = self.selection_mut() {
                    sel.export_format = format;
                }
                self.download = None;
                Vec::new()
            }
            Action::Convert => self.convert(),
        }
    }

    // -- dependent views --

    /// Drop views computed from the selected table.
    fn invalidate(&mut self) {
        self.chart = None;
        self.download = None;
    }

    fn selection_mut(&mut self) -> Option<&mut FileSelection> {
        let name = self.selected.clone()?;
        Some(self.selections.entry(name).or_default())
    }

    fn selected_entry_mut(&mut self) -> Option<&mut StoredTable> {
        let name = self.selected.as_deref()?;
        self.store.get_mut(name)
    }

    // -- handlers --

    fn upload(&mut self, files: Vec<UploadedFile>) -> Vec<Notice> {
        let mut notices = Vec::new();
        for file in files {
            if self.store.contains(file.name()) {
                log::debug!("{} already loaded, keeping the first upload", file.name());
                continue;
            }
            match ingest(&file) {
                Ok((format, table)) => {
                    log::info!(
                        "Loaded {} ({} rows, {} columns)",
                        file.name(),
                        table.row_count(),
                        table.column_count()
                    );
                    self.store.insert(StoredTable {
                        name: file.name().to_string(),
                        format,
                        size_bytes: file.size(),
                        table,
                    });
                }
                Err(e) => {
                    log::warn!("Skipping {}: {e}", file.name());
                    notices.push(Notice::error(format!("❌ {}: {e}", file.name())));
                }
            }
        }

        if self.selected_entry().is_none() {
            self.selected = self.store.names().next().map(str::to_string);
            self.invalidate();
        }
        notices
    }

    fn select_file(&mut self, name: String) -> Vec<Notice> {
        if !self.store.contains(&name) {
            return vec![Notice::warning(format!("No file named {name} is loaded"))];
        }
        if self.selected.as_deref() != Some(name.as_str()) {
            log::debug!("Selected {name}");
            self.selected = Some(name);
            self.invalidate();
        }
        Vec::new()
    }

    fn remove_file(&mut self, name: &str) -> Vec<Notice> {
        if self.store.remove(name).is_none() {
            return vec![Notice::warning(format!("No file named {name} is loaded"))];
        }
        self.selections.remove(name);
        if self.selected.as_deref() == Some(name) {
            self.selected = self.store.names().next().map(str::to_string);
            self.invalidate();
        }
        log::info!("Removed {name}");
        vec![Notice::info(format!("Removed {name}"))]
    }

    fn remove_duplicates(&mut self) -> Vec<Notice> {
        let Some(entry) = self.selected_entry_mut() else {
            return vec![no_file_selected()];
        };
        let removed = remove_duplicates(&mut entry.table);
        log::info!("Removed {removed} duplicate rows from {}", entry.name);
        self.invalidate();
        vec![Notice::success(format!(
            "✅ Duplicates Removed! ({removed} rows dropped)"
        ))]
    }

    fn fill_missing(&mut self) -> Vec<Notice> {
        let Some(entry) = self.selected_entry_mut() else {
            return vec![no_file_selected()];
        };
        let report = fill_missing(&mut entry.table);
        log::info!(
            "Filled {} missing cells in {}",
            report.cells_filled(),
            entry.name
        );
        self.invalidate();

        let mut notices: Vec<Notice> = report
            .errors
            .iter()
            .map(|e| {
                log::warn!("{e}");
                Notice::warning(e.to_string())
            })
            .collect();
        notices.push(Notice::success(format!(
            "✅ Missing values have been filled! ({} cells)",
            report.cells_filled()
        )));
        notices
    }

    fn select_axis(&mut self, axis: Axis, column: Option<String>) -> Vec<Notice> {
        let Some(table) = self.selected_table() else {
            return vec![no_file_selected()];
        };
        if let Some(name) = &column {
            if !table.column(name).is_some_and(|c| c.is_numeric()) {
                return vec![Notice::warning(format!("'{name}' is not a numeric column"))];
            }
        }
        if let Some(sel) = self.selection_mut() {
            match axis {
                Axis::X => sel.x_axis = column,
                Axis::Y => sel.y_axis = column,
            }
        }
        self.chart = None;
        Vec::new()
    }

    fn render_chart(&mut self, kind: ChartKind) -> Vec<Notice> {
        let Some(table) = self.selected_table() else {
            return vec![no_file_selected()];
        };
        let sel = self.selection();
        let (Some(x), Some(y)) = (sel.x_axis.as_deref(), sel.y_axis.as_deref()) else {
            return vec![Notice::warning(
                "Please select both X and Y axes to proceed with visualization.",
            )];
        };

        match self.charts.render(table, x, y, kind) {
            Ok(chart) => {
                self.chart = Some(chart);
                Vec::new()
            }
            Err(e) => {
                log::warn!("No chart: {e}");
                self.chart = None;
                vec![Notice::warning(e.to_string())]
            }
        }
    }

    fn convert(&mut self) -> Vec<Notice> {
        let Some(entry) = self.selected_entry() else {
            return vec![no_file_selected()];
        };
        let format = self.selection().export_format;
        match export(&entry.table, &entry.name, format) {
            Ok(out) => {
                log::info!("Converted {} to {}", entry.name, out.file_name);
                self.download = Some(out);
                vec![Notice::success("✅ File conversion successful!")]
            }
            Err(e) => {
                log::error!("Conversion of {} failed: {e}", entry.name);
                self.download = None;
                vec![Notice::error(format!("❌ Conversion failed: {e}"))]
            }
        }
    }
}

fn no_file_selected() -> Notice {
    Notice::warning("Select a file first")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::export::CSV_MIME;
    use crate::data::model::Cell;

    const DATA_CSV: &str = "region,sales\nnorth,10\nsouth,20\neast,\nwest,40\nnorth,30\n";

    fn upload(session: &mut Session, name: &str, content: &[u8]) -> Vec<Notice> {
        session.dispatch(Action::Upload(vec![UploadedFile::new(name, content.to_vec())]))
    }

    fn numeric_session() -> Session {
        let mut session = Session::default();
        upload(&mut session, "xy.csv", b"x,y\n1,10\n2,20\n3,30\n");
        session
    }

    #[test]
    fn test_fill_missing_scenario() {
        let mut session = Session::default();
        assert!(upload(&mut session, "data.csv", DATA_CSV.as_bytes()).is_empty());
        assert_eq!(session.selected_name(), Some("data.csv"));

        let notices = session.dispatch(Action::FillMissing);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        let table = session.selected_table().unwrap();
        assert_eq!(table.cell(2, 1), Cell::Number(25.0));
    }

    #[test]
    fn test_unsupported_and_malformed_files_are_skipped() {
        let mut session = Session::default();
        let notices = session.dispatch(Action::Upload(vec![
            UploadedFile::new("notes.txt", b"hello".to_vec()),
            UploadedFile::new("bad.csv", b"a,b\n1,2,3\n".to_vec()),
            UploadedFile::new("good.csv", b"a\n1\n".to_vec()),
        ]));
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.level == NoticeLevel::Error));
        assert!(notices[0].text.contains(".txt"));
        assert_eq!(session.store().names().collect::<Vec<_>>(), vec!["good.csv"]);
        assert_eq!(session.selected_name(), Some("good.csv"));
    }

    #[test]
    fn test_reupload_does_not_reparse() {
        let mut session = Session::default();
        upload(&mut session, "data.csv", DATA_CSV.as_bytes());
        session.dispatch(Action::FillMissing);
        upload(&mut session, "data.csv", DATA_CSV.as_bytes());
        assert_eq!(session.store().len(), 1);
        let table = session.selected_table().unwrap();
        assert_eq!(table.column("sales").unwrap().data.missing_count(), 0);
    }

    #[test]
    fn test_remove_duplicates_action() {
        let mut session = Session::default();
        upload(&mut session, "d.csv", b"a,b\n1,x\n1,x\n2,y\n");
        let notices = session.dispatch(Action::RemoveDuplicates);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(session.selected_table().unwrap().row_count(), 2);
        session.dispatch(Action::RemoveDuplicates);
        assert_eq!(session.selected_table().unwrap().row_count(), 2);
    }

    #[test]
    fn test_undefined_mean_warns_but_fills_others() {
        let mut session = Session::default();
        upload(&mut session, "d.csv", b"a,b\n1,\n,\n3,\n");
        let notices = session.dispatch(Action::FillMissing);
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(notices[0].text.contains("'b'"));
        let table = session.selected_table().unwrap();
        assert_eq!(table.cell(1, 0), Cell::Number(2.0));
        assert!(table.cell(1, 1).is_missing());
    }

    #[test]
    fn test_identical_axes_produce_no_chart() {
        let mut session = numeric_session();
        session.dispatch(Action::SelectXAxis(Some("x".into())));
        session.dispatch(Action::SelectYAxis(Some("x".into())));
        let notices = session.dispatch(Action::RenderChart(ChartKind::Bar));
        assert!(session.chart().is_none());
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(notices[0].text.contains("cannot be the same"));
    }

    #[test]
    fn test_missing_axis_warns() {
        let mut session = numeric_session();
        session.dispatch(Action::SelectXAxis(Some("x".into())));
        let notices = session.dispatch(Action::RenderChart(ChartKind::Line));
        assert!(session.chart().is_none());
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_render_and_invalidate_chart() {
        let mut session = numeric_session();
        session.dispatch(Action::SelectXAxis(Some("x".into())));
        session.dispatch(Action::SelectYAxis(Some("y".into())));
        assert!(session.dispatch(Action::RenderChart(ChartKind::Line)).is_empty());
        assert_eq!(session.chart().unwrap().kind(), ChartKind::Line);

        session.dispatch(Action::RemoveDuplicates);
        assert!(session.chart().is_none());
    }

    #[test]
    fn test_pie_with_eleven_categories_warns() {
        let mut content = String::from("x,y\n");
        for i in 0..11 {
            content.push_str(&format!("{i},1\n"));
        }
        let mut session = Session::default();
        upload(&mut session, "pie.csv", content.as_bytes());
        session.dispatch(Action::SelectXAxis(Some("x".into())));
        session.dispatch(Action::SelectYAxis(Some("y".into())));
        let notices = session.dispatch(Action::RenderChart(ChartKind::Pie));
        assert!(session.chart().is_none());
        assert!(notices[0].text.contains("Too many unique values"));
    }

    #[test]
    fn test_text_axis_rejected() {
        let mut session = Session::default();
        upload(&mut session, "data.csv", DATA_CSV.as_bytes());
        let notices = session.dispatch(Action::SelectXAxis(Some("region".into())));
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(session.selection().x_axis, None);
    }

    #[test]
    fn test_convert_xlsx_to_csv() {
        let table = crate::data::loader::parse(DATA_CSV.as_bytes(), FileFormat::Csv).unwrap();
        let xlsx = export(&table, "data.csv", FileFormat::Xlsx).unwrap();

        let mut session = Session::default();
        upload(&mut session, "data.xlsx", &xlsx.bytes);
        session.dispatch(Action::SelectExportFormat(FileFormat::Csv));
        let notices = session.dispatch(Action::Convert);
        assert_eq!(notices[0].level, NoticeLevel::Success);

        let download = session.download().unwrap();
        assert_eq!(download.file_name, "data.csv");
        assert_eq!(download.mime_type, CSV_MIME);
        let back = crate::data::loader::parse(&download.bytes, FileFormat::Csv).unwrap();
        assert_eq!(back.row_count(), 5);
    }

    #[test]
    fn test_selections_are_kept_per_file() {
        let mut session = numeric_session();
        upload(&mut session, "other.csv", b"p,q\n1,2\n");
        session.dispatch(Action::SelectXAxis(Some("x".into())));
        session.dispatch(Action::SelectExportFormat(FileFormat::Xlsx));

        session.dispatch(Action::SelectFile("other.csv".into()));
        assert_eq!(session.selection(), FileSelection::default());

        session.dispatch(Action::SelectFile("xy.csv".into()));
        let sel = session.selection();
        assert_eq!(sel.x_axis.as_deref(), Some("x"));
        assert_eq!(sel.export_format, FileFormat::Xlsx);
    }

    #[test]
    fn test_remove_selected_file_reselects() {
        let mut session = numeric_session();
        upload(&mut session, "other.csv", b"p,q\n1,2\n");
        session.dispatch(Action::RemoveFile("xy.csv".into()));
        assert_eq!(session.selected_name(), Some("other.csv"));
        session.dispatch(Action::RemoveFile("other.csv".into()));
        assert_eq!(session.selected_name(), None);
        assert_eq!(
            session.dispatch(Action::FillMissing),
            vec![no_file_selected()]
        );
    }
}
