use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use super::{plot, UiEvents};
use crate::color::notice_color;
use crate::data::chart::{Chart, ChartKind};
use crate::data::export::Export;
use crate::data::loader::UploadedFile;
use crate::data::model::FileFormat;
use crate::state::{Action, Notice, NoticeLevel};
use crate::view::{Preview, SelectedView, SessionView};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, view: &SessionView, events: &mut UiEvents) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(events);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("{} file(s) loaded", view.files.len()));
    });
}

// ---------------------------------------------------------------------------
// Left side panel – uploaded files
// ---------------------------------------------------------------------------

/// Render the uploaded-file listing and the file selector.
pub fn side_panel(ui: &mut Ui, view: &SessionView, events: &mut UiEvents) {
    ui.heading("Uploaded Files");
    ui.separator();

    if view.files.is_empty() {
        ui.label("No files uploaded.");
        if ui.button("Upload your Excel/CSV files…").clicked() {
            open_file_dialog(events);
        }
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("uploaded_files")
                .striped(true)
                .num_columns(4)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("File Name");
                    ui.strong("File Type");
                    ui.strong("File Size");
                    ui.end_row();
                    for file in &view.files {
                        ui.label(file.name.as_str());
                        ui.label(file.file_type.as_str());
                        ui.label(file.size.as_str());
                        if ui.small_button("Remove").clicked() {
                            events.actions.push(Action::RemoveFile(file.name.clone()));
                        }
                        ui.end_row();
                    }
                });

            ui.separator();
            ui.strong("Select a file for further processing");
            let current = view.selected.as_ref().map(|s| s.name).unwrap_or_default();
            egui::ComboBox::from_id_salt("selected_file")
                .selected_text(current)
                .show_ui(ui, |ui: &mut Ui| {
                    for name in view.file_names() {
                        if ui.selectable_label(current == name, name).clicked() {
                            events.actions.push(Action::SelectFile(name.to_string()));
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Central panel – preview, cleaning, visualization, conversion
// ---------------------------------------------------------------------------

pub fn central_panel(
    ui: &mut Ui,
    view: &SessionView,
    notices: &[Notice],
    show_cleaning: &mut bool,
    events: &mut UiEvents,
) {
    let Some(selected) = &view.selected else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload your Excel/CSV files  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for notice in notices {
                ui.label(RichText::new(&notice.text).color(notice_color(notice.level)));
            }

            ui.heading("Further Processing for Data Cleaning & Visualization");
            ui.label(RichText::new(format!("Preview of {}", selected.name)).strong());
            preview_table(ui, &selected.preview);
            ui.separator();

            cleaning_section(ui, selected, show_cleaning, events);
            ui.separator();

            visualization_section(ui, selected, events);
            ui.separator();

            conversion_section(ui, selected, events);
        });
}

fn preview_table(ui: &mut Ui, preview: &Preview) {
    ui.push_id("preview_table", |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .columns(TableColumn::auto().at_least(60.0), preview.headers.len())
                .header(20.0, |mut header| {
                    for name in &preview.headers {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name.as_str());
                        });
                    }
                })
                .body(|mut body| {
                    for row in &preview.rows {
                        body.row(18.0, |mut table_row| {
                            for cell in row {
                                table_row.col(|ui: &mut Ui| {
                                    ui.label(cell.as_str());
                                });
                            }
                        });
                    }
                });
        });
    });
    ui.label(format!(
        "{} of {} rows shown",
        preview.rows.len(),
        preview.total_rows
    ));
}

fn cleaning_section(
    ui: &mut Ui,
    selected: &SelectedView,
    show_cleaning: &mut bool,
    events: &mut UiEvents,
) {
    ui.strong("Data Cleaning Options");
    ui.checkbox(show_cleaning, format!("Clean data for {}", selected.name));
    if !*show_cleaning {
        return;
    }
    ui.horizontal(|ui: &mut Ui| {
        if ui
            .button(format!("Remove Duplicates from {}", selected.name))
            .clicked()
        {
            events.actions.push(Action::RemoveDuplicates);
        }
        if ui
            .button(format!("Fill Missing Values for {}", selected.name))
            .clicked()
        {
            events.actions.push(Action::FillMissing);
        }
    });
}

fn visualization_section(ui: &mut Ui, selected: &SelectedView, events: &mut UiEvents) {
    ui.strong("Data Visualization Options");
    if !selected.can_visualize() {
        ui.label("Visualization needs at least two numeric columns.");
        return;
    }

    let columns = &selected.numeric_columns;
    let selection = &selected.selection;
    if let Some(pick) = axis_combo(ui, "x_axis", "Select X-axis", &selection.x_axis, columns) {
        events.actions.push(Action::SelectXAxis(pick));
    }
    if let Some(pick) = axis_combo(ui, "y_axis", "Select Y-axis", &selection.y_axis, columns) {
        events.actions.push(Action::SelectYAxis(pick));
    }

    if !selected.can_chart() {
        if let Some(hint) = selected.axis_hint() {
            ui.label(RichText::new(hint).color(notice_color(NoticeLevel::Warning)));
        }
        return;
    }

    let shown = selected.chart.map(Chart::kind);
    ui.horizontal(|ui: &mut Ui| {
        for kind in ChartKind::ALL {
            if ui.selectable_label(shown == Some(kind), kind.label()).clicked() {
                events.actions.push(Action::RenderChart(kind));
            }
        }
    });

    if let Some(chart) = selected.chart {
        plot::chart_view(ui, chart);
    }
}

/// A "None"-able column picker. Returns the new choice when it changed.
fn axis_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: &Option<String>,
    columns: &[String],
) -> Option<Option<String>> {
    let mut picked = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current.as_deref().unwrap_or("None"))
            .show_ui(ui, |ui: &mut Ui| {
                if ui.selectable_label(current.is_none(), "None").clicked() {
                    picked = Some(None);
                }
                for col in columns {
                    let is_current = current.as_deref() == Some(col.as_str());
                    if ui.selectable_label(is_current, col.as_str()).clicked() {
                        picked = Some(Some(col.clone()));
                    }
                }
            });
    });
    picked.filter(|p| p != current)
}

fn conversion_section(ui: &mut Ui, selected: &SelectedView, events: &mut UiEvents) {
    ui.strong("Conversion Options");

    let current = selected.selection.export_format;
    let mut format = current;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Convert {} to:", selected.name));
        for option in FileFormat::ALL {
            ui.radio_value(&mut format, option, option.label());
        }
    });
    if format != current {
        events.actions.push(Action::SelectExportFormat(format));
    }

    if ui.button(format!("Convert {}", selected.name)).clicked() {
        events.actions.push(Action::Convert);
    }

    if let Some(download) = selected.download {
        let label = format!("Download {} as {}", selected.name, download.format.label());
        if ui.button(label).clicked() {
            match save_download(download) {
                Ok(Some(path)) => {
                    log::info!("Saved {}", path.display());
                    events
                        .notices
                        .push(Notice::success(format!("Saved {}", path.display())));
                }
                Ok(None) => {}
                Err(e) => {
                    log::error!("Failed to save download: {e:#}");
                    events.notices.push(Notice::error(format!("Error: {e:#}")));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(events: &mut UiEvents) {
    let Some(paths) = rfd::FileDialog::new()
        .set_title("Upload your Excel/CSV files")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .add_filter("All files", &["*"])
        .pick_files()
    else {
        return;
    };

    let mut files = Vec::new();
    for path in paths {
        match read_upload(&path) {
            Ok(file) => files.push(file),
            Err(e) => {
                log::error!("Failed to read file: {e:#}");
                events.notices.push(Notice::error(format!("Error: {e:#}")));
            }
        }
    }
    if !files.is_empty() {
        events.actions.push(Action::Upload(files));
    }
}

fn read_upload(path: &Path) -> Result<UploadedFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?;
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(UploadedFile::new(name, bytes))
}

/// Ask where to save the converted file and write it. `None` if cancelled.
fn save_download(download: &Export) -> Result<Option<PathBuf>> {
    let ext = download.format.extension();
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save converted file")
        .set_file_name(&download.file_name)
        .add_filter(download.format.label(), &[ext])
        .save_file()
    else {
        return Ok(None);
    };
    std::fs::write(&path, &download.bytes)
        .with_context(|| format!("writing {} ({})", path.display(), download.mime_type))?;
    Ok(Some(path))
}
