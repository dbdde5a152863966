use rust_xlsxwriter::Workbook;

use super::error::ExportError;
use super::model::{Cell, FileFormat, Table};

pub const CSV_MIME: &str = "text/csv";
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

impl FileFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            FileFormat::Csv => CSV_MIME,
            FileFormat::Xlsx => XLSX_MIME,
        }
    }
}

/// Serialized table, ready to be offered as a download.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub file_name: String,
    pub format: FileFormat,
}

/// Serialize `table` in `format`. The download name is `source_name` with
/// its extension swapped for the target one. No row-index column is written.
pub fn export(table: &Table, source_name: &str, format: FileFormat) -> Result<Export, ExportError> {
    let bytes = match format {
        FileFormat::Csv => write_csv(table)?,
        FileFormat::Xlsx => write_xlsx(table)?,
    };
    Ok(Export {
        bytes,
        mime_type: format.mime_type(),
        file_name: converted_file_name(source_name, format),
        format,
    })
}

/// `data.xlsx` → `data.csv`. Names without an extension get one appended.
pub fn converted_file_name(source_name: &str, format: FileFormat) -> String {
    let stem = match source_name.rfind('.') {
        Some(dot) if dot > 0 => &source_name[..dot],
        _ => source_name,
    };
    format!("{stem}.{}", format.extension())
}

fn write_csv(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.column_names())?;
    for row in 0..table.row_count() {
        writer.write_record(table.row(row).map(|cell| cell.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(bytes)
}

fn write_xlsx(table: &Table) -> Result<Vec<u8>, ExportError> {
    let too_large = || ExportError::TooLarge {
        rows: table.row_count(),
        columns: table.column_count(),
    };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, column) in table.columns().iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| too_large())?;
        sheet.write_string(0, col, &column.name)?;
    }

    for row in 0..table.row_count() {
        // Row 0 holds the header.
        let xl_row = u32::try_from(row + 1).map_err(|_| too_large())?;
        for (col, cell) in table.row(row).enumerate() {
            let col = u16::try_from(col).map_err(|_| too_large())?;
            match cell {
                Cell::Missing => {}
                Cell::Number(v) => {
                    sheet.write_number(xl_row, col, v)?;
                }
                Cell::Text(s) => {
                    sheet.write_string(xl_row, col, s)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
