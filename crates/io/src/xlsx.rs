// Excel file import (xlsx, xls, xlsb, ods) and missing-code export (xlsx only)
//
// Import: sheets come back as positional rows, re-based to A1 so column
// indices resolved on a header row line up with every data row.
// Export: a single plain table, codes written as text to keep leading zeros.

use std::path::Path;
use std::time::Instant;

use calamine::{open_workbook_auto, Data, Reader};
use clasif_recon::{Cell, MissingCodeRecord, ReconError, Row, TabularSource};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use crate::OUTPUT_SHEET;

/// Maximum dimensions read from a sheet
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Reads sheets from workbooks on disk through calamine.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxSource;

impl TabularSource for XlsxSource {
    fn read_sheet(&self, path: &Path, sheet: &str) -> Result<Vec<Row>, ReconError> {
        import_sheet(path, sheet).map_err(|message| ReconError::Read {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
            message,
        })
    }
}

/// Import one sheet of an Excel file as rows of cells
pub fn import_sheet(path: &Path, sheet_name: &str) -> Result<Vec<Row>, String> {
    let start_time = Instant::now();

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
        return Err(format!("no sheet named '{}'", sheet_name));
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let (height, width) = range.get_size();
    if height == 0 || width == 0 {
        return Ok(Vec::new());
    }

    // Range start offset (data may not begin at A1)
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let start_row = (start_row as usize).min(MAX_ROWS);
    let start_col = (start_col as usize).min(MAX_COLS);

    let mut rows: Vec<Row> = vec![Vec::new(); start_row];
    for row in range.rows().take(MAX_ROWS - start_row) {
        let mut cells = vec![Cell::Empty; start_col];
        cells.extend(row.iter().take(MAX_COLS - start_col).map(to_cell));
        rows.push(cells);
    }

    tracing::debug!(
        path = %path.display(),
        sheet = sheet_name,
        rows = rows.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "imported sheet"
    );
    Ok(rows)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::String(s.clone()),
        Data::Float(n) => Cell::Float(*n),
        Data::Int(n) => Cell::Int(*n),
        Data::Bool(b) => Cell::Bool(*b),
        // Store error as text representation
        Data::Error(e) => Cell::String(format!("#{:?}", e)),
        // Dates stay serial numbers; no template column holds one
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::String(s.clone()),
    }
}

/// Export missing-code records to a single-sheet XLSX file
pub fn export(records: &[MissingCodeRecord], path: &Path) -> Result<(), String> {
    let mut workbook = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook
        .add_worksheet()
        .set_name(OUTPUT_SHEET)
        .map_err(|e| format!("Failed to create sheet '{}': {}", OUTPUT_SHEET, e))?;

    for (col, title) in MissingCodeRecord::COLUMNS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *title, &header_format)
            .map_err(|e| format!("Failed to write header: {}", e))?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, value) in record.fields().iter().enumerate() {
            worksheet
                .write_string(row, col as u16, value)
                .map_err(|e| format!("Failed to write row {}: {}", row, e))?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("Failed to freeze header: {}", e))?;
    worksheet.autofit();

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))
}
