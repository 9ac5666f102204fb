use std::path::Path;

use tracing::warn;

use crate::config::ReportConfig;
use crate::error::{LocateError, ReconError, Result};
use crate::header::{first_data_row, locate_column, locate_header_row};
use crate::model::{cell_at, CodeType, ExtractedCodes, Row};
use crate::source::TabularSource;

/// Resolved column positions of a report sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReportLayout {
    header: usize,
    indicator: usize,
    functional_code: usize,
    functional_label: usize,
    economic_code: usize,
    economic_label: usize,
}

impl ReportLayout {
    fn locate(rows: &[Row], report: &ReportConfig) -> Result<Self, LocateError> {
        let cols = &report.columns;
        let header = locate_header_row(rows, &cols.indicator_type)?;
        let row = &rows[header];
        Ok(Self {
            header,
            indicator: locate_column(row, &cols.indicator_type)?,
            functional_code: locate_column(row, &cols.functional_code)?,
            functional_label: locate_column(row, &cols.functional_label)?,
            economic_code: locate_column(row, &cols.economic_code)?,
            economic_label: locate_column(row, &cols.economic_label)?,
        })
    }
}

/// Read one entity report and collect its codes in raw reporting form.
pub fn extract_codes(source: &dyn TabularSource, path: &Path, report: &ReportConfig) -> Result<ExtractedCodes> {
    let rows = source.read_sheet(path, &report.sheet)?;
    codes_from_rows(&rows, report).map_err(|source| ReconError::Layout {
        path: path.to_path_buf(),
        sheet: report.sheet.clone(),
        source,
    })
}

/// Rows without a functional code (totals, subtotals) are left out silently.
pub fn codes_from_rows(rows: &[Row], report: &ReportConfig) -> Result<ExtractedCodes, LocateError> {
    let layout = ReportLayout::locate(rows, report)?;
    let mut codes = ExtractedCodes::default();

    let Some(start) = first_data_row(rows, layout.header, layout.indicator) else {
        return Ok(codes);
    };

    for (idx, row) in rows.iter().enumerate().skip(start) {
        let functional_code = cell_at(row, layout.functional_code);
        if functional_code.is_blank() {
            continue;
        }

        let indicator = cell_at(row, layout.indicator).as_text();
        let indicator = indicator.trim();
        if indicator.is_empty() {
            warn!(row = idx + 1, "report row has a code but no indicator type, skipped");
            continue;
        }

        codes.insert(
            indicator,
            CodeType::Functional,
            functional_code.as_text(),
            cell_at(row, layout.functional_label).as_text(),
        );

        if indicator != report.revenue_indicator {
            codes.insert(
                indicator,
                CodeType::Economic,
                cell_at(row, layout.economic_code).as_text(),
                cell_at(row, layout.economic_label).as_text(),
            );
        }
    }

    Ok(codes)
}
