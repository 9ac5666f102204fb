//! Header row and column resolution for fixed spreadsheet templates.
//!
//! Matching is exact string equality against text cells. The templates are
//! known ahead of time, so there is no fuzzy matching or trimming here.

use crate::error::LocateError;
use crate::model::{cell_at, Cell, Row};

/// Index of the first row holding a cell equal to `marker`.
pub fn locate_header_row(rows: &[Row], marker: &str) -> Result<usize, LocateError> {
    rows.iter()
        .position(|row| row.iter().any(|cell| cell.is_label(marker)))
        .ok_or_else(|| LocateError::HeaderNotFound { marker: marker.to_string() })
}

/// Index of the first cell in `row` equal to `label`.
pub fn locate_column(row: &[Cell], label: &str) -> Result<usize, LocateError> {
    row.iter()
        .position(|cell| cell.is_label(label))
        .ok_or_else(|| LocateError::ColumnNotFound { column: label.to_string() })
}

/// First row after `header` whose cell at `col` is non-blank.
pub fn first_data_row(rows: &[Row], header: usize, col: usize) -> Option<usize> {
    rows.iter()
        .enumerate()
        .skip(header + 1)
        .find(|(_, row)| !cell_at(row, col).is_blank())
        .map(|(idx, _)| idx)
}
