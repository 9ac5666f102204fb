use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ReconError, Result};
use crate::model::Row;

/// Reads one sheet of a workbook as positional rows.
///
/// Implementations must preserve blank rows and keep column positions
/// aligned from the first column, so indices resolved on the header row
/// apply to every data row.
pub trait TabularSource {
    fn read_sheet(&self, path: &Path, sheet: &str) -> Result<Vec<Row>>;
}

/// Sheets held in memory, keyed by (path, sheet name).
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    sheets: HashMap<(PathBuf, String), Vec<Row>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, sheet: &str, rows: Vec<Row>) {
        self.sheets.insert((path.into(), sheet.to_string()), rows);
    }

    pub fn with_sheet(mut self, path: impl Into<PathBuf>, sheet: &str, rows: Vec<Row>) -> Self {
        self.insert(path, sheet, rows);
        self
    }
}

impl TabularSource for MemorySource {
    fn read_sheet(&self, path: &Path, sheet: &str) -> Result<Vec<Row>> {
        self.sheets
            .get(&(path.to_path_buf(), sheet.to_string()))
            .cloned()
            .ok_or_else(|| ReconError::Read {
                path: path.to_path_buf(),
                sheet: sheet.to_string(),
                message: "sheet not found".into(),
            })
    }
}
