use std::path::PathBuf;

use thiserror::Error;

/// Failure to resolve a header row or a named column within it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    /// No row contains a cell equal to the marker label.
    #[error("no header row containing '{marker}'")]
    HeaderNotFound { marker: String },
    /// The header row has no cell equal to the column label.
    #[error("header row has no column '{column}'")]
    ColumnNotFound { column: String },
}

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty label, duplicate sheet, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Header row or column missing in a sheet.
    #[error("{}, sheet '{sheet}': {source}", path.display())]
    Layout {
        path: PathBuf,
        sheet: String,
        #[source]
        source: LocateError,
    },
    /// Workbook or sheet could not be read.
    #[error("cannot read {}, sheet '{sheet}': {message}", path.display())]
    Read {
        path: PathBuf,
        sheet: String,
        message: String,
    },
    /// Report file name does not carry the entity identifiers.
    #[error("file name '{name}' has fewer than 5 '_'-separated tokens")]
    FileName { name: String },
    /// Filesystem error (directory listing, etc.).
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Output could not be written.
    #[error("cannot write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

impl ReconError {
    /// Errors confined to a single report file. The batch may skip the file
    /// and continue unless running strict.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::Layout { .. } | Self::Read { .. } | Self::FileName { .. })
    }
}

pub type Result<T, E = ReconError> = std::result::Result<T, E>;
