// File I/O operations

pub mod csv;
pub mod discovery;
pub mod json;
pub mod xlsx;

use std::path::Path;

use clasif_recon::{MissingCodeRecord, OutputFormat, ReconError};

pub use discovery::discover_reports;
pub use xlsx::XlsxSource;

/// Sheet name used for xlsx output.
pub const OUTPUT_SHEET: &str = "Missing Codes";

/// Write the missing-code table in the requested format.
pub fn write_report(records: &[MissingCodeRecord], path: &Path, format: OutputFormat) -> Result<(), ReconError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ReconError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let result = match format {
        OutputFormat::Xlsx => xlsx::export(records, path),
        OutputFormat::Csv => csv::export(records, path),
        OutputFormat::Json => json::export(records, path),
    };
    result.map_err(|message| ReconError::Write {
        path: path.to_path_buf(),
        message,
    })?;

    tracing::debug!(path = %path.display(), %format, records = records.len(), "wrote report");
    Ok(())
}
