// CSV export of the missing-code table

use std::path::Path;

use clasif_recon::MissingCodeRecord;

/// Writes a header row followed by one row per record.
pub fn export(records: &[MissingCodeRecord], path: &Path) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| e.to_string())?;
    writer
        .write_record(MissingCodeRecord::COLUMNS)
        .map_err(|e| e.to_string())?;
    for record in records {
        writer.write_record(record.fields()).map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())
}
