// JSON export of the missing-code table

use std::io::{BufWriter, Write};
use std::path::Path;

use clasif_recon::MissingCodeRecord;

/// Writes records as a JSON array of objects.
pub fn export(records: &[MissingCodeRecord], path: &Path) -> Result<(), String> {
    let file = std::fs::File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records).map_err(|e| e.to_string())?;
    writer.write_all(b"\n").map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())
}
