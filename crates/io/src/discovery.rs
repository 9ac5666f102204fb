//! Report file discovery for the input folder.

use std::path::{Path, PathBuf};

use clasif_recon::ReconError;
use tracing::debug;

/// Prefix of editor lock files left next to open workbooks.
pub const LOCK_PREFIX: &str = ".~lock.";

/// Lists report files in `dir`, skipping lock files and subdirectories.
///
/// Returns files sorted by file name.
pub fn discover_reports(dir: &Path) -> Result<Vec<PathBuf>, ReconError> {
    let io_err = |source| ReconError::Io { path: dir.to_path_buf(), source };
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.is_file() {
            continue;
        }

        let is_lock = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOCK_PREFIX));
        if is_lock {
            debug!(path = %path.display(), "skipping lock file");
            continue;
        }

        files.push(path);
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_reports_sorted_without_locks() {
        let dir = TempDir::new().unwrap();
        for name in [
            "20230731_F_T_1_1_02_3.xlsx",
            "20230630_F_T_1_1_02_3.xlsx",
            ".~lock.20230630_F_T_1_1_02_3.xlsx#",
        ] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("archive")).unwrap();

        let files = discover_reports(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["20230630_F_T_1_1_02_3.xlsx", "20230731_F_T_1_1_02_3.xlsx"]);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = discover_reports(&dir.path().join("files")).unwrap_err();
        assert!(matches!(err, ReconError::Io { .. }));
    }
}
