//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain     | Description                                   |
//! |------|------------|-----------------------------------------------|
//! | 0    | Universal  | Success                                       |
//! | 1    | Universal  | General error (unspecified)                   |
//! | 2    | Universal  | CLI usage error (bad args, missing folder)    |
//! | 3    | reference  | Config invalid or reference workbook broken   |
//! | 4    | report     | Report file unreadable (strict mode only)     |
//! | 5    | output     | Output file could not be written              |
//! | 6    | run        | Missing codes found (`--fail-on-missing`)     |

use clasif_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing input folder.
pub const EXIT_USAGE: u8 = 2;

/// Config file invalid, or reference workbook missing a sheet, header or column.
pub const EXIT_REFERENCE: u8 = 3;

/// A report file failed extraction and `--strict` was set.
pub const EXIT_REPORT: u8 = 4;

/// Writing the missing-code table failed.
pub const EXIT_WRITE: u8 = 5;

/// Run completed, missing codes were found and `--fail-on-missing` was set.
pub const EXIT_MISSING: u8 = 6;

/// Map an error raised while reconciling reports to its exit code.
pub fn report_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_REFERENCE,
        ReconError::Layout { .. } | ReconError::Read { .. } | ReconError::FileName { .. } => EXIT_REPORT,
        ReconError::Write { .. } => EXIT_WRITE,
        ReconError::Io { .. } => EXIT_ERROR,
    }
}
